use std::env;
use std::fmt;
use std::str::FromStr;

use crate::leave::company::UserSelector;

const DEFAULT_ANNUAL_ALLOWANCE: f64 = 20.0;

/// Distinguishes runtime behavior for different stages of deployment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnvironment {
    Development,
    Test,
    Production,
}

impl AppEnvironment {
    fn from_str(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "prod" | "production" => Self::Production,
            "test" | "ci" => Self::Test,
            _ => Self::Development,
        }
    }
}

/// Top-level configuration for the application.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: AppEnvironment,
    pub telemetry: TelemetryConfig,
    pub policy: LeavePolicyConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let environment = AppEnvironment::from_str(
            &env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
        );

        let log_level = env::var("APP_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        let annual_allowance = match env::var("LEAVE_ANNUAL_ALLOWANCE") {
            Ok(raw) => parse_allowance(&raw)?,
            Err(_) => DEFAULT_ANNUAL_ALLOWANCE,
        };

        let default_selector = match env::var("LEAVE_DEFAULT_SELECTOR") {
            Ok(raw) => UserSelector::from_str(&raw).map_err(|_| ConfigError::InvalidSelector)?,
            Err(_) => UserSelector::All,
        };

        Ok(Self {
            environment,
            telemetry: TelemetryConfig { log_level },
            policy: LeavePolicyConfig {
                annual_allowance,
                default_selector,
            },
        })
    }
}

fn parse_allowance(raw: &str) -> Result<f64, ConfigError> {
    let value = raw
        .trim()
        .parse::<f64>()
        .map_err(|_| ConfigError::InvalidAllowance)?;
    if value.is_finite() && value >= 0.0 {
        Ok(value)
    } else {
        Err(ConfigError::InvalidAllowance)
    }
}

/// Tracing controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
}

/// Company-wide leave defaults applied when an employee carries no override.
#[derive(Debug, Clone)]
pub struct LeavePolicyConfig {
    pub annual_allowance: f64,
    pub default_selector: UserSelector,
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidAllowance,
    InvalidSelector,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidAllowance => {
                write!(f, "LEAVE_ANNUAL_ALLOWANCE must be a non-negative number")
            }
            ConfigError::InvalidSelector => {
                write!(f, "LEAVE_DEFAULT_SELECTOR must be 'all' or a user id")
            }
        }
    }
}

impl std::error::Error for ConfigError {}
