//! Log setup for the command-line front end.
//!
//! Logs always go to stderr. Stdout belongs to command output, which callers
//! may be parsing as JSON.

use crate::config::TelemetryConfig;
use std::io::IsTerminal;
use tracing_subscriber::filter::{LevelFilter, ParseError};
use tracing_subscriber::EnvFilter;

const CRATE_TARGET: &str = "leave_planner";

#[derive(Debug, thiserror::Error)]
pub enum TelemetryError {
    #[error("log filter '{directive}' is not valid")]
    InvalidFilter {
        directive: String,
        #[source]
        source: ParseError,
    },
    #[error("a global tracing subscriber is already installed")]
    AlreadyInstalled(#[source] Box<dyn std::error::Error + Send + Sync>),
}

/// How command output is consumed, which decides how chatty logging may be.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogOutput {
    Human,
    /// `--json` output: only warnings and errors reach stderr.
    Machine,
}

impl LogOutput {
    pub fn for_json(json: bool) -> Self {
        if json {
            Self::Machine
        } else {
            Self::Human
        }
    }
}

/// Turns the configured log level into an `EnvFilter` directive.
///
/// A bare level applies to this crate only, with dependencies held at `warn`.
/// Anything else is taken as a full directive and used verbatim.
pub fn filter_directive(log_level: &str, output: LogOutput) -> String {
    match log_level.trim().parse::<LevelFilter>() {
        Ok(level) => {
            let level = match output {
                LogOutput::Human => level,
                LogOutput::Machine => level.min(LevelFilter::WARN),
            };
            format!("warn,{CRATE_TARGET}={level}")
        }
        Err(_) => log_level.trim().to_string(),
    }
}

pub fn build_filter(
    config: &TelemetryConfig,
    output: LogOutput,
) -> Result<EnvFilter, TelemetryError> {
    let directive = filter_directive(&config.log_level, output);
    EnvFilter::try_new(&directive)
        .map_err(|source| TelemetryError::InvalidFilter { directive, source })
}

/// Installs the global subscriber. `RUST_LOG` wins over the configured level.
pub fn init(config: &TelemetryConfig, output: LogOutput) -> Result<(), TelemetryError> {
    let env_filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => build_filter(config, output)?,
    };
    let ansi = output == LogOutput::Human && std::io::stderr().is_terminal();

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .with_ansi(ansi)
        .try_init()
        .map_err(TelemetryError::AlreadyInstalled)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(log_level: &str) -> TelemetryConfig {
        TelemetryConfig {
            log_level: log_level.to_string(),
        }
    }

    #[test]
    fn bare_level_is_scoped_to_this_crate() {
        assert_eq!(
            filter_directive("debug", LogOutput::Human),
            "warn,leave_planner=debug"
        );
        assert_eq!(
            filter_directive(" INFO ", LogOutput::Human),
            "warn,leave_planner=info"
        );
    }

    #[test]
    fn json_output_caps_logging_at_warn() {
        assert_eq!(
            filter_directive("trace", LogOutput::Machine),
            "warn,leave_planner=warn"
        );
        assert_eq!(
            filter_directive("error", LogOutput::Machine),
            "warn,leave_planner=error"
        );
        assert_eq!(LogOutput::for_json(true), LogOutput::Machine);
        assert_eq!(LogOutput::for_json(false), LogOutput::Human);
    }

    #[test]
    fn full_directives_pass_through() {
        assert_eq!(
            filter_directive("leave_planner::import=trace,info", LogOutput::Machine),
            "leave_planner::import=trace,info"
        );
        assert!(build_filter(&config("leave_planner::import=trace,info"), LogOutput::Human).is_ok());
    }

    #[test]
    fn rejects_unparseable_directive() {
        match build_filter(&config("leave_planner=loud"), LogOutput::Human) {
            Err(err @ TelemetryError::InvalidFilter { .. }) => {
                assert_eq!(err.to_string(), "log filter 'leave_planner=loud' is not valid");
                assert!(std::error::Error::source(&err).is_some());
            }
            other => panic!("expected invalid filter, got {other:?}"),
        }
    }
}
