use crate::render;
use chrono::{Local, NaiveDate};
use clap::{Args, Parser, Subcommand};
use leave_planner::config::AppConfig;
use leave_planner::error::AppError;
use leave_planner::import::LeaveCsvImporter;
use leave_planner::leave::{
    company_report, standard_leave_types, summarize, usage_by_type, Actor, CompanyLeaveStore,
    LeaveRequest, LeaveType, Permission, UserId, UserSelector,
};
use leave_planner::planner::YearPlanner;
use leave_planner::telemetry::{self, LogOutput};
use std::collections::BTreeMap;
use std::path::PathBuf;
use tracing::info;

#[derive(Parser, Debug)]
#[command(
    name = "leave-planner",
    about = "Leave balances, company leave views and planner calendars from the command line",
    version
)]
pub(crate) struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Summarise leave balances from a CSV export
    Summary(SummaryArgs),
    /// List leave requests across the company with capability flags
    Company(CompanyArgs),
    /// Print the planner grid for a year or a single month
    Calendar(CalendarArgs),
}

impl Command {
    fn json(&self) -> bool {
        match self {
            Command::Summary(args) => args.json,
            Command::Company(args) => args.json,
            Command::Calendar(args) => args.json,
        }
    }
}

#[derive(Args, Debug)]
pub(crate) struct SummaryArgs {
    /// Leave request CSV export
    #[arg(long)]
    requests: PathBuf,
    /// Optional leave type catalog CSV (defaults to annual/sick/unpaid)
    #[arg(long)]
    leave_types: Option<PathBuf>,
    /// Only summarise this employee
    #[arg(long)]
    user: Option<String>,
    /// Annual allowance in days (defaults to LEAVE_ANNUAL_ALLOWANCE)
    #[arg(long)]
    allowance: Option<f64>,
    /// Only count days falling in this calendar year; requests crossing the
    /// year boundary are trimmed to it
    #[arg(long)]
    year: Option<i32>,
    /// Emit JSON instead of text
    #[arg(long)]
    json: bool,
}

#[derive(Args, Debug)]
pub(crate) struct CompanyArgs {
    /// Leave request CSV export
    #[arg(long)]
    requests: PathBuf,
    /// "all" or a user id (defaults to LEAVE_DEFAULT_SELECTOR)
    #[arg(long)]
    user: Option<UserSelector>,
    /// Acting user id
    #[arg(long, default_value = "cli")]
    actor: String,
    /// Grant the acting user the view_leaves capability
    #[arg(long)]
    view: bool,
    /// Grant the acting user the manage_leaves capability
    #[arg(long)]
    manage: bool,
    /// Emit JSON instead of text
    #[arg(long)]
    json: bool,
}

#[derive(Args, Debug)]
pub(crate) struct CalendarArgs {
    /// Year to plan (defaults to the year of --today)
    #[arg(long)]
    year: Option<i32>,
    /// Month to expand into day cells (1-12)
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..=12))]
    month: Option<u32>,
    /// Date treated as today (YYYY-MM-DD)
    #[arg(long, value_parser = parse_date)]
    today: Option<NaiveDate>,
    /// Emit JSON instead of text
    #[arg(long)]
    json: bool,
}

pub(crate) fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let config = AppConfig::load()?;
    telemetry::init(&config.telemetry, LogOutput::for_json(cli.command.json()))?;

    match cli.command {
        Command::Summary(args) => run_summary(args, &config),
        Command::Company(args) => run_company(args, &config),
        Command::Calendar(args) => run_calendar(args),
    }
}

pub(crate) fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|err| format!("failed to parse '{raw}' as YYYY-MM-DD ({err})"))
}

fn load_leave_types(path: Option<PathBuf>) -> Result<Vec<LeaveType>, AppError> {
    match path {
        Some(path) => Ok(LeaveCsvImporter::leave_types_from_path(path)?),
        None => Ok(standard_leave_types()),
    }
}

fn run_summary(args: SummaryArgs, config: &AppConfig) -> Result<(), AppError> {
    let SummaryArgs {
        requests,
        leave_types,
        user,
        allowance,
        year,
        json,
    } = args;

    let store = LeaveCsvImporter::requests_from_path(&requests)?;
    let leave_types = load_leave_types(leave_types)?;
    let allowance = allowance.unwrap_or(config.policy.annual_allowance);

    let in_scope: Vec<LeaveRequest> = match year {
        Some(year) => store.clipped_to_year(year),
        None => store.requests().to_vec(),
    };
    info!(requests = in_scope.len(), ?year, "summarising leave");

    match user {
        Some(user) => {
            let user_id = UserId(user);
            let own: Vec<&LeaveRequest> = in_scope
                .iter()
                .filter(|request| request.user_id == user_id)
                .collect();
            let summary = summarize(own.iter().copied(), &leave_types, allowance);
            let usage = usage_by_type(own.iter().copied(), &leave_types);
            render::employee_summary(&user_id, &summary, &usage, json)
        }
        None => {
            let report = company_report(&in_scope, &BTreeMap::new(), &leave_types, allowance);
            render::company_summary(&report, json)
        }
    }
}

fn run_company(args: CompanyArgs, config: &AppConfig) -> Result<(), AppError> {
    let CompanyArgs {
        requests,
        user,
        actor,
        view,
        manage,
        json,
    } = args;

    let selector = user.unwrap_or_else(|| config.policy.default_selector.clone());
    let actor = Actor {
        user_id: UserId(actor),
        permission: Permission {
            view_leaves: view || manage,
            manage_leaves: manage,
        },
    };

    let store = LeaveCsvImporter::requests_from_path(&requests)?;
    let company = CompanyLeaveStore::new(store, []);
    let leaves = company.filter_by_user(&selector, &actor);
    render::company_leaves(&leaves, json)
}

fn run_calendar(args: CalendarArgs) -> Result<(), AppError> {
    let CalendarArgs {
        year,
        month,
        today,
        json,
    } = args;

    let today = today.unwrap_or_else(|| Local::now().date_naive());
    let reference = year
        .and_then(|year| NaiveDate::from_ymd_opt(year, 1, 1))
        .unwrap_or(today);
    let planner = YearPlanner::new(reference, today);

    match month {
        Some(month) => {
            let index = usize::try_from(month - 1).unwrap_or_default();
            let days = planner.day_grid(index).unwrap_or_default();
            render::day_grid(planner.year(), month, &days, json)
        }
        None => render::year_overview(&planner, json),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parse_date_reports_bad_input() {
        assert_eq!(
            parse_date(" 2025-03-03 "),
            Ok(NaiveDate::from_ymd_opt(2025, 3, 3).expect("valid date"))
        );
        assert!(parse_date("03/03/2025").is_err());
    }

    #[test]
    fn calendar_month_is_range_checked() {
        let result = Cli::try_parse_from(["leave-planner", "calendar", "--month", "13"]);
        assert!(result.is_err());
    }

    #[test]
    fn json_flag_is_visible_before_dispatch() {
        let cli = Cli::try_parse_from(["leave-planner", "calendar", "--json"])
            .expect("arguments parse");
        assert!(cli.command.json());
        assert_eq!(LogOutput::for_json(cli.command.json()), LogOutput::Machine);
    }

    #[test]
    fn blank_user_selector_is_a_usage_error() {
        let result = Cli::try_parse_from([
            "leave-planner",
            "company",
            "--requests",
            "leave.csv",
            "--user",
            "  ",
        ]);
        match result {
            Err(err) => assert_eq!(err.kind(), clap::error::ErrorKind::ValueValidation),
            Ok(cli) => panic!("expected a rejected selector, got {cli:?}"),
        }
    }

    #[test]
    fn company_flags_parse() {
        let cli = Cli::try_parse_from([
            "leave-planner",
            "company",
            "--requests",
            "leave.csv",
            "--user",
            "all",
            "--manage",
        ])
        .expect("arguments parse");
        match cli.command {
            Command::Company(args) => {
                assert!(args.manage);
                assert_eq!(args.actor, "cli");
                assert_eq!(args.user, Some(UserSelector::All));
            }
            other => panic!("expected company command, got {other:?}"),
        }
    }
}
