use leave_planner::error::AppError;
use leave_planner::leave::dates::is_weekend;
use leave_planner::leave::{
    CompanyLeaveReport, CompanyLeaveRequest, LeaveSummary, LeaveTypeUsage, UserId,
};
use leave_planner::planner::{CalendarDay, YearPlanner};
use serde::Serialize;
use serde_json::json;

fn print_json<T: Serialize>(value: &T) -> Result<(), AppError> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn print_balance(summary: &LeaveSummary) {
    println!(
        "  allowance {:.1} | used {:.1} (deductible {:.1}, non-deductible {:.1}) | pending {:.1} | remaining {:.1}",
        summary.allowance,
        summary.used,
        summary.deductible,
        summary.non_deductible,
        summary.pending,
        summary.remaining
    );
}

pub(crate) fn employee_summary(
    user_id: &UserId,
    summary: &LeaveSummary,
    usage: &[LeaveTypeUsage],
    json: bool,
) -> Result<(), AppError> {
    if json {
        return print_json(&json!({
            "user_id": user_id,
            "summary": summary,
            "usage": usage,
        }));
    }

    println!("Leave balance for {user_id}");
    print_balance(summary);

    println!("\nUsage by leave type");
    for entry in usage {
        let kind = if entry.deductible {
            "deductible"
        } else {
            "non-deductible"
        };
        println!(
            "- {} ({}): {:.1} approved, {:.1} pending",
            entry.name, kind, entry.approved, entry.pending
        );
    }
    Ok(())
}

pub(crate) fn company_summary(report: &CompanyLeaveReport, json: bool) -> Result<(), AppError> {
    if json {
        return print_json(report);
    }

    if report.employees.is_empty() {
        println!("No leave requests found");
        return Ok(());
    }

    println!("Company leave balances");
    for entry in &report.employees {
        match &entry.name {
            Some(name) => println!("{} ({})", name, entry.user_id),
            None => println!("{}", entry.user_id),
        }
        print_balance(&entry.summary);
    }

    println!("\nTotals");
    print_balance(&report.totals);
    Ok(())
}

pub(crate) fn company_leaves(leaves: &[CompanyLeaveRequest], json: bool) -> Result<(), AppError> {
    if json {
        return print_json(&leaves);
    }

    if leaves.is_empty() {
        println!("No visible leave requests");
        return Ok(());
    }

    for leave in leaves {
        let request = &leave.request;
        let mut actions = Vec::new();
        if leave.can_edit {
            actions.push("edit");
        }
        if leave.can_approve {
            actions.push("approve");
        }
        if leave.can_delete {
            actions.push("delete");
        }
        let actions = if actions.is_empty() {
            "read-only".to_string()
        } else {
            actions.join("/")
        };
        println!(
            "- {} | {} | {} | {} -> {} | {} | {}",
            request.id,
            request.user_id,
            request.leave_type,
            request.start_date,
            request.end_date,
            request.status,
            actions
        );
    }
    Ok(())
}

pub(crate) fn day_grid(
    year: i32,
    month: u32,
    days: &[CalendarDay],
    json: bool,
) -> Result<(), AppError> {
    if json {
        return print_json(&days);
    }

    println!("{year}-{month:02}");
    for day in days {
        let mut markers = Vec::new();
        if day.is_weekend {
            markers.push("weekend");
        }
        if day.is_today {
            markers.push("today");
        }
        if markers.is_empty() {
            println!("  {}", day.date.format("%a %d"));
        } else {
            println!("  {} ({})", day.date.format("%a %d"), markers.join(", "));
        }
    }
    Ok(())
}

pub(crate) fn year_overview(planner: &YearPlanner, json: bool) -> Result<(), AppError> {
    if json {
        return print_json(&planner.months());
    }

    println!("Planner year {}", planner.year());
    for month in planner.months() {
        let working = month
            .days
            .iter()
            .filter(|date| !is_weekend(*date))
            .count();
        println!(
            "- {}: {} days, {} working days",
            month.date.format("%B"),
            month.days.len(),
            working
        );
    }
    Ok(())
}
