use super::calculator::{find_leave_type, leave_days};
use super::domain::{Employee, LeaveRequest, LeaveStatus, LeaveType, LeaveTypeId, UserId};
use serde::Serialize;
use std::collections::BTreeMap;

/// Balance figures for one employee (or a sum across employees).
///
/// Pending days are informational only; `remaining` is the allowance minus
/// approved deductible usage.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct LeaveSummary {
    pub allowance: f64,
    pub pending: f64,
    pub deductible: f64,
    pub non_deductible: f64,
    pub used: f64,
    pub remaining: f64,
}

impl LeaveSummary {
    fn accumulate(mut self, other: &LeaveSummary) -> Self {
        self.allowance += other.allowance;
        self.pending += other.pending;
        self.deductible += other.deductible;
        self.non_deductible += other.non_deductible;
        self.used += other.used;
        self.remaining += other.remaining;
        self
    }
}

pub fn summarize<'a, I>(requests: I, leave_types: &[LeaveType], allowance: f64) -> LeaveSummary
where
    I: IntoIterator<Item = &'a LeaveRequest>,
{
    let mut pending = 0.0;
    let mut deductible = 0.0;
    let mut non_deductible = 0.0;

    for request in requests {
        match request.status {
            LeaveStatus::Pending => pending += leave_days(request, leave_types),
            LeaveStatus::Approved => {
                let days = leave_days(request, leave_types);
                let counts_against_allowance = find_leave_type(leave_types, &request.leave_type)
                    .is_some_and(|leave_type| leave_type.deductible);
                if counts_against_allowance {
                    deductible += days;
                } else {
                    non_deductible += days;
                }
            }
            LeaveStatus::Rejected | LeaveStatus::Cancelled => {}
        }
    }

    LeaveSummary {
        allowance,
        pending,
        deductible,
        non_deductible,
        used: deductible + non_deductible,
        remaining: allowance - deductible,
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LeaveTypeUsage {
    pub leave_type: LeaveTypeId,
    pub name: String,
    pub deductible: bool,
    pub approved: f64,
    pub pending: f64,
}

/// Approved and pending days per catalog entry, in catalog order.
pub fn usage_by_type<'a, I>(requests: I, leave_types: &[LeaveType]) -> Vec<LeaveTypeUsage>
where
    I: IntoIterator<Item = &'a LeaveRequest>,
{
    let mut usage: Vec<LeaveTypeUsage> = leave_types
        .iter()
        .map(|leave_type| LeaveTypeUsage {
            leave_type: leave_type.id.clone(),
            name: leave_type.name.clone(),
            deductible: leave_type.deductible,
            approved: 0.0,
            pending: 0.0,
        })
        .collect();

    for request in requests {
        let Some(entry) = usage
            .iter_mut()
            .find(|entry| entry.leave_type == request.leave_type)
        else {
            continue;
        };
        match request.status {
            LeaveStatus::Approved => entry.approved += leave_days(request, leave_types),
            LeaveStatus::Pending => entry.pending += leave_days(request, leave_types),
            LeaveStatus::Rejected | LeaveStatus::Cancelled => {}
        }
    }

    usage
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EmployeeLeaveSummary {
    pub user_id: UserId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub summary: LeaveSummary,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CompanyLeaveReport {
    pub employees: Vec<EmployeeLeaveSummary>,
    pub totals: LeaveSummary,
}

/// Per-employee balances across the whole company, ordered by user id.
///
/// Every known employee gets an entry even without requests; requests from
/// users missing in `employees` are summarised with the default allowance.
pub fn company_report<'a, I>(
    requests: I,
    employees: &BTreeMap<UserId, Employee>,
    leave_types: &[LeaveType],
    default_allowance: f64,
) -> CompanyLeaveReport
where
    I: IntoIterator<Item = &'a LeaveRequest>,
{
    let mut by_user: BTreeMap<&UserId, Vec<&LeaveRequest>> =
        employees.keys().map(|id| (id, Vec::new())).collect();
    for request in requests {
        by_user.entry(&request.user_id).or_default().push(request);
    }

    let entries: Vec<EmployeeLeaveSummary> = by_user
        .into_iter()
        .map(|(user_id, requests)| {
            let employee = employees.get(user_id);
            let allowance = employee
                .and_then(|employee| employee.allowance)
                .unwrap_or(default_allowance);
            EmployeeLeaveSummary {
                user_id: user_id.clone(),
                name: employee.map(|employee| employee.name.clone()),
                summary: summarize(requests, leave_types, allowance),
            }
        })
        .collect();

    let totals = entries
        .iter()
        .fold(LeaveSummary::default(), |acc, entry| acc.accumulate(&entry.summary));

    CompanyLeaveReport {
        employees: entries,
        totals,
    }
}
