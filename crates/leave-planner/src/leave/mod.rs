//! Leave accounting: day calculation, balances, and the request lifecycle.

pub mod calculator;
pub mod company;
pub mod dates;
pub mod domain;
pub mod store;
pub mod summary;

#[cfg(test)]
mod tests;

pub use calculator::{leave_days, try_leave_days};
pub use company::{CompanyLeaveRequest, CompanyLeaveStore, LeaveCapabilities, UserSelector};
pub use domain::{
    standard_leave_types, Actor, Employee, LeaveError, LeaveErrorKind, LeaveRequest,
    LeaveRequestId, LeaveStatus, LeaveType, LeaveTypeId, NewLeaveRequest, Permission, UserId,
};
pub use store::{LeaveRequestStore, SharedLeaveStore};
pub use summary::{
    company_report, summarize, usage_by_type, CompanyLeaveReport, EmployeeLeaveSummary,
    LeaveSummary, LeaveTypeUsage,
};
