use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Identifier wrapper for leave catalog entries.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct LeaveTypeId(pub String);

impl fmt::Display for LeaveTypeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Identifier wrapper for submitted leave requests.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct LeaveRequestId(pub String);

impl fmt::Display for LeaveRequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Identifier supplied by the identity provider for an employee account.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct UserId(pub String);

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Catalog entry describing a category of leave.
///
/// `deductible` decides whether approved usage draws down the annual allowance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaveType {
    pub id: LeaveTypeId,
    pub name: String,
    pub color: String,
    pub deductible: bool,
}

/// Default catalog used when no custom leave types are configured.
pub fn standard_leave_types() -> Vec<LeaveType> {
    vec![
        LeaveType {
            id: LeaveTypeId("annual".to_string()),
            name: "Annual Leave".to_string(),
            color: "#3b82f6".to_string(),
            deductible: true,
        },
        LeaveType {
            id: LeaveTypeId("sick".to_string()),
            name: "Sick Leave".to_string(),
            color: "#ef4444".to_string(),
            deductible: false,
        },
        LeaveType {
            id: LeaveTypeId("unpaid".to_string()),
            name: "Unpaid Leave".to_string(),
            color: "#6b7280".to_string(),
            deductible: false,
        },
    ]
}

/// Lifecycle state of a leave request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LeaveStatus {
    Pending,
    Approved,
    Rejected,
    Cancelled,
}

impl LeaveStatus {
    pub const fn ordered() -> [Self; 4] {
        [Self::Pending, Self::Approved, Self::Rejected, Self::Cancelled]
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Approved => "approved",
            Self::Rejected => "rejected",
            Self::Cancelled => "cancelled",
        }
    }

    /// Only pending and approved requests count towards balances.
    pub const fn is_active(self) -> bool {
        matches!(self, Self::Pending | Self::Approved)
    }
}

impl fmt::Display for LeaveStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for LeaveStatus {
    type Err = UnknownStatus;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "pending" => Ok(Self::Pending),
            "approved" => Ok(Self::Approved),
            "rejected" => Ok(Self::Rejected),
            "cancelled" | "canceled" => Ok(Self::Cancelled),
            _ => Err(UnknownStatus(value.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown leave status '{0}'")]
pub struct UnknownStatus(pub String);

/// A leave request as owned by the store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeaveRequest {
    pub id: LeaveRequestId,
    pub user_id: UserId,
    pub leave_type: LeaveTypeId,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub half_day_start: bool,
    pub half_day_end: bool,
    pub status: LeaveStatus,
    pub reason: String,
    pub created_at: DateTime<Utc>,
    /// Incremented on every status change; starts at 1.
    pub version: u64,
}

impl LeaveRequest {
    /// The part of the request that falls inside `year`, or `None` when the
    /// range misses the year. A half-day flag is dropped on any end that was cut.
    pub fn clipped_to_year(&self, year: i32) -> Option<LeaveRequest> {
        let first = NaiveDate::from_ymd_opt(year, 1, 1)?;
        let last = NaiveDate::from_ymd_opt(year, 12, 31)?;
        if self.end_date < first || self.start_date > last {
            return None;
        }

        let mut clipped = self.clone();
        if clipped.start_date < first {
            clipped.start_date = first;
            clipped.half_day_start = false;
        }
        if clipped.end_date > last {
            clipped.end_date = last;
            clipped.half_day_end = false;
        }
        Some(clipped)
    }
}

/// Submission payload: everything the store does not assign itself.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewLeaveRequest {
    pub user_id: UserId,
    pub leave_type: LeaveTypeId,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    #[serde(default)]
    pub half_day_start: bool,
    #[serde(default)]
    pub half_day_end: bool,
    #[serde(default)]
    pub reason: String,
}

impl NewLeaveRequest {
    pub fn validate(&self) -> Result<(), LeaveError> {
        if self.start_date > self.end_date {
            return Err(LeaveError::InvalidRange {
                start: self.start_date,
                end: self.end_date,
            });
        }
        Ok(())
    }
}

/// Capability pair handed over by the authorization provider.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Permission {
    pub view_leaves: bool,
    pub manage_leaves: bool,
}

impl Permission {
    pub const fn manager() -> Self {
        Self {
            view_leaves: true,
            manage_leaves: true,
        }
    }

    pub const fn viewer() -> Self {
        Self {
            view_leaves: true,
            manage_leaves: false,
        }
    }
}

/// The acting user together with the permission snapshot for this call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Actor {
    pub user_id: UserId,
    pub permission: Permission,
}

/// Employee reference attached to company-wide views.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Employee {
    pub id: UserId,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub allowance: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LeaveErrorKind {
    Validation,
    UnknownReference,
    Permission,
    Conflict,
}

/// Errors raised by leave operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LeaveError {
    #[error("end date {end} is before start date {start}")]
    InvalidRange { start: NaiveDate, end: NaiveDate },
    #[error("leave type '{0}' not found")]
    UnknownLeaveType(LeaveTypeId),
    #[error("leave request '{0}' not found")]
    RequestNotFound(LeaveRequestId),
    #[error("permission denied: {0} requires the manage_leaves capability")]
    PermissionDenied(&'static str),
    #[error("permission denied: leave request '{0}' may only be deleted by a manager or by its owner while pending")]
    NotPendingOwner(LeaveRequestId),
    #[error("leave request '{id}' changed concurrently (expected version {expected}, found {actual})")]
    VersionConflict {
        id: LeaveRequestId,
        expected: u64,
        actual: u64,
    },
}

impl LeaveError {
    pub const fn kind(&self) -> LeaveErrorKind {
        match self {
            Self::InvalidRange { .. } => LeaveErrorKind::Validation,
            Self::UnknownLeaveType(_) | Self::RequestNotFound(_) => {
                LeaveErrorKind::UnknownReference
            }
            Self::PermissionDenied(_) | Self::NotPendingOwner(_) => LeaveErrorKind::Permission,
            Self::VersionConflict { .. } => LeaveErrorKind::Conflict,
        }
    }
}
