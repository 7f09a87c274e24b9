//! CSV import of leave requests and leave-type catalogs.

mod parser;

use crate::leave::domain::{
    LeaveError, LeaveRequest, LeaveRequestId, LeaveStatus, LeaveType, LeaveTypeId,
    NewLeaveRequest, UserId,
};
use crate::leave::store::LeaveRequestStore;
use parser::{LeaveTypeRow, RequestRow};
use std::collections::HashSet;
use std::io::Read;
use std::path::Path;
use tracing::info;

const DEFAULT_LEAVE_COLOR: &str = "#9ca3af";

#[derive(Debug)]
pub enum LeaveImportError {
    Io(std::io::Error),
    Csv(csv::Error),
    InvalidField {
        row: usize,
        field: &'static str,
        value: String,
    },
    DuplicateId(LeaveRequestId),
    Leave { row: usize, source: LeaveError },
}

impl std::fmt::Display for LeaveImportError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LeaveImportError::Io(err) => write!(f, "failed to read leave export: {}", err),
            LeaveImportError::Csv(err) => write!(f, "invalid leave CSV data: {}", err),
            LeaveImportError::InvalidField { row, field, value } => {
                write!(f, "row {}: invalid {} '{}'", row, field, value)
            }
            LeaveImportError::DuplicateId(id) => {
                write!(f, "leave request id '{}' appears more than once", id)
            }
            LeaveImportError::Leave { row, source } => write!(f, "row {}: {}", row, source),
        }
    }
}

impl std::error::Error for LeaveImportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            LeaveImportError::Io(err) => Some(err),
            LeaveImportError::Csv(err) => Some(err),
            LeaveImportError::Leave { source, .. } => Some(source),
            LeaveImportError::InvalidField { .. } | LeaveImportError::DuplicateId(_) => None,
        }
    }
}

impl From<std::io::Error> for LeaveImportError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<csv::Error> for LeaveImportError {
    fn from(err: csv::Error) -> Self {
        Self::Csv(err)
    }
}

/// Loads leave data exported by the persistence layer.
///
/// Request CSV columns: `id,user_id,leave_type,start_date,end_date,
/// half_day_start,half_day_end,status,reason,created_at`. Only `user_id`,
/// `leave_type`, `start_date` and `end_date` are required; a blank id gets an
/// `import-NNNN` id, a blank status means pending, and a blank `created_at`
/// falls back to the start date at midnight UTC.
pub struct LeaveCsvImporter;

impl LeaveCsvImporter {
    pub fn requests_from_path<P: AsRef<Path>>(path: P) -> Result<LeaveRequestStore, LeaveImportError> {
        let file = std::fs::File::open(path)?;
        Self::requests_from_reader(file)
    }

    pub fn requests_from_reader<R: Read>(reader: R) -> Result<LeaveRequestStore, LeaveImportError> {
        let rows: Vec<RequestRow> = parser::parse_rows(reader)?;
        let mut seen = HashSet::new();
        let mut requests = Vec::with_capacity(rows.len());

        for (index, row) in rows.into_iter().enumerate() {
            let request = request_from_row(index + 1, row)?;
            if !seen.insert(request.id.clone()) {
                return Err(LeaveImportError::DuplicateId(request.id));
            }
            requests.push(request);
        }

        info!(count = requests.len(), "imported leave requests");
        Ok(LeaveRequestStore::from_requests(requests))
    }

    pub fn leave_types_from_path<P: AsRef<Path>>(path: P) -> Result<Vec<LeaveType>, LeaveImportError> {
        let file = std::fs::File::open(path)?;
        Self::leave_types_from_reader(file)
    }

    pub fn leave_types_from_reader<R: Read>(reader: R) -> Result<Vec<LeaveType>, LeaveImportError> {
        let rows: Vec<LeaveTypeRow> = parser::parse_rows(reader)?;
        rows.into_iter()
            .enumerate()
            .map(|(index, row)| {
                let deductible = parser::parse_flag(&row.deductible).ok_or_else(|| {
                    LeaveImportError::InvalidField {
                        row: index + 1,
                        field: "deductible",
                        value: row.deductible.clone(),
                    }
                })?;
                Ok(LeaveType {
                    id: LeaveTypeId(row.id),
                    name: row.name,
                    color: row
                        .color
                        .unwrap_or_else(|| DEFAULT_LEAVE_COLOR.to_string()),
                    deductible,
                })
            })
            .collect()
    }
}

fn request_from_row(row_number: usize, row: RequestRow) -> Result<LeaveRequest, LeaveImportError> {
    let invalid = |field: &'static str, value: &str| LeaveImportError::InvalidField {
        row: row_number,
        field,
        value: value.to_string(),
    };

    let start_date =
        parser::parse_date(&row.start_date).ok_or_else(|| invalid("start_date", &row.start_date))?;
    let end_date =
        parser::parse_date(&row.end_date).ok_or_else(|| invalid("end_date", &row.end_date))?;

    let flag = |field: &'static str, value: Option<&str>| match value {
        Some(raw) => parser::parse_flag(raw).ok_or_else(|| invalid(field, raw)),
        None => Ok(false),
    };
    let half_day_start = flag("half_day_start", row.half_day_start.as_deref())?;
    let half_day_end = flag("half_day_end", row.half_day_end.as_deref())?;

    let status = match row.status.as_deref() {
        Some(raw) => raw
            .parse::<LeaveStatus>()
            .map_err(|_| invalid("status", raw))?,
        None => LeaveStatus::Pending,
    };

    let submission = NewLeaveRequest {
        user_id: UserId(row.user_id),
        leave_type: LeaveTypeId(row.leave_type),
        start_date,
        end_date,
        half_day_start,
        half_day_end,
        reason: row.reason.unwrap_or_default(),
    };
    submission
        .validate()
        .map_err(|source| LeaveImportError::Leave {
            row: row_number,
            source,
        })?;

    let created_at = match row.created_at.as_deref() {
        Some(raw) => parser::parse_timestamp(raw).ok_or_else(|| invalid("created_at", raw))?,
        None => start_date
            .and_hms_opt(0, 0, 0)
            .map(|naive| naive.and_utc())
            .ok_or_else(|| invalid("start_date", &row.start_date))?,
    };

    let id = row
        .id
        .map(LeaveRequestId)
        .unwrap_or_else(|| LeaveRequestId(format!("import-{row_number:04}")));

    Ok(LeaveRequest {
        id,
        user_id: submission.user_id,
        leave_type: submission.leave_type,
        start_date,
        end_date,
        half_day_start,
        half_day_end,
        status,
        reason: submission.reason,
        created_at,
        version: 1,
    })
}
