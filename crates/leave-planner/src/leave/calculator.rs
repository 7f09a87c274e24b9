use super::dates::working_days;
use super::domain::{LeaveError, LeaveRequest, LeaveType, LeaveTypeId};
use chrono::NaiveDate;
use tracing::warn;

const HALF_DAY: f64 = 0.5;

pub fn find_leave_type<'a>(leave_types: &'a [LeaveType], id: &LeaveTypeId) -> Option<&'a LeaveType> {
    leave_types.iter().find(|leave_type| &leave_type.id == id)
}

/// Number of leave days a request consumes, degrading to zero when its leave
/// type is missing from the catalog.
pub fn leave_days(request: &LeaveRequest, leave_types: &[LeaveType]) -> f64 {
    match try_leave_days(request, leave_types) {
        Ok(days) => days,
        Err(err) => {
            warn!(request_id = %request.id, error = %err, "counting leave request as zero days");
            0.0
        }
    }
}

/// Like [`leave_days`], but reports an unresolved leave type instead of
/// returning zero.
pub fn try_leave_days(request: &LeaveRequest, leave_types: &[LeaveType]) -> Result<f64, LeaveError> {
    find_leave_type(leave_types, &request.leave_type)
        .ok_or_else(|| LeaveError::UnknownLeaveType(request.leave_type.clone()))?;

    Ok(span_days(
        request.start_date,
        request.end_date,
        request.half_day_start,
        request.half_day_end,
    ))
}

/// Half-day flags deduct from the working-day base even when the flagged
/// boundary falls on a weekend; the result is clamped at zero.
fn span_days(
    start: NaiveDate,
    end: NaiveDate,
    half_day_start: bool,
    half_day_end: bool,
) -> f64 {
    if start == end && half_day_start && half_day_end {
        return HALF_DAY;
    }

    let mut days = f64::from(working_days(start, end));
    if half_day_start {
        days -= HALF_DAY;
    }
    if half_day_end {
        days -= HALF_DAY;
    }

    days.max(0.0)
}
