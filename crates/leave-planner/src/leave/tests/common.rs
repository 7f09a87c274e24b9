use chrono::{DateTime, NaiveDate, TimeZone, Utc};

use crate::leave::domain::{
    standard_leave_types, Actor, Employee, LeaveRequest, LeaveRequestId, LeaveStatus, LeaveType,
    LeaveTypeId, NewLeaveRequest, Permission, UserId,
};
use crate::leave::store::LeaveRequestStore;

pub(super) fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).expect("valid date")
}

pub(super) fn created_at() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 2, 14, 9, 30, 0)
        .single()
        .expect("valid timestamp")
}

pub(super) fn user(id: &str) -> UserId {
    UserId(id.to_string())
}

pub(super) fn catalog() -> Vec<LeaveType> {
    standard_leave_types()
}

pub(super) fn submission(
    user_id: &str,
    leave_type: &str,
    start: NaiveDate,
    end: NaiveDate,
) -> NewLeaveRequest {
    NewLeaveRequest {
        user_id: user(user_id),
        leave_type: LeaveTypeId(leave_type.to_string()),
        start_date: start,
        end_date: end,
        half_day_start: false,
        half_day_end: false,
        reason: format!("{leave_type} leave for {user_id}"),
    }
}

/// A stored record built directly, bypassing the store.
pub(super) fn record(
    id: &str,
    user_id: &str,
    leave_type: &str,
    start: NaiveDate,
    end: NaiveDate,
    status: LeaveStatus,
) -> LeaveRequest {
    LeaveRequest {
        id: LeaveRequestId(id.to_string()),
        user_id: user(user_id),
        leave_type: LeaveTypeId(leave_type.to_string()),
        start_date: start,
        end_date: end,
        half_day_start: false,
        half_day_end: false,
        status,
        reason: String::new(),
        created_at: created_at(),
        version: 1,
    }
}

/// Three employees with a mix of statuses, all in March 2025.
pub(super) fn seeded_store() -> (LeaveRequestStore, Vec<LeaveRequestId>) {
    let mut store = LeaveRequestStore::new();
    let ids = [
        submission("u-ana", "annual", date(2025, 3, 3), date(2025, 3, 7)),
        submission("u-ben", "sick", date(2025, 3, 10), date(2025, 3, 11)),
        submission("u-ana", "unpaid", date(2025, 3, 17), date(2025, 3, 17)),
        submission("u-cho", "annual", date(2025, 3, 24), date(2025, 3, 28)),
    ]
    .into_iter()
    .map(|new| {
        store
            .create_at(new, created_at())
            .expect("seed request is valid")
            .id
    })
    .collect();
    (store, ids)
}

pub(super) fn employees() -> Vec<Employee> {
    vec![
        Employee {
            id: user("u-ana"),
            name: "Ana Duarte".to_string(),
            allowance: Some(25.0),
        },
        Employee {
            id: user("u-ben"),
            name: "Ben Okafor".to_string(),
            allowance: None,
        },
        Employee {
            id: user("u-dee"),
            name: "Dee Laurent".to_string(),
            allowance: None,
        },
    ]
}

pub(super) fn manager() -> Actor {
    Actor {
        user_id: user("u-hr"),
        permission: Permission::manager(),
    }
}

pub(super) fn employee_actor(id: &str) -> Actor {
    Actor {
        user_id: user(id),
        permission: Permission::default(),
    }
}
