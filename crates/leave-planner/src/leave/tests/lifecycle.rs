use super::common::*;
use crate::leave::domain::{LeaveError, LeaveErrorKind, LeaveRequestId, LeaveStatus};
use crate::leave::store::{LeaveRequestStore, SharedLeaveStore};
use std::thread;

#[test]
fn create_assigns_id_and_starts_pending() {
    let mut store = LeaveRequestStore::new();
    let created = store
        .create_at(
            submission("u-ana", "annual", date(2025, 3, 3), date(2025, 3, 7)),
            created_at(),
        )
        .expect("valid request");

    assert_eq!(created.id, LeaveRequestId("leave-000001".to_string()));
    assert_eq!(created.status, LeaveStatus::Pending);
    assert_eq!(created.created_at, created_at());
    assert_eq!(created.version, 1);
    assert_eq!(store.get(&created.id), Some(&created));
}

#[test]
fn create_rejects_end_before_start() {
    let mut store = LeaveRequestStore::new();
    let result = store.create_at(
        submission("u-ana", "annual", date(2025, 3, 7), date(2025, 3, 3)),
        created_at(),
    );

    match result {
        Err(err @ LeaveError::InvalidRange { .. }) => {
            assert_eq!(err.kind(), LeaveErrorKind::Validation)
        }
        other => panic!("expected invalid range, got {other:?}"),
    }
    assert!(store.is_empty());
}

#[test]
fn generated_ids_skip_hydrated_records() {
    let existing = record(
        "leave-000001",
        "u-ana",
        "annual",
        date(2025, 1, 6),
        date(2025, 1, 6),
        LeaveStatus::Approved,
    );
    let mut store = LeaveRequestStore::from_requests(vec![existing]);
    let created = store
        .create_at(
            submission("u-ben", "sick", date(2025, 3, 3), date(2025, 3, 3)),
            created_at(),
        )
        .expect("valid request");

    assert_eq!(created.id, LeaveRequestId("leave-000002".to_string()));
    assert_eq!(store.len(), 2);
}

#[test]
fn revoke_resets_to_pending_from_any_state() {
    let (mut store, ids) = seeded_store();
    let id = &ids[0];

    for prior in [
        LeaveStatus::Approved,
        LeaveStatus::Rejected,
        LeaveStatus::Cancelled,
        LeaveStatus::Pending,
    ] {
        store.set_status(id, prior).expect("known id");
        let previous = store.revoke(id).expect("known id");
        assert_eq!(previous, prior);
        assert_eq!(
            store.get(id).map(|request| request.status),
            Some(LeaveStatus::Pending)
        );
    }
}

#[test]
fn approve_and_reject_apply_from_any_state() {
    let (mut store, ids) = seeded_store();
    let id = &ids[1];

    store.reject(id).expect("reject pending");
    assert_eq!(store.approve(id), Ok(LeaveStatus::Rejected));
    assert_eq!(store.reject(id), Ok(LeaveStatus::Approved));
    assert_eq!(store.cancel(id), Ok(LeaveStatus::Rejected));
    assert_eq!(
        store.get(id).map(|request| request.status),
        Some(LeaveStatus::Cancelled)
    );
}

#[test]
fn approve_twice_is_idempotent() {
    let (mut store, ids) = seeded_store();
    let id = &ids[0];

    store.approve(id).expect("first approval");
    let version_after_first = store.get(id).map(|request| request.version);
    let before_second = store.snapshot();

    assert_eq!(store.approve(id), Ok(LeaveStatus::Approved));
    assert_eq!(
        store.get(id).map(|request| request.status),
        Some(LeaveStatus::Approved)
    );
    assert_eq!(store.get(id).map(|request| request.version), version_after_first);
    assert_eq!(*before_second, *store.snapshot());
}

#[test]
fn unknown_id_is_reported_and_leaves_collection_untouched() {
    let (mut store, _) = seeded_store();
    let before = store.snapshot();
    let missing = LeaveRequestId("leave-999999".to_string());

    for result in [
        store.approve(&missing),
        store.reject(&missing),
        store.revoke(&missing),
        store.set_status(&missing, LeaveStatus::Cancelled),
    ] {
        match result {
            Err(err @ LeaveError::RequestNotFound(_)) => {
                assert_eq!(err.kind(), LeaveErrorKind::UnknownReference)
            }
            other => panic!("expected not found, got {other:?}"),
        }
    }
    assert!(matches!(
        store.remove(&missing),
        Err(LeaveError::RequestNotFound(_))
    ));
    assert_eq!(*before, *store.snapshot());
}

#[test]
fn remove_deletes_without_tombstone() {
    let (mut store, ids) = seeded_store();
    let removed = store.remove(&ids[2]).expect("known id");

    assert_eq!(removed.id, ids[2]);
    assert_eq!(store.len(), 3);
    assert!(store.get(&ids[2]).is_none());
    assert!(matches!(
        store.approve(&ids[2]),
        Err(LeaveError::RequestNotFound(_))
    ));
}

#[test]
fn snapshots_are_not_affected_by_later_mutations() {
    let (mut store, ids) = seeded_store();
    let before = store.snapshot();

    store.approve(&ids[0]).expect("approve");
    store.remove(&ids[1]).expect("remove");

    assert_eq!(before.len(), 4);
    assert!(before
        .iter()
        .all(|request| request.status == LeaveStatus::Pending));
    assert_eq!(store.len(), 3);
    assert_eq!(
        store.get(&ids[0]).map(|request| request.status),
        Some(LeaveStatus::Approved)
    );
}

#[test]
fn checked_status_change_detects_stale_versions() {
    let (mut store, ids) = seeded_store();
    let id = &ids[0];
    let seen = store.get(id).map(|request| request.version).expect("present");

    store
        .set_status_checked(id, LeaveStatus::Approved, seen)
        .expect("fresh version applies");

    match store.set_status_checked(id, LeaveStatus::Rejected, seen) {
        Err(LeaveError::VersionConflict {
            expected, actual, ..
        }) => {
            assert_eq!(expected, seen);
            assert_eq!(actual, seen + 1);
        }
        other => panic!("expected version conflict, got {other:?}"),
    }
    assert_eq!(
        store.get(id).map(|request| request.status),
        Some(LeaveStatus::Approved)
    );
}

#[test]
fn for_user_and_in_year_filter_in_order() {
    let (mut store, _) = seeded_store();
    store
        .create_at(
            submission("u-ana", "annual", date(2025, 12, 29), date(2026, 1, 2)),
            created_at(),
        )
        .expect("valid request");

    let ana = user("u-ana");
    let ana_types: Vec<&str> = store
        .for_user(&ana)
        .map(|request| request.leave_type.0.as_str())
        .collect();
    assert_eq!(ana_types, vec!["annual", "unpaid", "annual"]);

    assert_eq!(store.in_year(2025).count(), 5);
    assert_eq!(store.in_year(2026).count(), 1);
    assert_eq!(store.in_year(2024).count(), 0);
}

#[test]
fn clipped_to_year_keeps_only_days_inside_the_year() {
    let mut store = LeaveRequestStore::new();
    let mut new = submission("u-ana", "annual", date(2025, 12, 29), date(2026, 1, 2));
    new.half_day_start = true;
    new.half_day_end = true;
    let spanning = store
        .create_at(new, created_at())
        .expect("valid request");

    let december = store.clipped_to_year(2025);
    assert_eq!(december.len(), 1);
    assert_eq!(december[0].id, spanning.id);
    assert_eq!(december[0].start_date, date(2025, 12, 29));
    assert_eq!(december[0].end_date, date(2025, 12, 31));
    assert!(december[0].half_day_start && !december[0].half_day_end);

    let january = store.clipped_to_year(2026);
    assert_eq!(january[0].start_date, date(2026, 1, 1));
    assert_eq!(january[0].end_date, date(2026, 1, 2));
    assert!(!january[0].half_day_start && january[0].half_day_end);

    assert!(store.clipped_to_year(2024).is_empty());
    assert_eq!(store.get(&spanning.id), Some(&spanning));
}

#[test]
fn shared_store_serialises_concurrent_writers() {
    let shared = SharedLeaveStore::new(LeaveRequestStore::new());

    let handles: Vec<_> = (0..4)
        .map(|worker| {
            let shared = shared.clone();
            thread::spawn(move || {
                for day in 3..=7 {
                    shared
                        .write(|store| {
                            store.create_at(
                                submission(
                                    &format!("u-{worker}"),
                                    "annual",
                                    date(2025, 3, day),
                                    date(2025, 3, day),
                                ),
                                created_at(),
                            )
                        })
                        .expect("valid request");
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().expect("writer thread finished");
    }

    let snapshot = shared.snapshot();
    assert_eq!(snapshot.len(), 20);
    let mut ids: Vec<_> = snapshot.iter().map(|request| request.id.clone()).collect();
    ids.sort();
    ids.dedup();
    assert_eq!(ids.len(), 20, "every writer received a unique id");
}
