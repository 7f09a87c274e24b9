use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use chrono::{DateTime, Datelike, Utc};
use tracing::{debug, info};

use super::domain::{
    LeaveError, LeaveRequest, LeaveRequestId, LeaveStatus, NewLeaveRequest, UserId,
};

/// Owns the leave request collection and its status lifecycle.
///
/// Every mutation swaps in a new collection when a snapshot is still held
/// elsewhere, so readers of [`LeaveRequestStore::snapshot`] never observe a
/// partial update. Status transitions are unconditional: any state may move
/// to any other state.
#[derive(Debug, Clone, Default)]
pub struct LeaveRequestStore {
    requests: Arc<Vec<LeaveRequest>>,
    sequence: u64,
}

impl LeaveRequestStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Hydrates the store with records supplied by a persistence layer.
    pub fn from_requests(requests: Vec<LeaveRequest>) -> Self {
        Self {
            requests: Arc::new(requests),
            sequence: 0,
        }
    }

    pub fn snapshot(&self) -> Arc<Vec<LeaveRequest>> {
        Arc::clone(&self.requests)
    }

    pub fn requests(&self) -> &[LeaveRequest] {
        &self.requests
    }

    pub fn len(&self) -> usize {
        self.requests.len()
    }

    pub fn is_empty(&self) -> bool {
        self.requests.is_empty()
    }

    pub fn get(&self, id: &LeaveRequestId) -> Option<&LeaveRequest> {
        self.requests.iter().find(|request| &request.id == id)
    }

    pub fn for_user<'a>(&'a self, user_id: &'a UserId) -> impl Iterator<Item = &'a LeaveRequest> {
        self.requests
            .iter()
            .filter(move |request| &request.user_id == user_id)
    }

    /// Requests whose date range touches the given calendar year.
    pub fn in_year(&self, year: i32) -> impl Iterator<Item = &LeaveRequest> {
        self.requests
            .iter()
            .filter(move |request| request.start_date.year() <= year && year <= request.end_date.year())
    }

    /// Requests touching `year`, each trimmed to the dates inside it.
    pub fn clipped_to_year(&self, year: i32) -> Vec<LeaveRequest> {
        self.requests
            .iter()
            .filter_map(|request| request.clipped_to_year(year))
            .collect()
    }

    /// Submit a new request stamped with the current time.
    pub fn create(&mut self, new: NewLeaveRequest) -> Result<LeaveRequest, LeaveError> {
        self.create_at(new, Utc::now())
    }

    /// Submit a new request; it always starts out pending.
    pub fn create_at(
        &mut self,
        new: NewLeaveRequest,
        created_at: DateTime<Utc>,
    ) -> Result<LeaveRequest, LeaveError> {
        new.validate()?;

        let request = LeaveRequest {
            id: self.next_id(),
            user_id: new.user_id,
            leave_type: new.leave_type,
            start_date: new.start_date,
            end_date: new.end_date,
            half_day_start: new.half_day_start,
            half_day_end: new.half_day_end,
            status: LeaveStatus::Pending,
            reason: new.reason,
            created_at,
            version: 1,
        };

        Arc::make_mut(&mut self.requests).push(request.clone());
        info!(
            request_id = %request.id,
            user_id = %request.user_id,
            leave_type = %request.leave_type,
            "leave request created"
        );

        Ok(request)
    }

    /// Each transition returns the status the request held before the call.
    pub fn approve(&mut self, id: &LeaveRequestId) -> Result<LeaveStatus, LeaveError> {
        self.transition(id, LeaveStatus::Approved, None)
    }

    pub fn reject(&mut self, id: &LeaveRequestId) -> Result<LeaveStatus, LeaveError> {
        self.transition(id, LeaveStatus::Rejected, None)
    }

    /// Resets a request to pending from whatever state it is in.
    pub fn revoke(&mut self, id: &LeaveRequestId) -> Result<LeaveStatus, LeaveError> {
        self.transition(id, LeaveStatus::Pending, None)
    }

    pub fn cancel(&mut self, id: &LeaveRequestId) -> Result<LeaveStatus, LeaveError> {
        self.transition(id, LeaveStatus::Cancelled, None)
    }

    pub fn set_status(
        &mut self,
        id: &LeaveRequestId,
        status: LeaveStatus,
    ) -> Result<LeaveStatus, LeaveError> {
        self.transition(id, status, None)
    }

    /// Applies `status` only if the stored record is still at `expected_version`.
    pub fn set_status_checked(
        &mut self,
        id: &LeaveRequestId,
        status: LeaveStatus,
        expected_version: u64,
    ) -> Result<LeaveStatus, LeaveError> {
        self.transition(id, status, Some(expected_version))
    }

    pub fn remove(&mut self, id: &LeaveRequestId) -> Result<LeaveRequest, LeaveError> {
        let position = self.position(id)?;
        let removed = Arc::make_mut(&mut self.requests).remove(position);
        info!(request_id = %removed.id, "leave request removed");
        Ok(removed)
    }

    fn transition(
        &mut self,
        id: &LeaveRequestId,
        status: LeaveStatus,
        expected_version: Option<u64>,
    ) -> Result<LeaveStatus, LeaveError> {
        let position = self.position(id)?;
        let current = &self.requests[position];

        if let Some(expected) = expected_version {
            if current.version != expected {
                return Err(LeaveError::VersionConflict {
                    id: id.clone(),
                    expected,
                    actual: current.version,
                });
            }
        }

        let previous = current.status;
        if previous == status {
            debug!(request_id = %id, %status, "leave request already in requested status");
            return Ok(previous);
        }

        let record = &mut Arc::make_mut(&mut self.requests)[position];
        record.status = status;
        record.version += 1;
        info!(request_id = %id, from = %previous, to = %status, "leave request status changed");

        Ok(previous)
    }

    fn position(&self, id: &LeaveRequestId) -> Result<usize, LeaveError> {
        self.requests
            .iter()
            .position(|request| &request.id == id)
            .ok_or_else(|| LeaveError::RequestNotFound(id.clone()))
    }

    fn next_id(&mut self) -> LeaveRequestId {
        loop {
            self.sequence += 1;
            let id = LeaveRequestId(format!("leave-{:06}", self.sequence));
            if self.get(&id).is_none() {
                return id;
            }
        }
    }
}

/// Serialises writers for callers that share one store between threads.
#[derive(Debug, Clone, Default)]
pub struct SharedLeaveStore {
    inner: Arc<Mutex<LeaveRequestStore>>,
}

impl SharedLeaveStore {
    pub fn new(store: LeaveRequestStore) -> Self {
        Self {
            inner: Arc::new(Mutex::new(store)),
        }
    }

    pub fn snapshot(&self) -> Arc<Vec<LeaveRequest>> {
        self.lock().snapshot()
    }

    /// Runs `operation` while holding the only write access to the store.
    pub fn write<T>(&self, operation: impl FnOnce(&mut LeaveRequestStore) -> T) -> T {
        let mut guard = self.lock();
        operation(&mut guard)
    }

    fn lock(&self) -> MutexGuard<'_, LeaveRequestStore> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
