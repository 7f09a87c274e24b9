use std::collections::BTreeMap;
use std::str::FromStr;

use serde::Serialize;
use tracing::warn;

use super::domain::{
    Actor, Employee, LeaveError, LeaveRequest, LeaveRequestId, LeaveStatus, LeaveType, UserId,
};
use super::store::LeaveRequestStore;
use super::summary::{company_report, CompanyLeaveReport};

const ALL_USERS: &str = "all";

/// Which employees a company view should include.
///
/// Parses the literal `all` (exact case) as every user; anything else is
/// taken as a user id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserSelector {
    All,
    User(UserId),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("user selector must be 'all' or a non-empty user id")]
pub struct EmptySelector;

impl FromStr for UserSelector {
    type Err = EmptySelector;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            Err(EmptySelector)
        } else if trimmed == ALL_USERS {
            Ok(Self::All)
        } else {
            Ok(Self::User(UserId(trimmed.to_string())))
        }
    }
}

/// What the acting user may do with one request.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct LeaveCapabilities {
    pub can_edit: bool,
    pub can_approve: bool,
    pub can_delete: bool,
}

impl LeaveCapabilities {
    /// Managers may do everything; owners may still edit or withdraw their own
    /// request while it is pending.
    pub fn derive(actor: &Actor, request: &LeaveRequest) -> Self {
        let manage = actor.permission.manage_leaves;
        let owns_pending =
            request.user_id == actor.user_id && request.status == LeaveStatus::Pending;

        Self {
            can_edit: manage || owns_pending,
            can_approve: manage,
            can_delete: manage || owns_pending,
        }
    }
}

/// A leave request composed for a company-wide view.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompanyLeaveRequest {
    #[serde(flatten)]
    pub request: LeaveRequest,
    pub user: Option<Employee>,
    pub can_edit: bool,
    pub can_approve: bool,
    pub can_delete: bool,
}

impl CompanyLeaveRequest {
    pub fn capabilities(&self) -> LeaveCapabilities {
        LeaveCapabilities {
            can_edit: self.can_edit,
            can_approve: self.can_approve,
            can_delete: self.can_delete,
        }
    }
}

/// Multi-employee view over a [`LeaveRequestStore`].
///
/// Capability flags are derived from the actor passed to each read, so a
/// permission change shows up on the next call without rebuilding anything.
#[derive(Debug, Clone, Default)]
pub struct CompanyLeaveStore {
    store: LeaveRequestStore,
    employees: BTreeMap<UserId, Employee>,
}

impl CompanyLeaveStore {
    pub fn new(store: LeaveRequestStore, employees: impl IntoIterator<Item = Employee>) -> Self {
        let employees = employees
            .into_iter()
            .map(|employee| (employee.id.clone(), employee))
            .collect();
        Self { store, employees }
    }

    pub fn register_employee(&mut self, employee: Employee) {
        self.employees.insert(employee.id.clone(), employee);
    }

    pub fn employees(&self) -> &BTreeMap<UserId, Employee> {
        &self.employees
    }

    pub fn store(&self) -> &LeaveRequestStore {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut LeaveRequestStore {
        &mut self.store
    }

    /// Every request the actor may see, in insertion order.
    ///
    /// Without `view_leaves` an actor only sees their own requests.
    pub fn leaves(&self, actor: &Actor) -> Vec<CompanyLeaveRequest> {
        self.store
            .requests()
            .iter()
            .filter(|request| actor.permission.view_leaves || request.user_id == actor.user_id)
            .map(|request| self.compose(request, actor))
            .collect()
    }

    pub fn filter_by_user(&self, selector: &UserSelector, actor: &Actor) -> Vec<CompanyLeaveRequest> {
        let leaves = self.leaves(actor);
        match selector {
            UserSelector::All => leaves,
            UserSelector::User(user_id) => leaves
                .into_iter()
                .filter(|leave| &leave.request.user_id == user_id)
                .collect(),
        }
    }

    pub fn approve_leave(
        &mut self,
        actor: &Actor,
        id: &LeaveRequestId,
    ) -> Result<LeaveStatus, LeaveError> {
        require_manage(actor, "approving leave")?;
        self.store.approve(id)
    }

    pub fn reject_leave(
        &mut self,
        actor: &Actor,
        id: &LeaveRequestId,
    ) -> Result<LeaveStatus, LeaveError> {
        require_manage(actor, "rejecting leave")?;
        self.store.reject(id)
    }

    pub fn revoke_leave(
        &mut self,
        actor: &Actor,
        id: &LeaveRequestId,
    ) -> Result<LeaveStatus, LeaveError> {
        require_manage(actor, "revoking leave")?;
        self.store.revoke(id)
    }

    /// Managers may delete any request; owners only their own pending ones.
    pub fn delete_leave(
        &mut self,
        actor: &Actor,
        id: &LeaveRequestId,
    ) -> Result<LeaveRequest, LeaveError> {
        let request = self
            .store
            .get(id)
            .ok_or_else(|| LeaveError::RequestNotFound(id.clone()))?;
        if !LeaveCapabilities::derive(actor, request).can_delete {
            warn!(request_id = %id, actor = %actor.user_id, "leave deletion denied");
            return Err(LeaveError::NotPendingOwner(id.clone()));
        }
        self.store.remove(id)
    }

    pub fn report(&self, leave_types: &[LeaveType], default_allowance: f64) -> CompanyLeaveReport {
        company_report(
            self.store.requests(),
            &self.employees,
            leave_types,
            default_allowance,
        )
    }

    fn compose(&self, request: &LeaveRequest, actor: &Actor) -> CompanyLeaveRequest {
        let capabilities = LeaveCapabilities::derive(actor, request);
        CompanyLeaveRequest {
            request: request.clone(),
            user: self.employees.get(&request.user_id).cloned(),
            can_edit: capabilities.can_edit,
            can_approve: capabilities.can_approve,
            can_delete: capabilities.can_delete,
        }
    }
}

fn require_manage(actor: &Actor, action: &'static str) -> Result<(), LeaveError> {
    if actor.permission.manage_leaves {
        Ok(())
    } else {
        warn!(actor = %actor.user_id, action, "leave mutation denied");
        Err(LeaveError::PermissionDenied(action))
    }
}
