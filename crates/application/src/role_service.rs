use std::collections::{HashMap, HashSet};
use std::hash::Hash;
use std::sync::Arc;

use tracing::debug;
use warden_core::AppResult;
use warden_domain::{
    AuthorityKeys, ClassifiedRoleReferences, NewRole, Role, RoleId, RoleName, RoleReference,
    classify_role_references,
};

use crate::role_ports::{RoleAssignmentRepository, RoleConstraint, RoleQuery, RoleRepository};

mod assignment;
mod resolve;
mod scopes;


/// Resolves role references and manages role assignments.
///
/// Every operation is a short, strictly sequential chain of repository calls.
/// Nothing here spans a transaction; callers that need atomicity across
/// resolution and assignment must wrap the calls themselves.
#[derive(Clone)]
pub struct RoleService {
    roles: Arc<dyn RoleRepository>,
    assignments: Arc<dyn RoleAssignmentRepository>,
}

impl RoleService {
    /// Creates a new service from required dependencies.
    #[must_use]
    pub fn new(
        roles: Arc<dyn RoleRepository>,
        assignments: Arc<dyn RoleAssignmentRepository>,
    ) -> Self {
        Self { roles, assignments }
    }
}

/// Drops repeated values while keeping first occurrences in order.
fn unique_in_order<T>(values: &[T]) -> Vec<T>
where
    T: Clone + Eq + Hash,
{
    let mut seen = HashSet::with_capacity(values.len());
    values
        .iter()
        .filter(|value| seen.insert(*value))
        .cloned()
        .collect()
}
