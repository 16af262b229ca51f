use std::collections::{BTreeMap, BTreeSet};

use async_trait::async_trait;
use tokio::sync::RwLock;
use warden_application::{RoleAssignmentRepository, RoleConstraint, RoleQuery, RoleRepository};
use warden_core::{AppError, AppResult};
use warden_domain::{AssignmentRecord, AuthorityKeys, NewRole, Role, RoleId};


/// In-memory role and assignment store.
///
/// Role names are unique and association rows form a set, matching the
/// constraints of the PostgreSQL schema.
#[derive(Debug, Default)]
pub struct InMemoryRoleRepository {
    roles: RwLock<BTreeMap<RoleId, Role>>,
    assignments: RwLock<BTreeSet<AssignmentRecord>>,
}

impl InMemoryRoleRepository {
    /// Creates an empty in-memory repository.
    #[must_use]
    pub fn new() -> Self {
        Self {
            roles: RwLock::new(BTreeMap::new()),
            assignments: RwLock::new(BTreeSet::new()),
        }
    }
}

#[async_trait]
impl RoleRepository for InMemoryRoleRepository {
    async fn find_roles_by_ids(&self, ids: &[RoleId]) -> AppResult<Vec<Role>> {
        let roles = self.roles.read().await;
        let wanted: BTreeSet<&RoleId> = ids.iter().collect();

        Ok(wanted
            .into_iter()
            .filter_map(|id| roles.get(id).cloned())
            .collect())
    }

    async fn find_roles_by_names(&self, names: &[String]) -> AppResult<Vec<Role>> {
        let roles = self.roles.read().await;

        Ok(roles
            .values()
            .filter(|role| names.iter().any(|name| name == role.name().as_str()))
            .cloned()
            .collect())
    }

    async fn create_role(&self, role: NewRole) -> AppResult<Role> {
        let mut roles = self.roles.write().await;

        if roles.values().any(|stored| stored.name() == &role.name) {
            return Err(AppError::Conflict(format!(
                "role '{}' already exists",
                role.name
            )));
        }

        let next_id = roles
            .keys()
            .next_back()
            .map_or(1, |last| last.as_i64().saturating_add(1));
        let created = Role::from_new(RoleId::new(next_id), role);
        roles.insert(created.id(), created.clone());

        Ok(created)
    }

    async fn query_roles(&self, query: &RoleQuery) -> AppResult<Vec<Role>> {
        let roles = self.roles.read().await;
        let assignments = self.assignments.read().await;

        Ok(roles
            .values()
            .filter(|role| {
                query
                    .constraints()
                    .iter()
                    .all(|constraint| matches_constraint(role, constraint, &assignments))
            })
            .cloned()
            .collect())
    }
}

#[async_trait]
impl RoleAssignmentRepository for InMemoryRoleRepository {
    async fn insert_assignments(&self, records: Vec<AssignmentRecord>) -> AppResult<u64> {
        let roles = self.roles.read().await;
        if let Some(orphan) = records
            .iter()
            .find(|record| !roles.contains_key(&record.role_id))
        {
            return Err(AppError::NotFound(format!(
                "role '{}' was not found",
                orphan.role_id
            )));
        }

        let mut assignments = self.assignments.write().await;
        let inserted = records
            .into_iter()
            .filter(|record| assignments.insert(record.clone()))
            .count();

        Ok(u64::try_from(inserted).unwrap_or(u64::MAX))
    }

    async fn delete_assignments(
        &self,
        role_id: RoleId,
        authorities: &AuthorityKeys,
    ) -> AppResult<u64> {
        let mut assignments = self.assignments.write().await;
        let before = assignments.len();
        assignments.retain(|record| {
            !(record.role_id == role_id && held_by(record, authorities))
        });

        Ok(u64::try_from(before - assignments.len()).unwrap_or(u64::MAX))
    }

    async fn list_assigned_authority_ids(
        &self,
        role_id: RoleId,
        authority_type: &str,
    ) -> AppResult<Vec<i64>> {
        Ok(self
            .assignments
            .read()
            .await
            .iter()
            .filter(|record| record.role_id == role_id && record.entity_type == authority_type)
            .map(|record| record.entity_id)
            .collect())
    }
}

fn matches_constraint(
    role: &Role,
    constraint: &RoleConstraint,
    assignments: &BTreeSet<AssignmentRecord>,
) -> bool {
    match constraint {
        RoleConstraint::IdIn(ids) => ids.contains(&role.id()),
        RoleConstraint::NameIn(names) => names.iter().any(|name| name == role.name().as_str()),
        RoleConstraint::AssignedTo(authorities) => is_assigned(role, authorities, assignments),
        RoleConstraint::NotAssignedTo(authorities) => !is_assigned(role, authorities, assignments),
    }
}

fn is_assigned(
    role: &Role,
    authorities: &AuthorityKeys,
    assignments: &BTreeSet<AssignmentRecord>,
) -> bool {
    assignments
        .iter()
        .any(|record| record.role_id == role.id() && held_by(record, authorities))
}

fn held_by(record: &AssignmentRecord, authorities: &AuthorityKeys) -> bool {
    record.entity_type == authorities.authority_type()
        && authorities.authority_ids().contains(&record.entity_id)
}
