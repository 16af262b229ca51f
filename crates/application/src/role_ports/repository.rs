use async_trait::async_trait;

use warden_core::AppResult;
use warden_domain::{AssignmentRecord, AuthorityKeys, NewRole, Role, RoleId};

use super::query::RoleQuery;

/// Repository port for role records.
#[async_trait]
pub trait RoleRepository: Send + Sync {
    /// Returns the roles whose id is in `ids`. Unknown ids are skipped.
    async fn find_roles_by_ids(&self, ids: &[RoleId]) -> AppResult<Vec<Role>>;

    /// Returns the roles whose name exactly matches one of `names`.
    async fn find_roles_by_names(&self, names: &[String]) -> AppResult<Vec<Role>>;

    /// Persists a new role.
    ///
    /// Fails with `AppError::Conflict` when the name is taken and the adapter
    /// cannot converge on the existing record.
    async fn create_role(&self, role: NewRole) -> AppResult<Role>;

    /// Runs a constrained role query, ordered by role id.
    async fn query_roles(&self, query: &RoleQuery) -> AppResult<Vec<Role>>;
}

/// Repository port for the role/authority association table.
#[async_trait]
pub trait RoleAssignmentRepository: Send + Sync {
    /// Inserts association rows in one bulk write and returns how many were new.
    ///
    /// Rows that already exist are ignored.
    async fn insert_assignments(&self, records: Vec<AssignmentRecord>) -> AppResult<u64>;

    /// Deletes the rows of one role for the given authorities in one bulk write.
    ///
    /// Returns the number of rows removed; zero is not an error.
    async fn delete_assignments(
        &self,
        role_id: RoleId,
        authorities: &AuthorityKeys,
    ) -> AppResult<u64>;

    /// Lists ids of authorities of one type that hold the role.
    async fn list_assigned_authority_ids(
        &self,
        role_id: RoleId,
        authority_type: &str,
    ) -> AppResult<Vec<i64>>;
}
