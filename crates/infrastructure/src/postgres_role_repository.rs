use async_trait::async_trait;
use serde_json::{Map, Value};
use sqlx::types::Json;
use sqlx::{FromRow, PgPool};
use tracing::warn;

use warden_application::{RoleAssignmentRepository, RoleQuery, RoleRepository};
use warden_core::{AppError, AppResult};
use warden_domain::{AssignmentRecord, AuthorityKeys, NewRole, Role, RoleId, RoleName};

use crate::config::RoleStoreConfig;

mod assignments;
mod query;
mod roles;

#[cfg(test)]
mod tests;

/// PostgreSQL-backed repository for roles and their assignments.
#[derive(Clone)]
pub struct PostgresRoleRepository {
    pool: PgPool,
    config: RoleStoreConfig,
}

impl PostgresRoleRepository {
    /// Creates a repository over the provided pool and table layout.
    #[must_use]
    pub fn new(pool: PgPool, config: RoleStoreConfig) -> Self {
        Self { pool, config }
    }
}

#[derive(Debug, FromRow)]
struct RoleRow {
    id: i64,
    name: String,
    title: Option<String>,
    attributes: Json<Map<String, Value>>,
}

impl TryFrom<RoleRow> for Role {
    type Error = AppError;

    fn try_from(row: RoleRow) -> Result<Self, Self::Error> {
        let name = RoleName::new(row.name).map_err(|error| {
            AppError::Internal(format!("stored role '{}' is invalid: {error}", row.id))
        })?;

        Ok(Role::new(RoleId::new(row.id), name, row.title, row.attributes.0))
    }
}

fn roles_from_rows(rows: Vec<RoleRow>) -> AppResult<Vec<Role>> {
    rows.into_iter().map(Role::try_from).collect()
}

#[async_trait]
impl RoleRepository for PostgresRoleRepository {
    async fn find_roles_by_ids(&self, ids: &[RoleId]) -> AppResult<Vec<Role>> {
        self.find_roles_by_ids_impl(ids).await
    }

    async fn find_roles_by_names(&self, names: &[String]) -> AppResult<Vec<Role>> {
        self.find_roles_by_names_impl(names).await
    }

    async fn create_role(&self, role: NewRole) -> AppResult<Role> {
        self.create_role_impl(role).await
    }

    async fn query_roles(&self, query: &RoleQuery) -> AppResult<Vec<Role>> {
        self.query_roles_impl(query).await
    }
}

#[async_trait]
impl RoleAssignmentRepository for PostgresRoleRepository {
    async fn insert_assignments(&self, records: Vec<AssignmentRecord>) -> AppResult<u64> {
        self.insert_assignments_impl(records).await
    }

    async fn delete_assignments(
        &self,
        role_id: RoleId,
        authorities: &AuthorityKeys,
    ) -> AppResult<u64> {
        self.delete_assignments_impl(role_id, authorities).await
    }

    async fn list_assigned_authority_ids(
        &self,
        role_id: RoleId,
        authority_type: &str,
    ) -> AppResult<Vec<i64>> {
        self.list_assigned_authority_ids_impl(role_id, authority_type)
            .await
    }
}

fn map_role_conflict(error: sqlx::Error, role_name: &str) -> AppError {
    if let sqlx::Error::Database(database_error) = &error
        && database_error.code().as_deref() == Some("23505")
    {
        return AppError::Conflict(format!("role '{role_name}' already exists"));
    }

    AppError::Internal(format!("failed to create role: {error}"))
}

fn map_assignment_error(error: sqlx::Error) -> AppError {
    if let sqlx::Error::Database(database_error) = &error {
        match database_error.code().as_deref() {
            Some("23503") => {
                return AppError::NotFound(format!(
                    "assignment references a missing role: {database_error}"
                ));
            }
            Some("23505") => {
                return AppError::Conflict(format!(
                    "role is already assigned: {database_error}"
                ));
            }
            _ => {}
        }
    }

    AppError::Internal(format!("failed to assign role: {error}"))
}
