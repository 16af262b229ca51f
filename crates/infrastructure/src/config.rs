use std::env;

use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use warden_core::{AppError, AppResult};

const DEFAULT_ROLES_TABLE: &str = "roles";
const DEFAULT_ASSIGNED_ROLES_TABLE: &str = "assigned_roles";
const DEFAULT_MAX_CONNECTIONS: u32 = 5;

/// Table layout used by the PostgreSQL role adapter.
///
/// The roles table needs `id BIGINT`, `name TEXT UNIQUE`, `title TEXT` and
/// `attributes JSONB`. The association table needs `role_id`, `entity_type`
/// and `entity_id` with a unique index over all three.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoleStoreConfig {
    roles_table: String,
    assigned_roles_table: String,
}

impl RoleStoreConfig {
    /// Creates a configuration with explicit table names.
    pub fn new(
        roles_table: impl Into<String>,
        assigned_roles_table: impl Into<String>,
    ) -> AppResult<Self> {
        let roles_table = roles_table.into();
        let assigned_roles_table = assigned_roles_table.into();
        validate_identifier("roles table", roles_table.as_str())?;
        validate_identifier("assigned roles table", assigned_roles_table.as_str())?;

        Ok(Self {
            roles_table,
            assigned_roles_table,
        })
    }

    /// Loads table names from `WARDEN_ROLES_TABLE` and `WARDEN_ASSIGNED_ROLES_TABLE`.
    pub fn from_env() -> AppResult<Self> {
        Self::new(
            env::var("WARDEN_ROLES_TABLE").unwrap_or_else(|_| DEFAULT_ROLES_TABLE.to_owned()),
            env::var("WARDEN_ASSIGNED_ROLES_TABLE")
                .unwrap_or_else(|_| DEFAULT_ASSIGNED_ROLES_TABLE.to_owned()),
        )
    }

    /// Returns the roles table name.
    #[must_use]
    pub fn roles_table(&self) -> &str {
        self.roles_table.as_str()
    }

    /// Returns the association table name.
    #[must_use]
    pub fn assigned_roles_table(&self) -> &str {
        self.assigned_roles_table.as_str()
    }
}

impl Default for RoleStoreConfig {
    fn default() -> Self {
        Self {
            roles_table: DEFAULT_ROLES_TABLE.to_owned(),
            assigned_roles_table: DEFAULT_ASSIGNED_ROLES_TABLE.to_owned(),
        }
    }
}

/// Database connection settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatabaseConfig {
    /// PostgreSQL connection string.
    pub database_url: String,
    /// Upper bound for pooled connections.
    pub max_connections: u32,
}

impl DatabaseConfig {
    /// Loads `DATABASE_URL` (required) and `DATABASE_MAX_CONNECTIONS`.
    pub fn from_env() -> AppResult<Self> {
        let database_url = env::var("DATABASE_URL")
            .map_err(|_| AppError::Validation("DATABASE_URL is required".to_owned()))?;
        let max_connections = match env::var("DATABASE_MAX_CONNECTIONS") {
            Ok(value) => value.parse::<u32>().map_err(|error| {
                AppError::Validation(format!(
                    "invalid DATABASE_MAX_CONNECTIONS value '{value}': {error}"
                ))
            })?,
            Err(_) => DEFAULT_MAX_CONNECTIONS,
        };

        Ok(Self {
            database_url,
            max_connections,
        })
    }
}

/// Opens a PostgreSQL connection pool.
pub async fn connect_pool(config: &DatabaseConfig) -> AppResult<PgPool> {
    PgPoolOptions::new()
        .max_connections(config.max_connections)
        .connect(config.database_url.as_str())
        .await
        .map_err(|error| AppError::Internal(format!("failed to connect to database: {error}")))
}

fn validate_identifier(label: &str, value: &str) -> AppResult<()> {
    let mut characters = value.chars();
    let starts_well = characters
        .next()
        .is_some_and(|first| first.is_ascii_alphabetic() || first == '_');
    let rest_valid =
        characters.all(|character| character.is_ascii_alphanumeric() || character == '_');

    if !starts_well || !rest_valid || value.len() > 63 {
        return Err(AppError::Validation(format!(
            "{label} '{value}' must be a plain SQL identifier"
        )));
    }

    Ok(())
}
