//! Infrastructure adapters for application ports.

#![forbid(unsafe_code)]

mod config;
mod in_memory_role_repository;
mod postgres_role_repository;

pub use config::{DatabaseConfig, RoleStoreConfig, connect_pool};
pub use in_memory_role_repository::InMemoryRoleRepository;
pub use postgres_role_repository::PostgresRoleRepository;
