mod query;
mod repository;

pub use query::{RoleConstraint, RoleQuery};
pub use repository::{RoleAssignmentRepository, RoleRepository};
