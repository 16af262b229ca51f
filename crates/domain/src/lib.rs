//! Domain entities and invariants.

#![forbid(unsafe_code)]

mod authority;
mod reference;
mod role;

pub use authority::{AssignmentRecord, Authority, AuthorityKeys};
pub use reference::{
    ClassifiedRoleReferences, RoleReference, classify_role_references,
    classify_transport_references,
};
pub use role::{NewRole, ROLE_AUTHORITY_TYPE, Role, RoleId, RoleName, role_title};
