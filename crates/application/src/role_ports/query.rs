use warden_domain::{AuthorityKeys, RoleId};

/// Single predicate applied to a role query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RoleConstraint {
    /// Role id is one of the values.
    IdIn(Vec<RoleId>),
    /// Role name is one of the values.
    NameIn(Vec<String>),
    /// Role is held by at least one of the authorities.
    AssignedTo(AuthorityKeys),
    /// Role is held by none of the authorities.
    NotAssignedTo(AuthorityKeys),
}

/// Conjunction of constraints over the role table.
///
/// Adapters translate the constraints into their own filtering. An empty query
/// matches every role.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RoleQuery {
    constraints: Vec<RoleConstraint>,
}

impl RoleQuery {
    /// Creates an unconstrained query.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Restricts the query to the given ids.
    #[must_use]
    pub fn with_ids(mut self, ids: Vec<RoleId>) -> Self {
        self.push_constraint(RoleConstraint::IdIn(ids));
        self
    }

    /// Restricts the query to the given names.
    #[must_use]
    pub fn with_names(mut self, names: Vec<String>) -> Self {
        self.push_constraint(RoleConstraint::NameIn(names));
        self
    }

    /// Adds a constraint in place.
    pub fn push_constraint(&mut self, constraint: RoleConstraint) {
        self.constraints.push(constraint);
    }

    /// Returns the constraints in insertion order.
    #[must_use]
    pub fn constraints(&self) -> &[RoleConstraint] {
        self.constraints.as_slice()
    }
}

#[cfg(test)]
mod tests {
    use warden_domain::RoleId;

    use super::{RoleConstraint, RoleQuery};

    #[test]
    fn builder_keeps_constraint_order() {
        let query = RoleQuery::new()
            .with_names(vec!["admin".to_owned()])
            .with_ids(vec![RoleId::new(1)]);

        assert_eq!(
            query.constraints(),
            &[
                RoleConstraint::NameIn(vec!["admin".to_owned()]),
                RoleConstraint::IdIn(vec![RoleId::new(1)]),
            ]
        );
    }
}
