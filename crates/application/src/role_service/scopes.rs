use super::*;

impl RoleService {
    /// Constrains `query` to roles held by at least one of the authorities.
    pub fn where_assigned_to(&self, query: &mut RoleQuery, authorities: &AuthorityKeys) {
        query.push_constraint(RoleConstraint::AssignedTo(authorities.clone()));
    }

    /// Constrains `query` to roles held by none of the authorities.
    pub fn where_not_assigned_to(&self, query: &mut RoleQuery, authorities: &AuthorityKeys) {
        query.push_constraint(RoleConstraint::NotAssignedTo(authorities.clone()));
    }

    /// Runs a role query through the repository.
    pub async fn query_roles(&self, query: &RoleQuery) -> AppResult<Vec<Role>> {
        self.roles.query_roles(query).await
    }

    /// Lists the roles held by any of the authorities, ordered by role id.
    pub async fn roles_assigned_to(&self, authorities: &AuthorityKeys) -> AppResult<Vec<Role>> {
        let mut query = RoleQuery::new();
        self.where_assigned_to(&mut query, authorities);
        self.query_roles(&query).await
    }
}
