use sqlx::{Postgres, QueryBuilder};
use warden_application::RoleConstraint;

use super::*;

impl PostgresRoleRepository {
    pub(super) async fn query_roles_impl(&self, query: &RoleQuery) -> AppResult<Vec<Role>> {
        let mut builder: QueryBuilder<'_, Postgres> = QueryBuilder::new(
            "SELECT roles.id, roles.name, roles.title, roles.attributes FROM ",
        );
        builder.push(self.config.roles_table());
        builder.push(" AS roles WHERE TRUE");

        for constraint in query.constraints() {
            builder.push(" AND ");
            self.push_role_constraint(&mut builder, constraint);
        }

        builder.push(" ORDER BY roles.id");

        let rows = builder
            .build_query_as::<RoleRow>()
            .fetch_all(&self.pool)
            .await
            .map_err(|error| AppError::Internal(format!("failed to query roles: {error}")))?;

        roles_from_rows(rows)
    }

    fn push_role_constraint(
        &self,
        builder: &mut QueryBuilder<'_, Postgres>,
        constraint: &RoleConstraint,
    ) {
        match constraint {
            RoleConstraint::IdIn(ids) => {
                builder.push("roles.id = ANY(");
                builder.push_bind(ids.iter().map(RoleId::as_i64).collect::<Vec<_>>());
                builder.push(')');
            }
            RoleConstraint::NameIn(names) => {
                builder.push("roles.name = ANY(");
                builder.push_bind(names.clone());
                builder.push(')');
            }
            RoleConstraint::AssignedTo(authorities) => {
                builder.push("EXISTS ");
                self.push_assignment_subquery(builder, authorities);
            }
            RoleConstraint::NotAssignedTo(authorities) => {
                builder.push("NOT EXISTS ");
                self.push_assignment_subquery(builder, authorities);
            }
        }
    }

    fn push_assignment_subquery(
        &self,
        builder: &mut QueryBuilder<'_, Postgres>,
        authorities: &AuthorityKeys,
    ) {
        builder.push("(SELECT 1 FROM ");
        builder.push(self.config.assigned_roles_table());
        builder.push(" AS assigned WHERE assigned.role_id = roles.id AND assigned.entity_type = ");
        builder.push_bind(authorities.authority_type().to_owned());
        builder.push(" AND assigned.entity_id = ANY(");
        builder.push_bind(authorities.authority_ids().to_vec());
        builder.push("))");
    }
}
