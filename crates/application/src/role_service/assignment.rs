use super::*;

impl RoleService {
    /// Assigns the role to every targeted authority and returns the role.
    ///
    /// All association rows are written in one bulk insert. Rows that already
    /// exist are left alone, so re-assigning a held role is a no-op.
    pub async fn assign_to<'role>(
        &self,
        role: &'role Role,
        authorities: &AuthorityKeys,
    ) -> AppResult<&'role Role> {
        if authorities.is_empty() {
            return Ok(role);
        }

        let inserted = self
            .assignments
            .insert_assignments(authorities.assignment_records(role.id()))
            .await?;

        debug!(
            role_id = %role.id(),
            authority_type = %authorities.authority_type(),
            requested = authorities.authority_ids().len(),
            inserted,
            "assigned role"
        );

        Ok(role)
    }

    /// Retracts the role from every targeted authority and returns the role.
    ///
    /// Retracting an assignment that does not exist is a no-op.
    pub async fn retract_from<'role>(
        &self,
        role: &'role Role,
        authorities: &AuthorityKeys,
    ) -> AppResult<&'role Role> {
        if authorities.is_empty() {
            return Ok(role);
        }

        let deleted = self
            .assignments
            .delete_assignments(role.id(), authorities)
            .await?;

        debug!(
            role_id = %role.id(),
            authority_type = %authorities.authority_type(),
            requested = authorities.authority_ids().len(),
            deleted,
            "retracted role"
        );

        Ok(role)
    }

    /// Lists ids of authorities of one type that hold the role.
    pub async fn assigned_authority_ids(
        &self,
        role: &Role,
        authority_type: &str,
    ) -> AppResult<Vec<i64>> {
        self.assignments
            .list_assigned_authority_ids(role.id(), authority_type)
            .await
    }
}
