use super::*;

impl PostgresRoleRepository {
    pub(super) async fn insert_assignments_impl(
        &self,
        records: Vec<AssignmentRecord>,
    ) -> AppResult<u64> {
        if records.is_empty() {
            return Ok(0);
        }

        let mut role_ids = Vec::with_capacity(records.len());
        let mut entity_types = Vec::with_capacity(records.len());
        let mut entity_ids = Vec::with_capacity(records.len());
        for record in records {
            role_ids.push(record.role_id.as_i64());
            entity_types.push(record.entity_type);
            entity_ids.push(record.entity_id);
        }

        let sql = format!(
            r#"
            INSERT INTO {assigned_roles} (role_id, entity_type, entity_id)
            SELECT * FROM UNNEST($1::BIGINT[], $2::TEXT[], $3::BIGINT[])
            ON CONFLICT (role_id, entity_type, entity_id) DO NOTHING
            "#,
            assigned_roles = self.config.assigned_roles_table(),
        );

        let result = sqlx::query(sql.as_str())
            .bind(role_ids)
            .bind(entity_types)
            .bind(entity_ids)
            .execute(&self.pool)
            .await
            .map_err(map_assignment_error)?;

        Ok(result.rows_affected())
    }

    pub(super) async fn delete_assignments_impl(
        &self,
        role_id: RoleId,
        authorities: &AuthorityKeys,
    ) -> AppResult<u64> {
        if authorities.is_empty() {
            return Ok(0);
        }

        let sql = format!(
            r#"
            DELETE FROM {assigned_roles}
            WHERE role_id = $1
                AND entity_type = $2
                AND entity_id = ANY($3)
            "#,
            assigned_roles = self.config.assigned_roles_table(),
        );

        let result = sqlx::query(sql.as_str())
            .bind(role_id.as_i64())
            .bind(authorities.authority_type())
            .bind(authorities.authority_ids())
            .execute(&self.pool)
            .await
            .map_err(|error| {
                AppError::Internal(format!("failed to retract role assignments: {error}"))
            })?;

        Ok(result.rows_affected())
    }

    pub(super) async fn list_assigned_authority_ids_impl(
        &self,
        role_id: RoleId,
        authority_type: &str,
    ) -> AppResult<Vec<i64>> {
        let sql = format!(
            r#"
            SELECT entity_id
            FROM {assigned_roles}
            WHERE role_id = $1
                AND entity_type = $2
            ORDER BY entity_id
            "#,
            assigned_roles = self.config.assigned_roles_table(),
        );

        sqlx::query_scalar::<_, i64>(sql.as_str())
            .bind(role_id.as_i64())
            .bind(authority_type)
            .fetch_all(&self.pool)
            .await
            .map_err(|error| {
                AppError::Internal(format!("failed to list role holders: {error}"))
            })
    }
}
