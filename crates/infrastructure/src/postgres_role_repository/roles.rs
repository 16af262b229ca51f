use super::*;

impl PostgresRoleRepository {
    pub(super) async fn find_roles_by_ids_impl(&self, ids: &[RoleId]) -> AppResult<Vec<Role>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let raw_ids: Vec<i64> = ids.iter().map(RoleId::as_i64).collect();
        let sql = format!(
            r#"
            SELECT id, name, title, attributes
            FROM {roles}
            WHERE id = ANY($1)
            ORDER BY id
            "#,
            roles = self.config.roles_table(),
        );

        let rows = sqlx::query_as::<_, RoleRow>(sql.as_str())
            .bind(raw_ids)
            .fetch_all(&self.pool)
            .await
            .map_err(|error| AppError::Internal(format!("failed to find roles by id: {error}")))?;

        roles_from_rows(rows)
    }

    pub(super) async fn find_roles_by_names_impl(&self, names: &[String]) -> AppResult<Vec<Role>> {
        if names.is_empty() {
            return Ok(Vec::new());
        }

        let sql = format!(
            r#"
            SELECT id, name, title, attributes
            FROM {roles}
            WHERE name = ANY($1)
            ORDER BY id
            "#,
            roles = self.config.roles_table(),
        );

        let rows = sqlx::query_as::<_, RoleRow>(sql.as_str())
            .bind(names)
            .fetch_all(&self.pool)
            .await
            .map_err(|error| {
                AppError::Internal(format!("failed to find roles by name: {error}"))
            })?;

        roles_from_rows(rows)
    }

    pub(super) async fn create_role_impl(&self, role: NewRole) -> AppResult<Role> {
        let insert_sql = format!(
            r#"
            INSERT INTO {roles} (name, title, attributes)
            VALUES ($1, $2, $3)
            ON CONFLICT (name) DO NOTHING
            RETURNING id, name, title, attributes
            "#,
            roles = self.config.roles_table(),
        );

        let inserted = sqlx::query_as::<_, RoleRow>(insert_sql.as_str())
            .bind(role.name.as_str())
            .bind(role.title.as_deref())
            .bind(Json(&role.attributes))
            .fetch_optional(&self.pool)
            .await
            .map_err(|error| map_role_conflict(error, role.name.as_str()))?;

        if let Some(row) = inserted {
            return Role::try_from(row);
        }

        // Another writer created the name between our lookup and insert.
        warn!(
            role_name = %role.name,
            "role name already taken, reusing the stored record"
        );

        let select_sql = format!(
            r#"
            SELECT id, name, title, attributes
            FROM {roles}
            WHERE name = $1
            "#,
            roles = self.config.roles_table(),
        );

        sqlx::query_as::<_, RoleRow>(select_sql.as_str())
            .bind(role.name.as_str())
            .fetch_optional(&self.pool)
            .await
            .map_err(|error| AppError::Internal(format!("failed to resolve role: {error}")))?
            .ok_or_else(|| AppError::Conflict(format!("role '{}' already exists", role.name)))
            .and_then(Role::try_from)
    }
}
