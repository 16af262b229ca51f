use super::*;

impl RoleService {
    /// Resolves mixed references into role records, creating roles for unknown names.
    ///
    /// The result lists id references first, then name references, then
    /// records, each bucket in caller order. Unknown ids are dropped, repeated
    /// ids and names resolve once, and records pass through untouched.
    pub async fn find_or_create_roles<I>(&self, references: I) -> AppResult<Vec<Role>>
    where
        I: IntoIterator,
        I::Item: Into<RoleReference>,
    {
        let ClassifiedRoleReferences {
            integers,
            strings,
            models,
        } = classify_role_references(references);

        let mut roles = self.find_roles_by_ids(&integers).await?;
        roles.extend(self.find_or_create_roles_by_name(&strings).await?);
        roles.extend(models);

        Ok(roles)
    }

    /// Resolves mixed references into role ids without creating anything.
    ///
    /// Ids pass through unchecked, names that match no role are omitted.
    pub async fn role_keys<I>(&self, references: I) -> AppResult<Vec<RoleId>>
    where
        I: IntoIterator,
        I::Item: Into<RoleReference>,
    {
        let ClassifiedRoleReferences {
            integers,
            strings,
            models,
        } = classify_role_references(references);

        let mut keys = integers;
        keys.extend(self.keys_by_name(&strings).await?);
        keys.extend(models.iter().map(Role::id));

        Ok(keys)
    }

    /// Resolves mixed references into role names without creating anything.
    ///
    /// Names pass through unchecked, ids that match no role are omitted.
    pub async fn role_names<I>(&self, references: I) -> AppResult<Vec<String>>
    where
        I: IntoIterator,
        I::Item: Into<RoleReference>,
    {
        let ClassifiedRoleReferences {
            integers,
            strings,
            models,
        } = classify_role_references(references);

        let mut names = self.names_by_key(&integers).await?;
        names.extend(strings);
        names.extend(models.iter().map(|role| role.name().as_str().to_owned()));

        Ok(names)
    }

    /// Looks up the ids of the named roles, in the order the names were given.
    pub async fn keys_by_name(&self, names: &[String]) -> AppResult<Vec<RoleId>> {
        if names.is_empty() {
            return Ok(Vec::new());
        }

        let names = unique_in_order(names);
        let found: HashMap<String, RoleId> = self
            .roles
            .find_roles_by_names(&names)
            .await?
            .into_iter()
            .map(|role| (role.name().as_str().to_owned(), role.id()))
            .collect();

        Ok(names
            .iter()
            .filter_map(|name| found.get(name).copied())
            .collect())
    }

    /// Looks up the names of the given role ids, in the order the ids were given.
    pub async fn names_by_key(&self, keys: &[RoleId]) -> AppResult<Vec<String>> {
        Ok(self
            .find_roles_by_ids(keys)
            .await?
            .into_iter()
            .map(|role| String::from(role.name().clone()))
            .collect())
    }

    async fn find_roles_by_ids(&self, ids: &[RoleId]) -> AppResult<Vec<Role>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let ids = unique_in_order(ids);
        let mut found: HashMap<RoleId, Role> = self
            .roles
            .find_roles_by_ids(&ids)
            .await?
            .into_iter()
            .map(|role| (role.id(), role))
            .collect();

        Ok(ids.iter().filter_map(|id| found.remove(id)).collect())
    }

    async fn find_or_create_roles_by_name(&self, names: &[String]) -> AppResult<Vec<Role>> {
        if names.is_empty() {
            return Ok(Vec::new());
        }

        let names = unique_in_order(names);
        let mut existing: HashMap<String, Role> = self
            .roles
            .find_roles_by_names(&names)
            .await?
            .into_iter()
            .map(|role| (role.name().as_str().to_owned(), role))
            .collect();

        // Validate every missing name before the first write.
        let resolutions = names
            .into_iter()
            .map(|name| match existing.remove(&name) {
                Some(role) => Ok(NameResolution::Existing(role)),
                None => RoleName::new(name).map(NameResolution::Missing),
            })
            .collect::<AppResult<Vec<_>>>()?;

        let mut roles = Vec::with_capacity(resolutions.len());
        for resolution in resolutions {
            let role = match resolution {
                NameResolution::Existing(role) => role,
                NameResolution::Missing(name) => {
                    let role = self.roles.create_role(NewRole::named(name)).await?;
                    debug!(
                        role_id = %role.id(),
                        role_name = %role.name(),
                        "created role for unresolved name"
                    );
                    role
                }
            };
            roles.push(role);
        }

        Ok(roles)
    }
}

enum NameResolution {
    Existing(Role),
    Missing(RoleName),
}
