//! Role references and their classification into id, name and record buckets.

use serde_json::Value;
use warden_core::{AppError, AppResult};

use crate::role::{Role, RoleId};

/// Caller-supplied pointer to a role.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RoleReference {
    /// Role identified by its numeric id.
    Id(RoleId),
    /// Role identified by its unique name.
    Name(String),
    /// Role that is already resolved.
    Record(Role),
}

impl RoleReference {
    /// Parses a loosely typed transport value into a role reference.
    ///
    /// Integers become ids, non-blank strings become names and objects must
    /// deserialize into a full role record. Anything else fails with
    /// [`AppError::InvalidRoleReference`].
    pub fn from_transport(value: &Value) -> AppResult<Self> {
        match value {
            Value::Number(number) => match number.as_i64() {
                Some(id) => Ok(Self::Id(RoleId::new(id))),
                None => Err(AppError::InvalidRoleReference(format!(
                    "'{number}' is not an integer role id"
                ))),
            },
            Value::String(name) if name.trim().is_empty() => Err(AppError::InvalidRoleReference(
                "role name must not be blank".to_owned(),
            )),
            Value::String(name) => Ok(Self::Name(name.clone())),
            Value::Object(_) => serde_json::from_value::<Role>(value.clone())
                .map(Self::Record)
                .map_err(|error| {
                    AppError::InvalidRoleReference(format!("object is not a role record: {error}"))
                }),
            Value::Null => Err(AppError::InvalidRoleReference(
                "null is not a role reference".to_owned(),
            )),
            Value::Bool(flag) => Err(AppError::InvalidRoleReference(format!(
                "boolean '{flag}' is not a role reference"
            ))),
            Value::Array(_) => Err(AppError::InvalidRoleReference(
                "nested arrays are not role references".to_owned(),
            )),
        }
    }
}

impl From<RoleId> for RoleReference {
    fn from(value: RoleId) -> Self {
        Self::Id(value)
    }
}

impl From<i64> for RoleReference {
    fn from(value: i64) -> Self {
        Self::Id(RoleId::new(value))
    }
}

impl From<&str> for RoleReference {
    fn from(value: &str) -> Self {
        Self::Name(value.to_owned())
    }
}

impl From<String> for RoleReference {
    fn from(value: String) -> Self {
        Self::Name(value)
    }
}

impl From<Role> for RoleReference {
    fn from(value: Role) -> Self {
        Self::Record(value)
    }
}

impl From<&Role> for RoleReference {
    fn from(value: &Role) -> Self {
        Self::Record(value.clone())
    }
}

/// Role references partitioned by shape. Every bucket keeps caller order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClassifiedRoleReferences {
    /// References given as numeric ids.
    pub integers: Vec<RoleId>,
    /// References given as names.
    pub strings: Vec<String>,
    /// References given as resolved records.
    pub models: Vec<Role>,
}

impl ClassifiedRoleReferences {
    /// Returns the total number of classified references.
    #[must_use]
    pub fn len(&self) -> usize {
        self.integers.len() + self.strings.len() + self.models.len()
    }

    /// Returns true when every bucket is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Partitions references into the id, name and record buckets.
pub fn classify_role_references<I>(references: I) -> ClassifiedRoleReferences
where
    I: IntoIterator,
    I::Item: Into<RoleReference>,
{
    let mut classified = ClassifiedRoleReferences::default();

    for reference in references {
        match reference.into() {
            RoleReference::Id(id) => classified.integers.push(id),
            RoleReference::Name(name) => classified.strings.push(name),
            RoleReference::Record(role) => classified.models.push(role),
        }
    }

    classified
}

/// Classifies loosely typed transport values, failing on the first invalid one.
pub fn classify_transport_references(values: &[Value]) -> AppResult<ClassifiedRoleReferences> {
    let references = values
        .iter()
        .map(RoleReference::from_transport)
        .collect::<AppResult<Vec<_>>>()?;

    Ok(classify_role_references(references))
}
