//! Role records and their value types.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use warden_core::{AppError, AppResult, NonEmptyString};

use crate::authority::Authority;

/// Type tag used when a role itself is the target of a grant.
pub const ROLE_AUTHORITY_TYPE: &str = "roles";

/// Numeric identity of a persisted role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RoleId(i64);

impl RoleId {
    /// Wraps a raw storage identifier.
    #[must_use]
    pub fn new(value: i64) -> Self {
        Self(value)
    }

    /// Returns the raw storage identifier.
    #[must_use]
    pub fn as_i64(&self) -> i64 {
        self.0
    }
}

impl From<i64> for RoleId {
    fn from(value: i64) -> Self {
        Self(value)
    }
}

impl std::fmt::Display for RoleId {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(formatter, "{}", self.0)
    }
}

/// Unique, non-blank role name.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct RoleName(NonEmptyString);

impl RoleName {
    /// Creates a validated role name. Names are matched exactly, so no trimming happens.
    pub fn new(value: impl Into<String>) -> AppResult<Self> {
        NonEmptyString::new(value)
            .map(Self)
            .map_err(|_| AppError::Validation("role name must not be blank".to_owned()))
    }

    /// Returns the name as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl TryFrom<String> for RoleName {
    type Error = AppError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<RoleName> for String {
    fn from(value: RoleName) -> Self {
        value.0.into()
    }
}

impl std::fmt::Display for RoleName {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        formatter.write_str(self.as_str())
    }
}

/// Persisted role record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Role {
    id: RoleId,
    name: RoleName,
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    attributes: Map<String, Value>,
}

impl Role {
    /// Creates a role record from stored values.
    #[must_use]
    pub fn new(
        id: RoleId,
        name: RoleName,
        title: Option<String>,
        attributes: Map<String, Value>,
    ) -> Self {
        Self {
            id,
            name,
            title,
            attributes,
        }
    }

    /// Materializes a freshly inserted role from its creation payload.
    #[must_use]
    pub fn from_new(id: RoleId, new_role: NewRole) -> Self {
        Self::new(id, new_role.name, new_role.title, new_role.attributes)
    }

    /// Returns the role identifier.
    #[must_use]
    pub fn id(&self) -> RoleId {
        self.id
    }

    /// Returns the unique role name.
    #[must_use]
    pub fn name(&self) -> &RoleName {
        &self.name
    }

    /// Returns the human readable title, if one was stored.
    #[must_use]
    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    /// Returns the remaining free-form attributes.
    #[must_use]
    pub fn attributes(&self) -> &Map<String, Value> {
        &self.attributes
    }
}

impl Authority for Role {
    fn authority_type(&self) -> &str {
        ROLE_AUTHORITY_TYPE
    }

    fn authority_id(&self) -> i64 {
        self.id.as_i64()
    }
}

/// Creation payload for a role that does not exist yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewRole {
    /// Unique role name.
    pub name: RoleName,
    /// Optional human readable title.
    pub title: Option<String>,
    /// Extra attributes stored alongside the role.
    pub attributes: Map<String, Value>,
}

impl NewRole {
    /// Builds the minimal payload used when a role is created from its name.
    #[must_use]
    pub fn named(name: RoleName) -> Self {
        let title = Some(role_title(name.as_str()));
        Self {
            name,
            title,
            attributes: Map::new(),
        }
    }
}

/// Derives a display title from a role name.
///
/// Separators (`-`, `_`, whitespace) and camel-case boundaries become single
/// spaces, the result is lowercased and its first letter capitalized:
/// `site-admin` becomes `Site admin`, `banUsers` becomes `Ban users`.
#[must_use]
pub fn role_title(name: &str) -> String {
    let mut words = String::with_capacity(name.len());
    let mut previous: Option<char> = None;

    for character in name.chars() {
        if character == '-' || character == '_' || character.is_whitespace() {
            if !words.is_empty() && !words.ends_with(' ') {
                words.push(' ');
            }
        } else {
            let boundary = character.is_uppercase()
                && previous.is_some_and(|last| last.is_lowercase() || last.is_ascii_digit());
            if boundary && !words.ends_with(' ') {
                words.push(' ');
            }
            words.extend(character.to_lowercase());
        }
        previous = Some(character);
    }

    let words = words.trim_end();
    let mut characters = words.chars();
    match characters.next() {
        Some(first) => first.to_uppercase().chain(characters).collect(),
        None => String::new(),
    }
}
