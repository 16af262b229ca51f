//! Authorities that can hold roles, and the association rows linking them.

use serde::{Deserialize, Serialize};
use warden_core::{AppError, AppResult, NonEmptyString};

use crate::role::RoleId;

/// Entity capable of holding roles.
///
/// Implementors identify themselves with a stable type tag and a numeric id.
/// The pair is what gets written into the association table.
pub trait Authority {
    /// Returns the stable type tag stored in `entity_type`.
    fn authority_type(&self) -> &str;

    /// Returns the numeric identifier stored in `entity_id`.
    fn authority_id(&self) -> i64;
}

/// Resolved authority argument: one type tag plus the ids it applies to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthorityKeys {
    authority_type: String,
    authority_ids: Vec<i64>,
}

impl AuthorityKeys {
    /// Creates keys from a raw type tag and id list.
    pub fn new(authority_type: impl Into<String>, authority_ids: Vec<i64>) -> AppResult<Self> {
        let authority_type = NonEmptyString::new(authority_type).map_err(|_| {
            AppError::Validation("authority type must not be blank".to_owned())
        })?;

        Ok(Self {
            authority_type: authority_type.into(),
            authority_ids,
        })
    }

    /// Targets a single authority through its own id.
    #[must_use]
    pub fn for_authority<A: Authority + ?Sized>(authority: &A) -> Self {
        Self {
            authority_type: authority.authority_type().to_owned(),
            authority_ids: vec![authority.authority_id()],
        }
    }

    /// Uses the authority only for its type tag and targets the explicit ids instead.
    #[must_use]
    pub fn for_authority_with_keys<A, I>(authority: &A, keys: I) -> Self
    where
        A: Authority + ?Sized,
        I: IntoIterator<Item = i64>,
    {
        Self {
            authority_type: authority.authority_type().to_owned(),
            authority_ids: keys.into_iter().collect(),
        }
    }

    /// Targets every member of a homogeneous collection.
    ///
    /// The collection must be non-empty and all members must share one type tag.
    pub fn for_authorities<A: Authority>(authorities: &[A]) -> AppResult<Self> {
        let Some(first) = authorities.first() else {
            return Err(AppError::Validation(
                "authority collection must not be empty".to_owned(),
            ));
        };

        let authority_type = first.authority_type();
        if let Some(stray) = authorities
            .iter()
            .find(|authority| authority.authority_type() != authority_type)
        {
            return Err(AppError::Validation(format!(
                "authority collection mixes types '{authority_type}' and '{}'",
                stray.authority_type()
            )));
        }

        Ok(Self {
            authority_type: authority_type.to_owned(),
            authority_ids: authorities.iter().map(A::authority_id).collect(),
        })
    }

    /// Returns the shared type tag.
    #[must_use]
    pub fn authority_type(&self) -> &str {
        self.authority_type.as_str()
    }

    /// Returns the targeted ids in caller order.
    #[must_use]
    pub fn authority_ids(&self) -> &[i64] {
        self.authority_ids.as_slice()
    }

    /// Returns true when no ids are targeted.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.authority_ids.is_empty()
    }

    /// Builds one association row per targeted id for the given role.
    #[must_use]
    pub fn assignment_records(&self, role_id: RoleId) -> Vec<AssignmentRecord> {
        self.authority_ids
            .iter()
            .map(|entity_id| AssignmentRecord {
                role_id,
                entity_type: self.authority_type.clone(),
                entity_id: *entity_id,
            })
            .collect()
    }
}

/// Association row stating that a role is held by an authority.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct AssignmentRecord {
    /// Assigned role.
    pub role_id: RoleId,
    /// Authority type tag.
    pub entity_type: String,
    /// Authority identifier.
    pub entity_id: i64,
}
