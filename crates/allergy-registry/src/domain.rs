//! Allergy aggregate, identifier and errors.

use std::fmt;
use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};
use shared_types::{AllergyIntolerance, Entity, StoreError};
use thiserror::Error;

/// Identifier of an allergy record, equal to the resource's logical id.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AllergyId(String);

impl AllergyId {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AllergyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Aggregate wrapper for an [`AllergyIntolerance`] resource.
///
/// Equality and hash are by identifier only.
#[derive(Debug, Clone)]
pub struct AllergyEntity {
    id: AllergyId,
    pub allergy: AllergyIntolerance,
}

impl AllergyEntity {
    /// Wrap a resource, deriving the identifier from its logical id.
    pub fn of(allergy: AllergyIntolerance) -> Self {
        Self {
            id: AllergyId::new(allergy.id.clone()),
            allergy,
        }
    }
}

impl Entity for AllergyEntity {
    type Id = AllergyId;

    fn id(&self) -> &AllergyId {
        &self.id
    }
}

impl PartialEq for AllergyEntity {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for AllergyEntity {}

impl Hash for AllergyEntity {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

/// Failures surfaced by the allergy registry.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AllergyRegistryError {
    #[error("allergy record '{id}' not found")]
    NotFound { id: String },

    #[error(transparent)]
    Store(#[from] StoreError),
}
