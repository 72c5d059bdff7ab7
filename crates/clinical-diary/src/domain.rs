//! Encounter aggregate, identifier and errors.

use std::fmt;
use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};
use shared_types::{Encounter, Entity, StoreError};
use thiserror::Error;

/// Identifier of an encounter, equal to the resource's logical id.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EncounterId(String);

impl EncounterId {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EncounterId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Aggregate wrapper for an [`Encounter`] resource.
///
/// Equality and hash are by identifier only.
#[derive(Debug, Clone)]
pub struct EncounterEntity {
    id: EncounterId,
    pub encounter: Encounter,
}

impl EncounterEntity {
    /// Wrap a resource, deriving the identifier from its logical id.
    pub fn of(encounter: Encounter) -> Self {
        Self {
            id: EncounterId::new(encounter.id.clone()),
            encounter,
        }
    }
}

impl Entity for EncounterEntity {
    type Id = EncounterId;

    fn id(&self) -> &EncounterId {
        &self.id
    }
}

impl PartialEq for EncounterEntity {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for EncounterEntity {}

impl Hash for EncounterEntity {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

/// Failures surfaced by the clinical diary.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClinicalDiaryError {
    #[error("encounter '{id}' not found")]
    NotFound { id: String },

    #[error(transparent)]
    Store(#[from] StoreError),
}
