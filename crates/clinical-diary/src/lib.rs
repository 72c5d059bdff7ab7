//! # Clinical Diary Service
//!
//! Owns the encounter records. Concluding an encounter follows the same
//! publish-after-persist choreography as the allergy registry: the status
//! change is stored, then announced on the `encounter-concluded` topic for
//! any interested downstream service.

pub mod domain;
pub mod service;

pub use domain::{ClinicalDiaryError, EncounterEntity, EncounterId};
pub use service::{DiaryApi, DiaryService, InMemoryEncounterRepository};

/// Service label used on log lines and metrics.
pub const SERVICE_NAME: &str = "clinical-diary";
