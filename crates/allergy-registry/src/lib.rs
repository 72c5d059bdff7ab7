//! # Allergy Registry Service
//!
//! Owns the patients' allergy records. Recording a new allergy is the
//! trigger side of the conflict-detection choreography: the record is
//! persisted first, then announced on the `allergy-diagnosed` topic for
//! downstream services (the therapy service scans its plans on receipt).

pub mod domain;
pub mod service;

pub use domain::{AllergyEntity, AllergyId, AllergyRegistryError};
pub use service::{AllergyApi, AllergyService, InMemoryAllergyRepository};

/// Service label used on log lines and metrics.
pub const SERVICE_NAME: &str = "allergy-registry";
