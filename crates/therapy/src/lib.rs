//! # Therapy Service
//!
//! Owns the therapy plans (care plans) and acts as the conflict-detection
//! saga participant: when another service records a new allergy, this
//! service scans its plans for medication/allergen conflicts, revokes the
//! conflicting ones, and announces each revocation on the bus.
//!
//! ## Choreography
//!
//! ```text
//! allergy-registry ──AllergyDiagnosed──→ [Event Bus]
//!                                             │
//!                                             ↓
//!                                  AllergyDiagnosedHandler
//!                                             │
//!                                             ↓
//!                                     CarePlanService
//!                           scan → match → revoke → persist
//!                                             │
//!                                             ↓
//!                          TherapyRevoked ──→ [Event Bus] ──→ observers
//! ```
//!
//! The participant keeps no saga state: every invocation re-derives the
//! conflict set from the store. Consistency across the scan-then-update
//! sequence is best-effort (see the repository port docs).
//!
//! ## Module Structure (Hexagonal Architecture)
//!
//! ```text
//! adapters/  - bus handler, in-memory store alias
//! ports/     - inbound CarePlanApi, outbound CarePlanRepository
//! domain/    - entities, conflict predicate, errors
//! service.rs - CarePlanService implementation
//! ```

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod service;

pub use adapters::AllergyDiagnosedHandler;
pub use domain::conflict::medication_conflict;
pub use domain::entities::{revoke_for_conflict, CarePlanEntity, CarePlanId};
pub use domain::errors::TherapyError;
pub use ports::inbound::CarePlanApi;
pub use ports::outbound::{CarePlanRepository, InMemoryCarePlanRepository};
pub use service::{CarePlanService, ConflictScanReport};

/// Service label used on log lines and metrics.
pub const SERVICE_NAME: &str = "therapy";
