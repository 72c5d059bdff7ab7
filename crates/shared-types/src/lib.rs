//! # Shared Types Crate
//!
//! This crate contains the clinical resource model, the entity/identifier
//! conventions, and the repository port shared by every service in the
//! workspace.
//!
//! ## Design Principles
//!
//! - **Single Source of Truth**: every type that crosses a service boundary
//!   (inside an event payload or a stored record) is defined here.
//! - **Identity by Identifier**: entities compare equal iff their identifiers
//!   compare equal; all other fields are free-form aggregate state.
//! - **Store-Agnostic Persistence**: services depend on the [`Repository`]
//!   trait only; concrete drivers live behind it.

pub mod credentials;
pub mod entity;
pub mod fhir;
pub mod repository;

pub use credentials::StoreCredentials;
pub use entity::Entity;
pub use fhir::*;
pub use repository::{InMemoryRepository, Repository, StoreError};
