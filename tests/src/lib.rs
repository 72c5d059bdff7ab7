//! # CareLink Test Suite
//!
//! Unified test crate containing the cross-service tests:
//!
//! ```text
//! tests/src/
//! └── integration/
//!     ├── choreography.rs     # allergy → conflict scan → revocation flow
//!     ├── repository_contract.rs  # the store contract every adapter must honor
//!     ├── resilience.rs       # circuit breaker guarding a service operation
//!     └── wire_format.rs      # event payload round trips
//! ```
//!
//! ## Running Tests
//!
//! ```bash
//! # All tests
//! cargo test -p care-tests
//!
//! # By category
//! cargo test -p care-tests integration::choreography::
//! ```

pub mod integration;
