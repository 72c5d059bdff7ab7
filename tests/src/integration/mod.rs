//! Cross-service integration tests.

pub mod choreography;
pub mod repository_contract;
pub mod resilience;
pub mod wire_format;
