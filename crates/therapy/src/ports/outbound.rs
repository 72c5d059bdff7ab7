//! # Outbound Ports (Driven Ports)
//!
//! Dependencies the therapy service requires the host to provide: a store
//! for its plans and a publisher for its events (the publisher contract
//! lives in `shared-bus`).

use shared_types::{InMemoryRepository, Repository};

use crate::domain::entities::{CarePlanEntity, CarePlanId};

/// The care-plan store contract.
///
/// Inherits the full repository contract, including update-fails-if-absent.
pub trait CarePlanRepository: Repository<CarePlanId, CarePlanEntity> {}

impl<T> CarePlanRepository for T where T: Repository<CarePlanId, CarePlanEntity> {}

/// In-memory adapter for single-process wiring and tests.
///
/// Production deployments provide a driver-backed adapter implementing the
/// same contract.
pub type InMemoryCarePlanRepository = InMemoryRepository<CarePlanEntity>;
