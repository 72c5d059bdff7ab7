//! # Service Wiring
//!
//! Connects the clinical services according to the choreography pattern:
//! each service defines its ports, and this module provides the adapters
//! and bus subscriptions that tie them together in one process.
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                         EVENT BUS                            │
//! └───────┬───────────────────────┬──────────────────────┬───────┘
//!         │ allergy-diagnosed     │ therapy-revoked      │ encounter-concluded
//!         ▼                       ▼                      ▼
//!   therapy dispatcher      revocation observer     (external listeners)
//! ```

use std::sync::Arc;

use tokio::task::JoinHandle;
use tracing::info;

use allergy_registry::{AllergyService, InMemoryAllergyRepository};
use clinical_diary::{DiaryService, InMemoryEncounterRepository};
use shared_bus::{
    DomainEvent, EventDispatcher, EventHandler, EventPublisher, HandlerError, InMemoryEventBus,
    Topic,
};
use shared_resilience::CircuitBreaker;
use therapy::{AllergyDiagnosedHandler, CarePlanService, InMemoryCarePlanRepository};

/// Everything a running process needs: the bus, the three services, and
/// the process-wide circuit breaker guarding inbound synchronous work.
pub struct Services {
    pub bus: Arc<InMemoryEventBus>,
    pub allergy: Arc<AllergyService>,
    pub therapy: Arc<CarePlanService>,
    pub diary: Arc<DiaryService>,
    pub breaker: Arc<CircuitBreaker>,
}

/// Construct the services over in-memory adapters.
///
/// Production deployments substitute driver-backed repositories and a real
/// broker client behind the same ports.
pub fn wire() -> Services {
    let bus = Arc::new(InMemoryEventBus::new());
    let publisher: Arc<dyn EventPublisher> = bus.clone();

    let allergy = Arc::new(AllergyService::new(
        Arc::new(InMemoryAllergyRepository::new()),
        publisher.clone(),
    ));
    let therapy = Arc::new(CarePlanService::new(
        Arc::new(InMemoryCarePlanRepository::new()),
        publisher.clone(),
    ));
    let diary = Arc::new(DiaryService::new(
        Arc::new(InMemoryEncounterRepository::new()),
        publisher,
    ));

    // One breaker instance shared by every inbound handler in the process.
    let breaker = Arc::new(CircuitBreaker::new("care-runtime"));

    Services {
        bus,
        allergy,
        therapy,
        diary,
        breaker,
    }
}

/// Observer that logs each revocation as it propagates.
struct RevocationObserver;

#[async_trait::async_trait]
impl EventHandler for RevocationObserver {
    async fn handle(&self, event: DomainEvent) -> Result<(), HandlerError> {
        if let DomainEvent::TherapyRevoked(plan) = event {
            info!(plan = %plan.id, "therapy plan revocation propagated");
        }
        Ok(())
    }
}

/// Spawn the dispatch loops: the therapy service on `allergy-diagnosed`
/// and the revocation observer on `therapy-revoked`.
pub fn spawn_dispatchers(services: &Services) -> Vec<JoinHandle<()>> {
    let therapy_dispatcher =
        EventDispatcher::new(services.bus.subscribe(vec![Topic::AllergyDiagnosed])).register(
            Topic::AllergyDiagnosed,
            Arc::new(AllergyDiagnosedHandler::new(services.therapy.clone())),
        );

    let observer_dispatcher =
        EventDispatcher::new(services.bus.subscribe(vec![Topic::TherapyRevoked]))
            .register(Topic::TherapyRevoked, Arc::new(RevocationObserver));

    vec![
        tokio::spawn(therapy_dispatcher.run()),
        tokio::spawn(observer_dispatcher.run()),
    ]
}
