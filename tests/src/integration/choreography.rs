//! # End-to-End Choreography Tests
//!
//! Tests the complete conflict-detection flow:
//!
//! ```text
//! [allergy-registry] ──AllergyDiagnosed──→ [Event Bus]
//!                                               │
//!                                               ↓
//!                                      [therapy dispatcher]
//!                                               │
//!                                scan → match → revoke → persist
//!                                               │
//!                                               ↓
//!                       TherapyRevoked ──→ [Event Bus] ──→ [observer]
//! ```
//!
//! The observer is a plain subscription on `therapy-revoked`, standing in
//! for any downstream service confirming propagation.

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use tokio::time::timeout;

    use allergy_registry::{AllergyApi, AllergyEntity, AllergyService, InMemoryAllergyRepository};
    use shared_bus::{DomainEvent, EventDispatcher, EventPublisher, InMemoryEventBus, Topic};
    use shared_types::{
        AllergyIntolerance, CarePlan, CarePlanStatus, Coding, Repository,
    };
    use therapy::{
        AllergyDiagnosedHandler, CarePlanEntity, CarePlanId, CarePlanService,
        InMemoryCarePlanRepository,
    };

    const RXNORM: &str = "http://www.nlm.nih.gov/research/umls/rxnorm";

    /// Coordinates one bus plus the two saga sides.
    struct ChoreographyHarness {
        bus: Arc<InMemoryEventBus>,
        allergy_service: Arc<AllergyService>,
        plan_repository: Arc<InMemoryCarePlanRepository>,
    }

    impl ChoreographyHarness {
        fn new() -> Self {
            let bus = Arc::new(InMemoryEventBus::new());
            let publisher: Arc<dyn EventPublisher> = bus.clone();

            let allergy_service = Arc::new(AllergyService::new(
                Arc::new(InMemoryAllergyRepository::new()),
                publisher.clone(),
            ));

            let plan_repository = Arc::new(InMemoryCarePlanRepository::new());
            let therapy_service = Arc::new(CarePlanService::new(
                plan_repository.clone(),
                publisher,
            ));

            let dispatcher =
                EventDispatcher::new(bus.subscribe(vec![Topic::AllergyDiagnosed])).register(
                    Topic::AllergyDiagnosed,
                    Arc::new(AllergyDiagnosedHandler::new(therapy_service)),
                );
            tokio::spawn(dispatcher.run());

            Self {
                bus,
                allergy_service,
                plan_repository,
            }
        }
    }

    fn penicillin_plan(id: &str) -> CarePlanEntity {
        CarePlanEntity::of(
            CarePlan::new(id, "Patient/1", "Antibiotic course")
                .with_medication_activity(Coding::new(RXNORM, "7980", "Penicillin")),
        )
    }

    fn aspirin_plan(id: &str) -> CarePlanEntity {
        CarePlanEntity::of(
            CarePlan::new(id, "Patient/1", "Pain relief")
                .with_medication_activity(Coding::new(RXNORM, "161", "Aspirin")),
        )
    }

    fn penicillin_allergy(id: &str) -> AllergyEntity {
        AllergyEntity::of(
            AllergyIntolerance::new(id, "Patient/1")
                .with_code(Coding::new(RXNORM, "7980", "Penicillin")),
        )
    }

    #[tokio::test]
    async fn recorded_allergy_revokes_conflicting_plan_end_to_end() {
        let harness = ChoreographyHarness::new();
        harness.plan_repository.save(&penicillin_plan("123")).unwrap();
        harness.plan_repository.save(&aspirin_plan("124")).unwrap();

        // Downstream observer confirming propagation.
        let mut observer = harness.bus.subscribe(vec![Topic::TherapyRevoked]);

        harness
            .allergy_service
            .record_allergy(penicillin_allergy("allergy-1"))
            .await
            .unwrap();

        // The revocation event arrives, carrying the mutated plan.
        let record = timeout(Duration::from_secs(2), observer.recv())
            .await
            .expect("no revocation within deadline")
            .expect("bus closed");
        let event = DomainEvent::from_record(&record).unwrap();
        match event {
            DomainEvent::TherapyRevoked(plan) => {
                assert_eq!(plan.id, "123");
                assert_eq!(plan.status, CarePlanStatus::Revoked);
            }
            other => panic!("unexpected event: {other:?}"),
        }

        // The store agrees with the event.
        let stored = harness
            .plan_repository
            .find_by_id(&CarePlanId::new("123"))
            .unwrap()
            .unwrap();
        assert_eq!(stored.plan.status, CarePlanStatus::Revoked);

        // The non-conflicting plan is untouched and nothing else arrives.
        let untouched = harness
            .plan_repository
            .find_by_id(&CarePlanId::new("124"))
            .unwrap()
            .unwrap();
        assert_eq!(untouched.plan.status, CarePlanStatus::Active);
        assert!(
            timeout(Duration::from_millis(200), observer.recv())
                .await
                .is_err(),
            "no event may be emitted for plans without a matching coding"
        );
    }

    #[tokio::test]
    async fn duplicate_delivery_is_tolerated() {
        let harness = ChoreographyHarness::new();
        harness.plan_repository.save(&penicillin_plan("123")).unwrap();
        let mut observer = harness.bus.subscribe(vec![Topic::TherapyRevoked]);

        // At-least-once: the same diagnosis arrives twice (simulated by
        // publishing the event again directly).
        let allergy = penicillin_allergy("allergy-1");
        harness
            .allergy_service
            .record_allergy(allergy.clone())
            .await
            .unwrap();
        harness
            .bus
            .publish(DomainEvent::AllergyDiagnosed(allergy.allergy.clone()))
            .await;

        // Exactly one revocation: the second scan sees the plan already
        // revoked and does nothing.
        let first = timeout(Duration::from_secs(2), observer.recv())
            .await
            .expect("no revocation within deadline");
        assert!(first.is_some());
        assert!(
            timeout(Duration::from_millis(300), observer.recv())
                .await
                .is_err(),
            "a duplicate event must not produce a second revocation"
        );
    }

    #[tokio::test]
    async fn concluded_encounter_propagates_to_observers() {
        use clinical_diary::{
            DiaryApi, DiaryService, EncounterEntity, EncounterId, InMemoryEncounterRepository,
        };
        use shared_types::Encounter;

        let bus = Arc::new(InMemoryEventBus::new());
        let diary = DiaryService::new(
            Arc::new(InMemoryEncounterRepository::new()),
            bus.clone(),
        );
        let mut observer = bus.subscribe(vec![Topic::EncounterConcluded]);

        diary
            .add_encounter(EncounterEntity::of(Encounter::new("e1", "Patient/1")))
            .unwrap();
        diary
            .conclude_encounter(&EncounterId::new("e1"))
            .await
            .unwrap();

        let record = timeout(Duration::from_secs(2), observer.recv())
            .await
            .expect("no conclusion within deadline")
            .expect("bus closed");
        match DomainEvent::from_record(&record).unwrap() {
            DomainEvent::EncounterConcluded(encounter) => assert_eq!(encounter.id, "e1"),
            other => panic!("unexpected event: {other:?}"),
        }
    }

    #[tokio::test]
    async fn allergy_without_conflicts_revokes_nothing() {
        let harness = ChoreographyHarness::new();
        harness.plan_repository.save(&aspirin_plan("200")).unwrap();
        let mut observer = harness.bus.subscribe(vec![Topic::TherapyRevoked]);

        harness
            .allergy_service
            .record_allergy(penicillin_allergy("allergy-2"))
            .await
            .unwrap();

        assert!(
            timeout(Duration::from_millis(300), observer.recv())
                .await
                .is_err()
        );
        let stored = harness
            .plan_repository
            .find_by_id(&CarePlanId::new("200"))
            .unwrap()
            .unwrap();
        assert_eq!(stored.plan.status, CarePlanStatus::Active);
    }
}
