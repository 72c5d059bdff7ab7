//! # Resilience Integration Tests
//!
//! A circuit breaker wrapping a real service operation: the synchronous
//! inbound path (here, the allergy lookup a controller would serve) keeps
//! failing while the store is down, the circuit opens, and callers fail
//! fast until the dependency recovers.

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use allergy_registry::{
        AllergyApi, AllergyId, AllergyRegistryError, AllergyService, InMemoryAllergyRepository,
    };
    use care_telemetry::{record_outcome, Outcome};
    use shared_bus::NoOpPublisher;
    use shared_resilience::{
        CircuitBreaker, CircuitBreakerConfig, CircuitBreakerError, CircuitState,
    };

    fn guarded_service() -> (Arc<AllergyService>, CircuitBreaker) {
        let service = Arc::new(AllergyService::new(
            Arc::new(InMemoryAllergyRepository::new()),
            Arc::new(NoOpPublisher),
        ));
        let breaker = CircuitBreaker::with_config(
            "allergy-registry",
            CircuitBreakerConfig {
                failure_threshold: 3,
                reset_timeout: Duration::from_millis(100),
                call_timeout: Duration::from_millis(200),
            },
        );
        (service, breaker)
    }

    /// One guarded lookup, counted the way the controller layer counts it.
    async fn guarded_lookup(
        service: &AllergyService,
        breaker: &CircuitBreaker,
        id: &str,
    ) -> Result<(), CircuitBreakerError<AllergyRegistryError>> {
        let result = breaker
            .execute(async { service.allergy_by_id(&AllergyId::new(id)).map(|_| ()) })
            .await;
        let outcome = match &result {
            Ok(()) => Outcome::Success,
            Err(CircuitBreakerError::Open(_)) => Outcome::ShortCircuited,
            Err(_) => Outcome::Failure,
        };
        record_outcome("allergy-registry", "get_allergy", outcome);
        result
    }

    #[tokio::test]
    async fn repeated_failures_open_the_circuit_and_short_circuit_callers() {
        let (service, breaker) = guarded_service();

        // The record does not exist, so every lookup fails.
        for _ in 0..3 {
            let result = guarded_lookup(&service, &breaker, "missing").await;
            assert!(matches!(
                result,
                Err(CircuitBreakerError::Inner(AllergyRegistryError::NotFound { .. }))
            ));
        }
        assert_eq!(breaker.state(), CircuitState::Open);

        // Callers now fail fast; the service is not invoked at all.
        let result = guarded_lookup(&service, &breaker, "missing").await;
        assert!(matches!(result, Err(CircuitBreakerError::Open(_))));
        assert_eq!(breaker.stats().total_short_circuits, 1);
    }

    #[tokio::test]
    async fn circuit_recovers_once_the_dependency_does() {
        let (service, breaker) = guarded_service();

        for _ in 0..3 {
            let _ = guarded_lookup(&service, &breaker, "missing").await;
        }
        assert_eq!(breaker.state(), CircuitState::Open);

        // The dependency recovers: the record now exists.
        use allergy_registry::AllergyEntity;
        use shared_types::AllergyIntolerance;
        service
            .record_allergy(AllergyEntity::of(AllergyIntolerance::new(
                "a1",
                "Patient/1",
            )))
            .await
            .unwrap();

        // After the reset timeout the half-open trial succeeds and the
        // circuit closes.
        tokio::time::sleep(Duration::from_millis(150)).await;
        guarded_lookup(&service, &breaker, "a1").await.unwrap();
        assert_eq!(breaker.state(), CircuitState::Closed);
    }
}
