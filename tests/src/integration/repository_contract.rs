//! # Repository Contract Tests
//!
//! The contract every store adapter must honor, exercised here against the
//! in-memory adapter through a real aggregate type. A driver-backed
//! adapter must pass the same suite.

#[cfg(test)]
mod tests {
    use shared_types::{CarePlan, Coding, Repository, StoreError};
    use therapy::{CarePlanEntity, CarePlanId, InMemoryCarePlanRepository};

    const RXNORM: &str = "http://www.nlm.nih.gov/research/umls/rxnorm";

    fn plan(id: &str) -> CarePlanEntity {
        CarePlanEntity::of(
            CarePlan::new(id, "Patient/1", "Course")
                .with_medication_activity(Coding::new(RXNORM, "161", "Aspirin")),
        )
    }

    #[test]
    fn save_then_find_by_id_returns_an_equal_value() {
        let repo = InMemoryCarePlanRepository::new();
        let entity = plan("p1");
        repo.save(&entity).unwrap();

        let found = repo.find_by_id(&CarePlanId::new("p1")).unwrap().unwrap();
        assert_eq!(found, entity);
        assert_eq!(found.plan, entity.plan);
    }

    #[test]
    fn delete_by_id_on_an_unsaved_id_returns_absent() {
        let repo = InMemoryCarePlanRepository::new();
        assert_eq!(repo.delete_by_id(&CarePlanId::new("ghost")).unwrap(), None);
    }

    #[test]
    fn update_on_an_unsaved_id_fails_with_a_not_found_error() {
        let repo = InMemoryCarePlanRepository::new();
        let result = repo.update(&plan("ghost"));
        assert!(matches!(result, Err(StoreError::NotFound { .. })));
        // Specifically: not an upsert.
        assert_eq!(repo.find_by_id(&CarePlanId::new("ghost")).unwrap(), None);
    }

    #[test]
    fn find_all_contains_every_saved_id() {
        let repo = InMemoryCarePlanRepository::new();
        let ids = ["a", "b", "c", "d", "e"];
        for id in ids {
            repo.save(&plan(id)).unwrap();
        }

        let all = repo.find_all().unwrap();
        assert!(all.len() >= ids.len());
        for id in ids {
            let wanted = CarePlanId::new(id);
            assert!(all.iter().any(|entity| {
                use shared_types::Entity;
                entity.id() == &wanted
            }));
        }
    }

    #[test]
    fn mutating_calls_maintain_store_timestamps() {
        let repo = InMemoryCarePlanRepository::new();
        repo.save(&plan("p1")).unwrap();
        let (created, _) = repo.timestamps(&CarePlanId::new("p1")).unwrap();

        let mut revised = plan("p1");
        revised.plan.title = "Adjusted course".into();
        repo.update(&revised).unwrap();

        let (created_after, updated_after) = repo.timestamps(&CarePlanId::new("p1")).unwrap();
        assert_eq!(created, created_after);
        assert!(updated_after >= created);
    }
}
