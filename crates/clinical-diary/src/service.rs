//! Diary service: encounter CRUD plus the conclude-and-announce operation.

use std::sync::Arc;

use async_trait::async_trait;
use care_telemetry::{record_outcome, Outcome};
use shared_bus::{DomainEvent, EventPublisher};
use shared_types::{EncounterStatus, InMemoryRepository, Repository};
use tracing::{debug, info};

use crate::domain::{ClinicalDiaryError, EncounterEntity, EncounterId};
use crate::SERVICE_NAME;

/// In-memory adapter for single-process wiring and tests.
pub type InMemoryEncounterRepository = InMemoryRepository<EncounterEntity>;

/// Encounter operations.
#[async_trait]
pub trait DiaryApi: Send + Sync {
    fn encounter_by_id(&self, id: &EncounterId) -> Result<EncounterEntity, ClinicalDiaryError>;

    fn add_encounter(&self, entity: EncounterEntity) -> Result<(), ClinicalDiaryError>;

    fn update_encounter(&self, entity: EncounterEntity) -> Result<(), ClinicalDiaryError>;

    fn delete_encounter(
        &self,
        id: &EncounterId,
    ) -> Result<Option<EncounterEntity>, ClinicalDiaryError>;

    /// Mark an encounter finished, persist it, then announce the
    /// conclusion on the bus.
    async fn conclude_encounter(&self, id: &EncounterId) -> Result<(), ClinicalDiaryError>;
}

/// The diary service implementation.
pub struct DiaryService {
    repository: Arc<dyn Repository<EncounterId, EncounterEntity>>,
    publisher: Arc<dyn EventPublisher>,
}

impl DiaryService {
    pub fn new(
        repository: Arc<dyn Repository<EncounterId, EncounterEntity>>,
        publisher: Arc<dyn EventPublisher>,
    ) -> Self {
        Self {
            repository,
            publisher,
        }
    }
}

#[async_trait]
impl DiaryApi for DiaryService {
    fn encounter_by_id(&self, id: &EncounterId) -> Result<EncounterEntity, ClinicalDiaryError> {
        self.repository
            .find_by_id(id)?
            .ok_or_else(|| ClinicalDiaryError::NotFound { id: id.to_string() })
    }

    fn add_encounter(&self, entity: EncounterEntity) -> Result<(), ClinicalDiaryError> {
        self.repository.save(&entity)?;
        debug!(encounter = %entity.encounter.id, "encounter recorded");
        Ok(())
    }

    fn update_encounter(&self, entity: EncounterEntity) -> Result<(), ClinicalDiaryError> {
        self.repository.update(&entity)?;
        Ok(())
    }

    fn delete_encounter(
        &self,
        id: &EncounterId,
    ) -> Result<Option<EncounterEntity>, ClinicalDiaryError> {
        Ok(self.repository.delete_by_id(id)?)
    }

    async fn conclude_encounter(&self, id: &EncounterId) -> Result<(), ClinicalDiaryError> {
        let mut entity = self.encounter_by_id(id)?;
        entity.encounter.status = EncounterStatus::Finished;
        if let Some(period) = entity.encounter.period.as_mut() {
            period.end = Some(chrono::Utc::now());
        }

        self.repository.update(&entity).inspect_err(|_| {
            record_outcome(SERVICE_NAME, "conclude_encounter", Outcome::Failure);
        })?;
        record_outcome(SERVICE_NAME, "conclude_encounter", Outcome::Success);

        info!(encounter = %entity.encounter.id, "encounter concluded, announcing");
        self.publisher
            .publish(DomainEvent::EncounterConcluded(entity.encounter.clone()))
            .await;
        Ok(())
    }
}
