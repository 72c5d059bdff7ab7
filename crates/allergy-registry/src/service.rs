//! Allergy service: CRUD plus the publish-after-persist trigger.

use std::sync::Arc;

use async_trait::async_trait;
use care_telemetry::{record_outcome, Outcome};
use shared_bus::{DomainEvent, EventPublisher};
use shared_types::{InMemoryRepository, Repository};
use tracing::{debug, info};

use crate::domain::{AllergyEntity, AllergyId, AllergyRegistryError};
use crate::SERVICE_NAME;

/// In-memory adapter for single-process wiring and tests.
pub type InMemoryAllergyRepository = InMemoryRepository<AllergyEntity>;

/// Allergy-record operations.
#[async_trait]
pub trait AllergyApi: Send + Sync {
    fn allergy_by_id(&self, id: &AllergyId) -> Result<AllergyEntity, AllergyRegistryError>;

    /// Persist a new allergy record, then announce it on the bus.
    ///
    /// The event carries a value copy of the resource; the record itself is
    /// immutable once published.
    async fn record_allergy(&self, entity: AllergyEntity) -> Result<(), AllergyRegistryError>;

    fn update_allergy(&self, entity: AllergyEntity) -> Result<(), AllergyRegistryError>;

    fn delete_allergy(
        &self,
        id: &AllergyId,
    ) -> Result<Option<AllergyEntity>, AllergyRegistryError>;
}

/// The registry service implementation.
pub struct AllergyService {
    repository: Arc<dyn Repository<AllergyId, AllergyEntity>>,
    publisher: Arc<dyn EventPublisher>,
}

impl AllergyService {
    pub fn new(
        repository: Arc<dyn Repository<AllergyId, AllergyEntity>>,
        publisher: Arc<dyn EventPublisher>,
    ) -> Self {
        Self {
            repository,
            publisher,
        }
    }
}

#[async_trait]
impl AllergyApi for AllergyService {
    fn allergy_by_id(&self, id: &AllergyId) -> Result<AllergyEntity, AllergyRegistryError> {
        self.repository
            .find_by_id(id)?
            .ok_or_else(|| AllergyRegistryError::NotFound { id: id.to_string() })
    }

    async fn record_allergy(&self, entity: AllergyEntity) -> Result<(), AllergyRegistryError> {
        self.repository.save(&entity).inspect_err(|_| {
            record_outcome(SERVICE_NAME, "record_allergy", Outcome::Failure);
        })?;
        record_outcome(SERVICE_NAME, "record_allergy", Outcome::Success);

        info!(allergy = %entity.allergy.id, "allergy recorded, announcing diagnosis");
        self.publisher
            .publish(DomainEvent::AllergyDiagnosed(entity.allergy.clone()))
            .await;
        Ok(())
    }

    fn update_allergy(&self, entity: AllergyEntity) -> Result<(), AllergyRegistryError> {
        self.repository.update(&entity)?;
        debug!(allergy = %entity.allergy.id, "allergy record updated");
        Ok(())
    }

    fn delete_allergy(
        &self,
        id: &AllergyId,
    ) -> Result<Option<AllergyEntity>, AllergyRegistryError> {
        Ok(self.repository.delete_by_id(id)?)
    }
}
