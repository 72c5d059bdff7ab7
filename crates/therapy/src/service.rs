//! Care-plan service: CRUD operations plus the conflict-detection scan.

use std::sync::Arc;

use async_trait::async_trait;
use care_telemetry::{record_outcome, Outcome};
use shared_bus::{DomainEvent, EventPublisher};
use shared_types::{AllergyIntolerance, CarePlanStatus, Entity, Repository, StoreError};
use tracing::{debug, error, info, warn};

use crate::domain::conflict::medication_conflict;
use crate::domain::entities::{revoke_for_conflict, CarePlanEntity, CarePlanId};
use crate::domain::errors::TherapyError;
use crate::ports::inbound::CarePlanApi;
use crate::SERVICE_NAME;

/// Outcome of one conflict scan.
///
/// Per-plan write failures are collected here rather than aborting the
/// scan; only a failure to read the plan set at all is fatal.
#[derive(Debug, Default)]
pub struct ConflictScanReport {
    /// Plans retrieved from the store.
    pub scanned: usize,
    /// Plans revoked, persisted and announced.
    pub revoked: Vec<CarePlanId>,
    /// Plans that matched but could not be persisted.
    pub failed: Vec<(CarePlanId, StoreError)>,
}

/// The conflict-detection saga participant.
///
/// Stateless and reactive: every invocation re-derives the conflict set
/// from the store. Shared process-wide behind `Arc`.
pub struct CarePlanService {
    repository: Arc<dyn Repository<CarePlanId, CarePlanEntity>>,
    publisher: Arc<dyn EventPublisher>,
}

impl CarePlanService {
    pub fn new(
        repository: Arc<dyn Repository<CarePlanId, CarePlanEntity>>,
        publisher: Arc<dyn EventPublisher>,
    ) -> Self {
        Self {
            repository,
            publisher,
        }
    }
}

#[async_trait]
impl CarePlanApi for CarePlanService {
    fn care_plan_by_id(&self, id: &CarePlanId) -> Result<CarePlanEntity, TherapyError> {
        self.repository
            .find_by_id(id)?
            .ok_or_else(|| TherapyError::NotFound { id: id.to_string() })
    }

    fn add_care_plan(&self, entity: CarePlanEntity) -> Result<(), TherapyError> {
        self.repository.save(&entity)?;
        Ok(())
    }

    fn update_care_plan(&self, entity: CarePlanEntity) -> Result<(), TherapyError> {
        self.repository.update(&entity)?;
        Ok(())
    }

    fn delete_care_plan(
        &self,
        id: &CarePlanId,
    ) -> Result<Option<CarePlanEntity>, TherapyError> {
        Ok(self.repository.delete_by_id(id)?)
    }

    async fn reconcile_allergy(
        &self,
        allergy: &AllergyIntolerance,
    ) -> Result<ConflictScanReport, TherapyError> {
        let plans = self.repository.find_all().map_err(|e| {
            // Cannot even read the plan set: fatal for this invocation. The
            // triggering event is lost under at-least-once without retry.
            error!(error = %e, "conflict scan aborted, could not read care plans");
            record_outcome(SERVICE_NAME, "conflict_scan", Outcome::Failure);
            e
        })?;

        debug!(count = plans.len(), "retrieved care plans for conflict scan");
        let mut report = ConflictScanReport {
            scanned: plans.len(),
            ..ConflictScanReport::default()
        };

        for mut entity in plans {
            // Already-revoked plans are excluded so a redelivered event is
            // a no-op.
            if entity.plan.status == CarePlanStatus::Revoked {
                continue;
            }

            if !medication_conflict(&entity.plan, allergy) {
                debug!(
                    plan = %entity.id(),
                    allergy = %allergy.id,
                    "no conflict detected"
                );
                continue;
            }

            info!(
                plan = %entity.id(),
                allergy = %allergy.id,
                "conflict detected, revoking care plan"
            );
            revoke_for_conflict(&mut entity.plan);

            match self.repository.update(&entity) {
                Ok(()) => {
                    record_outcome(SERVICE_NAME, "revoke_care_plan", Outcome::Success);
                    self.publisher
                        .publish(DomainEvent::TherapyRevoked(entity.plan.clone()))
                        .await;
                    debug!(plan = %entity.id(), "care plan revoked and announced");
                    report.revoked.push(entity.id().clone());
                }
                Err(e) => {
                    // One plan failing to persist (e.g. deleted between scan
                    // and write) must not abort the rest of the scan.
                    warn!(plan = %entity.id(), error = %e, "failed to persist revocation");
                    record_outcome(SERVICE_NAME, "revoke_care_plan", Outcome::Failure);
                    report.failed.push((entity.id().clone(), e));
                }
            }
        }

        record_outcome(SERVICE_NAME, "conflict_scan", Outcome::Success);
        Ok(report)
    }
}
