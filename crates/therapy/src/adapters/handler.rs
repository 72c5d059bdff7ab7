//! Bus handler for the `allergy-diagnosed` topic.
//!
//! Forwards each decoded allergy event to the conflict scan. Safe under
//! at-least-once delivery: the scan skips already-revoked plans, so a
//! duplicate event is a no-op.

use std::sync::Arc;

use async_trait::async_trait;
use shared_bus::{DomainEvent, EventHandler, HandlerError};
use tracing::{info, warn};

use crate::ports::inbound::CarePlanApi;

/// Routes `AllergyDiagnosed` events into the care-plan service.
pub struct AllergyDiagnosedHandler {
    service: Arc<dyn CarePlanApi>,
}

impl AllergyDiagnosedHandler {
    pub fn new(service: Arc<dyn CarePlanApi>) -> Self {
        Self { service }
    }
}

#[async_trait]
impl EventHandler for AllergyDiagnosedHandler {
    async fn handle(&self, event: DomainEvent) -> Result<(), HandlerError> {
        match event {
            DomainEvent::AllergyDiagnosed(allergy) => {
                let report = self
                    .service
                    .reconcile_allergy(&allergy)
                    .await
                    .map_err(|e| HandlerError::new(e.to_string()))?;
                info!(
                    allergy = %allergy.id,
                    scanned = report.scanned,
                    revoked = report.revoked.len(),
                    failed = report.failed.len(),
                    "conflict scan completed"
                );
                Ok(())
            }
            other => {
                // The dispatcher only routes our topic here; anything else
                // is a wiring mistake, not a reason to fail the delivery.
                warn!(topic = %other.topic(), "unexpected event on allergy handler, ignoring");
                Ok(())
            }
        }
    }
}
