//! # Inbound Port (Driving Port)
//!
//! The operations this service offers to its callers: the (external) HTTP
//! controller for the CRUD operations, and the bus handler for the
//! reactive conflict scan.

use async_trait::async_trait;
use shared_types::AllergyIntolerance;

use crate::domain::entities::{CarePlanEntity, CarePlanId};
use crate::domain::errors::TherapyError;
use crate::service::ConflictScanReport;

/// Care-plan operations.
#[async_trait]
pub trait CarePlanApi: Send + Sync {
    /// Fetch one plan; a missing id is an error at this level (the caller
    /// asked for something specific).
    fn care_plan_by_id(&self, id: &CarePlanId) -> Result<CarePlanEntity, TherapyError>;

    /// Store a new plan.
    fn add_care_plan(&self, entity: CarePlanEntity) -> Result<(), TherapyError>;

    /// Replace an existing plan (full-aggregate update).
    fn update_care_plan(&self, entity: CarePlanEntity) -> Result<(), TherapyError>;

    /// Delete a plan, returning the prior value if it existed.
    fn delete_care_plan(&self, id: &CarePlanId)
        -> Result<Option<CarePlanEntity>, TherapyError>;

    /// React to a newly diagnosed allergy: scan all plans, revoke the
    /// conflicting ones, publish a revocation event per revoked plan.
    ///
    /// A store failure on the initial scan is fatal for the invocation and
    /// propagates; per-plan write failures are isolated and reported in the
    /// returned [`ConflictScanReport`].
    async fn reconcile_allergy(
        &self,
        allergy: &AllergyIntolerance,
    ) -> Result<ConflictScanReport, TherapyError>;
}
