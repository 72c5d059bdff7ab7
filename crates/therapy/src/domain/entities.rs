//! Care-plan aggregate and its identifier.

use std::fmt;
use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};
use shared_types::{CarePlan, CarePlanStatus, Entity};

/// Identifier of a care plan, equal to the resource's logical id.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CarePlanId(String);

impl CarePlanId {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CarePlanId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Aggregate wrapper for a [`CarePlan`] resource.
///
/// Equality and hash are defined solely by the identifier; the wrapped
/// resource is free-form aggregate state.
#[derive(Debug, Clone)]
pub struct CarePlanEntity {
    id: CarePlanId,
    pub plan: CarePlan,
}

impl CarePlanEntity {
    /// Wrap a resource, deriving the identifier from its logical id.
    pub fn of(plan: CarePlan) -> Self {
        Self {
            id: CarePlanId::new(plan.id.clone()),
            plan,
        }
    }
}

impl Entity for CarePlanEntity {
    type Id = CarePlanId;

    fn id(&self) -> &CarePlanId {
        &self.id
    }
}

impl PartialEq for CarePlanEntity {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for CarePlanEntity {}

impl Hash for CarePlanEntity {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

/// The one place that maps a detected conflict onto the status vocabulary.
///
/// The vocabulary has no `suspended` value, so a conflicting plan is moved
/// to the closest terminal status, `revoked`. Only the conflict-detection
/// flow calls this; no other component may set `revoked`.
pub fn revoke_for_conflict(plan: &mut CarePlan) {
    plan.status = CarePlanStatus::Revoked;
}
