//! Medication/allergen conflict predicate.

use shared_types::{AllergyIntolerance, CarePlan};

/// Whether a therapy plan conflicts with a recorded allergy.
///
/// True iff some activity detail's inline medication coding names the same
/// `(system, code)` pair as some coding of the allergy record's code.
/// Evaluation short-circuits on the first match. Absence of codings on
/// either side (no activities, no detail, a reference-only product, or an
/// uncoded allergy) yields no conflict.
///
/// Pure and side-effect free; independently callable from the saga flow.
#[must_use]
pub fn medication_conflict(plan: &CarePlan, allergy: &AllergyIntolerance) -> bool {
    plan.activity
        .iter()
        .filter_map(|activity| activity.detail.as_ref())
        .any(|detail| {
            detail.medication_codings().iter().any(|medication| {
                allergy
                    .code
                    .coding
                    .iter()
                    .any(|allergen| medication.same_concept(allergen))
            })
        })
}
