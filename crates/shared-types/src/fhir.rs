//! Clinical resource model.
//!
//! FHIR-style representations of the resources the services exchange:
//! allergy records, therapy plans (care plans), and encounters. These are
//! the wire types: an event payload is exactly the JSON text of one of
//! these resources, so every field here serializes with its interchange
//! name (camelCase, kebab-case status codes).
//!
//! ## Clusters
//!
//! - **Data types**: [`Coding`], [`CodeableConcept`], [`Reference`],
//!   [`Quantity`], [`Period`]
//! - **Allergy**: [`AllergyIntolerance`], [`AllergyClinicalStatus`]
//! - **Therapy**: [`CarePlan`], [`CarePlanActivity`], [`CarePlanActivityDetail`]
//! - **Diary**: [`Encounter`], [`EncounterStatus`]

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// =============================================================================
// CLUSTER A: GENERAL-PURPOSE DATA TYPES
// =============================================================================

/// A single code from a coding system.
///
/// Two codings identify the same concept iff their `(system, code)` pairs
/// are equal; `display` is presentation-only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Coding {
    /// The coding system URI (e.g. an RxNorm or SNOMED system URL).
    pub system: String,
    /// The code within the system.
    pub code: String,
    /// Human-readable label for the code.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display: Option<String>,
}

impl Coding {
    pub fn new(
        system: impl Into<String>,
        code: impl Into<String>,
        display: impl Into<String>,
    ) -> Self {
        Self {
            system: system.into(),
            code: code.into(),
            display: Some(display.into()),
        }
    }

    /// Whether this coding names the same concept as `other`.
    #[must_use]
    pub fn same_concept(&self, other: &Coding) -> bool {
        self.system == other.system && self.code == other.code
    }
}

/// A concept expressed as one or more codings plus an optional free-text form.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct CodeableConcept {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub coding: Vec<Coding>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

impl CodeableConcept {
    /// A concept with a single coding, using the coding's display as text.
    pub fn of(coding: Coding) -> Self {
        Self {
            text: coding.display.clone(),
            coding: vec![coding],
        }
    }
}

/// A reference to another resource (e.g. `"Patient/123"`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reference {
    pub reference: String,
}

impl Reference {
    pub fn new(reference: impl Into<String>) -> Self {
        Self {
            reference: reference.into(),
        }
    }
}

/// An amount with a unit (e.g. "1 tablet").
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Quantity {
    pub value: f64,
    pub unit: String,
}

/// A time window with an optional open end.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Period {
    pub start: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end: Option<DateTime<Utc>>,
}

impl Period {
    /// A period starting now, with no end.
    pub fn starting_now() -> Self {
        Self {
            start: Utc::now(),
            end: None,
        }
    }
}

// =============================================================================
// CLUSTER B: ALLERGY INTOLERANCE
// =============================================================================

/// Clinical status of a recorded allergy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum AllergyClinicalStatus {
    #[default]
    Active,
    Inactive,
    Resolved,
}

/// A recorded allergy or intolerance for one patient.
///
/// Immutable once published as an event; the event carries a value copy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AllergyIntolerance {
    /// Logical id (no resource-type prefix).
    pub id: String,
    pub clinical_status: AllergyClinicalStatus,
    /// The allergen, as one or more codings.
    #[serde(default)]
    pub code: CodeableConcept,
    pub patient: Reference,
    /// When the allergy was first observed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub onset: Option<DateTime<Utc>>,
}

impl AllergyIntolerance {
    pub fn new(id: impl Into<String>, patient_reference: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            clinical_status: AllergyClinicalStatus::Active,
            code: CodeableConcept::default(),
            patient: Reference::new(patient_reference),
            onset: None,
        }
    }

    /// Set the allergen coding.
    #[must_use]
    pub fn with_code(mut self, coding: Coding) -> Self {
        self.code = CodeableConcept::of(coding);
        self
    }

    #[must_use]
    pub fn with_onset(mut self, onset: DateTime<Utc>) -> Self {
        self.onset = Some(onset);
        self
    }
}

// =============================================================================
// CLUSTER C: CARE PLAN (THERAPY)
// =============================================================================

/// Lifecycle status of a therapy plan.
///
/// `Revoked` is terminal and is only ever set by the conflict-detection
/// service; no other component may set it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum CarePlanStatus {
    Draft,
    #[default]
    Active,
    OnHold,
    Revoked,
    Completed,
    EnteredInError,
    Unknown,
}

/// How the plan is intended to be used.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum CarePlanIntent {
    Proposal,
    #[default]
    Plan,
    Order,
    Option,
}

/// Progress status of a single planned activity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum CarePlanActivityStatus {
    #[default]
    NotStarted,
    Scheduled,
    InProgress,
    Completed,
    Cancelled,
}

/// The detail of a planned activity.
///
/// The product is either a direct reference to a medication resource or an
/// inline coding; at most one of the two fields is set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CarePlanActivityDetail {
    /// What kind of activity this is.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<CodeableConcept>,
    pub status: CarePlanActivityStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub product_codeable_concept: Option<CodeableConcept>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub product_reference: Option<Reference>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub daily_amount: Option<Quantity>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quantity: Option<Quantity>,
}

impl CarePlanActivityDetail {
    /// The medication codings carried inline by this detail.
    ///
    /// Empty when the product is a reference or absent; conflict matching
    /// only sees inline codings.
    #[must_use]
    pub fn medication_codings(&self) -> &[Coding] {
        self.product_codeable_concept
            .as_ref()
            .map(|concept| concept.coding.as_slice())
            .unwrap_or(&[])
    }
}

/// One planned activity: either an inline detail or a reference to an
/// external request resource.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CarePlanActivity {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<CarePlanActivityDetail>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reference: Option<Reference>,
}

/// A therapy plan for one patient.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CarePlan {
    /// Logical id (no resource-type prefix).
    pub id: String,
    pub status: CarePlanStatus,
    pub intent: CarePlanIntent,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub subject: Reference,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub period: Option<Period>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub activity: Vec<CarePlanActivity>,
}

impl CarePlan {
    pub fn new(
        id: impl Into<String>,
        patient_reference: impl Into<String>,
        title: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            status: CarePlanStatus::Active,
            intent: CarePlanIntent::Plan,
            title: title.into(),
            description: None,
            subject: Reference::new(patient_reference),
            period: Some(Period::starting_now()),
            activity: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    #[must_use]
    pub fn with_status(mut self, status: CarePlanStatus) -> Self {
        self.status = status;
        self
    }

    /// Add an activity whose product is an inline medication coding.
    #[must_use]
    pub fn with_medication_activity(mut self, medication: Coding) -> Self {
        self.activity.push(CarePlanActivity {
            detail: Some(CarePlanActivityDetail {
                code: None,
                status: CarePlanActivityStatus::NotStarted,
                description: None,
                product_codeable_concept: Some(CodeableConcept::of(medication)),
                product_reference: None,
                daily_amount: None,
                quantity: None,
            }),
            reference: None,
        });
        self
    }

    /// Add an activity whose product is a reference to a medication resource.
    #[must_use]
    pub fn with_medication_reference_activity(mut self, medication_reference: &str) -> Self {
        self.activity.push(CarePlanActivity {
            detail: Some(CarePlanActivityDetail {
                code: None,
                status: CarePlanActivityStatus::NotStarted,
                description: None,
                product_codeable_concept: None,
                product_reference: Some(Reference::new(medication_reference)),
                daily_amount: None,
                quantity: None,
            }),
            reference: None,
        });
        self
    }

    /// Add an activity that only references an external request resource.
    #[must_use]
    pub fn with_request_activity(mut self, request_reference: &str) -> Self {
        self.activity.push(CarePlanActivity {
            detail: None,
            reference: Some(Reference::new(request_reference)),
        });
        self
    }
}

// =============================================================================
// CLUSTER D: ENCOUNTER (CLINICAL DIARY)
// =============================================================================

/// Lifecycle status of an encounter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum EncounterStatus {
    Planned,
    #[default]
    InProgress,
    Finished,
    Cancelled,
}

/// A patient/clinician interaction recorded in the clinical diary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Encounter {
    /// Logical id (no resource-type prefix).
    pub id: String,
    pub status: EncounterStatus,
    pub subject: Reference,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub period: Option<Period>,
}

impl Encounter {
    pub fn new(id: impl Into<String>, patient_reference: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            status: EncounterStatus::InProgress,
            subject: Reference::new(patient_reference),
            period: Some(Period::starting_now()),
        }
    }

    #[must_use]
    pub fn with_status(mut self, status: EncounterStatus) -> Self {
        self.status = status;
        self
    }
}
