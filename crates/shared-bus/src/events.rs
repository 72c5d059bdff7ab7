//! Domain events and the topic registry.
//!
//! Every event the services exchange is a variant of [`DomainEvent`], a
//! closed set: the mapping from variant to topic is an exhaustive match the
//! compiler checks, never an open-ended type test. Each event travels on
//! exactly one topic, and its wire payload is the JSON text of the carried
//! resource.

use serde::{Deserialize, Serialize};
use shared_types::{AllergyIntolerance, CarePlan, Encounter};
use thiserror::Error;

/// The durable channels events travel on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Topic {
    /// A clinician recorded a new allergy.
    AllergyDiagnosed,
    /// The conflict-detection service revoked a therapy plan.
    TherapyRevoked,
    /// A clinical-diary encounter was concluded.
    EncounterConcluded,
}

impl Topic {
    /// The broker-level channel name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::AllergyDiagnosed => "allergy-diagnosed",
            Self::TherapyRevoked => "therapy-revoked",
            Self::EncounterConcluded => "encounter-concluded",
        }
    }

    /// Resolve a broker-level channel name; `None` for unknown topics.
    #[must_use]
    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "allergy-diagnosed" => Some(Self::AllergyDiagnosed),
            "therapy-revoked" => Some(Self::TherapyRevoked),
            "encounter-concluded" => Some(Self::EncounterConcluded),
            _ => None,
        }
    }
}

impl std::fmt::Display for Topic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An immutable fact published by one service and consumed by zero or more
/// others. Each variant carries a value copy of its clinical resource.
#[derive(Debug, Clone, PartialEq)]
pub enum DomainEvent {
    /// A new allergy record was persisted by the allergy registry.
    AllergyDiagnosed(AllergyIntolerance),
    /// A therapy plan was revoked by the conflict-detection service.
    TherapyRevoked(CarePlan),
    /// An encounter was concluded by the clinical diary.
    EncounterConcluded(Encounter),
}

impl DomainEvent {
    /// The topic this event travels on. Exhaustive over the closed event set.
    #[must_use]
    pub const fn topic(&self) -> Topic {
        match self {
            Self::AllergyDiagnosed(_) => Topic::AllergyDiagnosed,
            Self::TherapyRevoked(_) => Topic::TherapyRevoked,
            Self::EncounterConcluded(_) => Topic::EncounterConcluded,
        }
    }

    /// Serialize the carried resource to its wire payload.
    pub fn to_record(&self) -> Result<EventRecord, EventCodecError> {
        let payload = match self {
            Self::AllergyDiagnosed(allergy) => serde_json::to_string(allergy),
            Self::TherapyRevoked(plan) => serde_json::to_string(plan),
            Self::EncounterConcluded(encounter) => serde_json::to_string(encounter),
        }
        .map_err(|e| EventCodecError::Encode(e.to_string()))?;

        Ok(EventRecord {
            topic: self.topic(),
            key: None,
            payload,
        })
    }

    /// Decode a wire record back into the event its topic implies.
    pub fn from_record(record: &EventRecord) -> Result<Self, EventCodecError> {
        let decode = |e: serde_json::Error| EventCodecError::Decode {
            topic: record.topic,
            message: e.to_string(),
        };
        match record.topic {
            Topic::AllergyDiagnosed => serde_json::from_str(&record.payload)
                .map(Self::AllergyDiagnosed)
                .map_err(decode),
            Topic::TherapyRevoked => serde_json::from_str(&record.payload)
                .map(Self::TherapyRevoked)
                .map_err(decode),
            Topic::EncounterConcluded => serde_json::from_str(&record.payload)
                .map(Self::EncounterConcluded)
                .map_err(decode),
        }
    }
}

/// A record as it travels on the broker: topic name, optional partition
/// key (currently unused, always `None`), and the resource's JSON text.
#[derive(Debug, Clone, PartialEq)]
pub struct EventRecord {
    pub topic: Topic,
    pub key: Option<String>,
    pub payload: String,
}

/// Encode/decode failures at the bus boundary.
#[derive(Debug, Clone, Error)]
pub enum EventCodecError {
    #[error("failed to encode event payload: {0}")]
    Encode(String),

    #[error("malformed payload on topic '{topic}': {message}")]
    Decode { topic: Topic, message: String },
}
