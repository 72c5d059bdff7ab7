//! # Wire Format Tests
//!
//! Event payloads are the JSON text of the carried resource; these tests
//! pin the interchange shape and the round trips the services rely on.

#[cfg(test)]
mod tests {
    use shared_bus::{DomainEvent, Topic};
    use shared_types::{AllergyIntolerance, CarePlan, CarePlanStatus, Coding, Encounter};

    const RXNORM: &str = "http://www.nlm.nih.gov/research/umls/rxnorm";

    #[test]
    fn care_plan_payload_uses_interchange_field_names() {
        let plan = CarePlan::new("123", "Patient/42", "Antibiotic course")
            .with_medication_activity(Coding::new(RXNORM, "7980", "Penicillin"));
        let record = DomainEvent::TherapyRevoked(plan).to_record().unwrap();

        let value: serde_json::Value = serde_json::from_str(&record.payload).unwrap();
        assert_eq!(value["subject"]["reference"], "Patient/42");
        assert_eq!(
            value["activity"][0]["detail"]["productCodeableConcept"]["coding"][0]["code"],
            "7980"
        );
    }

    #[test]
    fn revoked_status_serializes_to_its_code() {
        let plan = CarePlan::new("123", "Patient/42", "Course")
            .with_status(CarePlanStatus::Revoked);
        let record = DomainEvent::TherapyRevoked(plan).to_record().unwrap();
        let value: serde_json::Value = serde_json::from_str(&record.payload).unwrap();
        assert_eq!(value["status"], "revoked");
    }

    #[test]
    fn each_event_round_trips_on_its_own_topic() {
        let events = [
            DomainEvent::AllergyDiagnosed(
                AllergyIntolerance::new("a1", "Patient/1")
                    .with_code(Coding::new(RXNORM, "7980", "Penicillin")),
            ),
            DomainEvent::TherapyRevoked(CarePlan::new("p1", "Patient/1", "Course")),
            DomainEvent::EncounterConcluded(Encounter::new("e1", "Patient/1")),
        ];

        for event in events {
            let record = event.to_record().unwrap();
            assert_eq!(record.topic, event.topic());
            assert!(record.key.is_none());
            let decoded = DomainEvent::from_record(&record).unwrap();
            assert_eq!(decoded, event);
        }
    }

    #[test]
    fn topic_names_match_the_broker_channels() {
        assert_eq!(Topic::AllergyDiagnosed.as_str(), "allergy-diagnosed");
        assert_eq!(Topic::TherapyRevoked.as_str(), "therapy-revoked");
        assert_eq!(Topic::EncounterConcluded.as_str(), "encounter-concluded");
    }
}
