//! Repository port.
//!
//! Store-agnostic persistence contract used both to read all candidate
//! aggregates and to persist revised state. Services depend on this trait
//! only; a concrete adapter per backing store implements it.
//!
//! ## Contract
//!
//! - Reads that find nothing return `Ok(None)`; absence is not an error.
//! - `update` **fails with [`StoreError::NotFound`] when no record with the
//!   entity's id exists**. This is a documented contract, not an incidental
//!   behavior: callers must not call `update` on unsaved entities, and an
//!   adapter must never implement it as an upsert.
//! - Every mutating call stamps a last-modified timestamp on the stored
//!   record; timestamps are store metadata, not part of entity identity.
//! - The scan-then-update sequence built on top of this port is best-effort:
//!   there is no optimistic concurrency. If a stronger guarantee is ever
//!   needed, add a version field checked on `update` rather than assuming
//!   the race away.

use std::collections::HashMap;

use parking_lot::RwLock;
use thiserror::Error;
use tracing::debug;

use crate::entity::Entity;

/// Failure taxonomy for store operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// `update` targeted a record that does not exist.
    #[error("no stored record with id '{id}'")]
    NotFound { id: String },

    /// `save` collided with an existing record (store-enforced uniqueness).
    #[error("record with id '{id}' already exists")]
    Duplicate { id: String },

    /// The backing store cannot be reached.
    #[error("store unavailable: {0}")]
    Unavailable(String),

    /// A stored record could not be (de)serialized.
    #[error("stored record (de)serialization failed: {0}")]
    Serialization(String),
}

/// Uniform CRUD contract, generic over identifier and entity type.
pub trait Repository<I, E>: Send + Sync {
    /// Look up one entity. Absence is `Ok(None)`, never an error.
    fn find_by_id(&self, id: &I) -> Result<Option<E>, StoreError>;

    /// A finite snapshot of all stored entities at call time; no ordering
    /// guarantee.
    fn find_all(&self) -> Result<Vec<E>, StoreError>;

    /// Insert a new record keyed by the entity's identifier.
    fn save(&self, entity: &E) -> Result<(), StoreError>;

    /// Replace the full stored record matching the entity's identifier.
    ///
    /// Fails with [`StoreError::NotFound`] if no such record exists.
    fn update(&self, entity: &E) -> Result<(), StoreError>;

    /// Remove and return the prior value; absence is `Ok(None)`.
    fn delete_by_id(&self, id: &I) -> Result<Option<E>, StoreError>;

    /// Release underlying connections. Idempotent.
    fn close(&self);
}

/// A stored record: the entity plus store-side metadata.
#[derive(Debug, Clone)]
struct StoredRecord<E> {
    entity: E,
    created_at_ms: u64,
    updated_at_ms: u64,
}

fn now_millis() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

/// In-memory repository adapter.
///
/// Backs single-process wiring and unit tests; a production deployment
/// swaps in a driver-backed adapter behind the same trait. Supports
/// concurrent callers through a process-wide lock.
pub struct InMemoryRepository<E: Entity> {
    records: RwLock<HashMap<E::Id, StoredRecord<E>>>,
}

impl<E: Entity + Clone> InMemoryRepository<E> {
    pub fn new() -> Self {
        Self {
            records: RwLock::new(HashMap::new()),
        }
    }

    /// Number of stored records.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.read().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.read().is_empty()
    }

    /// Created/updated timestamps for a record, if present. Test hook.
    #[must_use]
    pub fn timestamps(&self, id: &E::Id) -> Option<(u64, u64)> {
        self.records
            .read()
            .get(id)
            .map(|record| (record.created_at_ms, record.updated_at_ms))
    }
}

impl<E: Entity + Clone> Default for InMemoryRepository<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> Repository<E::Id, E> for InMemoryRepository<E>
where
    E: Entity + Clone + Send + Sync,
{
    fn find_by_id(&self, id: &E::Id) -> Result<Option<E>, StoreError> {
        Ok(self.records.read().get(id).map(|r| r.entity.clone()))
    }

    fn find_all(&self) -> Result<Vec<E>, StoreError> {
        Ok(self
            .records
            .read()
            .values()
            .map(|r| r.entity.clone())
            .collect())
    }

    fn save(&self, entity: &E) -> Result<(), StoreError> {
        let mut records = self.records.write();
        let id = entity.id().clone();
        if records.contains_key(&id) {
            return Err(StoreError::Duplicate { id: id.to_string() });
        }
        let now = now_millis();
        records.insert(
            id,
            StoredRecord {
                entity: entity.clone(),
                created_at_ms: now,
                updated_at_ms: now,
            },
        );
        Ok(())
    }

    fn update(&self, entity: &E) -> Result<(), StoreError> {
        let mut records = self.records.write();
        match records.get_mut(entity.id()) {
            Some(record) => {
                record.entity = entity.clone();
                record.updated_at_ms = now_millis();
                Ok(())
            }
            None => Err(StoreError::NotFound {
                id: entity.id().to_string(),
            }),
        }
    }

    fn delete_by_id(&self, id: &E::Id) -> Result<Option<E>, StoreError> {
        Ok(self.records.write().remove(id).map(|r| r.entity))
    }

    fn close(&self) {
        // Nothing to release for the in-memory adapter; kept so callers can
        // treat every adapter uniformly. Safe to call more than once.
        debug!("in-memory repository closed");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fmt;

    #[derive(Debug, Clone, PartialEq, Eq, Hash)]
    struct NoteId(String);

    impl fmt::Display for NoteId {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str(&self.0)
        }
    }

    #[derive(Debug, Clone, PartialEq)]
    struct Note {
        id: NoteId,
        body: String,
    }

    impl Entity for Note {
        type Id = NoteId;
        fn id(&self) -> &NoteId {
            &self.id
        }
    }

    fn note(id: &str, body: &str) -> Note {
        Note {
            id: NoteId(id.to_string()),
            body: body.to_string(),
        }
    }

    #[test]
    fn save_then_find_returns_saved_value() {
        let repo = InMemoryRepository::new();
        let n = note("a", "first");
        repo.save(&n).unwrap();
        assert_eq!(repo.find_by_id(&NoteId("a".into())).unwrap(), Some(n));
    }

    #[test]
    fn find_missing_is_none_not_error() {
        let repo: InMemoryRepository<Note> = InMemoryRepository::new();
        assert_eq!(repo.find_by_id(&NoteId("missing".into())).unwrap(), None);
    }

    #[test]
    fn save_duplicate_id_is_rejected() {
        let repo = InMemoryRepository::new();
        repo.save(&note("a", "first")).unwrap();
        assert_eq!(
            repo.save(&note("a", "second")),
            Err(StoreError::Duplicate { id: "a".into() })
        );
    }

    #[test]
    fn update_replaces_full_record() {
        let repo = InMemoryRepository::new();
        repo.save(&note("a", "first")).unwrap();
        repo.update(&note("a", "second")).unwrap();
        assert_eq!(
            repo.find_by_id(&NoteId("a".into())).unwrap().unwrap().body,
            "second"
        );
    }

    #[test]
    fn update_on_unsaved_id_fails_with_not_found() {
        let repo: InMemoryRepository<Note> = InMemoryRepository::new();
        assert_eq!(
            repo.update(&note("ghost", "x")),
            Err(StoreError::NotFound { id: "ghost".into() })
        );
        // And it must not have turned into an insert.
        assert!(repo.is_empty());
    }

    #[test]
    fn delete_returns_prior_value_or_none() {
        let repo = InMemoryRepository::new();
        let n = note("a", "first");
        repo.save(&n).unwrap();
        assert_eq!(repo.delete_by_id(&NoteId("a".into())).unwrap(), Some(n));
        assert_eq!(repo.delete_by_id(&NoteId("a".into())).unwrap(), None);
    }

    #[test]
    fn find_all_returns_every_saved_entity() {
        let repo = InMemoryRepository::new();
        for i in 0..5 {
            repo.save(&note(&format!("n{i}"), "body")).unwrap();
        }
        let all = repo.find_all().unwrap();
        assert_eq!(all.len(), 5);
        for i in 0..5 {
            assert!(all.iter().any(|n| n.id.0 == format!("n{i}")));
        }
    }

    #[test]
    fn mutating_calls_stamp_timestamps() {
        let repo = InMemoryRepository::new();
        repo.save(&note("a", "first")).unwrap();
        let (created, updated) = repo.timestamps(&NoteId("a".into())).unwrap();
        assert!(created > 0);
        assert_eq!(created, updated);

        repo.update(&note("a", "second")).unwrap();
        let (created_after, updated_after) = repo.timestamps(&NoteId("a".into())).unwrap();
        assert_eq!(created, created_after);
        assert!(updated_after >= updated);
    }

    #[test]
    fn close_is_idempotent() {
        let repo: InMemoryRepository<Note> = InMemoryRepository::new();
        repo.close();
        repo.close();
    }
}
