//! Therapy service error types.

use shared_types::StoreError;
use thiserror::Error;

/// Failures surfaced by the therapy service.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TherapyError {
    /// A lookup by id found nothing.
    #[error("care plan '{id}' not found")]
    NotFound { id: String },

    /// The backing store failed; for the conflict scan this is fatal for
    /// the whole invocation (the triggering event is lost, no redelivery).
    #[error(transparent)]
    Store(#[from] StoreError),
}
