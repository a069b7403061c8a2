//! Unified error types for the domain layer
//!
//! Provides a common error type used across repositories, aggregation
//! queries, and the HTTP layer, so adapters never surface driver errors
//! or anyhow chains directly.

use thiserror::Error;

use crate::ids::TrainerId;

/// Unified error type for domain operations
#[derive(Debug, Error, Clone)]
pub enum DomainError {
    /// Input document or patch failed validation (empty, missing field)
    #[error("Validation failed: {0}")]
    Validation(String),

    /// Entity not found by its identifier
    #[error("{entity_type} not found: {id}")]
    NotFound {
        entity_type: &'static str,
        id: String,
    },

    /// Foreign reference to a trainer that does not exist
    #[error("Trainer {trainer_id} not found")]
    Referential { trainer_id: TrainerId },

    /// Transient store failure, surfaced after retries are exhausted
    #[error("Transient store error: {0}")]
    Transient(String),

    /// Permanent store failure (constraint violation, malformed identifier)
    #[error("Store error: {0}")]
    Permanent(String),
}

impl DomainError {
    /// Creates a validation error for rejected input.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Creates a not-found error for an unresolved identifier.
    pub fn not_found(entity_type: &'static str, id: impl ToString) -> Self {
        Self::NotFound {
            entity_type,
            id: id.to_string(),
        }
    }

    /// Creates a referential error for a dangling trainer reference.
    pub fn referential(trainer_id: TrainerId) -> Self {
        Self::Referential { trainer_id }
    }

    /// Creates a transient store error (connectivity, replica election).
    pub fn transient(msg: impl Into<String>) -> Self {
        Self::Transient(msg.into())
    }

    /// Creates a permanent store error (constraint, malformed id).
    pub fn permanent(msg: impl Into<String>) -> Self {
        Self::Permanent(msg.into())
    }

    /// Whether the operation that produced this error is worth retrying.
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Transient(_))
    }

    /// Check if this error resolves to a missing entity or reference.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. } | Self::Referential { .. })
    }
}
