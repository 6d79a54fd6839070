//! Domain error types.

use std::fmt;

use thiserror::Error;
use uuid::Uuid;

/// Why a commit against an aggregate was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConflictReason {
    /// The aggregate existed at load time but was deleted before commit.
    Vanished,
    /// The aggregate was modified by another writer.
    StaleVersion {
        /// The version the caller read.
        expected: i64,
        /// The version currently stored.
        actual: i64,
    },
}

impl fmt::Display for ConflictReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Vanished => write!(f, "aggregate no longer exists"),
            Self::StaleVersion { expected, actual } => {
                write!(f, "expected version {expected}, found {actual}")
            }
        }
    }
}

/// Top-level domain error type.
#[derive(Debug, Error)]
pub enum DomainError {
    /// An aggregate was not found.
    #[error("aggregate not found: {0}")]
    AggregateNotFound(Uuid),

    /// Optimistic concurrency conflict.
    #[error("concurrency conflict on aggregate {aggregate_id}: {reason}")]
    ConcurrencyConflict {
        /// The aggregate that had the conflict.
        aggregate_id: Uuid,
        /// What the store observed.
        reason: ConflictReason,
    },

    /// A validation error in domain logic.
    #[error("validation error: {0}")]
    Validation(String),

    /// An infrastructure/persistence error.
    #[error("infrastructure error: {0}")]
    Infrastructure(String),
}

impl DomainError {
    /// Classifies a failed version guard.
    ///
    /// `current` is the version the store holds now, or `None` when the
    /// aggregate row is gone.
    #[must_use]
    pub fn conflict(aggregate_id: Uuid, expected: i64, current: Option<i64>) -> Self {
        let reason = match current {
            None => ConflictReason::Vanished,
            Some(actual) => ConflictReason::StaleVersion { expected, actual },
        };
        Self::ConcurrencyConflict {
            aggregate_id,
            reason,
        }
    }

    /// Returns `true` for errors the caller may retry after re-reading.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::ConcurrencyConflict { .. })
    }
}
