//! Pre-flight classification of a loaded aggregate.

use outofschool_core::aggregate::AggregateRoot;
use outofschool_core::error::DomainError;
use uuid::Uuid;

/// Distinguishes "aggregate not found" from "aggregate found but stale"
/// before any reconciliation work starts.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConcurrencyGuard {
    expected_version: Option<i64>,
}

impl ConcurrencyGuard {
    /// A guard that checks the loaded version against `expected_version`
    /// when one is given.
    #[must_use]
    pub fn new(expected_version: Option<i64>) -> Self {
        Self { expected_version }
    }

    /// Admits the loaded aggregate.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::AggregateNotFound` when nothing was loaded and
    /// `DomainError::ConcurrencyConflict` when the loaded version differs from
    /// the one the caller last read.
    pub fn admit<A: AggregateRoot>(
        &self,
        aggregate_id: Uuid,
        loaded: Option<A>,
    ) -> Result<A, DomainError> {
        let aggregate = loaded.ok_or(DomainError::AggregateNotFound(aggregate_id))?;
        match self.expected_version {
            Some(expected) if expected != aggregate.version() => Err(DomainError::conflict(
                aggregate_id,
                expected,
                Some(aggregate.version()),
            )),
            _ => Ok(aggregate),
        }
    }
}
