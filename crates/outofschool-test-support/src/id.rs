//! Test id generator — predictable surrogate ids.

use std::sync::atomic::{AtomicU64, Ordering};

use outofschool_core::id::IdGenerator;
use uuid::Uuid;

/// Issues `Uuid::from_u128(n)`, `Uuid::from_u128(n + 1)`, ... so tests can
/// assert on the ids given to created children.
#[derive(Debug)]
pub struct SequenceIdGenerator {
    next: AtomicU64,
}

impl SequenceIdGenerator {
    /// Create a generator whose first id is `Uuid::from_u128(first)`.
    #[must_use]
    pub fn starting_at(first: u64) -> Self {
        Self {
            next: AtomicU64::new(first),
        }
    }
}

impl IdGenerator for SequenceIdGenerator {
    fn next_id(&self) -> Uuid {
        Uuid::from_u128(u128::from(self.next.fetch_add(1, Ordering::SeqCst)))
    }
}
