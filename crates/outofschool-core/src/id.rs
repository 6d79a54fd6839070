//! Surrogate identifier generation.
//!
//! Child elements created during reconciliation receive their surrogate id
//! from an injected generator, so that tests can predict the ids a plan
//! produces.

use uuid::Uuid;

/// Abstraction over surrogate id generation.
pub trait IdGenerator: Send + Sync {
    /// Returns a fresh, never-before-issued identifier.
    fn next_id(&self) -> Uuid;
}

/// Production generator backed by time-ordered v7 UUIDs.
#[derive(Debug, Clone, Copy)]
pub struct UuidV7Generator;

impl IdGenerator for UuidV7Generator {
    fn next_id(&self) -> Uuid {
        Uuid::now_v7()
    }
}
