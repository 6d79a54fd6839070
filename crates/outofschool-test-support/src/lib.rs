//! Shared test mocks and utilities for the Out-of-School backend.

mod clock;
mod id;
mod store;

pub use clock::FixedClock;
pub use id::SequenceIdGenerator;
pub use store::{
    FailingAggregateStore, InMemoryAggregateStore, UnavailableCommitStore,
    VanishingAggregateStore,
};
