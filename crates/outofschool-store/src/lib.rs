//! Out-of-School Store — PostgreSQL persistence for aggregates and their
//! owned collections.
//!
//! Every store loads an aggregate root together with its children and
//! persists a unit of work in a single transaction guarded by the root's
//! version column. A transaction that is dropped before `commit` rolls back,
//! so an error or a cancelled request never leaves a partial write behind.

pub mod competitions;
pub mod contacts;
pub mod providers;
pub mod schema;
pub mod study_subjects;

mod support;
