//! Out-of-School Core — shared domain abstractions.
//!
//! This crate defines the fundamental traits and types that all bounded
//! contexts depend on. It contains no infrastructure code.

pub mod aggregate;
pub mod clock;
pub mod error;
pub mod id;
pub mod repository;
