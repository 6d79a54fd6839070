//! Domain layer for the Competitive Events context.

pub mod aggregates;
pub mod commands;
pub mod judges;
