//! Domain layer for the Providers context.

pub mod aggregates;
pub mod commands;
pub mod contacts;
