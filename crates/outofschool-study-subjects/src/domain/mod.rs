//! Domain layer for the Study Subjects context.

pub mod aggregates;
pub mod commands;
pub mod languages;
