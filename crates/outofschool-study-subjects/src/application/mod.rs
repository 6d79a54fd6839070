//! Application layer for the Study Subjects context.

pub mod command_handlers;
pub mod query_handlers;
