//! Application layer for the Competitive Events context.

pub mod command_handlers;
pub mod query_handlers;
