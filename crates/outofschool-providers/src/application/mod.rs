//! Application layer for the Providers context.

pub mod command_handlers;
pub mod query_handlers;
