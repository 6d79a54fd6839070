//! Route modules organized by bounded context.

pub mod competitive_events;
pub mod contacts;
pub mod health;
pub mod positions;
pub mod providers;
pub mod study_subjects;
pub mod workshops;

#[cfg(test)]
pub(crate) mod testing;
