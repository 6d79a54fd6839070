//! Out-of-School — Study Subjects bounded context.
//!
//! Responsible for the subjects a provider teaches and the languages each
//! subject is taught in.

pub mod application;
pub mod domain;
