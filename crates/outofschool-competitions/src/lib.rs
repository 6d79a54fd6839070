//! Out-of-School — Competitive Events bounded context.
//!
//! Responsible for competitions, their judging panels and the sectioned
//! description shown to participants.

pub mod application;
pub mod domain;
