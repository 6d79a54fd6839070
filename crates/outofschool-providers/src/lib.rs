//! Out-of-School — Providers bounded context.
//!
//! Responsible for education providers, the workshops they run and the
//! staff positions they advertise. Each of the three owns a contact list
//! that is reconciled by title.

pub mod application;
pub mod domain;
