//! Commands for the Providers context.

use uuid::Uuid;

use super::contacts::Contact;

/// Command to register a provider.
#[derive(Debug, Clone)]
pub struct CreateProvider {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// Registered full title.
    pub full_title: String,
    /// Short display title.
    pub short_title: String,
    /// Public e-mail.
    pub email: String,
    /// Initial contacts.
    pub contacts: Vec<Contact>,
}

/// Command to update a provider and reconcile its contacts.
#[derive(Debug, Clone)]
pub struct UpdateProvider {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The provider identifier.
    pub provider_id: Uuid,
    /// The version the caller last read, if it wants a stale-write check.
    pub expected_version: Option<i64>,
    /// Registered full title.
    pub full_title: String,
    /// Short display title.
    pub short_title: String,
    /// Public e-mail.
    pub email: String,
    /// Desired contacts.
    pub contacts: Vec<Contact>,
}

/// Command to add a workshop to a provider.
#[derive(Debug, Clone)]
pub struct CreateWorkshop {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The provider running the workshop.
    pub provider_id: Uuid,
    /// Workshop title.
    pub title: String,
    /// Free-form description.
    pub description: String,
    /// Initial contacts.
    pub contacts: Vec<Contact>,
}

/// Command to update a workshop and reconcile its contacts.
#[derive(Debug, Clone)]
pub struct UpdateWorkshop {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The workshop identifier.
    pub workshop_id: Uuid,
    /// The version the caller last read, if it wants a stale-write check.
    pub expected_version: Option<i64>,
    /// Workshop title.
    pub title: String,
    /// Free-form description.
    pub description: String,
    /// Desired contacts.
    pub contacts: Vec<Contact>,
}

/// Command to open a position at a provider.
#[derive(Debug, Clone)]
pub struct CreatePosition {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The provider offering the position.
    pub provider_id: Uuid,
    /// Position name.
    pub full_title: String,
    /// Department the position belongs to.
    pub department: Option<String>,
    /// Initial contacts.
    pub contacts: Vec<Contact>,
}

/// Command to update a position and reconcile its contacts.
#[derive(Debug, Clone)]
pub struct UpdatePosition {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The position identifier.
    pub position_id: Uuid,
    /// The version the caller last read, if it wants a stale-write check.
    pub expected_version: Option<i64>,
    /// Position name.
    pub full_title: String,
    /// Department the position belongs to.
    pub department: Option<String>,
    /// Desired contacts.
    pub contacts: Vec<Contact>,
}
