//! Commands for the Competitive Events context.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::judges::{DescriptionItem, Judge};

/// Command to announce a competitive event.
#[derive(Debug, Clone)]
pub struct CreateCompetitiveEvent {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// Event title.
    pub title: String,
    /// Short summary.
    pub description: String,
    /// Scheduled start.
    pub scheduled_at: Option<DateTime<Utc>>,
    /// Initial judging panel.
    pub judges: Vec<Judge>,
    /// Initial description sections.
    pub description_items: Vec<DescriptionItem>,
}

/// Command to update a competitive event and reconcile both of its owned
/// collections.
#[derive(Debug, Clone)]
pub struct UpdateCompetitiveEvent {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The competitive event identifier.
    pub competitive_event_id: Uuid,
    /// The version the caller last read, if it wants a stale-write check.
    pub expected_version: Option<i64>,
    /// Event title.
    pub title: String,
    /// Short summary.
    pub description: String,
    /// Scheduled start.
    pub scheduled_at: Option<DateTime<Utc>>,
    /// Desired judging panel.
    pub judges: Vec<Judge>,
    /// Desired description sections.
    pub description_items: Vec<DescriptionItem>,
}
