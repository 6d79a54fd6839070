//! Database schema.

use sqlx::migrate::Migrator;

/// Migrations embedded from the workspace `migrations/` directory.
pub static MIGRATOR: Migrator = sqlx::migrate!("../../migrations");

/// Provider roots.
pub const PROVIDERS: &str = "providers";

/// Workshop roots.
pub const WORKSHOPS: &str = "workshops";

/// Position roots.
pub const POSITIONS: &str = "positions";

/// Competitive event roots.
pub const COMPETITIVE_EVENTS: &str = "competitive_events";

/// Study subject roots.
pub const STUDY_SUBJECTS: &str = "study_subjects";
