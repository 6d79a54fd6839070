//! Shared application state.

use std::fmt;
use std::sync::Arc;

use outofschool_competitions::domain::aggregates::CompetitiveEvent;
use outofschool_core::clock::Clock;
use outofschool_core::id::IdGenerator;
use outofschool_core::repository::AggregateStore;
use outofschool_providers::domain::aggregates::{Position, Provider, Workshop};
use outofschool_store::competitions::PgCompetitiveEventStore;
use outofschool_store::providers::{PgPositionStore, PgProviderStore, PgWorkshopStore};
use outofschool_store::study_subjects::PgStudySubjectStore;
use outofschool_study_subjects::domain::aggregates::StudySubject;
use sqlx::PgPool;

/// Application state shared across all request handlers.
#[derive(Clone)]
pub struct AppState {
    /// PostgreSQL connection pool.
    pub db_pool: PgPool,
    /// Clock used to stamp committed changes.
    pub clock: Arc<dyn Clock>,
    /// Source of surrogate ids for new aggregates and children.
    pub ids: Arc<dyn IdGenerator>,
    /// Provider store.
    pub providers: Arc<dyn AggregateStore<Provider>>,
    /// Workshop store.
    pub workshops: Arc<dyn AggregateStore<Workshop>>,
    /// Position store.
    pub positions: Arc<dyn AggregateStore<Position>>,
    /// Competitive event store.
    pub competitive_events: Arc<dyn AggregateStore<CompetitiveEvent>>,
    /// Study subject store.
    pub study_subjects: Arc<dyn AggregateStore<StudySubject>>,
}

impl AppState {
    /// Create application state backed by Postgres stores sharing `db_pool`.
    #[must_use]
    pub fn new(db_pool: PgPool, clock: Arc<dyn Clock>, ids: Arc<dyn IdGenerator>) -> Self {
        Self {
            providers: Arc::new(PgProviderStore::new(db_pool.clone())),
            workshops: Arc::new(PgWorkshopStore::new(db_pool.clone())),
            positions: Arc::new(PgPositionStore::new(db_pool.clone())),
            competitive_events: Arc::new(PgCompetitiveEventStore::new(db_pool.clone())),
            study_subjects: Arc::new(PgStudySubjectStore::new(db_pool.clone())),
            db_pool,
            clock,
            ids,
        }
    }
}

impl fmt::Debug for AppState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppState")
            .field("db_pool", &self.db_pool)
            .finish_non_exhaustive()
    }
}
