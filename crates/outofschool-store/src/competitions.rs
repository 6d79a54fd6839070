//! `PostgreSQL` store for competitive events, their judges and description
//! items.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use outofschool_competitions::domain::aggregates::{CompetitiveEvent, CompetitiveEventWrite};
use outofschool_competitions::domain::judges::{DescriptionItem, Judge};
use outofschool_core::error::DomainError;
use outofschool_core::repository::{AggregateStore, ChildWrite, UnitOfWork};
use sqlx::{FromRow, PgConnection, PgPool};
use tracing::debug;
use uuid::Uuid;

use crate::schema::COMPETITIVE_EVENTS;
use crate::support::{
    caller_keyed_write_error, ensure_version, infrastructure, persisted_id, sort_order,
};

#[derive(Debug, FromRow)]
struct CompetitiveEventRow {
    id: Uuid,
    version: i64,
    title: String,
    description: String,
    scheduled_at: Option<DateTime<Utc>>,
    updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, FromRow)]
struct JudgeRow {
    id: Uuid,
    competitive_event_id: Uuid,
    first_name: String,
    last_name: String,
    is_chief: bool,
    description: String,
}

#[derive(Debug, FromRow)]
struct DescriptionItemRow {
    id: Uuid,
    competitive_event_id: Uuid,
    section_name: String,
    description: String,
}

/// PostgreSQL-backed competitive event store.
#[derive(Debug, Clone)]
pub struct PgCompetitiveEventStore {
    pool: PgPool,
}

impl PgCompetitiveEventStore {
    /// Creates a new `PgCompetitiveEventStore`.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

async fn load_judges(conn: &mut PgConnection, event_id: Uuid) -> Result<Vec<Judge>, DomainError> {
    let rows: Vec<JudgeRow> = sqlx::query_as(
        r"
        SELECT id, competitive_event_id, first_name, last_name, is_chief, description
        FROM judges
        WHERE competitive_event_id = $1
        ORDER BY sort_order, id
        ",
    )
    .bind(event_id)
    .fetch_all(&mut *conn)
    .await
    .map_err(infrastructure)?;

    Ok(rows
        .into_iter()
        .map(|row| Judge {
            id: Some(row.id),
            competitive_event_id: Some(row.competitive_event_id),
            first_name: row.first_name,
            last_name: row.last_name,
            is_chief: row.is_chief,
            description: row.description,
        })
        .collect())
}

async fn load_description_items(
    conn: &mut PgConnection,
    event_id: Uuid,
) -> Result<Vec<DescriptionItem>, DomainError> {
    let rows: Vec<DescriptionItemRow> = sqlx::query_as(
        r"
        SELECT id, competitive_event_id, section_name, description
        FROM description_items
        WHERE competitive_event_id = $1
        ORDER BY sort_order, id
        ",
    )
    .bind(event_id)
    .fetch_all(&mut *conn)
    .await
    .map_err(infrastructure)?;

    Ok(rows
        .into_iter()
        .map(|row| DescriptionItem {
            id: Some(row.id),
            competitive_event_id: Some(row.competitive_event_id),
            section_name: row.section_name,
            description: row.description,
        })
        .collect())
}

async fn apply_judge(
    conn: &mut PgConnection,
    event_id: Uuid,
    judges: &[Judge],
    write: &ChildWrite<Judge>,
) -> Result<(), DomainError> {
    let judge = write.child();
    let id = persisted_id(judge)?;
    let query = match write {
        ChildWrite::Delete(_) => {
            sqlx::query("DELETE FROM judges WHERE id = $1 AND competitive_event_id = $2")
                .bind(id)
                .bind(event_id)
        }
        ChildWrite::Update(_) => sqlx::query(
            r"
            UPDATE judges
            SET sort_order = $3, first_name = $4, last_name = $5, is_chief = $6, description = $7
            WHERE id = $1 AND competitive_event_id = $2
            ",
        )
        .bind(id)
        .bind(event_id)
        .bind(sort_order(judges, id)?)
        .bind(&judge.first_name)
        .bind(&judge.last_name)
        .bind(judge.is_chief)
        .bind(&judge.description),
        ChildWrite::Create(_) => sqlx::query(
            r"
            INSERT INTO judges
                (id, competitive_event_id, sort_order, first_name, last_name, is_chief, description)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            ",
        )
        .bind(id)
        .bind(event_id)
        .bind(sort_order(judges, id)?)
        .bind(&judge.first_name)
        .bind(&judge.last_name)
        .bind(judge.is_chief)
        .bind(&judge.description),
    };
    query
        .execute(&mut *conn)
        .await
        .map_err(|err| caller_keyed_write_error(write, "judge", id, err))?;
    Ok(())
}

async fn apply_description_item(
    conn: &mut PgConnection,
    event_id: Uuid,
    items: &[DescriptionItem],
    write: &ChildWrite<DescriptionItem>,
) -> Result<(), DomainError> {
    let item = write.child();
    let id = persisted_id(item)?;
    let query = match write {
        ChildWrite::Delete(_) => {
            sqlx::query("DELETE FROM description_items WHERE id = $1 AND competitive_event_id = $2")
                .bind(id)
                .bind(event_id)
        }
        ChildWrite::Update(_) => sqlx::query(
            r"
            UPDATE description_items
            SET sort_order = $3, section_name = $4, description = $5
            WHERE id = $1 AND competitive_event_id = $2
            ",
        )
        .bind(id)
        .bind(event_id)
        .bind(sort_order(items, id)?)
        .bind(&item.section_name)
        .bind(&item.description),
        ChildWrite::Create(_) => sqlx::query(
            r"
            INSERT INTO description_items
                (id, competitive_event_id, sort_order, section_name, description)
            VALUES ($1, $2, $3, $4, $5)
            ",
        )
        .bind(id)
        .bind(event_id)
        .bind(sort_order(items, id)?)
        .bind(&item.section_name)
        .bind(&item.description),
    };
    query
        .execute(&mut *conn)
        .await
        .map_err(|err| caller_keyed_write_error(write, "description item", id, err))?;
    Ok(())
}

async fn apply_writes(
    conn: &mut PgConnection,
    event: &CompetitiveEvent,
    writes: &[CompetitiveEventWrite],
) -> Result<(), DomainError> {
    for write in writes {
        match write {
            CompetitiveEventWrite::Judge(write) => {
                apply_judge(conn, event.id, &event.judges, write).await?;
            }
            CompetitiveEventWrite::DescriptionItem(write) => {
                apply_description_item(conn, event.id, &event.description_items, write).await?;
            }
        }
    }
    Ok(())
}

#[async_trait]
impl AggregateStore<CompetitiveEvent> for PgCompetitiveEventStore {
    async fn load_with_children(
        &self,
        aggregate_id: Uuid,
    ) -> Result<Option<CompetitiveEvent>, DomainError> {
        let mut conn = self.pool.acquire().await.map_err(infrastructure)?;
        let row: Option<CompetitiveEventRow> = sqlx::query_as(
            r"
            SELECT id, version, title, description, scheduled_at, updated_at
            FROM competitive_events
            WHERE id = $1
            ",
        )
        .bind(aggregate_id)
        .fetch_optional(&mut *conn)
        .await
        .map_err(infrastructure)?;
        let Some(row) = row else {
            return Ok(None);
        };

        let judges = load_judges(&mut conn, row.id).await?;
        let description_items = load_description_items(&mut conn, row.id).await?;
        Ok(Some(CompetitiveEvent {
            id: row.id,
            version: row.version,
            title: row.title,
            description: row.description,
            scheduled_at: row.scheduled_at,
            updated_at: row.updated_at,
            judges,
            description_items,
        }))
    }

    async fn insert(&self, unit: &UnitOfWork<CompetitiveEvent>) -> Result<(), DomainError> {
        let event = &unit.aggregate;
        let mut tx = self.pool.begin().await.map_err(infrastructure)?;

        sqlx::query(
            r"
            INSERT INTO competitive_events (id, version, title, description, scheduled_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            ",
        )
        .bind(event.id)
        .bind(event.version)
        .bind(&event.title)
        .bind(&event.description)
        .bind(event.scheduled_at)
        .bind(event.updated_at)
        .execute(&mut *tx)
        .await
        .map_err(infrastructure)?;
        apply_writes(&mut tx, event, &unit.writes).await?;

        tx.commit().await.map_err(infrastructure)?;
        debug!(competitive_event_id = %event.id, writes = unit.writes.len(), "competitive event inserted");
        Ok(())
    }

    async fn commit(&self, unit: &UnitOfWork<CompetitiveEvent>) -> Result<(), DomainError> {
        let event = &unit.aggregate;
        let mut tx = self.pool.begin().await.map_err(infrastructure)?;

        let result = sqlx::query(
            r"
            UPDATE competitive_events
            SET version = $3, title = $4, description = $5, scheduled_at = $6, updated_at = $7
            WHERE id = $1 AND version = $2
            ",
        )
        .bind(event.id)
        .bind(unit.expected_version)
        .bind(event.version)
        .bind(&event.title)
        .bind(&event.description)
        .bind(event.scheduled_at)
        .bind(event.updated_at)
        .execute(&mut *tx)
        .await
        .map_err(infrastructure)?;
        ensure_version(
            &mut tx,
            COMPETITIVE_EVENTS,
            result.rows_affected(),
            event.id,
            unit.expected_version,
        )
        .await?;
        apply_writes(&mut tx, event, &unit.writes).await?;

        tx.commit().await.map_err(infrastructure)?;
        debug!(competitive_event_id = %event.id, version = event.version, "competitive event committed");
        Ok(())
    }
}
