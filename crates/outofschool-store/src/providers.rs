//! `PostgreSQL` stores for providers, workshops and positions.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use outofschool_core::error::DomainError;
use outofschool_core::repository::{AggregateStore, UnitOfWork};
use outofschool_providers::domain::aggregates::{Position, Provider, Workshop};
use sqlx::{FromRow, PgPool};
use tracing::debug;
use uuid::Uuid;

use crate::contacts::{self, ContactOwner};
use crate::schema::{POSITIONS, PROVIDERS, WORKSHOPS};
use crate::support::{ensure_version, infrastructure};

#[derive(Debug, FromRow)]
struct ProviderRow {
    id: Uuid,
    version: i64,
    full_title: String,
    short_title: String,
    email: String,
    updated_at: Option<DateTime<Utc>>,
}

/// PostgreSQL-backed provider store.
#[derive(Debug, Clone)]
pub struct PgProviderStore {
    pool: PgPool,
}

impl PgProviderStore {
    /// Creates a new `PgProviderStore`.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AggregateStore<Provider> for PgProviderStore {
    async fn load_with_children(&self, aggregate_id: Uuid) -> Result<Option<Provider>, DomainError> {
        let mut conn = self.pool.acquire().await.map_err(infrastructure)?;
        let row: Option<ProviderRow> = sqlx::query_as(
            "SELECT id, version, full_title, short_title, email, updated_at FROM providers WHERE id = $1",
        )
        .bind(aggregate_id)
        .fetch_optional(&mut *conn)
        .await
        .map_err(infrastructure)?;
        let Some(row) = row else {
            return Ok(None);
        };

        let contacts = contacts::load(&mut conn, ContactOwner::Provider, row.id).await?;
        Ok(Some(Provider {
            id: row.id,
            version: row.version,
            full_title: row.full_title,
            short_title: row.short_title,
            email: row.email,
            updated_at: row.updated_at,
            contacts,
        }))
    }

    async fn insert(&self, unit: &UnitOfWork<Provider>) -> Result<(), DomainError> {
        let provider = &unit.aggregate;
        let mut tx = self.pool.begin().await.map_err(infrastructure)?;

        sqlx::query(
            r"
            INSERT INTO providers (id, version, full_title, short_title, email, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            ",
        )
        .bind(provider.id)
        .bind(provider.version)
        .bind(&provider.full_title)
        .bind(&provider.short_title)
        .bind(&provider.email)
        .bind(provider.updated_at)
        .execute(&mut *tx)
        .await
        .map_err(infrastructure)?;
        contacts::apply(
            &mut tx,
            ContactOwner::Provider,
            provider.id,
            &provider.contacts,
            &unit.writes,
        )
        .await?;

        tx.commit().await.map_err(infrastructure)?;
        debug!(provider_id = %provider.id, writes = unit.writes.len(), "provider inserted");
        Ok(())
    }

    async fn commit(&self, unit: &UnitOfWork<Provider>) -> Result<(), DomainError> {
        let provider = &unit.aggregate;
        let mut tx = self.pool.begin().await.map_err(infrastructure)?;

        let result = sqlx::query(
            r"
            UPDATE providers
            SET version = $3, full_title = $4, short_title = $5, email = $6, updated_at = $7
            WHERE id = $1 AND version = $2
            ",
        )
        .bind(provider.id)
        .bind(unit.expected_version)
        .bind(provider.version)
        .bind(&provider.full_title)
        .bind(&provider.short_title)
        .bind(&provider.email)
        .bind(provider.updated_at)
        .execute(&mut *tx)
        .await
        .map_err(infrastructure)?;
        ensure_version(
            &mut tx,
            PROVIDERS,
            result.rows_affected(),
            provider.id,
            unit.expected_version,
        )
        .await?;
        contacts::apply(
            &mut tx,
            ContactOwner::Provider,
            provider.id,
            &provider.contacts,
            &unit.writes,
        )
        .await?;

        tx.commit().await.map_err(infrastructure)?;
        debug!(provider_id = %provider.id, version = provider.version, "provider committed");
        Ok(())
    }
}

#[derive(Debug, FromRow)]
struct WorkshopRow {
    id: Uuid,
    version: i64,
    provider_id: Uuid,
    title: String,
    description: String,
    updated_at: Option<DateTime<Utc>>,
}

/// PostgreSQL-backed workshop store.
#[derive(Debug, Clone)]
pub struct PgWorkshopStore {
    pool: PgPool,
}

impl PgWorkshopStore {
    /// Creates a new `PgWorkshopStore`.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AggregateStore<Workshop> for PgWorkshopStore {
    async fn load_with_children(&self, aggregate_id: Uuid) -> Result<Option<Workshop>, DomainError> {
        let mut conn = self.pool.acquire().await.map_err(infrastructure)?;
        let row: Option<WorkshopRow> = sqlx::query_as(
            "SELECT id, version, provider_id, title, description, updated_at FROM workshops WHERE id = $1",
        )
        .bind(aggregate_id)
        .fetch_optional(&mut *conn)
        .await
        .map_err(infrastructure)?;
        let Some(row) = row else {
            return Ok(None);
        };

        let contacts = contacts::load(&mut conn, ContactOwner::Workshop, row.id).await?;
        Ok(Some(Workshop {
            id: row.id,
            version: row.version,
            provider_id: row.provider_id,
            title: row.title,
            description: row.description,
            updated_at: row.updated_at,
            contacts,
        }))
    }

    async fn insert(&self, unit: &UnitOfWork<Workshop>) -> Result<(), DomainError> {
        let workshop = &unit.aggregate;
        let mut tx = self.pool.begin().await.map_err(infrastructure)?;

        sqlx::query(
            r"
            INSERT INTO workshops (id, version, provider_id, title, description, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            ",
        )
        .bind(workshop.id)
        .bind(workshop.version)
        .bind(workshop.provider_id)
        .bind(&workshop.title)
        .bind(&workshop.description)
        .bind(workshop.updated_at)
        .execute(&mut *tx)
        .await
        .map_err(infrastructure)?;
        contacts::apply(
            &mut tx,
            ContactOwner::Workshop,
            workshop.id,
            &workshop.contacts,
            &unit.writes,
        )
        .await?;

        tx.commit().await.map_err(infrastructure)?;
        debug!(workshop_id = %workshop.id, writes = unit.writes.len(), "workshop inserted");
        Ok(())
    }

    async fn commit(&self, unit: &UnitOfWork<Workshop>) -> Result<(), DomainError> {
        let workshop = &unit.aggregate;
        let mut tx = self.pool.begin().await.map_err(infrastructure)?;

        let result = sqlx::query(
            r"
            UPDATE workshops
            SET version = $3, title = $4, description = $5, updated_at = $6
            WHERE id = $1 AND version = $2
            ",
        )
        .bind(workshop.id)
        .bind(unit.expected_version)
        .bind(workshop.version)
        .bind(&workshop.title)
        .bind(&workshop.description)
        .bind(workshop.updated_at)
        .execute(&mut *tx)
        .await
        .map_err(infrastructure)?;
        ensure_version(
            &mut tx,
            WORKSHOPS,
            result.rows_affected(),
            workshop.id,
            unit.expected_version,
        )
        .await?;
        contacts::apply(
            &mut tx,
            ContactOwner::Workshop,
            workshop.id,
            &workshop.contacts,
            &unit.writes,
        )
        .await?;

        tx.commit().await.map_err(infrastructure)?;
        debug!(workshop_id = %workshop.id, version = workshop.version, "workshop committed");
        Ok(())
    }
}

#[derive(Debug, FromRow)]
struct PositionRow {
    id: Uuid,
    version: i64,
    provider_id: Uuid,
    full_title: String,
    department: Option<String>,
    updated_at: Option<DateTime<Utc>>,
}

/// PostgreSQL-backed position store.
#[derive(Debug, Clone)]
pub struct PgPositionStore {
    pool: PgPool,
}

impl PgPositionStore {
    /// Creates a new `PgPositionStore`.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AggregateStore<Position> for PgPositionStore {
    async fn load_with_children(&self, aggregate_id: Uuid) -> Result<Option<Position>, DomainError> {
        let mut conn = self.pool.acquire().await.map_err(infrastructure)?;
        let row: Option<PositionRow> = sqlx::query_as(
            "SELECT id, version, provider_id, full_title, department, updated_at FROM positions WHERE id = $1",
        )
        .bind(aggregate_id)
        .fetch_optional(&mut *conn)
        .await
        .map_err(infrastructure)?;
        let Some(row) = row else {
            return Ok(None);
        };

        let contacts = contacts::load(&mut conn, ContactOwner::Position, row.id).await?;
        Ok(Some(Position {
            id: row.id,
            version: row.version,
            provider_id: row.provider_id,
            full_title: row.full_title,
            department: row.department,
            updated_at: row.updated_at,
            contacts,
        }))
    }

    async fn insert(&self, unit: &UnitOfWork<Position>) -> Result<(), DomainError> {
        let position = &unit.aggregate;
        let mut tx = self.pool.begin().await.map_err(infrastructure)?;

        sqlx::query(
            r"
            INSERT INTO positions (id, version, provider_id, full_title, department, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            ",
        )
        .bind(position.id)
        .bind(position.version)
        .bind(position.provider_id)
        .bind(&position.full_title)
        .bind(&position.department)
        .bind(position.updated_at)
        .execute(&mut *tx)
        .await
        .map_err(infrastructure)?;
        contacts::apply(
            &mut tx,
            ContactOwner::Position,
            position.id,
            &position.contacts,
            &unit.writes,
        )
        .await?;

        tx.commit().await.map_err(infrastructure)?;
        debug!(position_id = %position.id, writes = unit.writes.len(), "position inserted");
        Ok(())
    }

    async fn commit(&self, unit: &UnitOfWork<Position>) -> Result<(), DomainError> {
        let position = &unit.aggregate;
        let mut tx = self.pool.begin().await.map_err(infrastructure)?;

        let result = sqlx::query(
            r"
            UPDATE positions
            SET version = $3, full_title = $4, department = $5, updated_at = $6
            WHERE id = $1 AND version = $2
            ",
        )
        .bind(position.id)
        .bind(unit.expected_version)
        .bind(position.version)
        .bind(&position.full_title)
        .bind(&position.department)
        .bind(position.updated_at)
        .execute(&mut *tx)
        .await
        .map_err(infrastructure)?;
        ensure_version(
            &mut tx,
            POSITIONS,
            result.rows_affected(),
            position.id,
            unit.expected_version,
        )
        .await?;
        contacts::apply(
            &mut tx,
            ContactOwner::Position,
            position.id,
            &position.contacts,
            &unit.writes,
        )
        .await?;

        tx.commit().await.map_err(infrastructure)?;
        debug!(position_id = %position.id, version = position.version, "position committed");
        Ok(())
    }
}
