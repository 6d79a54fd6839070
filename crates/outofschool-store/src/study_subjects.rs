//! `PostgreSQL` store for study subjects and their languages.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use outofschool_core::error::DomainError;
use outofschool_core::repository::{AggregateStore, ChildWrite, UnitOfWork};
use outofschool_study_subjects::domain::aggregates::StudySubject;
use outofschool_study_subjects::domain::languages::SubjectLanguage;
use sqlx::{FromRow, PgConnection, PgPool};
use tracing::debug;
use uuid::Uuid;

use crate::schema::STUDY_SUBJECTS;
use crate::support::{ensure_version, infrastructure, persisted_id, sort_order};

#[derive(Debug, FromRow)]
struct StudySubjectRow {
    id: Uuid,
    version: i64,
    title: String,
    updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, FromRow)]
struct SubjectLanguageRow {
    study_subject_id: Uuid,
    language_id: Uuid,
    is_primary: bool,
}

/// PostgreSQL-backed study subject store.
#[derive(Debug, Clone)]
pub struct PgStudySubjectStore {
    pool: PgPool,
}

impl PgStudySubjectStore {
    /// Creates a new `PgStudySubjectStore`.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

async fn apply_writes(
    conn: &mut PgConnection,
    subject: &StudySubject,
    writes: &[ChildWrite<SubjectLanguage>],
) -> Result<(), DomainError> {
    for write in writes {
        let language = write.child();
        let language_id = persisted_id(language)?;
        let query = match write {
            ChildWrite::Delete(_) => sqlx::query(
                "DELETE FROM study_subject_languages WHERE study_subject_id = $1 AND language_id = $2",
            )
            .bind(subject.id)
            .bind(language_id),
            ChildWrite::Update(_) => sqlx::query(
                r"
                UPDATE study_subject_languages
                SET sort_order = $3, is_primary = $4
                WHERE study_subject_id = $1 AND language_id = $2
                ",
            )
            .bind(subject.id)
            .bind(language_id)
            .bind(sort_order(&subject.languages, language_id)?)
            .bind(language.is_primary),
            ChildWrite::Create(_) => sqlx::query(
                r"
                INSERT INTO study_subject_languages
                    (study_subject_id, language_id, sort_order, is_primary)
                VALUES ($1, $2, $3, $4)
                ",
            )
            .bind(subject.id)
            .bind(language_id)
            .bind(sort_order(&subject.languages, language_id)?)
            .bind(language.is_primary),
        };
        query.execute(&mut *conn).await.map_err(infrastructure)?;
    }
    Ok(())
}

#[async_trait]
impl AggregateStore<StudySubject> for PgStudySubjectStore {
    async fn load_with_children(
        &self,
        aggregate_id: Uuid,
    ) -> Result<Option<StudySubject>, DomainError> {
        let mut conn = self.pool.acquire().await.map_err(infrastructure)?;
        let row: Option<StudySubjectRow> = sqlx::query_as(
            "SELECT id, version, title, updated_at FROM study_subjects WHERE id = $1",
        )
        .bind(aggregate_id)
        .fetch_optional(&mut *conn)
        .await
        .map_err(infrastructure)?;
        let Some(row) = row else {
            return Ok(None);
        };

        let languages: Vec<SubjectLanguageRow> = sqlx::query_as(
            r"
            SELECT study_subject_id, language_id, is_primary
            FROM study_subject_languages
            WHERE study_subject_id = $1
            ORDER BY sort_order, language_id
            ",
        )
        .bind(row.id)
        .fetch_all(&mut *conn)
        .await
        .map_err(infrastructure)?;

        Ok(Some(StudySubject {
            id: row.id,
            version: row.version,
            title: row.title,
            updated_at: row.updated_at,
            languages: languages
                .into_iter()
                .map(|language| SubjectLanguage {
                    language_id: Some(language.language_id),
                    study_subject_id: Some(language.study_subject_id),
                    is_primary: language.is_primary,
                })
                .collect(),
        }))
    }

    async fn insert(&self, unit: &UnitOfWork<StudySubject>) -> Result<(), DomainError> {
        let subject = &unit.aggregate;
        let mut tx = self.pool.begin().await.map_err(infrastructure)?;

        sqlx::query(
            "INSERT INTO study_subjects (id, version, title, updated_at) VALUES ($1, $2, $3, $4)",
        )
        .bind(subject.id)
        .bind(subject.version)
        .bind(&subject.title)
        .bind(subject.updated_at)
        .execute(&mut *tx)
        .await
        .map_err(infrastructure)?;
        apply_writes(&mut tx, subject, &unit.writes).await?;

        tx.commit().await.map_err(infrastructure)?;
        debug!(study_subject_id = %subject.id, writes = unit.writes.len(), "study subject inserted");
        Ok(())
    }

    async fn commit(&self, unit: &UnitOfWork<StudySubject>) -> Result<(), DomainError> {
        let subject = &unit.aggregate;
        let mut tx = self.pool.begin().await.map_err(infrastructure)?;

        let result = sqlx::query(
            r"
            UPDATE study_subjects
            SET version = $3, title = $4, updated_at = $5
            WHERE id = $1 AND version = $2
            ",
        )
        .bind(subject.id)
        .bind(unit.expected_version)
        .bind(subject.version)
        .bind(&subject.title)
        .bind(subject.updated_at)
        .execute(&mut *tx)
        .await
        .map_err(infrastructure)?;
        ensure_version(
            &mut tx,
            STUDY_SUBJECTS,
            result.rows_affected(),
            subject.id,
            unit.expected_version,
        )
        .await?;
        apply_writes(&mut tx, subject, &unit.writes).await?;

        tx.commit().await.map_err(infrastructure)?;
        debug!(study_subject_id = %subject.id, version = subject.version, "study subject committed");
        Ok(())
    }
}
