//! Integration tests for the Postgres aggregate stores.
//!
//! These need a running database (`DATABASE_URL`) and are ignored by
//! default: `cargo test -p outofschool-store -- --ignored`.

use chrono::{TimeZone, Utc};
use outofschool_competitions::domain::aggregates::{CompetitiveEvent, CompetitiveEventChanges};
use outofschool_competitions::domain::judges::{DescriptionItem, Judge};
use outofschool_core::error::{ConflictReason, DomainError};
use outofschool_core::repository::{AggregateStore, ChildWrite, UnitOfWork};
use outofschool_providers::domain::aggregates::{Provider, ProviderChanges};
use outofschool_providers::domain::contacts::{Address, Contact, Phone};
use outofschool_reconcile::reconciler::AggregateReconciler;
use outofschool_store::competitions::PgCompetitiveEventStore;
use outofschool_store::providers::PgProviderStore;
use outofschool_store::study_subjects::PgStudySubjectStore;
use outofschool_study_subjects::domain::aggregates::{StudySubject, StudySubjectChanges};
use outofschool_study_subjects::domain::languages::SubjectLanguage;
use outofschool_test_support::{FixedClock, SequenceIdGenerator};
use sqlx::PgPool;
use uuid::Uuid;

fn clock() -> FixedClock {
    FixedClock(Utc.with_ymd_and_hms(2026, 1, 15, 10, 0, 0).unwrap())
}

fn contact(title: &str) -> Contact {
    Contact::new(
        title,
        Some(Address {
            city: "Kyiv".to_owned(),
            street: "Khreshchatyk".to_owned(),
            building_number: "22".to_owned(),
        }),
        vec![Phone {
            number: "+380441234567".to_owned(),
            label: Some("reception".to_owned()),
        }],
    )
}

fn provider_changes(contacts: Vec<Contact>) -> ProviderChanges {
    ProviderChanges {
        full_title: "Sunrise Academy LLC".to_owned(),
        short_title: "Sunrise".to_owned(),
        email: "hello@sunrise.example".to_owned(),
        contacts,
    }
}

async fn create_provider(store: &PgProviderStore, contacts: Vec<Contact>) -> Provider {
    let ids = SequenceIdGenerator::starting_at(1);
    AggregateReconciler::<Provider>::new(store, &clock(), &ids)
        .create(Provider::new(Uuid::new_v4()), provider_changes(contacts))
        .await
        .unwrap()
}

// --- providers ---

#[sqlx::test(migrations = "../../migrations")]
#[ignore = "requires DATABASE_URL"]
async fn test_insert_and_load_provider_with_contacts(pool: PgPool) {
    let store = PgProviderStore::new(pool);

    let created = create_provider(&store, vec![contact("Office"), contact("Branch")]).await;

    let loaded = store.load_with_children(created.id).await.unwrap().unwrap();
    assert_eq!(loaded, created);
    assert_eq!(loaded.version, 1);
    assert!(loaded.contacts[0].is_default);
    assert_eq!(loaded.contacts[1].title, "Branch");
}

#[sqlx::test(migrations = "../../migrations")]
#[ignore = "requires DATABASE_URL"]
async fn test_load_missing_provider_returns_none(pool: PgPool) {
    let store = PgProviderStore::new(pool);

    let loaded = store.load_with_children(Uuid::new_v4()).await.unwrap();

    assert!(loaded.is_none());
}

#[sqlx::test(migrations = "../../migrations")]
#[ignore = "requires DATABASE_URL"]
async fn test_reconcile_provider_replaces_contacts(pool: PgPool) {
    // Arrange
    let store = PgProviderStore::new(pool);
    let created = create_provider(&store, vec![contact("Overlap"), contact("OldStuff")]).await;
    let ids = SequenceIdGenerator::starting_at(100);

    // Act
    let updated = AggregateReconciler::<Provider>::new(&store, &clock(), &ids)
        .reconcile_existing(
            created.id,
            Some(1),
            provider_changes(vec![contact("NewDto"), contact("Overlap")]),
        )
        .await
        .unwrap();

    // Assert
    let loaded = store.load_with_children(created.id).await.unwrap().unwrap();
    assert_eq!(loaded, updated);
    assert_eq!(loaded.version, 2);
    let titles: Vec<&str> = loaded.contacts.iter().map(|c| c.title.as_str()).collect();
    assert_eq!(titles, vec!["NewDto", "Overlap"]);
    assert_eq!(loaded.contacts[1].id, created.contacts[0].id);
}

#[sqlx::test(migrations = "../../migrations")]
#[ignore = "requires DATABASE_URL"]
async fn test_commit_with_stale_version_is_rejected(pool: PgPool) {
    let store = PgProviderStore::new(pool);
    let created = create_provider(&store, vec![contact("Office")]).await;
    let mut stale = created.clone();
    stale.version = 3;

    let result = store
        .commit(&UnitOfWork {
            aggregate: stale,
            expected_version: 2,
            writes: Vec::new(),
        })
        .await;

    match result.unwrap_err() {
        DomainError::ConcurrencyConflict { reason, .. } => assert_eq!(
            reason,
            ConflictReason::StaleVersion {
                expected: 2,
                actual: 1
            }
        ),
        other => panic!("expected ConcurrencyConflict, got {other:?}"),
    }
}

#[sqlx::test(migrations = "../../migrations")]
#[ignore = "requires DATABASE_URL"]
async fn test_commit_after_delete_is_vanished_conflict(pool: PgPool) {
    let store = PgProviderStore::new(pool.clone());
    let created = create_provider(&store, vec![contact("Office")]).await;
    sqlx::query("DELETE FROM providers WHERE id = $1")
        .bind(created.id)
        .execute(&pool)
        .await
        .unwrap();
    let mut next = created.clone();
    next.version = 2;

    let result = store
        .commit(&UnitOfWork {
            aggregate: next,
            expected_version: 1,
            writes: Vec::new(),
        })
        .await;

    match result.unwrap_err() {
        DomainError::ConcurrencyConflict { reason, .. } => {
            assert_eq!(reason, ConflictReason::Vanished);
        }
        other => panic!("expected ConcurrencyConflict, got {other:?}"),
    }
}

#[sqlx::test(migrations = "../../migrations")]
#[ignore = "requires DATABASE_URL"]
async fn test_failed_child_write_rolls_back_root_update(pool: PgPool) {
    // Arrange: the second create reuses the first contact's id, which the
    // primary key rejects after the root row has already been updated.
    let store = PgProviderStore::new(pool);
    let created = create_provider(&store, vec![contact("Office")]).await;
    let taken = created.contacts[0].id;
    let mut next = created.clone();
    next.version = 2;
    next.short_title = "Renamed".to_owned();
    let mut clash = contact("Clash");
    clash.id = taken;
    clash.owner_id = Some(created.id);
    next.contacts.push(clash.clone());

    // Act
    let result = store
        .commit(&UnitOfWork {
            aggregate: next,
            expected_version: 1,
            writes: vec![ChildWrite::Create(clash)],
        })
        .await;

    // Assert
    assert!(matches!(result, Err(DomainError::Infrastructure(_))));
    let loaded = store.load_with_children(created.id).await.unwrap().unwrap();
    assert_eq!(loaded, created);
}

// --- competitive events ---

#[sqlx::test(migrations = "../../migrations")]
#[ignore = "requires DATABASE_URL"]
async fn test_reconcile_competitive_event_by_judge_id(pool: PgPool) {
    // Arrange
    let store = PgCompetitiveEventStore::new(pool);
    let clock = clock();
    let ids = SequenceIdGenerator::starting_at(1);
    let reconciler = AggregateReconciler::<CompetitiveEvent>::new(&store, &clock, &ids);
    let changes = |judges: Vec<Judge>| CompetitiveEventChanges {
        title: "Spring Chess Open".to_owned(),
        description: String::new(),
        scheduled_at: None,
        judges,
        description_items: vec![DescriptionItem::new("Rules", "Swiss system")],
    };
    let created = reconciler
        .create(
            CompetitiveEvent::new(Uuid::new_v4()),
            changes(vec![Judge::new("A", "Judge"), Judge::new("B", "Judge")]),
        )
        .await
        .unwrap();
    let mut kept = created.judges[0].clone();
    kept.is_chief = true;
    let mut items = created.description_items.clone();
    items[0].description = "Round robin".to_owned();

    // Act
    let mut desired = changes(vec![kept, Judge::new("C", "Judge")]);
    desired.description_items = items;
    reconciler
        .reconcile_existing(created.id, None, desired)
        .await
        .unwrap();

    // Assert
    let loaded = store.load_with_children(created.id).await.unwrap().unwrap();
    let names: Vec<&str> = loaded.judges.iter().map(|j| j.first_name.as_str()).collect();
    assert_eq!(names, vec!["A", "C"]);
    assert_eq!(loaded.judges[0].id, created.judges[0].id);
    assert!(loaded.judges[0].is_chief);
    assert_eq!(loaded.description_items[0].description, "Round robin");
    assert_eq!(loaded.version, 2);
}

#[sqlx::test(migrations = "../../migrations")]
#[ignore = "requires DATABASE_URL"]
async fn test_judge_id_of_another_event_is_rejected_as_validation(pool: PgPool) {
    // Arrange
    let store = PgCompetitiveEventStore::new(pool);
    let clock = clock();
    let ids = SequenceIdGenerator::starting_at(1);
    let reconciler = AggregateReconciler::<CompetitiveEvent>::new(&store, &clock, &ids);
    let changes = |judges: Vec<Judge>| CompetitiveEventChanges {
        title: "Spring Chess Open".to_owned(),
        description: String::new(),
        scheduled_at: None,
        judges,
        description_items: Vec::new(),
    };
    let first = reconciler
        .create(
            CompetitiveEvent::new(Uuid::new_v4()),
            changes(vec![Judge::new("A", "Judge")]),
        )
        .await
        .unwrap();
    let second = reconciler
        .create(
            CompetitiveEvent::new(Uuid::new_v4()),
            changes(vec![Judge::new("B", "Judge")]),
        )
        .await
        .unwrap();
    let borrowed = first.judges[0].clone();

    // Act
    let result = reconciler
        .reconcile_existing(second.id, Some(1), changes(vec![borrowed]))
        .await;

    // Assert
    match result.unwrap_err() {
        DomainError::Validation(msg) => assert!(msg.contains("judge id")),
        other => panic!("expected Validation, got {other:?}"),
    }
    let loaded = store.load_with_children(second.id).await.unwrap().unwrap();
    assert_eq!(loaded, second);
    let untouched = store.load_with_children(first.id).await.unwrap().unwrap();
    assert_eq!(untouched, first);
}

// --- study subjects ---

#[sqlx::test(migrations = "../../migrations")]
#[ignore = "requires DATABASE_URL"]
async fn test_reconcile_study_subject_moves_primary(pool: PgPool) {
    let store = PgStudySubjectStore::new(pool);
    let clock = clock();
    let ids = SequenceIdGenerator::starting_at(1);
    let reconciler = AggregateReconciler::<StudySubject>::new(&store, &clock, &ids);
    let ukrainian = Uuid::new_v4();
    let english = Uuid::new_v4();
    let created = reconciler
        .create(
            StudySubject::new(Uuid::new_v4()),
            StudySubjectChanges {
                title: "Mathematics".to_owned(),
                languages: vec![
                    SubjectLanguage::new(ukrainian, true),
                    SubjectLanguage::new(english, false),
                ],
            },
        )
        .await
        .unwrap();

    reconciler
        .reconcile_existing(
            created.id,
            Some(1),
            StudySubjectChanges {
                title: "Mathematics".to_owned(),
                languages: vec![SubjectLanguage::new(english, true)],
            },
        )
        .await
        .unwrap();

    let loaded = store.load_with_children(created.id).await.unwrap().unwrap();
    assert_eq!(loaded.languages.len(), 1);
    assert_eq!(loaded.primary_language(), Some(english));
}
