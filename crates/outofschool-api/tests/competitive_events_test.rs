//! Integration tests for the competitive event and study subject routes.
//!
//! Ignored by default; they need `DATABASE_URL`.

mod common;

use axum::http::StatusCode;
use serde_json::json;
use sqlx::PgPool;
use uuid::Uuid;

#[sqlx::test(migrations = "../../migrations")]
#[ignore = "requires DATABASE_URL"]
async fn test_two_chief_judges_are_rejected_and_nothing_is_stored(pool: PgPool) {
    let (status, json) = common::send_json(
        common::build_test_app(pool.clone()),
        "POST",
        "/api/v1/competitive-events",
        &json!({
            "title": "Spring Chess Open",
            "judges": [
                { "first_name": "Olena", "last_name": "Shevchenko", "is_chief": true },
                { "first_name": "Taras", "last_name": "Bondar", "is_chief": true }
            ]
        }),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["message"], "No more than one chief judge can be specified.");
    let stored: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM judges")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(stored, 0);
}

#[sqlx::test(migrations = "../../migrations")]
#[ignore = "requires DATABASE_URL"]
async fn test_study_subject_round_trip(pool: PgPool) {
    let language_id = Uuid::new_v4();

    let (status, created) = common::send_json(
        common::build_test_app(pool.clone()),
        "POST",
        "/api/v1/study-subjects",
        &json!({
            "title": "Mathematics",
            "languages": [{ "language_id": language_id, "is_primary": true }]
        }),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let subject_id = created["study_subject_id"].as_str().unwrap().to_owned();

    let (status, fetched) = common::get_json(
        common::build_test_app(pool),
        &format!("/api/v1/study-subjects/{subject_id}"),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched["languages"][0]["language_id"], language_id.to_string());
    assert_eq!(fetched["version"], 1);
}
