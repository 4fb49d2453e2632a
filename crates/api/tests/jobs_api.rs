//! HTTP-level integration tests for the jobs API.
//!
//! Uses Axum's tower::ServiceExt to send requests directly to the router
//! without an actual TCP listener; broker traffic is captured by the
//! in-memory publisher from `common`.

mod common;

use axum::http::StatusCode;
use common::{body_json, get, post_json};
use sqlx::PgPool;
use vigraph_db::repositories::UserRepo;

async fn create_test_user(pool: &PgPool) -> i64 {
    UserRepo::create(pool, "jobtester")
        .await
        .expect("user creation should succeed")
        .id
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn submit_graph_job_returns_201_and_dispatches_transcription(pool: PgPool) {
    let user_id = create_test_user(&pool).await;
    let (app, publisher) = common::build_test_app(pool.clone());

    let body = serde_json::json!({
        "type": "graph",
        "video_id": "vid-1",
        "user_id": user_id,
        "action_models": [
            "transcription.local-whisper",
            "entity-relation.gemini-2.0",
            "graph.force-directed",
        ],
    });
    let response = post_json(app, "/api/v1/jobs", body).await;

    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    assert_eq!(json["data"]["status"], "created");
    assert_eq!(json["data"]["type"], "graph");

    // The transcription request is already on the broker.
    let sent = publisher.sent();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].0, "transcription.local-whisper");
    assert_eq!(sent[0].1["job_id"], json["data"]["id"]);
    assert_eq!(sent[0].1["video_id"], "vid-1");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn submit_without_required_capability_returns_400_and_persists_nothing(pool: PgPool) {
    let user_id = create_test_user(&pool).await;
    let (app, publisher) = common::build_test_app(pool.clone());

    // A summary job with no summary.* capability.
    let body = serde_json::json!({
        "type": "summary",
        "video_id": "vid-2",
        "user_id": user_id,
        "action_models": ["transcription.local-whisper"],
    });
    let response = post_json(app, "/api/v1/jobs", body).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["code"], "VALIDATION_ERROR");

    // Validation runs before the insert: no orphan row, no message.
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM jobs")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(count, 0);
    assert!(publisher.sent().is_empty());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn get_unknown_job_returns_404(pool: PgPool) {
    let (app, _publisher) = common::build_test_app(pool);

    let response = get(
        app,
        "/api/v1/jobs/00000000-0000-0000-0000-000000000000",
    )
    .await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let json = body_json(response).await;
    assert_eq!(json["code"], "NOT_FOUND");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn fresh_job_has_empty_artifact_list(pool: PgPool) {
    let user_id = create_test_user(&pool).await;
    let (app, _publisher) = common::build_test_app(pool.clone());

    let body = serde_json::json!({
        "type": "transcription",
        "video_id": "vid-3",
        "user_id": user_id,
        "action_models": ["transcription.local-whisper"],
    });
    let response = post_json(app.clone(), "/api/v1/jobs", body).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let job_id = body_json(response).await["data"]["id"]
        .as_str()
        .unwrap()
        .to_string();

    let response = get(app, &format!("/api/v1/jobs/{job_id}/artifacts")).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"], serde_json::json!([]));
}
