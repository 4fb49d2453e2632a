//! Handlers for the `/jobs` resource.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use vigraph_core::error::CoreError;
use vigraph_core::types::JobId;
use vigraph_db::models::job::{CreateJob, Job};
use vigraph_db::repositories::{ArtifactRepo, JobRepo};

use crate::error::{AppError, AppResult};
use crate::response::DataResponse;
use crate::state::AppState;

/// Fetch a job by ID or produce a 404.
async fn find_job(pool: &sqlx::PgPool, job_id: JobId) -> AppResult<Job> {
    JobRepo::find_by_id(pool, job_id)
        .await?
        .ok_or_else(|| AppError::Core(CoreError::not_found("Job", job_id)))
}

/// POST /api/v1/jobs
///
/// Submit a new pipeline job. The capability list is validated against the
/// job type before anything is persisted, so a rejected request leaves no
/// job row behind. Returns 201 with the created job; its transcription
/// request is already on the broker by the time the response is sent.
pub async fn submit_job(
    State(state): State<AppState>,
    Json(input): Json<CreateJob>,
) -> AppResult<impl IntoResponse> {
    let job =
        vigraph_pipeline::submit::submit_job(&state.pool, state.publisher.as_ref(), &input)
            .await?;

    tracing::info!(
        job_id = %job.id,
        job_type = %job.job_type,
        user_id = job.user_id,
        "Job submitted",
    );

    Ok((StatusCode::CREATED, Json(DataResponse { data: job })))
}

/// GET /api/v1/jobs/{id}
pub async fn get_job(
    State(state): State<AppState>,
    Path(job_id): Path<JobId>,
) -> AppResult<impl IntoResponse> {
    let job = find_job(&state.pool, job_id).await?;
    Ok(Json(DataResponse { data: job }))
}

/// GET /api/v1/jobs/{id}/artifacts
///
/// List the stage artifacts persisted for a job so far, in insertion
/// order. 404 when the job itself does not exist; an existing job with no
/// artifacts yet returns an empty list.
pub async fn list_job_artifacts(
    State(state): State<AppState>,
    Path(job_id): Path<JobId>,
) -> AppResult<impl IntoResponse> {
    find_job(&state.pool, job_id).await?;
    let artifacts = ArtifactRepo::list_by_job(&state.pool, job_id).await?;
    Ok(Json(DataResponse { data: artifacts }))
}
