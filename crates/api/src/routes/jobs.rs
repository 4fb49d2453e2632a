//! Route definitions for the `/jobs` resource.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::jobs;
use crate::state::AppState;

/// Routes mounted at `/jobs`.
///
/// ```text
/// POST   /                  -> submit_job
/// GET    /{id}              -> get_job
/// GET    /{id}/artifacts    -> list_job_artifacts
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(jobs::submit_job))
        .route("/{id}", get(jobs::get_job))
        .route("/{id}/artifacts", get(jobs::list_job_artifacts))
}
