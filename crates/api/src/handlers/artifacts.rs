//! Handlers for the `/artifacts` resource.

use axum::extract::{Path, State};
use axum::response::IntoResponse;
use axum::Json;
use uuid::Uuid;
use vigraph_core::error::CoreError;
use vigraph_db::repositories::ArtifactRepo;

use crate::error::{AppError, AppResult};
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/artifacts/{id}
pub async fn get_artifact(
    State(state): State<AppState>,
    Path(artifact_id): Path<Uuid>,
) -> AppResult<impl IntoResponse> {
    let artifact = ArtifactRepo::find_by_id(&state.pool, artifact_id)
        .await?
        .ok_or_else(|| AppError::Core(CoreError::not_found("Artifact", artifact_id)))?;
    Ok(Json(DataResponse { data: artifact }))
}
