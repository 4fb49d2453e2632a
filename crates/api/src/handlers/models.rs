//! Handlers for the `/models` resource.

use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;
use vigraph_db::repositories::RegistryRepo;

use crate::error::AppResult;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/models/available
///
/// List capabilities whose last heartbeat falls within the configured
/// freshness threshold. The listing is advisory: routing at submission
/// time trusts the request's capability list, not this table.
pub async fn list_available(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let models = RegistryRepo::list_available(
        &state.pool,
        state.config.model_availability_threshold_secs,
    )
    .await?;
    Ok(Json(DataResponse { data: models }))
}
