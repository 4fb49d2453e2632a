//! Route definitions for the `/models` resource.

use axum::routing::get;
use axum::Router;

use crate::handlers::models;
use crate::state::AppState;

/// Routes mounted at `/models`.
///
/// ```text
/// GET    /available    -> list_available
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route("/available", get(models::list_available))
}
