pub mod artifacts;
pub mod health;
pub mod jobs;
pub mod models;
pub mod users;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// ```text
/// /jobs                     submit
/// /jobs/{id}                get
/// /jobs/{id}/artifacts      list stage artifacts
///
/// /artifacts/{id}           get
///
/// /models/available         freshness-filtered capability listing
///
/// /users                    list, register
/// /users/{id}               get
/// /users/by-name/{name}     get
/// /users/{id}/jobs          list the user's jobs
/// /users/{id}/role          update (PUT)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/jobs", jobs::router())
        .nest("/artifacts", artifacts::router())
        .nest("/models", models::router())
        .nest("/users", users::router())
}
