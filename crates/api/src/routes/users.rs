//! Route definitions for the `/users` resource.

use axum::routing::{get, put};
use axum::Router;

use crate::handlers::users;
use crate::state::AppState;

/// Routes mounted at `/users`.
///
/// ```text
/// GET    /                  -> list_users
/// POST   /                  -> create_user
/// GET    /{id}              -> get_user
/// GET    /by-name/{name}    -> get_user_by_name
/// GET    /{id}/jobs         -> list_user_jobs
/// PUT    /{id}/role         -> update_user_role
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(users::list_users).post(users::create_user))
        .route("/{id}", get(users::get_user))
        .route("/by-name/{name}", get(users::get_user_by_name))
        .route("/{id}/jobs", get(users::list_user_jobs))
        .route("/{id}/role", put(users::update_user_role))
}
