//! Handlers for the `/users` resource.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use vigraph_core::error::CoreError;
use vigraph_core::roles::is_valid_role;
use vigraph_core::types::DbId;
use vigraph_db::models::user::{CreateUser, UpdateUserRole};
use vigraph_db::repositories::{JobRepo, UserRepo};

use crate::error::{AppError, AppResult};
use crate::response::DataResponse;
use crate::state::AppState;

/// POST /api/v1/users
///
/// Register a new user with the default role. A duplicate username maps
/// to 409 via the unique-constraint classification.
pub async fn create_user(
    State(state): State<AppState>,
    Json(input): Json<CreateUser>,
) -> AppResult<impl IntoResponse> {
    let username = input.username.trim();
    if username.is_empty() {
        return Err(AppError::Core(CoreError::Validation(
            "Username must not be empty".into(),
        )));
    }

    let user = UserRepo::create(&state.pool, username).await?;
    tracing::info!(user_id = user.id, username = %user.username, "User registered");
    Ok((StatusCode::CREATED, Json(DataResponse { data: user })))
}

/// GET /api/v1/users
pub async fn list_users(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let users = UserRepo::list(&state.pool).await?;
    Ok(Json(DataResponse { data: users }))
}

/// GET /api/v1/users/{id}
pub async fn get_user(
    State(state): State<AppState>,
    Path(user_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let user = UserRepo::find_by_id(&state.pool, user_id)
        .await?
        .ok_or_else(|| AppError::Core(CoreError::not_found("User", user_id)))?;
    Ok(Json(DataResponse { data: user }))
}

/// GET /api/v1/users/by-name/{name}
pub async fn get_user_by_name(
    State(state): State<AppState>,
    Path(username): Path<String>,
) -> AppResult<impl IntoResponse> {
    let user = UserRepo::find_by_username(&state.pool, &username)
        .await?
        .ok_or_else(|| AppError::Core(CoreError::not_found("User", username)))?;
    Ok(Json(DataResponse { data: user }))
}

/// GET /api/v1/users/{id}/jobs
///
/// List the user's jobs, newest first. 404 when the user does not exist.
pub async fn list_user_jobs(
    State(state): State<AppState>,
    Path(user_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    UserRepo::find_by_id(&state.pool, user_id)
        .await?
        .ok_or_else(|| AppError::Core(CoreError::not_found("User", user_id)))?;

    let jobs = JobRepo::list_by_user(&state.pool, user_id).await?;
    Ok(Json(DataResponse { data: jobs }))
}

/// PUT /api/v1/users/{id}/role
///
/// Set a user's role. Unknown role values are rejected before touching
/// the database.
pub async fn update_user_role(
    State(state): State<AppState>,
    Path(user_id): Path<DbId>,
    Json(input): Json<UpdateUserRole>,
) -> AppResult<impl IntoResponse> {
    if !is_valid_role(&input.role) {
        return Err(AppError::Core(CoreError::Validation(format!(
            "Unknown role '{}'",
            input.role
        ))));
    }

    let user = UserRepo::update_role(&state.pool, user_id, &input.role)
        .await?
        .ok_or_else(|| AppError::Core(CoreError::not_found("User", user_id)))?;

    tracing::info!(user_id = user.id, role = %user.role, "User role updated");
    Ok(Json(DataResponse { data: user }))
}
