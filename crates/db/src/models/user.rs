//! User entity model and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use vigraph_core::types::{DbId, Timestamp};

/// A row from the `users` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct User {
    pub id: DbId,
    pub username: String,
    pub role: String,
    pub created_at: Timestamp,
}

/// DTO for registering a new user via `POST /users`.
#[derive(Debug, Deserialize)]
pub struct CreateUser {
    pub username: String,
}

/// DTO for `PUT /users/{id}/role`.
#[derive(Debug, Deserialize)]
pub struct UpdateUserRole {
    pub role: String,
}
