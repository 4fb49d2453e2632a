//! Domain-level error type.
//!
//! [`CoreError`] is transport-agnostic. The api crate maps each variant to
//! an HTTP status in its `AppError` implementation.

/// Errors produced by domain logic (validation, lookups, invariants).
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    /// An entity lookup failed. `entity` names the kind ("Job", "User", ...).
    #[error("{entity} with id {id} not found")]
    NotFound {
        entity: &'static str,
        id: String,
    },

    /// Input failed domain validation (e.g. a missing required capability).
    #[error("Validation error: {0}")]
    Validation(String),

    /// The operation conflicts with current state.
    #[error("Conflict: {0}")]
    Conflict(String),

    /// The caller lacks the required role.
    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// An invariant was violated or an internal operation failed.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl CoreError {
    /// Shorthand for a [`CoreError::NotFound`] with a displayable id.
    pub fn not_found(entity: &'static str, id: impl ToString) -> Self {
        CoreError::NotFound {
            entity,
            id: id.to_string(),
        }
    }
}
