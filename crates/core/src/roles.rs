//! User role constants.
//!
//! Roles are plain strings in the `users.role` column. There are exactly
//! two; anything else is rejected at the API boundary.

/// Default role for newly registered users.
pub const ROLE_USER: &str = "user";

/// Administrative role. Grants the role-update endpoint and nothing else.
pub const ROLE_ADMIN: &str = "admin";

/// Whether `role` is one of the known role strings.
pub fn is_valid_role(role: &str) -> bool {
    role == ROLE_USER || role == ROLE_ADMIN
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_roles_are_valid() {
        assert!(is_valid_role(ROLE_USER));
        assert!(is_valid_role(ROLE_ADMIN));
        assert!(!is_valid_role("superuser"));
        assert!(!is_valid_role(""));
    }
}
