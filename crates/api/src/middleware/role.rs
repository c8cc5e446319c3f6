//! Role gate for admin routes.
//!
//! The role carried by the token is resolved once; tokens without a
//! resolvable role are rejected like any insufficient role.

use axum::response::Response;

use terralot_core::Role;
use terralot_shared::{AppError, Claims};

use crate::routes::app_error;

/// Checks that the authenticated user holds one of the allowed roles.
///
/// # Errors
///
/// Returns a ready-to-send `403 {"error": "Forbidden"}` response when
/// the role is missing or not allowed.
pub fn require_role(claims: &Claims, allowed: &[Role]) -> Result<Role, Response> {
    let resolved = Role::resolve(claims.role.as_deref(), claims.is_staff);
    match resolved {
        Some(role) if role.is_allowed(allowed) => Ok(role),
        _ => Err(app_error(&AppError::Forbidden)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use uuid::Uuid;

    fn claims(role: Option<&str>, is_staff: bool) -> Claims {
        Claims::new(
            Uuid::new_v4(),
            "user@example.com",
            is_staff,
            role,
            Utc::now() + chrono::Duration::hours(1),
        )
    }

    #[test]
    fn explicit_role_passes_gate() {
        assert!(require_role(&claims(Some("sales"), false), &[Role::Admin, Role::Sales]).is_ok());
    }

    #[test]
    fn staff_without_role_acts_as_admin() {
        assert!(require_role(&claims(None, true), &[Role::Admin]).is_ok());
    }

    #[test]
    fn roleless_non_staff_is_forbidden() {
        assert!(require_role(&claims(None, false), &[Role::Admin, Role::Sales]).is_err());
    }

    #[test]
    fn insufficient_role_is_forbidden() {
        assert!(require_role(&claims(Some("viewer"), false), &[Role::Admin]).is_err());
    }
}
