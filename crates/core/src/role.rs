//! Staff roles and role resolution.
//!
//! The user table carries a free-text role column plus a staff flag.
//! Resolution happens once, at user-load (login) time, and the result is
//! embedded in the token; nothing downstream falls back to the flag again.

use serde::{Deserialize, Serialize};

/// Closed set of staff roles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Full administrative access.
    Admin,
    /// Sales staff: CRM and catalog mutations, no destructive actions.
    Sales,
    /// Read-only backoffice access.
    Viewer,
}

impl Role {
    /// Role name as stored and transported.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::Sales => "sales",
            Self::Viewer => "viewer",
        }
    }

    /// Parses a stored role string.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "admin" => Some(Self::Admin),
            "sales" => Some(Self::Sales),
            "viewer" => Some(Self::Viewer),
            _ => None,
        }
    }

    /// Resolves a caller's effective role.
    ///
    /// The explicit role column wins when it parses; otherwise a set staff
    /// flag implies admin; otherwise the caller has no role and any
    /// non-empty gate rejects them.
    #[must_use]
    pub fn resolve(explicit: Option<&str>, is_staff: bool) -> Option<Self> {
        match explicit.and_then(Self::parse) {
            Some(role) => Some(role),
            None if is_staff => Some(Self::Admin),
            None => None,
        }
    }

    /// Whether this role passes a gate with the given allow-list.
    ///
    /// An empty allow-list means any resolved role passes.
    #[must_use]
    pub fn is_allowed(self, allowed: &[Self]) -> bool {
        allowed.is_empty() || allowed.contains(&self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_role_wins_over_staff_flag() {
        assert_eq!(Role::resolve(Some("sales"), true), Some(Role::Sales));
        assert_eq!(Role::resolve(Some("viewer"), true), Some(Role::Viewer));
    }

    #[test]
    fn staff_flag_implies_admin() {
        assert_eq!(Role::resolve(None, true), Some(Role::Admin));
        assert_eq!(Role::resolve(Some("manager"), true), Some(Role::Admin));
    }

    #[test]
    fn no_role_no_staff_resolves_to_none() {
        assert_eq!(Role::resolve(None, false), None);
        assert_eq!(Role::resolve(Some(""), false), None);
        assert_eq!(Role::resolve(Some("manager"), false), None);
    }

    #[test]
    fn parse_trims_and_lowercases() {
        assert_eq!(Role::parse(" Admin "), Some(Role::Admin));
        assert_eq!(Role::parse("SALES"), Some(Role::Sales));
        assert_eq!(Role::parse("root"), None);
    }

    #[test]
    fn empty_allow_list_passes_any_role() {
        assert!(Role::Viewer.is_allowed(&[]));
        assert!(Role::Admin.is_allowed(&[]));
    }

    #[test]
    fn non_empty_allow_list_filters() {
        assert!(Role::Admin.is_allowed(&[Role::Admin]));
        assert!(!Role::Sales.is_allowed(&[Role::Admin]));
        assert!(Role::Sales.is_allowed(&[Role::Admin, Role::Sales]));
    }
}
