//! Application-wide error types.

use thiserror::Error;

/// Result type alias using `AppError`.
pub type AppResult<T> = Result<T, AppError>;

/// Application error types.
///
/// Each variant maps to one HTTP status class. Handlers surface the
/// variant message in the `error` field of the JSON body; store errors
/// additionally echo their text in a `details` field.
#[derive(Debug, Error)]
pub enum AppError {
    /// Authentication failed (missing or invalid token, bad credentials).
    #[error("{0}")]
    Unauthorized(String),

    /// Caller's role is not in the route's allow-list.
    #[error("Forbidden")]
    Forbidden,

    /// Entity lookup miss.
    #[error("{0}")]
    NotFound(String),

    /// Missing or malformed input.
    #[error("{0}")]
    Validation(String),

    /// Duplicate slug, email, or key.
    #[error("{0}")]
    Conflict(String),

    /// Underlying store failure.
    #[error("{0}")]
    Database(String),

    /// Anything else caught at the handler boundary.
    #[error("{0}")]
    Internal(String),
}

impl AppError {
    /// Returns the HTTP status code for this error.
    #[must_use]
    pub const fn status_code(&self) -> u16 {
        match self {
            Self::Unauthorized(_) => 401,
            Self::Forbidden => 403,
            Self::NotFound(_) => 404,
            Self::Validation(_) => 400,
            Self::Conflict(_) => 409,
            Self::Database(_) | Self::Internal(_) => 500,
        }
    }

    /// Whether the underlying error text may be echoed to the caller.
    ///
    /// Store and internal errors surface a generic message plus a
    /// `details` field; everything else is already caller-safe.
    #[must_use]
    pub const fn echoes_details(&self) -> bool {
        matches!(self, Self::Database(_) | Self::Internal(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_status_codes() {
        assert_eq!(AppError::Unauthorized(String::new()).status_code(), 401);
        assert_eq!(AppError::Forbidden.status_code(), 403);
        assert_eq!(AppError::NotFound(String::new()).status_code(), 404);
        assert_eq!(AppError::Validation(String::new()).status_code(), 400);
        assert_eq!(AppError::Conflict(String::new()).status_code(), 409);
        assert_eq!(AppError::Database(String::new()).status_code(), 500);
        assert_eq!(AppError::Internal(String::new()).status_code(), 500);
    }

    #[test]
    fn test_forbidden_display_is_fixed() {
        assert_eq!(AppError::Forbidden.to_string(), "Forbidden");
    }

    #[test]
    fn test_details_echo_policy() {
        assert!(AppError::Database("boom".into()).echoes_details());
        assert!(AppError::Internal("boom".into()).echoes_details());
        assert!(!AppError::Validation("bad".into()).echoes_details());
        assert!(!AppError::Forbidden.echoes_details());
    }
}
