//! Error types for filmgraph.

use crate::id::EntityKind;
use thiserror::Error;

/// Application result type.
pub type AppResult<T> = Result<T, AppError>;

/// Application error type.
#[derive(Debug, Error)]
pub enum AppError {
    // === Client Errors ===
    #[error("{kind} not found: {id}")]
    NotFound { kind: EntityKind, id: i64 },

    #[error("Bad request: {0}")]
    BadRequest(String),

    // === Server Errors ===
    #[error("Database error: {0}")]
    Database(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Shorthand for a missing user.
    #[must_use]
    pub const fn user_not_found(id: i64) -> Self {
        Self::NotFound {
            kind: EntityKind::User,
            id,
        }
    }

    /// Shorthand for a missing film.
    #[must_use]
    pub const fn film_not_found(id: i64) -> Self {
        Self::NotFound {
            kind: EntityKind::Film,
            id,
        }
    }

    /// Shorthand for a missing review.
    #[must_use]
    pub const fn review_not_found(id: i64) -> Self {
        Self::NotFound {
            kind: EntityKind::Review,
            id,
        }
    }

    /// Returns the error code for logs and callers.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::NotFound {
                kind: EntityKind::User,
                ..
            } => "USER_NOT_FOUND",
            Self::NotFound {
                kind: EntityKind::Film,
                ..
            } => "FILM_NOT_FOUND",
            Self::NotFound {
                kind: EntityKind::Review,
                ..
            } => "REVIEW_NOT_FOUND",
            Self::BadRequest(_) => "BAD_REQUEST",
            Self::Database(_) => "DATABASE_ERROR",
            Self::Config(_) => "CONFIG_ERROR",
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Returns whether this error is caused by the server rather than the caller's input.
    #[must_use]
    pub const fn is_server_error(&self) -> bool {
        matches!(
            self,
            Self::Database(_) | Self::Config(_) | Self::Internal(_)
        )
    }

    /// Logs the error at a level matching its class and returns it.
    #[must_use]
    pub fn logged(self) -> Self {
        let code = self.error_code();
        if self.is_server_error() {
            tracing::error!(error = %self, code = code, "Server error occurred");
        } else {
            tracing::debug!(error = %self, code = code, "Client error occurred");
        }
        self
    }
}

// === From implementations ===

impl From<config::ConfigError> for AppError {
    fn from(err: config::ConfigError) -> Self {
        Self::Config(err.to_string())
    }
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        Self::Internal(err.to_string())
    }
}
