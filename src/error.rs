// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Application error types with consistent user-facing notices.

use serde::Serialize;

/// Application error type.
///
/// The footprint engine never produces one of these: calculation problems
/// degrade to a zero emission plus a [`crate::services::CalcWarning`].
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Invalid request: {0}")]
    BadRequest(String),

    #[error("Persistence failure: {0}")]
    PersistenceFailure(String),

    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

/// Notice shown to the user when an operation fails.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Notice {
    pub error: String,
    /// Whether retrying (or switching to a fallback store) may succeed.
    pub retryable: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl AppError {
    /// Convert into the notice the UI layer displays.
    pub fn notice(&self) -> Notice {
        let (error, retryable, details) = match self {
            AppError::NotFound(msg) => ("not_found", false, Some(msg.clone())),
            AppError::BadRequest(msg) => ("bad_request", false, Some(msg.clone())),
            AppError::PersistenceFailure(msg) => {
                tracing::warn!(error = %msg, "Persistence failure");
                ("persistence_failure", true, None)
            }
            AppError::Internal(err) => {
                tracing::error!(error = %err, "Internal error");
                ("internal_error", false, None)
            }
        };

        Notice {
            error: error.to_string(),
            retryable,
            details,
        }
    }

    /// True for storage read/write errors, including quota exhaustion.
    pub fn is_persistence_failure(&self) -> bool {
        matches!(self, AppError::PersistenceFailure(_))
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(errors: validator::ValidationErrors) -> Self {
        AppError::BadRequest(errors.to_string())
    }
}

/// Result type alias for store and service operations
pub type Result<T> = std::result::Result<T, AppError>;
