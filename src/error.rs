// SPDX-License-Identifier: MIT

//! Crate-wide error taxonomy for the client runtime.
//!
//! Every failure a screen can observe flows through [`ClientError`]. The
//! distinction that matters most is `Transport` (no response ever arrived,
//! so no status code exists) versus `Http` (the backend answered with a
//! non-2xx status). The classifier in `services::classifier` maps these to
//! user-facing remediation and must never treat a transport failure as an
//! authentication problem.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

/// A single field-level validation error from the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

/// Client runtime error type.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// An operation that requires a session was called without a token.
    #[error("Authentication required")]
    Unauthenticated,

    /// No response was received: timeout, connection refused, DNS, offline.
    /// Carries no status code by definition.
    #[error("Network unreachable: {0}")]
    Transport(String),

    /// The backend responded with a non-2xx status.
    #[error("HTTP {status}: {detail}")]
    Http {
        status: u16,
        detail: String,
        errors: Vec<FieldError>,
    },

    /// A 2xx response whose body could not be decoded.
    #[error("Response decode error: {0}")]
    Decode(String),

    /// Push subscription could not be established or removed cleanly.
    #[error("Push registration failed: {0}")]
    PushRegistration(String),

    /// Internal to the offline cache controller; a required cache entry
    /// was absent (e.g. the offline fallback page before install).
    #[error("Cache miss: {0}")]
    CacheMiss(String),

    /// Persistent store read/write failure.
    #[error("Storage error: {0}")]
    Storage(String),

    /// Service worker lifecycle transition out of order.
    #[error("Worker lifecycle error: {0}")]
    Lifecycle(String),

    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

/// Tagged view over the closed status table, with an explicit `Other`
/// variant for forward compatibility with statuses we don't handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    Unauthorized,
    Forbidden,
    NotFound,
    Validation,
    BadRequest,
    Timeout,
    ServerError,
    Transport,
    Other(u16),
}

impl ClientError {
    /// Status code of the failure, when the backend actually responded.
    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::Http { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Classify an API-level failure. Returns `None` for errors that never
    /// cross the gateway boundary (storage, lifecycle, push, cache).
    pub fn kind(&self) -> Option<FailureKind> {
        match self {
            ClientError::Unauthenticated => Some(FailureKind::Unauthorized),
            ClientError::Transport(_) => Some(FailureKind::Transport),
            ClientError::Http { status, .. } => Some(match status {
                401 => FailureKind::Unauthorized,
                403 => FailureKind::Forbidden,
                404 => FailureKind::NotFound,
                422 => FailureKind::Validation,
                400 => FailureKind::BadRequest,
                408 => FailureKind::Timeout,
                500 => FailureKind::ServerError,
                other => FailureKind::Other(*other),
            }),
            _ => None,
        }
    }

    /// True when the failure should be retried once connectivity returns.
    pub fn is_offline(&self) -> bool {
        matches!(self, ClientError::Transport(_))
    }
}

/// JSON error response body for boundary routes.
#[derive(Serialize)]
struct ErrorResponse {
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<String>,
}

impl IntoResponse for ClientError {
    fn into_response(self) -> Response {
        let (status, error, details) = match &self {
            ClientError::Unauthenticated => (StatusCode::UNAUTHORIZED, "unauthenticated", None),
            ClientError::Transport(msg) => (
                StatusCode::BAD_GATEWAY,
                "upstream_unreachable",
                Some(msg.clone()),
            ),
            ClientError::Http { status, detail, .. } => (
                StatusCode::from_u16(*status).unwrap_or(StatusCode::BAD_GATEWAY),
                "upstream_error",
                Some(detail.clone()),
            ),
            ClientError::Decode(msg) => (
                StatusCode::BAD_GATEWAY,
                "upstream_decode_error",
                Some(msg.clone()),
            ),
            ClientError::PushRegistration(msg) => (
                StatusCode::BAD_GATEWAY,
                "push_registration_failed",
                Some(msg.clone()),
            ),
            ClientError::CacheMiss(msg) => {
                (StatusCode::NOT_FOUND, "cache_miss", Some(msg.clone()))
            }
            ClientError::Storage(msg) => {
                tracing::error!(error = %msg, "Storage error");
                (StatusCode::INTERNAL_SERVER_ERROR, "storage_error", None)
            }
            ClientError::Lifecycle(msg) => {
                tracing::error!(error = %msg, "Worker lifecycle error");
                (StatusCode::INTERNAL_SERVER_ERROR, "lifecycle_error", None)
            }
            ClientError::Internal(err) => {
                tracing::error!(error = %err, "Internal error");
                (StatusCode::INTERNAL_SERVER_ERROR, "internal_error", None)
            }
        };

        let body = ErrorResponse {
            error: error.to_string(),
            details,
        };

        (status, Json(body)).into_response()
    }
}

/// Result type alias for client operations.
pub type Result<T> = std::result::Result<T, ClientError>;
