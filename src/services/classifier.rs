// SPDX-License-Identifier: MIT

//! Error classifier: maps a raised [`ClientError`] to user-facing
//! remediation.
//!
//! Every failure produces exactly one visible notification; statuses
//! outside the table fall back to a generic message, never silence.

use crate::error::{ClientError, FailureKind};
use crate::services::session::SessionManager;
use std::sync::Arc;

const MSG_SESSION_EXPIRED: &str = "Your session has expired. Please log in again.";
const MSG_ACCESS_DENIED: &str = "You don't have access to that.";
const MSG_NOT_FOUND: &str = "That wasn't found.";
const MSG_TIMED_OUT: &str = "Request timed out. Check your connection and try again.";
const MSG_SERVER_ERROR: &str = "Server error. Please try again later.";
const MSG_GENERIC: &str = "Something went wrong. Please try again.";

/// Seam for user-visible notifications (toasts). Tests record messages.
pub trait Notifier: Send + Sync {
    fn notify(&self, message: &str);
}

/// Default notifier: structured log. The UI layer wires a real toast.
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn notify(&self, message: &str) {
        tracing::warn!(message, "User notification");
    }
}

/// What to do about a failure: always one message, plus for auth
/// failures a forced logout (which clears the store and navigates).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Remediation {
    pub message: String,
    pub force_logout: bool,
}

impl Remediation {
    fn notify(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            force_logout: false,
        }
    }
}

/// Pure mapping from error to remediation, per the closed status table.
pub fn classify(err: &ClientError) -> Remediation {
    let Some(kind) = err.kind() else {
        // Failures that never crossed the gateway (push, cache, storage,
        // lifecycle, decode). Surface their message; never silent.
        return match err {
            ClientError::PushRegistration(msg) => {
                Remediation::notify(format!("Couldn't update notification settings: {msg}"))
            }
            _ => Remediation::notify(MSG_GENERIC),
        };
    };

    let detail_or = |fallback: &str| match err {
        ClientError::Http { detail, .. } if !detail.is_empty() => detail.clone(),
        _ => fallback.to_string(),
    };

    match kind {
        FailureKind::Unauthorized => Remediation {
            message: MSG_SESSION_EXPIRED.to_string(),
            force_logout: true,
        },
        FailureKind::Forbidden => Remediation::notify(MSG_ACCESS_DENIED),
        FailureKind::NotFound => Remediation::notify(MSG_NOT_FOUND),
        FailureKind::Validation => {
            // Surface the first/primary validation message verbatim.
            let message = match err {
                ClientError::Http { errors, .. } if !errors.is_empty() => {
                    errors[0].message.clone()
                }
                _ => detail_or(MSG_GENERIC),
            };
            Remediation::notify(message)
        }
        FailureKind::BadRequest => Remediation::notify(detail_or(MSG_GENERIC)),
        FailureKind::Timeout | FailureKind::Transport => Remediation::notify(MSG_TIMED_OUT),
        FailureKind::ServerError => Remediation::notify(MSG_SERVER_ERROR),
        FailureKind::Other(_) => Remediation::notify(detail_or(MSG_GENERIC)),
    }
}

/// Applies remediation: one notification per failure, and for auth
/// failures a forced logout delegated to the session manager.
#[derive(Clone)]
pub struct ErrorReporter {
    notifier: Arc<dyn Notifier>,
    session: SessionManager,
}

impl ErrorReporter {
    pub fn new(notifier: Arc<dyn Notifier>, session: SessionManager) -> Self {
        Self { notifier, session }
    }

    pub fn handle(&self, err: &ClientError) {
        let remediation = classify(err);
        self.notifier.notify(&remediation.message);
        if remediation.force_logout {
            self.session.logout();
        }
    }
}
