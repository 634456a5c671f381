// SPDX-License-Identifier: MIT

//! Current-user snapshot cached by the session manager.

use serde::{Deserialize, Serialize};

/// User profile as returned by `GET /auth/me` and cached locally.
///
/// The cached copy may be stale; a fresh fetch always supersedes it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: u64,
    pub username: String,
    pub email: String,
    /// Avatar URL (may be None if the user never set one)
    #[serde(default)]
    pub avatar_url: Option<String>,
    /// Sentinel: true when this profile is the deterministic offline
    /// fallback rather than a record the backend actually returned.
    /// UI can use this to indicate degraded state.
    #[serde(default)]
    pub degraded: bool,
}

impl UserProfile {
    /// Deterministic fallback profile served when a token is present but
    /// the `auth/me` fetch fails. Favors uninterrupted navigation over
    /// strict correctness; `degraded` marks it as such.
    pub fn fallback() -> Self {
        Self {
            id: 0,
            username: "you".to_string(),
            email: String::new(),
            avatar_url: None,
            degraded: true,
        }
    }
}
