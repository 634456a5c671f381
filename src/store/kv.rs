// SPDX-License-Identifier: MIT

//! Durable key-value store for the session token, cached user profile,
//! and onboarding flag.
//!
//! Backed by a single JSON file. All components read through this store;
//! only the session manager (token/user) and onboarding store (flag)
//! mutate it. Reads are safe from any concurrent context.

use crate::error::{ClientError, Result};
use crate::models::UserProfile;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use std::sync::{PoisonError, RwLock};

/// On-disk layout. Key names match the legacy local-storage contract.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct Persisted {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    user: Option<UserProfile>,
    #[serde(default, rename = "hasCompletedOnboarding")]
    has_completed_onboarding: bool,
}

/// File-backed holder of the auth token and cached profile.
pub struct TokenStore {
    /// `None` means detached (no persistent storage, e.g. pre-hydration);
    /// writes then stay in memory and reads still succeed.
    path: Option<PathBuf>,
    state: RwLock<Persisted>,
}

impl TokenStore {
    /// Open the store at `path`, hydrating from an existing file.
    ///
    /// A missing file yields an empty session. A corrupt file is logged
    /// and treated as empty rather than failing startup.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let state = match fs::read_to_string(&path) {
            Ok(raw) => match serde_json::from_str(&raw) {
                Ok(state) => state,
                Err(e) => {
                    tracing::warn!(error = %e, path = %path.display(), "Corrupt session store, starting empty");
                    Persisted::default()
                }
            },
            Err(_) => Persisted::default(),
        };

        Self {
            path: Some(path),
            state: RwLock::new(state),
        }
    }

    /// A store with no backing file. Used when persistent storage is not
    /// available; all operations work against memory only.
    pub fn detached() -> Self {
        Self {
            path: None,
            state: RwLock::new(Persisted::default()),
        }
    }

    /// Whether a session token is present. Never errors, even detached.
    pub fn is_authenticated(&self) -> bool {
        self.read().token.is_some()
    }

    pub fn token(&self) -> Option<String> {
        self.read().token.clone()
    }

    pub fn set_token(&self, token: &str) -> Result<()> {
        self.mutate(|state| state.token = Some(token.to_string()))
    }

    pub fn user(&self) -> Option<UserProfile> {
        self.read().user.clone()
    }

    pub fn set_user(&self, user: &UserProfile) -> Result<()> {
        self.mutate(|state| state.user = Some(user.clone()))
    }

    /// Clear token and cached profile. Returns whether anything was
    /// actually cleared, so callers can observe idempotency.
    pub fn clear_session(&self) -> Result<bool> {
        let mut cleared = false;
        self.mutate(|state| {
            cleared = state.token.is_some() || state.user.is_some();
            state.token = None;
            state.user = None;
        })?;
        Ok(cleared)
    }

    pub fn onboarding_complete(&self) -> bool {
        self.read().has_completed_onboarding
    }

    pub fn set_onboarding_complete(&self, complete: bool) -> Result<()> {
        self.mutate(|state| state.has_completed_onboarding = complete)
    }

    fn read(&self) -> std::sync::RwLockReadGuard<'_, Persisted> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn mutate(&self, f: impl FnOnce(&mut Persisted)) -> Result<()> {
        let snapshot = {
            let mut state = self.state.write().unwrap_or_else(PoisonError::into_inner);
            f(&mut state);
            state.clone()
        };
        self.persist(&snapshot)
    }

    /// Write through a temp file + rename so a crash mid-write never
    /// leaves a truncated store behind.
    fn persist(&self, state: &Persisted) -> Result<()> {
        let Some(path) = &self.path else {
            return Ok(());
        };

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)
                    .map_err(|e| ClientError::Storage(format!("create {}: {e}", parent.display())))?;
            }
        }

        let raw = serde_json::to_string_pretty(state)
            .map_err(|e| ClientError::Storage(format!("serialize session store: {e}")))?;

        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, raw)
            .map_err(|e| ClientError::Storage(format!("write {}: {e}", tmp.display())))?;
        fs::rename(&tmp, path)
            .map_err(|e| ClientError::Storage(format!("rename {}: {e}", path.display())))?;

        Ok(())
    }
}
