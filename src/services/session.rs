// SPDX-License-Identifier: MIT

//! Session manager: authentication state, current-user fetch, logout.
//!
//! Built on the token store and API gateway. `current_user` treats a
//! missing token as an error (same remediation as a 401), while a failed
//! fetch with a token present yields the deterministic fallback profile
//! so navigation is never interrupted by a flaky network.

use crate::error::{ClientError, Result};
use crate::models::UserProfile;
use crate::services::gateway::ApiGateway;
use crate::store::TokenStore;
use std::sync::Arc;

/// Seam for hard navigations (forced logout, login redirect). The host
/// shell owns the actual location bar; tests record calls.
pub trait Navigator: Send + Sync {
    fn assign(&self, location: &str);
}

/// Default navigator: logs the intent. The native shell wires a real one.
pub struct TracingNavigator;

impl Navigator for TracingNavigator {
    fn assign(&self, location: &str) {
        tracing::info!(location, "Navigation requested");
    }
}

/// Owns the session lifecycle: hydrate on construction, teardown via
/// [`SessionManager::logout`]. Cheap to clone; shares the store.
#[derive(Clone)]
pub struct SessionManager {
    store: Arc<TokenStore>,
    gateway: ApiGateway,
    navigator: Arc<dyn Navigator>,
    login_path: String,
}

impl SessionManager {
    pub fn new(
        store: Arc<TokenStore>,
        gateway: ApiGateway,
        navigator: Arc<dyn Navigator>,
        login_path: impl Into<String>,
    ) -> Self {
        Self {
            store,
            gateway,
            navigator,
            login_path: login_path.into(),
        }
    }

    /// Pure read of whether a token is present. Never errors, including
    /// against a detached (pre-hydration) store.
    pub fn is_authenticated(&self) -> bool {
        self.store.is_authenticated()
    }

    /// Fetch the current user through the gateway.
    ///
    /// Requires a token; fails with `Unauthenticated` otherwise. On any
    /// fetch failure the deterministic fallback profile is returned
    /// instead of the error — callers distinguish it via `degraded`.
    pub async fn current_user(&self) -> Result<UserProfile> {
        if !self.store.is_authenticated() {
            return Err(ClientError::Unauthenticated);
        }

        match self.gateway.get::<UserProfile>("/auth/me").await {
            Ok(user) => {
                if let Err(e) = self.store.set_user(&user) {
                    tracing::warn!(error = %e, "Failed to cache user profile");
                }
                Ok(user)
            }
            Err(e) => {
                tracing::warn!(error = %e, "Current-user fetch failed, serving fallback profile");
                Ok(UserProfile::fallback())
            }
        }
    }

    /// Last successfully fetched profile, if any. May be stale.
    pub fn cached_user(&self) -> Option<UserProfile> {
        self.store.user()
    }

    /// Clear token and cached profile, then navigate to the login entry
    /// point. Idempotent: when already logged out only the navigation
    /// happens.
    pub fn logout(&self) {
        match self.store.clear_session() {
            Ok(true) => tracing::info!("Session cleared"),
            Ok(false) => {}
            Err(e) => tracing::error!(error = %e, "Failed to clear session store"),
        }
        self.navigator.assign(&self.login_path);
    }
}
