// SPDX-License-Identifier: MIT

//! Onboarding completion flag with a cookie mirror.
//!
//! The flag lives in the same persistent store as the session. It is
//! additionally mirrored into a cookie of the same name so server-rendered
//! middleware can read it without script execution. The mirror is derived
//! from the stored value, so the two can never disagree.

use crate::error::Result;
use crate::store::TokenStore;
use axum_extra::extract::cookie::{Cookie, SameSite};
use std::sync::Arc;

/// Cookie (and storage key) name shared with the middleware contract.
pub const ONBOARDING_COOKIE: &str = "hasCompletedOnboarding";

const COOKIE_MAX_AGE_DAYS: i64 = 365;

/// Persisted onboarding flag plus its cookie mirror.
#[derive(Clone)]
pub struct OnboardingStore {
    kv: Arc<TokenStore>,
}

impl OnboardingStore {
    pub fn new(kv: Arc<TokenStore>) -> Self {
        Self { kv }
    }

    pub fn is_complete(&self) -> bool {
        self.kv.onboarding_complete()
    }

    /// Mark onboarding finished. Returns the mirror cookie to set.
    pub fn complete(&self) -> Result<Cookie<'static>> {
        self.kv.set_onboarding_complete(true)?;
        tracing::info!("Onboarding marked complete");
        Ok(Self::mirror(true))
    }

    /// Explicit reset (test/debug path). Returns a removal cookie.
    pub fn reset(&self) -> Result<Cookie<'static>> {
        self.kv.set_onboarding_complete(false)?;
        tracing::info!("Onboarding flag reset");
        Ok(Self::mirror(false))
    }

    /// The cookie mirror for the current stored value: a 1-year cookie
    /// when set, `None` when not. Always in lockstep with storage.
    pub fn mirror_cookie(&self) -> Option<Cookie<'static>> {
        if self.is_complete() {
            Some(Self::mirror(true))
        } else {
            None
        }
    }

    fn mirror(complete: bool) -> Cookie<'static> {
        let builder = if complete {
            Cookie::build((ONBOARDING_COOKIE, "true"))
                .max_age(time::Duration::days(COOKIE_MAX_AGE_DAYS))
        } else {
            // Max-Age=0 removes the cookie on the next response.
            Cookie::build((ONBOARDING_COOKIE, "")).max_age(time::Duration::ZERO)
        };

        builder
            .path("/")
            .secure(true)
            .same_site(SameSite::Strict)
            .build()
    }
}
