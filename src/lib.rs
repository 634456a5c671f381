// SPDX-License-Identifier: MIT

//! Chime client runtime: the resilience layer of the Chime
//! calendar/reminder app.
//!
//! This crate provides session/token management, the backend API gateway
//! with its error classifier, the offline cache controller, the push
//! subscription manager, and the small CORS-decorated HTTP boundary the
//! client hosts for the native-shell wrapper.

pub mod cache;
pub mod config;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod store;

use config::Config;
use std::sync::Arc;
use store::{OnboardingStore, TokenStore};

/// Shared state for the boundary routes.
pub struct AppState {
    pub config: Config,
    pub store: Arc<TokenStore>,
    pub onboarding: OnboardingStore,
}
