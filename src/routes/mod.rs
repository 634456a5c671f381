// SPDX-License-Identifier: MIT

//! Client-hosted boundary routes: health probe, offline fallback page,
//! login entry redirect, and onboarding flag mutation (which sets the
//! middleware-visible cookie mirror).

use crate::AppState;
use axum::{
    extract::{Query, State},
    http::StatusCode,
    middleware,
    response::{Html, Redirect},
    routing::{get, post},
    Json, Router,
};
use axum_extra::extract::cookie::CookieJar;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;

/// Static offline fallback page, precached by the worker and served for
/// navigations that fail due to connectivity loss.
pub const OFFLINE_PAGE_HTML: &str = "<!doctype html>\n<html lang=\"en\">\n<head><meta charset=\"utf-8\"><title>Chime: offline</title></head>\n<body>\n<h1>You're offline</h1>\n<p>Chime couldn't reach the network. Your reminders are safe; reconnect and this page will reload.</p>\n</body>\n</html>\n";

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub build_id: String,
}

/// Health check response
async fn health_check() -> Json<HealthResponse> {
    let build_id = option_env!("BUILD_ID").unwrap_or("unknown").to_string();
    Json(HealthResponse {
        status: "ok".to_string(),
        build_id,
    })
}

/// Offline fallback page. Served statically so it can be precached.
async fn offline_page() -> Html<&'static str> {
    Html(OFFLINE_PAGE_HTML)
}

#[derive(Deserialize)]
struct LoginParams {
    /// Where to land after the OAuth round-trip completes.
    #[serde(default)]
    next: Option<String>,
}

/// Login entry: hand off to the backend's Google OAuth redirect.
async fn login_entry(
    State(state): State<Arc<AppState>>,
    Query(params): Query<LoginParams>,
) -> Redirect {
    let next = params.next.unwrap_or_else(|| "/".to_string());
    let target = format!(
        "{}/api/auth/google?next={}",
        state.config.api_base_url,
        urlencoding::encode(&next)
    );
    tracing::info!(next = %next, "Redirecting to OAuth entry");
    Redirect::temporary(&target)
}

/// Mark onboarding complete; mirrors the flag into the cookie.
async fn onboarding_complete(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
) -> Result<(CookieJar, StatusCode), crate::error::ClientError> {
    let cookie = state.onboarding.complete()?;
    Ok((jar.add(cookie), StatusCode::NO_CONTENT))
}

/// Reset the onboarding flag (test/debug path); removes the cookie.
async fn onboarding_reset(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
) -> Result<(CookieJar, StatusCode), crate::error::ClientError> {
    let cookie = state.onboarding.reset()?;
    Ok((jar.add(cookie), StatusCode::NO_CONTENT))
}

/// Build the complete boundary router.
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/offline", get(offline_page))
        .route("/auth/login", get(login_entry))
        .route("/onboarding/complete", post(onboarding_complete))
        .route("/onboarding/reset", post(onboarding_reset))
        .layer(middleware::from_fn(crate::middleware::cors::cors_boundary))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .with_state(state)
}
