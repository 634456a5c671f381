// SPDX-License-Identifier: MIT

//! Chime client boundary server.
//!
//! Hosts the routes the client itself serves (health, offline fallback,
//! login entry, onboarding) behind the permissive CORS boundary. The
//! offline cache controller runs in the platform's own worker context
//! and is driven by the host shell, not by this binary.

use chime_client::{config::Config, store::{OnboardingStore, TokenStore}, AppState};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_logging();

    let config = Config::from_env().expect("Failed to load configuration");
    tracing::info!(port = config.port, "Starting Chime client boundary");

    let store = Arc::new(TokenStore::open(&config.storage_path));
    tracing::info!(
        path = %config.storage_path.display(),
        authenticated = store.is_authenticated(),
        "Session store hydrated"
    );

    let onboarding = OnboardingStore::new(store.clone());

    let state = Arc::new(AppState {
        config: config.clone(),
        store,
        onboarding,
    });

    let app = chime_client::routes::create_router(state);

    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(address = %addr, "Server listening");

    axum::serve(listener, app).await?;
    Ok(())
}

/// Initialize structured JSON logging.
fn init_logging() {
    let format = tracing_subscriber::fmt::layer()
        .json()
        .with_target(false)
        .with_current_span(true)
        .flatten_event(true);

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("chime_client=debug".parse().unwrap())
                .add_directive("info".parse().unwrap()),
        )
        .with(format)
        .init();
}
