// SPDX-License-Identifier: MIT

use axum::Router;
use chime_client::config::Config;
use chime_client::services::{Navigator, Notifier};
use chime_client::store::{OnboardingStore, TokenStore};
use chime_client::AppState;
use std::sync::{Arc, Mutex};

/// Spawn a router on an ephemeral port, returning its base URL.
#[allow(dead_code)]
pub async fn spawn_server(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind ephemeral port");
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{addr}")
}

/// Boundary app backed by a temp-dir session store.
/// Returns the router, shared state, and the guard keeping the dir alive.
#[allow(dead_code)]
pub fn create_test_app() -> (Router, Arc<AppState>, tempfile::TempDir) {
    let dir = tempfile::tempdir().unwrap();
    let config = Config {
        storage_path: dir.path().join("session.json"),
        ..Config::default()
    };
    let store = Arc::new(TokenStore::open(&config.storage_path));
    let onboarding = OnboardingStore::new(store.clone());
    let state = Arc::new(AppState {
        config,
        store,
        onboarding,
    });
    (
        chime_client::routes::create_router(state.clone()),
        state,
        dir,
    )
}

/// Notifier that records every message it is asked to show.
#[allow(dead_code)]
#[derive(Default)]
pub struct RecordingNotifier {
    pub messages: Mutex<Vec<String>>,
}

impl Notifier for RecordingNotifier {
    fn notify(&self, message: &str) {
        self.messages.lock().unwrap().push(message.to_string());
    }
}

/// Navigator that records every location assignment.
#[allow(dead_code)]
#[derive(Default)]
pub struct RecordingNavigator {
    pub locations: Mutex<Vec<String>>,
}

impl Navigator for RecordingNavigator {
    fn assign(&self, location: &str) {
        self.locations.lock().unwrap().push(location.to_string());
    }
}
