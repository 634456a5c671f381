// SPDX-License-Identifier: MIT

//! Classifier table coverage: every status in the closed table produces
//! exactly one notification, and only auth failures clear the session.

use chime_client::error::{ClientError, FieldError};
use chime_client::services::{ApiGateway, ErrorReporter, SessionManager};
use chime_client::store::TokenStore;
use std::sync::Arc;

mod common;
use common::{RecordingNavigator, RecordingNotifier};

struct Harness {
    reporter: ErrorReporter,
    notifier: Arc<RecordingNotifier>,
    navigator: Arc<RecordingNavigator>,
    store: Arc<TokenStore>,
}

fn harness() -> Harness {
    let store = Arc::new(TokenStore::detached());
    store.set_token("tok").unwrap();

    // The gateway never fires in these tests; any base URL will do.
    let gateway = ApiGateway::new("http://127.0.0.1:1", store.clone(), 1);
    let notifier = Arc::new(RecordingNotifier::default());
    let navigator = Arc::new(RecordingNavigator::default());
    let session = SessionManager::new(store.clone(), gateway, navigator.clone(), "/login");

    Harness {
        reporter: ErrorReporter::new(notifier.clone(), session),
        notifier,
        navigator,
        store,
    }
}

fn http(status: u16, detail: &str, errors: Vec<FieldError>) -> ClientError {
    ClientError::Http {
        status,
        detail: detail.to_string(),
        errors,
    }
}

impl Harness {
    fn messages(&self) -> Vec<String> {
        self.notifier.messages.lock().unwrap().clone()
    }

    fn navigations(&self) -> Vec<String> {
        self.navigator.locations.lock().unwrap().clone()
    }
}

#[test]
fn test_401_clears_token_notifies_and_navigates_once() {
    let h = harness();
    h.reporter.handle(&http(401, "", vec![]));

    assert_eq!(
        h.messages(),
        vec!["Your session has expired. Please log in again.".to_string()]
    );
    assert_eq!(h.navigations(), vec!["/login".to_string()]);
    assert!(!h.store.is_authenticated());
}

#[test]
fn test_unauthenticated_gets_same_remediation_as_401() {
    let h = harness();
    h.reporter.handle(&ClientError::Unauthenticated);

    assert_eq!(h.messages().len(), 1);
    assert_eq!(h.navigations().len(), 1);
    assert!(!h.store.is_authenticated());
}

#[test]
fn test_403_notifies_without_state_change() {
    let h = harness();
    h.reporter.handle(&http(403, "", vec![]));

    assert_eq!(h.messages(), vec!["You don't have access to that.".to_string()]);
    assert!(h.navigations().is_empty());
    assert!(h.store.is_authenticated());
}

#[test]
fn test_404_notifies_without_state_change() {
    let h = harness();
    h.reporter.handle(&http(404, "", vec![]));

    assert_eq!(h.messages(), vec!["That wasn't found.".to_string()]);
    assert!(h.store.is_authenticated());
}

#[test]
fn test_422_surfaces_primary_validation_message_verbatim() {
    let h = harness();
    h.reporter.handle(&http(
        422,
        "Validation failed",
        vec![
            FieldError {
                field: "password".to_string(),
                message: "Password must contain a digit".to_string(),
            },
            FieldError {
                field: "password".to_string(),
                message: "Password too short".to_string(),
            },
        ],
    ));

    assert_eq!(h.messages(), vec!["Password must contain a digit".to_string()]);
}

#[test]
fn test_422_without_list_falls_back_to_detail() {
    let h = harness();
    h.reporter.handle(&http(422, "Name is required", vec![]));
    assert_eq!(h.messages(), vec!["Name is required".to_string()]);
}

#[test]
fn test_400_uses_server_detail_with_generic_fallback() {
    let h = harness();
    h.reporter.handle(&http(400, "Invalid event date", vec![]));
    assert_eq!(h.messages(), vec!["Invalid event date".to_string()]);

    let h = harness();
    h.reporter.handle(&http(400, "", vec![]));
    assert_eq!(
        h.messages(),
        vec!["Something went wrong. Please try again.".to_string()]
    );
}

#[test]
fn test_408_and_transport_notify_timed_out() {
    let timeout_msg = "Request timed out. Check your connection and try again.";

    let h = harness();
    h.reporter.handle(&http(408, "", vec![]));
    assert_eq!(h.messages(), vec![timeout_msg.to_string()]);

    let h = harness();
    h.reporter
        .handle(&ClientError::Transport("connection refused".to_string()));
    assert_eq!(h.messages(), vec![timeout_msg.to_string()]);
    // Transport failures are never treated as auth failures.
    assert!(h.store.is_authenticated());
    assert!(h.navigations().is_empty());
}

#[test]
fn test_500_notifies_generic_server_error() {
    let h = harness();
    h.reporter.handle(&http(500, "stack trace here", vec![]));
    assert_eq!(
        h.messages(),
        vec!["Server error. Please try again later.".to_string()]
    );
}

#[test]
fn test_unknown_status_still_notifies() {
    let h = harness();
    h.reporter.handle(&http(418, "I'm a teapot", vec![]));
    assert_eq!(h.messages(), vec!["I'm a teapot".to_string()]);

    let h = harness();
    h.reporter.handle(&http(503, "", vec![]));
    assert_eq!(
        h.messages(),
        vec!["Something went wrong. Please try again.".to_string()]
    );
}

#[test]
fn test_push_failure_is_not_silent() {
    let h = harness();
    h.reporter
        .handle(&ClientError::PushRegistration("permission denied".to_string()));
    let messages = h.messages();
    assert_eq!(messages.len(), 1);
    assert!(messages[0].contains("permission denied"));
}

#[test]
fn test_every_table_status_produces_exactly_one_notification() {
    for status in [400u16, 401, 403, 404, 408, 418, 422, 500, 503] {
        let h = harness();
        h.reporter.handle(&http(status, "detail", vec![]));
        assert_eq!(h.messages().len(), 1, "status {status}");
    }
}
