// SPDX-License-Identifier: MIT

//! Onboarding flag round-trips and cookie mirror lockstep, both at the
//! store level and through the boundary routes.

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
};
use axum_extra::extract::cookie::SameSite;
use chime_client::store::{OnboardingStore, TokenStore};
use std::sync::Arc;
use tower::ServiceExt; // for oneshot

mod common;

fn store() -> OnboardingStore {
    OnboardingStore::new(Arc::new(TokenStore::detached()))
}

#[test]
fn test_flag_round_trips_with_cookie_in_lockstep() {
    let onboarding = store();

    assert!(!onboarding.is_complete());
    assert!(onboarding.mirror_cookie().is_none());

    onboarding.complete().unwrap();
    assert!(onboarding.is_complete());
    assert!(onboarding.mirror_cookie().is_some());

    onboarding.reset().unwrap();
    assert!(!onboarding.is_complete());
    assert!(onboarding.mirror_cookie().is_none());
}

#[test]
fn test_mirror_cookie_attributes() {
    let onboarding = store();
    let cookie = onboarding.complete().unwrap();

    assert_eq!(cookie.name(), "hasCompletedOnboarding");
    assert_eq!(cookie.value(), "true");
    assert_eq!(cookie.max_age(), Some(time::Duration::days(365)));
    assert_eq!(cookie.secure(), Some(true));
    assert_eq!(cookie.same_site(), Some(SameSite::Strict));
    assert_eq!(cookie.path(), Some("/"));
}

#[test]
fn test_reset_cookie_expires_immediately() {
    let onboarding = store();
    onboarding.complete().unwrap();

    let cookie = onboarding.reset().unwrap();
    assert_eq!(cookie.max_age(), Some(time::Duration::ZERO));
    assert!(cookie.value().is_empty());
}

#[test]
fn test_flag_survives_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("session.json");

    let onboarding = OnboardingStore::new(Arc::new(TokenStore::open(&path)));
    onboarding.complete().unwrap();

    let reopened = OnboardingStore::new(Arc::new(TokenStore::open(&path)));
    assert!(reopened.is_complete());
    assert!(reopened.mirror_cookie().is_some());
}

#[tokio::test]
async fn test_complete_route_sets_mirror_cookie() {
    let (app, state, _dir) = common::create_test_app();

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/onboarding/complete")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NO_CONTENT);
    assert!(state.onboarding.is_complete());

    let set_cookie = response
        .headers()
        .get(header::SET_COOKIE)
        .expect("missing Set-Cookie")
        .to_str()
        .unwrap();
    assert!(set_cookie.starts_with("hasCompletedOnboarding=true"));
    assert!(set_cookie.contains("Secure"));
    assert!(set_cookie.contains("SameSite=Strict"));
    assert!(set_cookie.contains("Max-Age=31536000"));
    assert!(set_cookie.contains("Path=/"));
}

#[tokio::test]
async fn test_reset_route_removes_mirror_cookie() {
    let (app, state, _dir) = common::create_test_app();
    state.onboarding.complete().unwrap();

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/onboarding/reset")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NO_CONTENT);
    assert!(!state.onboarding.is_complete());

    let set_cookie = response
        .headers()
        .get(header::SET_COOKIE)
        .expect("missing Set-Cookie")
        .to_str()
        .unwrap();
    assert!(set_cookie.contains("Max-Age=0"));
}
