// SPDX-License-Identifier: MIT

//! Cross-origin boundary for client-hosted routes.
//!
//! The native-shell wrapper consumes these routes cross-origin, so every
//! response carries permissive CORS headers, and `OPTIONS` preflights are
//! answered immediately without touching the inner handler.

use axum::{
    extract::Request,
    http::{HeaderMap, HeaderValue, Method, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};

const ALLOWED_METHODS: &str = "GET, POST, PUT, DELETE, OPTIONS";
const ALLOWED_HEADERS: &str = "Content-Type, Authorization, X-Requested-With";

/// Answer preflights directly; decorate everything else on the way out.
pub async fn cors_boundary(req: Request, next: Next) -> Response {
    if req.method() == Method::OPTIONS {
        let mut response = StatusCode::NO_CONTENT.into_response();
        apply_cors_headers(response.headers_mut());
        return response;
    }

    let mut response = next.run(req).await;
    apply_cors_headers(response.headers_mut());
    response
}

fn apply_cors_headers(headers: &mut HeaderMap) {
    headers.insert("Access-Control-Allow-Origin", HeaderValue::from_static("*"));
    headers.insert(
        "Access-Control-Allow-Methods",
        HeaderValue::from_static(ALLOWED_METHODS),
    );
    headers.insert(
        "Access-Control-Allow-Headers",
        HeaderValue::from_static(ALLOWED_HEADERS),
    );
    headers.insert(
        "Access-Control-Allow-Credentials",
        HeaderValue::from_static("true"),
    );
}
