// SPDX-License-Identifier: MIT

//! API gateway: the single chokepoint for outbound backend calls.
//!
//! Handles:
//! - Bearer header attachment from the token store
//! - Transport vs HTTP-error normalization into [`ClientError`]
//! - Lenient parsing of backend error bodies (detail + validation list)

use crate::error::{ClientError, FieldError, Result};
use crate::store::TokenStore;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;

/// Thin client over the backend REST API.
///
/// Every authenticated request in the app passes through here. The token
/// store is read-only from the gateway's perspective; only the session
/// manager mutates it.
#[derive(Clone)]
pub struct ApiGateway {
    http: reqwest::Client,
    base_url: String,
    store: Arc<TokenStore>,
}

impl ApiGateway {
    pub fn new(base_url: impl Into<String>, store: Arc<TokenStore>, timeout_secs: u64) -> Self {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .unwrap_or_default();

        Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            store,
        }
    }

    /// GET a JSON resource.
    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        self.send(reqwest::Method::GET, path, None).await
    }

    /// POST a JSON body, expecting a JSON response.
    pub async fn post<T: DeserializeOwned, B: Serialize>(&self, path: &str, body: &B) -> Result<T> {
        let value = serde_json::to_value(body)
            .map_err(|e| ClientError::Decode(format!("serialize request body: {e}")))?;
        self.send(reqwest::Method::POST, path, Some(value)).await
    }

    /// POST a JSON body, ignoring the response body.
    pub async fn post_no_content<B: Serialize>(&self, path: &str, body: &B) -> Result<()> {
        let value = serde_json::to_value(body)
            .map_err(|e| ClientError::Decode(format!("serialize request body: {e}")))?;

        let response = self.dispatch(reqwest::Method::POST, path, Some(value)).await?;
        self.check_status(response).await?;
        Ok(())
    }

    async fn send<T: DeserializeOwned>(
        &self,
        method: reqwest::Method,
        path: &str,
        body: Option<serde_json::Value>,
    ) -> Result<T> {
        let response = self.dispatch(method, path, body).await?;
        let response = self.check_status(response).await?;

        response
            .json()
            .await
            .map_err(|e| ClientError::Decode(format!("JSON parse error: {e}")))
    }

    /// Build and fire the request. Any error here means no response was
    /// received, so it is always a transport failure, never an auth one.
    async fn dispatch(
        &self,
        method: reqwest::Method,
        path: &str,
        body: Option<serde_json::Value>,
    ) -> Result<reqwest::Response> {
        let url = format!("{}{}", self.base_url, path);
        let mut request = self.http.request(method, &url);

        // Attach the bearer header when a token exists; the backend
        // rejects unauthenticated calls that require one.
        if let Some(token) = self.store.token() {
            request = request.bearer_auth(token);
        }

        if let Some(body) = body {
            request = request.json(&body);
        }

        request.send().await.map_err(|e| {
            let detail = if e.is_timeout() {
                "request timed out".to_string()
            } else {
                format!("{e}")
            };
            tracing::warn!(url = %url, error = %detail, "Transport failure");
            ClientError::Transport(detail)
        })
    }

    /// Turn a non-2xx response into `ClientError::Http`, preserving the
    /// machine-readable detail and validation list when present.
    async fn check_status(&self, response: reqwest::Response) -> Result<reqwest::Response> {
        if response.status().is_success() {
            return Ok(response);
        }

        let status = response.status().as_u16();
        let body = response.text().await.unwrap_or_default();
        let (detail, errors) = parse_error_body(&body);

        tracing::warn!(status, detail = %detail, "API error response");
        Err(ClientError::Http {
            status,
            detail,
            errors,
        })
    }
}

/// Shape the backend uses for error payloads. Both fields are optional;
/// unknown shapes degrade to the raw text.
#[derive(Debug, Default, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    detail: Option<String>,
    #[serde(default)]
    errors: Vec<FieldError>,
}

/// Extract a human-readable detail and validation list from an error body.
fn parse_error_body(body: &str) -> (String, Vec<FieldError>) {
    if let Ok(parsed) = serde_json::from_str::<ErrorBody>(body) {
        if parsed.detail.is_some() || !parsed.errors.is_empty() {
            let detail = parsed
                .detail
                .or_else(|| parsed.errors.first().map(|e| e.message.clone()))
                .unwrap_or_default();
            return (detail, parsed.errors);
        }
    }

    // Not the structured shape. Keep short plain-text bodies as detail.
    let trimmed = body.trim();
    if !trimmed.is_empty() && trimmed.len() <= 256 && !trimmed.starts_with('<') {
        (trimmed.to_string(), Vec::new())
    } else {
        (String::new(), Vec::new())
    }
}
