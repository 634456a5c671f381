// SPDX-License-Identifier: MIT

//! Push subscription lifecycle.
//!
//! The core correctness property is exactly-once-or-none: after any
//! `subscribe()` call, either both the platform subscription and the
//! backend record exist, or neither does. A platform subscription created
//! during a run whose backend registration fails is rolled back before
//! the error surfaces.

use crate::error::{ClientError, Result};
use crate::services::gateway::ApiGateway;
use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use futures_util::future::BoxFuture;
use serde::Serialize;
use std::sync::Arc;

/// Outcome of asking the platform for notification permission.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Permission {
    Granted,
    Denied,
}

/// A platform-issued push subscription: endpoint plus encryption keys.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlatformSubscription {
    pub endpoint: String,
    pub p256dh: Vec<u8>,
    pub auth: Vec<u8>,
}

/// Seam over the browser/native push platform. At most one subscription
/// exists per installation; `current_subscription` reflects it.
pub trait PushPlatform: Send + Sync {
    fn request_permission(&self) -> BoxFuture<'_, Result<Permission>>;
    fn subscribe(&self) -> BoxFuture<'_, Result<PlatformSubscription>>;
    fn unsubscribe(&self) -> BoxFuture<'_, Result<()>>;
    fn current_subscription(&self) -> BoxFuture<'_, Result<Option<PlatformSubscription>>>;
}

/// Wire payload for the backend push registration endpoint.
#[derive(Serialize)]
struct RegistrationPayload<'a> {
    action: &'a str,
    endpoint: &'a str,
    keys: RegistrationKeys,
}

#[derive(Serialize)]
struct RegistrationKeys {
    p256dh: String,
    auth: String,
}

/// Registers and removes the platform's push capability with the backend.
/// Authorization rides on the gateway's bearer header.
#[derive(Clone)]
pub struct PushManager {
    platform: Arc<dyn PushPlatform>,
    gateway: ApiGateway,
    endpoint_path: String,
}

impl PushManager {
    pub fn new(
        platform: Arc<dyn PushPlatform>,
        gateway: ApiGateway,
        endpoint_path: impl Into<String>,
    ) -> Self {
        Self {
            platform,
            gateway,
            endpoint_path: endpoint_path.into(),
        }
    }

    /// Opt in to push delivery. Idempotent: an existing subscription is
    /// re-registered under the same endpoint, never duplicated.
    pub async fn subscribe(&self) -> Result<()> {
        if let Some(existing) = self.platform.current_subscription().await? {
            tracing::debug!(endpoint = %existing.endpoint, "Already subscribed, re-registering");
            return self.register(&existing, "subscribe").await;
        }

        match self.platform.request_permission().await? {
            Permission::Granted => {}
            Permission::Denied => {
                return Err(ClientError::PushRegistration(
                    "notification permission denied".to_string(),
                ));
            }
        }

        let subscription = self.platform.subscribe().await?;

        if let Err(e) = self.register(&subscription, "subscribe").await {
            // Roll back the platform subscription so no partial
            // registration survives this call.
            if let Err(undo) = self.platform.unsubscribe().await {
                tracing::error!(error = %undo, "Rollback of platform subscription failed");
            }
            return Err(ClientError::PushRegistration(format!(
                "backend registration failed: {e}"
            )));
        }

        tracing::info!(endpoint = %subscription.endpoint, "Push subscription registered");
        Ok(())
    }

    /// Opt out. No-op when not subscribed. Backend record is removed
    /// first; if the platform removal then fails, the error surfaces and
    /// a later `subscribe()` re-registers the surviving endpoint.
    pub async fn unsubscribe(&self) -> Result<()> {
        let Some(subscription) = self.platform.current_subscription().await? else {
            return Ok(());
        };

        self.register(&subscription, "unsubscribe")
            .await
            .map_err(|e| {
                ClientError::PushRegistration(format!("backend removal failed: {e}"))
            })?;

        self.platform.unsubscribe().await?;
        tracing::info!(endpoint = %subscription.endpoint, "Push subscription removed");
        Ok(())
    }

    async fn register(&self, subscription: &PlatformSubscription, action: &str) -> Result<()> {
        let payload = RegistrationPayload {
            action,
            endpoint: &subscription.endpoint,
            keys: RegistrationKeys {
                p256dh: URL_SAFE_NO_PAD.encode(&subscription.p256dh),
                auth: URL_SAFE_NO_PAD.encode(&subscription.auth),
            },
        };

        self.gateway
            .post_no_content(&self.endpoint_path, &payload)
            .await
    }
}
