// SPDX-License-Identifier: MIT

//! Services module - the client's resilience layer.

pub mod classifier;
pub mod gateway;
pub mod push;
pub mod session;

pub use classifier::{classify, ErrorReporter, Notifier, Remediation, TracingNotifier};
pub use gateway::ApiGateway;
pub use push::{Permission, PlatformSubscription, PushManager, PushPlatform};
pub use session::{Navigator, SessionManager, TracingNavigator};
