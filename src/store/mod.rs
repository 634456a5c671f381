// SPDX-License-Identifier: MIT

//! Persistent client-side state: session token, cached profile, and the
//! onboarding flag with its cookie mirror.

pub mod kv;
pub mod onboarding;

pub use kv::TokenStore;
pub use onboarding::OnboardingStore;
