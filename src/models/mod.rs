// SPDX-License-Identifier: MIT

//! Data models for the client runtime.

pub mod user;

pub use user::UserProfile;
