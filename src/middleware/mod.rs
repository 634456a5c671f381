// SPDX-License-Identifier: MIT

//! Middleware for the client-hosted boundary routes.

pub mod cors;

pub use cors::cors_boundary;
