// SPDX-License-Identifier: MIT

//! Offline cache controller: worker lifecycle, strategy routing, and
//! cache entry storage.

pub mod store;
pub mod strategy;
pub mod worker;

pub use store::{CacheEntry, CacheStore};
pub use strategy::{route, Bucket, FetchRequest, Route, Strategy, OFFLINE_PAGE, PRECACHE_URLS};
pub use worker::{FetchResponse, Network, OfflineController, OriginNetwork, WorkerState};
