// SPDX-License-Identifier: MIT

//! Cache entry storage, keyed by versioned cache name + request URL.
//!
//! The storage outlives any single page view and is shared between
//! worker generations; activation of a new generation evicts entries
//! whose cache name belongs to an older one.

use chrono::{DateTime, Duration, Utc};
use dashmap::DashMap;
use std::sync::Arc;

/// A stored response: body bytes, content type, and when it was written.
#[derive(Debug, Clone)]
pub struct CacheEntry {
    pub body: Vec<u8>,
    pub content_type: Option<String>,
    pub stored_at: DateTime<Utc>,
}

impl CacheEntry {
    pub fn new(body: Vec<u8>, content_type: Option<String>) -> Self {
        Self {
            body,
            content_type,
            stored_at: Utc::now(),
        }
    }

    /// Whether the entry is younger than `max_age`.
    pub fn is_fresh(&self, max_age: Duration) -> bool {
        Utc::now().signed_duration_since(self.stored_at) < max_age
    }
}

/// Concurrent cache storage. Cheap to clone; all clones share entries.
#[derive(Clone, Default)]
pub struct CacheStore {
    entries: Arc<DashMap<(String, String), CacheEntry>>,
}

impl CacheStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, cache_name: &str, url: &str) -> Option<CacheEntry> {
        self.entries
            .get(&(cache_name.to_string(), url.to_string()))
            .map(|e| e.clone())
    }

    pub fn put(&self, cache_name: &str, url: &str, entry: CacheEntry) {
        self.entries
            .insert((cache_name.to_string(), url.to_string()), entry);
    }

    pub fn contains(&self, cache_name: &str, url: &str) -> bool {
        self.entries
            .contains_key(&(cache_name.to_string(), url.to_string()))
    }

    /// Drop every entry whose cache name does not carry the given
    /// generation suffix. Called on activation of a new worker.
    pub fn evict_other_generations(&self, generation: u32) {
        let suffix = format!("-v{generation}");
        let before = self.entries.len();
        self.entries.retain(|(name, _), _| name.ends_with(&suffix));
        let evicted = before - self.entries.len();
        if evicted > 0 {
            tracing::info!(generation, evicted, "Evicted stale cache generations");
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
