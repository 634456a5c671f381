// SPDX-License-Identifier: MIT

//! Per-route caching strategy selection.
//!
//! Strategies are chosen by URL pattern in a fixed precedence order:
//! static assets, then the manifest, then never-cache paths, then
//! navigations, then everything else.

use chrono::Duration;

/// Path the offline fallback page is precached under.
pub const OFFLINE_PAGE: &str = "/offline";

/// Fixed network path of the worker script itself. Never cached so a new
/// deployment is never masked by stale worker code.
pub const WORKER_SCRIPT: &str = "/worker.js";

/// Shell assets precached on install: the offline page and static icons.
pub const PRECACHE_URLS: &[&str] = &[
    OFFLINE_PAGE,
    "/icons/icon-192.png",
    "/icons/icon-512.png",
    "/icons/maskable-512.png",
];

const MANIFEST_PATHS: &[&str] = &["/manifest.webmanifest", "/site.webmanifest"];

const STATIC_EXTENSIONS: &[&str] = &[
    ".png", ".svg", ".ico", ".woff", ".woff2", ".ttf", ".css", ".js",
];

/// Strategy bucket a cache entry is stored under. Bucket names are part
/// of the versioned cache-name scheme.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Bucket {
    StaticImmutable,
    ManifestDaily,
    NoStore,
    Runtime,
}

impl Bucket {
    pub fn as_str(&self) -> &'static str {
        match self {
            Bucket::StaticImmutable => "static-immutable",
            Bucket::ManifestDaily => "manifest-daily",
            Bucket::NoStore => "no-store",
            Bucket::Runtime => "runtime",
        }
    }

    /// Versioned cache name. Bumping the generation on deploy strands
    /// old entries, which activation then evicts.
    pub fn cache_name(&self, generation: u32) -> String {
        format!("{}-v{}", self.as_str(), generation)
    }
}

/// How a request is served.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    /// Serve from cache while fresh; fetch and store on miss or when the
    /// entry is older than `max_age` (falling back to the stale copy if
    /// the network is unreachable).
    CacheFirst { max_age: Duration },
    /// Always hit the network; never read or write the cache.
    NetworkOnly,
    /// Network first; on failure fall back to a cached copy.
    NetworkFirst,
    /// Navigation: network first, offline fallback page on failure.
    Navigation,
}

/// A request as seen by the cache controller. Only same-origin GET
/// traffic reaches this layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchRequest {
    /// Path component of the URL, e.g. `/icons/icon-192.png`.
    pub url: String,
    /// True for HTML page loads (top-level navigations).
    pub is_navigation: bool,
}

impl FetchRequest {
    pub fn asset(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            is_navigation: false,
        }
    }

    pub fn navigation(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            is_navigation: true,
        }
    }
}

/// Resolved routing decision for one request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Route {
    pub bucket: Bucket,
    pub strategy: Strategy,
}

/// Choose the strategy for a request, evaluated in precedence order.
pub fn route(request: &FetchRequest) -> Route {
    let path = request.url.split('?').next().unwrap_or(&request.url);

    // 1. Icons and long-lived static assets: cache-first, 1-year
    //    freshness, revalidated only when absent.
    if !request.is_navigation && is_static_asset(path) {
        return Route {
            bucket: Bucket::StaticImmutable,
            strategy: Strategy::CacheFirst {
                max_age: Duration::days(365),
            },
        };
    }

    // 2. Web app manifest: cache-first with a 1-day revalidation window.
    if MANIFEST_PATHS.contains(&path) {
        return Route {
            bucket: Bucket::ManifestDaily,
            strategy: Strategy::CacheFirst {
                max_age: Duration::days(1),
            },
        };
    }

    // 3. The worker's own script and dynamic API endpoints: never cached.
    if path == WORKER_SCRIPT || path.starts_with("/api/") {
        return Route {
            bucket: Bucket::NoStore,
            strategy: Strategy::NetworkOnly,
        };
    }

    // 4. Navigations get the offline fallback when the network is down.
    if request.is_navigation {
        return Route {
            bucket: Bucket::Runtime,
            strategy: Strategy::Navigation,
        };
    }

    // 5. Everything else: network-first with cache fallback.
    Route {
        bucket: Bucket::Runtime,
        strategy: Strategy::NetworkFirst,
    }
}

fn is_static_asset(path: &str) -> bool {
    // Worker script matches a static extension but must never be cached;
    // rule 3 owns it, so carve it out here.
    if path == WORKER_SCRIPT {
        return false;
    }
    path.starts_with("/icons/") || STATIC_EXTENSIONS.iter().any(|ext| path.ends_with(ext))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_icons_are_cache_first_for_a_year() {
        let r = route(&FetchRequest::asset("/icons/icon-192.png"));
        assert_eq!(r.bucket, Bucket::StaticImmutable);
        assert_eq!(
            r.strategy,
            Strategy::CacheFirst {
                max_age: Duration::days(365)
            }
        );
    }

    #[test]
    fn test_manifest_revalidates_daily() {
        let r = route(&FetchRequest::asset("/manifest.webmanifest"));
        assert_eq!(r.bucket, Bucket::ManifestDaily);
        assert_eq!(
            r.strategy,
            Strategy::CacheFirst {
                max_age: Duration::days(1)
            }
        );
    }

    #[test]
    fn test_worker_script_and_api_never_cached() {
        for path in [WORKER_SCRIPT, "/api/events", "/api/auth/me"] {
            let r = route(&FetchRequest::asset(path));
            assert_eq!(r.bucket, Bucket::NoStore, "{path}");
            assert_eq!(r.strategy, Strategy::NetworkOnly, "{path}");
        }
    }

    #[test]
    fn test_navigations_get_offline_fallback() {
        let r = route(&FetchRequest::navigation("/calendar"));
        assert_eq!(r.strategy, Strategy::Navigation);
    }

    #[test]
    fn test_everything_else_is_network_first() {
        let r = route(&FetchRequest::asset("/data/holidays.json"));
        assert_eq!(r.bucket, Bucket::Runtime);
        assert_eq!(r.strategy, Strategy::NetworkFirst);
    }

    #[test]
    fn test_query_string_ignored_for_routing() {
        let r = route(&FetchRequest::asset("/icons/icon-192.png?v=2"));
        assert_eq!(r.bucket, Bucket::StaticImmutable);
    }

    #[test]
    fn test_cache_names_are_versioned() {
        assert_eq!(Bucket::StaticImmutable.cache_name(3), "static-immutable-v3");
        assert_eq!(Bucket::Runtime.cache_name(1), "runtime-v1");
    }
}
