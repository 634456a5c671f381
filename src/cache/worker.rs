// SPDX-License-Identifier: MIT

//! Offline cache controller: the service worker modeled as an explicit
//! state machine.
//!
//! Lifecycle: `Installing → Waiting → Activating → Active`, with
//! `Redundant` as the terminal superseded/failed state. `install`
//! always completes before `activate`, which always completes before any
//! fetch is served from the newly activated cache generation.

use crate::cache::store::{CacheEntry, CacheStore};
use crate::cache::strategy::{route, Bucket, FetchRequest, Strategy, OFFLINE_PAGE, PRECACHE_URLS};
use crate::error::{ClientError, Result};
use futures_util::future::BoxFuture;
use futures_util::FutureExt;
use std::sync::Arc;

/// Worker lifecycle states.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkerState {
    Installing,
    Waiting,
    Activating,
    Active,
    Redundant,
}

/// A response as served to the intercepted fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchResponse {
    pub status: u16,
    pub content_type: Option<String>,
    pub body: Vec<u8>,
    /// True when the bytes came from cache rather than the network.
    pub from_cache: bool,
}

impl FetchResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    fn from_entry(entry: &CacheEntry) -> Self {
        Self {
            status: 200,
            content_type: entry.content_type.clone(),
            body: entry.body.clone(),
            from_cache: true,
        }
    }
}

/// Seam over actual connectivity so tests can simulate an unreachable
/// network. The production impl fetches from the app origin.
pub trait Network: Send + Sync {
    fn fetch<'a>(&'a self, request: &'a FetchRequest) -> BoxFuture<'a, Result<FetchResponse>>;
}

/// Network impl backed by reqwest against the app's own origin.
pub struct OriginNetwork {
    http: reqwest::Client,
    origin: String,
}

impl OriginNetwork {
    pub fn new(origin: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            origin: origin.into().trim_end_matches('/').to_string(),
        }
    }
}

impl Network for OriginNetwork {
    fn fetch<'a>(&'a self, request: &'a FetchRequest) -> BoxFuture<'a, Result<FetchResponse>> {
        async move {
            let url = format!("{}{}", self.origin, request.url);
            let response = self
                .http
                .get(&url)
                .send()
                .await
                .map_err(|e| ClientError::Transport(format!("{e}")))?;

            let status = response.status().as_u16();
            let content_type = response
                .headers()
                .get(reqwest::header::CONTENT_TYPE)
                .and_then(|v| v.to_str().ok())
                .map(|s| s.to_string());
            let body = response
                .bytes()
                .await
                .map_err(|e| ClientError::Transport(format!("{e}")))?
                .to_vec();

            Ok(FetchResponse {
                status,
                content_type,
                body,
                from_cache: false,
            })
        }
        .boxed()
    }
}

/// The service worker: owns cache storage independently of the page
/// runtime and serves intercepted requests per strategy.
pub struct OfflineController<N: Network> {
    state: WorkerState,
    generation: u32,
    cache: CacheStore,
    network: Arc<N>,
    /// Whether activation claimed existing clients. Required so a page
    /// open during deploy reloads against the new cache generation.
    claimed: bool,
}

impl<N: Network> OfflineController<N> {
    /// A freshly registered worker, in `Installing`.
    pub fn new(network: Arc<N>, cache: CacheStore, generation: u32) -> Self {
        Self {
            state: WorkerState::Installing,
            generation,
            cache,
            network,
            claimed: false,
        }
    }

    pub fn state(&self) -> WorkerState {
        self.state
    }

    pub fn generation(&self) -> u32 {
        self.generation
    }

    pub fn has_claimed_clients(&self) -> bool {
        self.claimed
    }

    /// Install: precache the shell needed to render the offline fallback
    /// page and static icons. On failure the worker becomes redundant.
    pub async fn install(&mut self) -> Result<()> {
        self.require_state(WorkerState::Installing, "install")?;

        for url in PRECACHE_URLS {
            let request = FetchRequest::asset(*url);
            match self.network.fetch(&request).await {
                Ok(response) if response.is_success() => {
                    let name = Bucket::StaticImmutable.cache_name(self.generation);
                    self.cache.put(
                        &name,
                        url,
                        CacheEntry::new(response.body, response.content_type),
                    );
                }
                Ok(response) => {
                    self.state = WorkerState::Redundant;
                    return Err(ClientError::Lifecycle(format!(
                        "precache of {url} failed with status {}",
                        response.status
                    )));
                }
                Err(e) => {
                    self.state = WorkerState::Redundant;
                    return Err(ClientError::Lifecycle(format!("precache of {url} failed: {e}")));
                }
            }
        }

        tracing::info!(
            generation = self.generation,
            precached = PRECACHE_URLS.len(),
            "Worker installed"
        );
        self.state = WorkerState::Waiting;
        Ok(())
    }

    /// Activate: evict stale cache generations and take control of open
    /// clients immediately rather than waiting for a reload.
    pub fn activate(&mut self) -> Result<()> {
        self.require_state(WorkerState::Waiting, "activate")?;
        self.state = WorkerState::Activating;

        self.cache.evict_other_generations(self.generation);
        self.claimed = true;

        self.state = WorkerState::Active;
        tracing::info!(generation = self.generation, "Worker active, clients claimed");
        Ok(())
    }

    /// Mark this worker as superseded. Terminal.
    pub fn retire(&mut self) {
        self.state = WorkerState::Redundant;
    }

    /// Serve an intercepted request per its routed strategy. Only an
    /// active worker serves fetches.
    pub async fn handle_fetch(&self, request: &FetchRequest) -> Result<FetchResponse> {
        self.require_state(WorkerState::Active, "handle_fetch")?;

        let routed = route(request);
        match routed.strategy {
            Strategy::CacheFirst { max_age } => {
                let name = routed.bucket.cache_name(self.generation);
                if let Some(entry) = self.cache.get(&name, &request.url) {
                    if entry.is_fresh(max_age) {
                        return Ok(FetchResponse::from_entry(&entry));
                    }
                    // Stale: revalidate against the network, falling
                    // back to the stale copy when unreachable.
                    match self.fetch_and_store(request, &name).await {
                        Ok(response) => Ok(response),
                        Err(e) => {
                            tracing::debug!(url = %request.url, error = %e, "Revalidation failed, serving stale entry");
                            Ok(FetchResponse::from_entry(&entry))
                        }
                    }
                } else {
                    // Cache miss falls through to the network.
                    self.fetch_and_store(request, &name).await
                }
            }
            Strategy::NetworkOnly => self.network.fetch(request).await,
            Strategy::Navigation => match self.network.fetch(request).await {
                Ok(response) => Ok(response),
                Err(e) if e.is_offline() => self.offline_fallback(),
                Err(e) => Err(e),
            },
            Strategy::NetworkFirst => {
                let name = routed.bucket.cache_name(self.generation);
                match self.fetch_and_store(request, &name).await {
                    Ok(response) => Ok(response),
                    Err(e) => match self.cache.get(&name, &request.url) {
                        Some(entry) => Ok(FetchResponse::from_entry(&entry)),
                        None => Err(e),
                    },
                }
            }
        }
    }

    /// Fetch from the network; store successful responses under `name`.
    async fn fetch_and_store(&self, request: &FetchRequest, name: &str) -> Result<FetchResponse> {
        let response = self.network.fetch(request).await?;
        if response.is_success() {
            self.cache.put(
                name,
                &request.url,
                CacheEntry::new(response.body.clone(), response.content_type.clone()),
            );
        }
        Ok(response)
    }

    /// The precached offline fallback page. Missing it means install
    /// never completed, which is a programming error surfaced as a miss.
    fn offline_fallback(&self) -> Result<FetchResponse> {
        let name = Bucket::StaticImmutable.cache_name(self.generation);
        self.cache
            .get(&name, OFFLINE_PAGE)
            .map(|entry| FetchResponse::from_entry(&entry))
            .ok_or_else(|| {
                ClientError::CacheMiss(format!("offline fallback page not precached in {name}"))
            })
    }

    fn require_state(&self, expected: WorkerState, operation: &str) -> Result<()> {
        if self.state != expected {
            return Err(ClientError::Lifecycle(format!(
                "{operation} requires {expected:?}, worker is {:?}",
                self.state
            )));
        }
        Ok(())
    }
}
