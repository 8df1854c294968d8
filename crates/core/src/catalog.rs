use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use thiserror::Error;
use tokio::sync::RwLock;

use crate::domain::item::{EnrichedItem, RawCatalogItem};
use crate::enrichment::Enricher;

pub const DEFAULT_CACHE_TTL: Duration = Duration::from_secs(300);
pub const DEFAULT_FETCH_RETRIES: u32 = 2;
pub const DEFAULT_RETRY_BACKOFF: Duration = Duration::from_millis(100);

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum CatalogError {
    #[error("catalog source failed: {0}")]
    Source(String),
    #[error("catalog unavailable after {attempts} attempt(s): {last_error}")]
    Unavailable { attempts: u32, last_error: String },
}

/// Supplies active, enabled menu entries in display order.
#[async_trait]
pub trait CatalogSource: Send + Sync {
    async fn fetch_active(&self) -> Result<Vec<RawCatalogItem>, CatalogError>;
}

/// In-memory source; returns its items sorted by display order.
#[derive(Clone, Debug, Default)]
pub struct StaticCatalogSource {
    items: Vec<RawCatalogItem>,
}

impl StaticCatalogSource {
    pub fn new(items: Vec<RawCatalogItem>) -> Self {
        Self { items }
    }
}

#[async_trait]
impl CatalogSource for StaticCatalogSource {
    async fn fetch_active(&self) -> Result<Vec<RawCatalogItem>, CatalogError> {
        let mut items = self.items.clone();
        items.sort_by_key(|item| item.display_order);
        Ok(items)
    }
}

/// Enriched snapshot of the catalog. Read-only once built.
#[derive(Clone, Debug, PartialEq)]
pub struct EnrichedCatalog {
    items: Vec<EnrichedItem>,
    fetched_at: DateTime<Utc>,
}

impl EnrichedCatalog {
    pub fn from_raw(raw_items: &[RawCatalogItem]) -> Self {
        Self { items: Enricher.enrich_all(raw_items), fetched_at: Utc::now() }
    }

    pub fn items(&self) -> &[EnrichedItem] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn fetched_at(&self) -> DateTime<Utc> {
        self.fetched_at
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CatalogCacheSettings {
    pub ttl: Duration,
    pub fetch_retries: u32,
    pub retry_backoff: Duration,
}

impl Default for CatalogCacheSettings {
    fn default() -> Self {
        Self {
            ttl: DEFAULT_CACHE_TTL,
            fetch_retries: DEFAULT_FETCH_RETRIES,
            retry_backoff: DEFAULT_RETRY_BACKOFF,
        }
    }
}

struct CachedCatalog {
    catalog: Arc<EnrichedCatalog>,
    loaded_at: Instant,
}

/// Owns the last good enriched catalog for its caller.
///
/// A fresh entry is served as is. Otherwise the source is fetched with
/// retries; when every attempt fails the previous entry is served stale, and
/// only a cache that never loaded reports [`CatalogError::Unavailable`].
/// Empty fetches are returned but never replace the cached entry.
pub struct CatalogCache<S> {
    source: S,
    settings: CatalogCacheSettings,
    state: RwLock<Option<CachedCatalog>>,
}

impl<S> CatalogCache<S>
where
    S: CatalogSource,
{
    pub fn new(source: S, settings: CatalogCacheSettings) -> Self {
        Self { source, settings, state: RwLock::new(None) }
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub async fn get(&self) -> Result<Arc<EnrichedCatalog>, CatalogError> {
        {
            let state = self.state.read().await;
            if let Some(cached) = state.as_ref() {
                if cached.loaded_at.elapsed() < self.settings.ttl {
                    return Ok(Arc::clone(&cached.catalog));
                }
            }
        }
        self.refresh().await
    }

    pub async fn refresh(&self) -> Result<Arc<EnrichedCatalog>, CatalogError> {
        let attempts = self.settings.fetch_retries.saturating_add(1);
        let mut last_error = String::new();

        for attempt in 1..=attempts {
            match self.source.fetch_active().await {
                Ok(raw_items) => {
                    let catalog = Arc::new(EnrichedCatalog::from_raw(&raw_items));
                    if catalog.is_empty() {
                        tracing::warn!(
                            event_name = "catalog.empty",
                            attempt,
                            "catalog source returned no active items"
                        );
                        return Ok(catalog);
                    }

                    tracing::info!(
                        event_name = "catalog.refreshed",
                        items = catalog.len(),
                        attempt,
                        "catalog cache refreshed"
                    );
                    let mut state = self.state.write().await;
                    *state = Some(CachedCatalog {
                        catalog: Arc::clone(&catalog),
                        loaded_at: Instant::now(),
                    });
                    return Ok(catalog);
                }
                Err(error) => {
                    last_error = error.to_string();
                    tracing::warn!(
                        event_name = "catalog.fetch_failed",
                        attempt,
                        attempts,
                        error = %error,
                        "catalog fetch failed"
                    );
                    if attempt < attempts && !self.settings.retry_backoff.is_zero() {
                        tokio::time::sleep(self.settings.retry_backoff * attempt).await;
                    }
                }
            }
        }

        let state = self.state.read().await;
        match state.as_ref() {
            Some(cached) => {
                tracing::warn!(
                    event_name = "catalog.stale_served",
                    items = cached.catalog.len(),
                    "serving stale catalog after failed refresh"
                );
                Ok(Arc::clone(&cached.catalog))
            }
            None => Err(CatalogError::Unavailable { attempts, last_error }),
        }
    }

    pub async fn invalidate(&self) {
        let mut state = self.state.write().await;
        *state = None;
        tracing::debug!(event_name = "catalog.invalidated", "catalog cache cleared");
    }

    pub async fn is_loaded(&self) -> bool {
        self.state.read().await.is_some()
    }
}
