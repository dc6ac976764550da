use std::future::Future;
use std::sync::Arc;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, warn};

use super::CatalogRepository;
use crate::cache::{CacheKey, CacheLookup, KeyValueStore, KeyValueStoreExt};
use crate::catalog::{Genre, Movie, MovieDetails, Page};
use crate::metrics::{CACHE_WRITE_FAILURES, REPOSITORY_OUTCOMES};
use crate::remote::{RemoteCatalog, RemoteError};

/// Repository backed by a remote catalog and a persistent key-value store.
pub struct CachedRepository {
    remote: Arc<dyn RemoteCatalog>,
    store: Arc<dyn KeyValueStore>,
}

impl CachedRepository {
    pub fn new(remote: Arc<dyn RemoteCatalog>, store: Arc<dyn KeyValueStore>) -> Self {
        Self { remote, store }
    }

    /// Fetch-with-fallback shared by every resource.
    ///
    /// 1. Read the local copy (a corrupt entry, or one `usable` rejects, counts as absent).
    /// 2. Without `force_remote`, a local copy is returned as is.
    /// 3. Otherwise call the remote; on success persist and return the fresh
    ///    value, on failure return the local copy if any.
    async fn fetch_with_fallback<T, F, Fut>(
        &self,
        resource: &'static str,
        key: CacheKey,
        force_remote: bool,
        usable: fn(&T) -> bool,
        fetch: F,
    ) -> Option<T>
    where
        T: Serialize + DeserializeOwned + Send,
        F: FnOnce() -> Fut + Send,
        Fut: Future<Output = Result<T, RemoteError>> + Send,
    {
        let local = match self.store.lookup::<T>(&key) {
            CacheLookup::Hit(value) if usable(&value) => Some(value),
            CacheLookup::Hit(_) => None,
            CacheLookup::Miss => None,
            CacheLookup::Failed(e) => {
                warn!(key = %key, error = %e, "Ignoring unreadable cache entry");
                None
            }
        };

        if !force_remote {
            if let Some(value) = local {
                debug!(key = %key, "Cache hit");
                record_outcome(resource, "cache_hit");
                return Some(value);
            }
        }

        match fetch().await {
            Ok(fresh) => {
                if let Err(e) = self.store.save(&key, &fresh) {
                    warn!(key = %key, error = %e, "Failed to write cache entry");
                    CACHE_WRITE_FAILURES.with_label_values(&[resource]).inc();
                }
                record_outcome(resource, "remote");
                Some(fresh)
            }
            Err(e) => {
                let outcome = if local.is_some() {
                    "stale_fallback"
                } else {
                    "unavailable"
                };
                warn!(
                    key = %key,
                    error = %e,
                    transient = e.is_transient(),
                    outcome,
                    "Remote fetch failed"
                );
                record_outcome(resource, outcome);
                local
            }
        }
    }
}

fn record_outcome(resource: &str, outcome: &str) {
    REPOSITORY_OUTCOMES
        .with_label_values(&[resource, outcome])
        .inc();
}

#[async_trait]
impl CatalogRepository for CachedRepository {
    async fn fetch_genres(&self, force_remote: bool) -> Vec<Genre> {
        // An empty list is the unavailable value, not a local copy.
        self.fetch_with_fallback(
            "genres",
            CacheKey::Genres,
            force_remote,
            |genres: &Vec<Genre>| !genres.is_empty(),
            || self.remote.fetch_genres(),
        )
        .await
        .unwrap_or_default()
    }

    async fn fetch_trending(&self, page: u32, force_remote: bool) -> Option<Page<Movie>> {
        self.fetch_with_fallback(
            "trending",
            CacheKey::TrendingPage(page),
            force_remote,
            |_| true,
            || self.remote.fetch_trending_page(page),
        )
        .await
    }

    async fn fetch_details(&self, id: i64, force_remote: bool) -> Option<MovieDetails> {
        self.fetch_with_fallback(
            "details",
            CacheKey::Item(id),
            force_remote,
            |_| true,
            || self.remote.fetch_details(id),
        )
        .await
    }
}
