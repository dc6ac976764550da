//! Mock remote catalog for testing.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{RwLock, Semaphore};

use crate::catalog::{Genre, Movie, MovieDetails, Page};
use crate::remote::{RemoteCatalog, RemoteError};

/// A recorded remote call for test assertions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordedRemoteQuery {
    Genres,
    TrendingPage(u32),
    Details(i64),
}

/// Mock implementation of the RemoteCatalog trait.
///
/// Provides controllable behavior for testing:
/// - Return configurable genres, pages and details
/// - Track queries for assertions
/// - Simulate failures, once or until cleared
/// - Hold calls in flight until released
///
/// # Example
///
/// ```rust,ignore
/// let remote = MockRemoteCatalog::new();
/// remote.set_genres(fixtures::genres()).await;
///
/// // Simulate the server being down
/// remote.set_error(RemoteError::HttpStatus { status: 503, body: String::new() }).await;
/// assert!(remote.fetch_genres().await.is_err());
/// ```
#[derive(Debug)]
pub struct MockRemoteCatalog {
    genres: Arc<RwLock<Vec<Genre>>>,
    /// Listing pages by page number.
    pages: Arc<RwLock<HashMap<u32, Page<Movie>>>>,
    /// Details by movie ID.
    details: Arc<RwLock<HashMap<i64, MovieDetails>>>,
    /// Recorded queries.
    queries: Arc<RwLock<Vec<RecordedRemoteQuery>>>,
    /// If set, the next operation will fail with this error.
    next_error: Arc<RwLock<Option<RemoteError>>>,
    /// If set, every operation fails with this error.
    persistent_error: Arc<RwLock<Option<RemoteError>>>,
    /// While paused, calls wait for a permit before answering.
    paused: Arc<RwLock<bool>>,
    gate: Arc<Semaphore>,
}

impl Default for MockRemoteCatalog {
    fn default() -> Self {
        Self::new()
    }
}

impl MockRemoteCatalog {
    /// Create a new empty mock remote catalog.
    pub fn new() -> Self {
        Self {
            genres: Arc::new(RwLock::new(Vec::new())),
            pages: Arc::new(RwLock::new(HashMap::new())),
            details: Arc::new(RwLock::new(HashMap::new())),
            queries: Arc::new(RwLock::new(Vec::new())),
            next_error: Arc::new(RwLock::new(None)),
            persistent_error: Arc::new(RwLock::new(None)),
            paused: Arc::new(RwLock::new(false)),
            gate: Arc::new(Semaphore::new(0)),
        }
    }

    // =========================================================================
    // Data Configuration
    // =========================================================================

    /// Set the genre list.
    pub async fn set_genres(&self, genres: Vec<Genre>) {
        *self.genres.write().await = genres;
    }

    /// Add a listing page, keyed by its page number.
    pub async fn add_page(&self, page: Page<Movie>) {
        self.pages.write().await.insert(page.page, page);
    }

    /// Set multiple pages at once.
    pub async fn set_pages(&self, pages: Vec<Page<Movie>>) {
        let mut map = self.pages.write().await;
        map.clear();
        for page in pages {
            map.insert(page.page, page);
        }
    }

    /// Add movie details.
    pub async fn add_details(&self, details: MovieDetails) {
        self.details.write().await.insert(details.id, details);
    }

    // =========================================================================
    // Query Recording
    // =========================================================================

    /// Get all recorded queries.
    pub async fn recorded_queries(&self) -> Vec<RecordedRemoteQuery> {
        self.queries.read().await.clone()
    }

    /// Clear recorded queries.
    pub async fn clear_recorded(&self) {
        self.queries.write().await.clear();
    }

    /// Get the number of queries performed.
    pub async fn query_count(&self) -> usize {
        self.queries.read().await.len()
    }

    /// Wait until at least `count` queries have been recorded.
    pub async fn wait_for_queries(&self, count: usize) {
        while self.query_count().await < count {
            tokio::time::sleep(Duration::from_millis(2)).await;
        }
    }

    // =========================================================================
    // Error Injection
    // =========================================================================

    /// Configure the next operation to fail with the given error.
    pub async fn set_next_error(&self, error: RemoteError) {
        *self.next_error.write().await = Some(error);
    }

    /// Configure every operation to fail with the given error until cleared.
    pub async fn set_error(&self, error: RemoteError) {
        *self.persistent_error.write().await = Some(error);
    }

    /// Clear any pending or persistent error.
    pub async fn clear_errors(&self) {
        *self.next_error.write().await = None;
        *self.persistent_error.write().await = None;
    }

    // =========================================================================
    // In-flight Control
    // =========================================================================

    /// Hold every subsequent call until released.
    pub async fn pause(&self) {
        *self.paused.write().await = true;
    }

    /// Let `calls` held calls complete.
    pub fn release(&self, calls: usize) {
        self.gate.add_permits(calls);
    }

    /// Stop holding calls and release `pending` already waiting.
    pub async fn resume(&self, pending: usize) {
        *self.paused.write().await = false;
        self.gate.add_permits(pending);
    }

    /// Record a query, wait at the gate if paused, then report any injected error.
    async fn begin(&self, query: RecordedRemoteQuery) -> Result<(), RemoteError> {
        self.queries.write().await.push(query);

        if *self.paused.read().await {
            if let Ok(permit) = self.gate.acquire().await {
                permit.forget();
            }
        }

        if let Some(err) = self.next_error.write().await.take() {
            return Err(err);
        }
        if let Some(err) = self.persistent_error.read().await.clone() {
            return Err(err);
        }
        Ok(())
    }
}

#[async_trait]
impl RemoteCatalog for MockRemoteCatalog {
    async fn fetch_genres(&self) -> Result<Vec<Genre>, RemoteError> {
        self.begin(RecordedRemoteQuery::Genres).await?;
        Ok(self.genres.read().await.clone())
    }

    async fn fetch_trending_page(&self, page: u32) -> Result<Page<Movie>, RemoteError> {
        self.begin(RecordedRemoteQuery::TrendingPage(page)).await?;

        self.pages
            .read()
            .await
            .get(&page)
            .cloned()
            .ok_or_else(|| RemoteError::HttpStatus {
                status: 404,
                body: format!("Page {} not found", page),
            })
    }

    async fn fetch_details(&self, id: i64) -> Result<MovieDetails, RemoteError> {
        self.begin(RecordedRemoteQuery::Details(id)).await?;

        self.details
            .read()
            .await
            .get(&id)
            .cloned()
            .ok_or_else(|| RemoteError::HttpStatus {
                status: 404,
                body: format!("Movie {} not found", id),
            })
    }
}
