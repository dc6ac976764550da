//! Mock catalog repository for testing controllers.

use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{RwLock, Semaphore};

use crate::catalog::{Genre, Movie, MovieDetails, Page};
use crate::repository::CatalogRepository;

/// A recorded repository call, with the policy it was made under.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordedRepositoryCall {
    Genres { force_remote: bool },
    Trending { page: u32, force_remote: bool },
    Details { id: i64, force_remote: bool },
}

/// Mock implementation of the CatalogRepository trait.
///
/// Answers straight from configured data. Pages marked as failing answer
/// `None`, the same way a real repository reports "no remote, no cache".
#[derive(Debug)]
pub struct MockRepository {
    genres: Arc<RwLock<Vec<Genre>>>,
    pages: Arc<RwLock<HashMap<u32, Page<Movie>>>>,
    details: Arc<RwLock<HashMap<i64, MovieDetails>>>,
    failing_pages: Arc<RwLock<HashSet<u32>>>,
    calls: Arc<RwLock<Vec<RecordedRepositoryCall>>>,
    paused: Arc<RwLock<bool>>,
    gate: Arc<Semaphore>,
}

impl Default for MockRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl MockRepository {
    /// Create a new empty mock repository.
    pub fn new() -> Self {
        Self {
            genres: Arc::new(RwLock::new(Vec::new())),
            pages: Arc::new(RwLock::new(HashMap::new())),
            details: Arc::new(RwLock::new(HashMap::new())),
            failing_pages: Arc::new(RwLock::new(HashSet::new())),
            calls: Arc::new(RwLock::new(Vec::new())),
            paused: Arc::new(RwLock::new(false)),
            gate: Arc::new(Semaphore::new(0)),
        }
    }

    pub async fn set_genres(&self, genres: Vec<Genre>) {
        *self.genres.write().await = genres;
    }

    /// Set multiple pages at once.
    pub async fn set_pages(&self, pages: Vec<Page<Movie>>) {
        let mut map = self.pages.write().await;
        map.clear();
        for page in pages {
            map.insert(page.page, page);
        }
    }

    /// Replace the content served for one page number.
    pub async fn replace_page(&self, page: Page<Movie>) {
        self.pages.write().await.insert(page.page, page);
    }

    pub async fn add_details(&self, details: MovieDetails) {
        self.details.write().await.insert(details.id, details);
    }

    /// Make a page answer `None` (or answer normally again).
    pub async fn set_page_failing(&self, page: u32, failing: bool) {
        let mut failing_pages = self.failing_pages.write().await;
        if failing {
            failing_pages.insert(page);
        } else {
            failing_pages.remove(&page);
        }
    }

    /// Get all recorded calls.
    pub async fn recorded_calls(&self) -> Vec<RecordedRepositoryCall> {
        self.calls.read().await.clone()
    }

    /// Pages requested so far, in call order.
    pub async fn requested_pages(&self) -> Vec<u32> {
        self.calls
            .read()
            .await
            .iter()
            .filter_map(|call| match call {
                RecordedRepositoryCall::Trending { page, .. } => Some(*page),
                _ => None,
            })
            .collect()
    }

    pub async fn call_count(&self) -> usize {
        self.calls.read().await.len()
    }

    pub async fn clear_recorded(&self) {
        self.calls.write().await.clear();
    }

    /// Wait until at least `count` calls have been recorded.
    pub async fn wait_for_calls(&self, count: usize) {
        while self.call_count().await < count {
            tokio::time::sleep(Duration::from_millis(2)).await;
        }
    }

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

    async fn begin(&self, call: RecordedRepositoryCall) {
        self.calls.write().await.push(call);

        if *self.paused.read().await {
            if let Ok(permit) = self.gate.acquire().await {
                permit.forget();
            }
        }
    }
}

#[async_trait]
impl CatalogRepository for MockRepository {
    async fn fetch_genres(&self, force_remote: bool) -> Vec<Genre> {
        self.begin(RecordedRepositoryCall::Genres { force_remote })
            .await;
        self.genres.read().await.clone()
    }

    async fn fetch_trending(&self, page: u32, force_remote: bool) -> Option<Page<Movie>> {
        self.begin(RecordedRepositoryCall::Trending { page, force_remote })
            .await;

        if self.failing_pages.read().await.contains(&page) {
            return None;
        }
        self.pages.read().await.get(&page).cloned()
    }

    async fn fetch_details(&self, id: i64, force_remote: bool) -> Option<MovieDetails> {
        self.begin(RecordedRepositoryCall::Details { id, force_remote })
            .await;
        self.details.read().await.get(&id).cloned()
    }
}
