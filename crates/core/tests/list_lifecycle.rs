//! List and details controller integration tests.
//!
//! These tests verify the controllers over a real repository and mock remote:
//! - Pagination until exhaustion, with no request past the last page
//! - One in-flight load at a time
//! - Offline reads from the cache and resync on reconnect
//! - Stale results from a reset session are discarded
//! - Local filtering scenarios

use std::collections::BTreeSet;
use std::sync::Arc;
use std::time::Duration;

use reelcache_core::{
    connectivity::Connectivity,
    controller::{DetailsController, DetailsState, ListController, ListSnapshot, LOAD_FAILED_MESSAGE},
    remote::RemoteError,
    repository::CachedRepository,
    testing::{fixtures, MemoryStore, MockRemoteCatalog, MockRepository, RecordedRemoteQuery},
};

const WAIT: Duration = Duration::from_secs(5);

/// Test helper wiring a list controller to a cached repository.
struct TestHarness {
    controller: Arc<ListController>,
    remote: Arc<MockRemoteCatalog>,
    store: Arc<MemoryStore>,
    connectivity: Connectivity,
}

impl TestHarness {
    async fn new(total_pages: u32, per_page: usize) -> Self {
        let remote = Arc::new(MockRemoteCatalog::new());
        remote.set_genres(fixtures::genres()).await;
        for page in 1..=total_pages {
            remote
                .add_page(fixtures::numbered_page(page, total_pages, per_page))
                .await;
        }

        let store = Arc::new(MemoryStore::new());
        let repo = Arc::new(CachedRepository::new(remote.clone(), store.clone()));
        let connectivity = Connectivity::new(true);
        let controller = ListController::new(repo, connectivity.clone());

        Self {
            controller,
            remote,
            store,
            connectivity,
        }
    }

    async fn wait_for(&self, predicate: impl FnMut(&ListSnapshot) -> bool) -> ListSnapshot {
        let mut sub = self.controller.subscribe();
        tokio::time::timeout(WAIT, sub.wait_for(predicate))
            .await
            .expect("Timed out waiting for list state")
            .expect("Controller dropped")
    }

    async fn trending_requests(&self) -> Vec<u32> {
        self.remote
            .recorded_queries()
            .await
            .into_iter()
            .filter_map(|q| match q {
                RecordedRemoteQuery::TrendingPage(page) => Some(page),
                _ => None,
            })
            .collect()
    }
}

// =============================================================================
// Pagination
// =============================================================================

#[tokio::test]
async fn test_pagination_exhausts_after_total_pages() {
    let h = TestHarness::new(3, 4).await;

    for _ in 0..3 {
        assert!(h.controller.snapshot().can_load_more);
        h.controller.load_next_page().await;
    }

    let snapshot = h.controller.snapshot();
    assert!(!snapshot.can_load_more);
    assert_eq!(snapshot.items.len(), 12);
    assert_eq!(snapshot.current_page, 4);
    assert_eq!(snapshot.total_pages, 3);

    h.controller.load_next_page().await;
    assert_eq!(h.trending_requests().await, vec![1, 2, 3]);
    assert_eq!(h.controller.snapshot().items.len(), 12);
}

#[tokio::test]
async fn test_empty_listing_is_exhausted_immediately() {
    let h = TestHarness::new(0, 0).await;
    h.remote.add_page(fixtures::page(1, 0, vec![])).await;

    h.controller.load_next_page().await;

    let snapshot = h.controller.snapshot();
    assert!(!snapshot.can_load_more);
    assert!(snapshot.error_message.is_none());
    assert!(snapshot.items.is_empty());
}

#[tokio::test]
async fn test_concurrent_loads_issue_one_request() {
    let h = TestHarness::new(5, 2).await;
    h.remote.pause().await;

    let loads: Vec<_> = (0..4)
        .map(|_| {
            let controller = h.controller.clone();
            tokio::spawn(async move { controller.load_next_page().await })
        })
        .collect();

    h.remote.wait_for_queries(1).await;
    assert!(h.controller.snapshot().is_loading);
    tokio::time::sleep(Duration::from_millis(20)).await;
    h.remote.resume(1).await;

    for result in futures::future::join_all(loads).await {
        result.unwrap();
    }

    assert_eq!(h.trending_requests().await, vec![1]);
    let snapshot = h.controller.snapshot();
    assert_eq!(snapshot.items.len(), 2);
    assert_eq!(snapshot.current_page, 2);
    assert!(!snapshot.is_loading);
}

#[tokio::test]
async fn test_failure_with_empty_cache_sets_error() {
    let h = TestHarness::new(2, 2).await;
    h.remote
        .set_error(RemoteError::Transport("offline".to_string()))
        .await;

    h.controller.load_next_page().await;

    let snapshot = h.controller.snapshot();
    assert_eq!(snapshot.error_message.as_deref(), Some(LOAD_FAILED_MESSAGE));
    assert!(!snapshot.can_load_more);

    h.remote.clear_errors().await;
    h.controller.retry().await;
    let snapshot = h.controller.snapshot();
    assert!(snapshot.error_message.is_none());
    assert_eq!(snapshot.items.len(), 2);
}

// =============================================================================
// Connectivity
// =============================================================================

#[tokio::test]
async fn test_offline_reads_cached_pages() {
    let h = TestHarness::new(2, 3).await;
    h.controller.load_next_page().await;
    assert!(h.store.contains(&reelcache_core::CacheKey::TrendingPage(1)));

    h.connectivity.set_online(false);
    h.remote
        .set_error(RemoteError::Transport("offline".to_string()))
        .await;
    h.remote.clear_recorded().await;

    h.controller.reset_and_load().await;

    let snapshot = h.controller.snapshot();
    assert_eq!(snapshot.items.len(), 3);
    assert!(snapshot.error_message.is_none());
    assert!(h.remote.recorded_queries().await.is_empty());
}

#[tokio::test]
async fn test_start_loads_genres_and_first_page() {
    let h = TestHarness::new(2, 2).await;

    h.controller.start().await;

    let snapshot = h.controller.snapshot();
    assert_eq!(snapshot.genres, fixtures::genres());
    assert_eq!(snapshot.items.len(), 2);
    assert!(!snapshot.is_offline);
    assert_eq!(
        h.remote.recorded_queries().await,
        vec![RecordedRemoteQuery::Genres, RecordedRemoteQuery::TrendingPage(1)]
    );
}

#[tokio::test]
async fn test_reconnect_resets_to_first_page() {
    let h = TestHarness::new(3, 2).await;
    h.controller.start().await;
    h.controller.load_next_page().await;
    assert_eq!(h.controller.snapshot().items.len(), 4);

    h.connectivity.set_online(false);
    let snapshot = h.wait_for(|s| s.is_offline).await;
    assert_eq!(snapshot.items.len(), 4);

    h.remote.clear_recorded().await;
    h.connectivity.set_online(true);

    let snapshot = h
        .wait_for(|s| !s.is_offline && !s.is_loading && s.current_page == 2)
        .await;
    assert_eq!(snapshot.items.len(), 2);
    assert_eq!(h.trending_requests().await, vec![1]);
}

#[tokio::test]
async fn test_online_to_offline_keeps_data() {
    let h = TestHarness::new(2, 2).await;
    h.controller.start().await;
    h.remote.clear_recorded().await;

    h.connectivity.set_online(false);
    let snapshot = h.wait_for(|s| s.is_offline).await;

    assert_eq!(snapshot.items.len(), 2);
    tokio::time::sleep(Duration::from_millis(20)).await;
    assert!(h.remote.recorded_queries().await.is_empty());
}

#[tokio::test]
async fn test_stale_result_after_reset_is_discarded() {
    let repo = Arc::new(MockRepository::new());
    repo.set_pages(vec![
        fixtures::page(1, 2, vec![fixtures::movie(1, "Old Page")]),
        fixtures::numbered_page(2, 2, 1),
    ])
    .await;
    let controller = ListController::new(repo.clone(), Connectivity::new(true));

    repo.pause().await;
    let stale = {
        let controller = controller.clone();
        tokio::spawn(async move { controller.load_next_page().await })
    };
    repo.wait_for_calls(1).await;

    repo.replace_page(fixtures::page(1, 2, vec![fixtures::movie(100, "New Page")]))
        .await;
    let fresh = {
        let controller = controller.clone();
        tokio::spawn(async move { controller.reset_and_load().await })
    };
    repo.wait_for_calls(2).await;

    // Held calls are released in order: the stale load answers first.
    repo.release(1);
    stale.await.unwrap();
    repo.resume(1).await;
    fresh.await.unwrap();

    let snapshot = controller.snapshot();
    let titles: Vec<&str> = snapshot.items.iter().map(|m| m.title.as_str()).collect();
    assert_eq!(titles, vec!["New Page"]);
    assert_eq!(snapshot.current_page, 2);
    assert!(!snapshot.is_loading);
    assert_eq!(repo.requested_pages().await, vec![1, 1]);
}

// =============================================================================
// Filtering
// =============================================================================

#[tokio::test]
async fn test_search_toy_scenario() {
    let repo = Arc::new(MockRepository::new());
    repo.set_pages(vec![fixtures::page(
        1,
        1,
        vec![
            fixtures::movie(1, "Ratatouille"),
            fixtures::movie(2, "Toy Story"),
            fixtures::movie(3, "Tangled"),
        ],
    )])
    .await;
    let controller = ListController::new(repo, Connectivity::new(true));
    controller.load_next_page().await;

    controller.set_search_text("toy").await;

    let filtered: Vec<String> = controller
        .snapshot()
        .filtered
        .into_iter()
        .map(|m| m.title)
        .collect();
    assert_eq!(filtered, vec!["Toy Story".to_string()]);
}

#[tokio::test]
async fn test_genre_selection_scenario() {
    let repo = Arc::new(MockRepository::new());
    repo.set_pages(vec![fixtures::page(
        1,
        1,
        vec![
            fixtures::movie_with_genres(1, "First", &[1]),
            fixtures::movie_with_genres(2, "Second", &[2]),
            fixtures::movie_with_genres(3, "Third", &[1, 2]),
        ],
    )])
    .await;
    let controller = ListController::new(repo, Connectivity::new(true));
    controller.load_next_page().await;

    controller.set_selected_genres(BTreeSet::from([1])).await;

    let ids: Vec<i64> = controller.snapshot().filtered.iter().map(|m| m.id).collect();
    assert_eq!(ids, vec![1, 3]);
}

#[tokio::test]
async fn test_filter_applies_to_later_pages() {
    let h = TestHarness::new(2, 10).await;
    h.controller.set_search_text("movie 1").await;

    h.controller.load_next_page().await;
    let first: Vec<i64> = h.controller.snapshot().filtered.iter().map(|m| m.id).collect();
    assert_eq!(first, vec![1, 10]);

    h.controller.load_next_page().await;
    let all: Vec<i64> = h.controller.snapshot().filtered.iter().map(|m| m.id).collect();
    assert_eq!(all, vec![1, 10, 11, 12, 13, 14, 15, 16, 17, 18, 19]);
}

// =============================================================================
// Details
// =============================================================================

#[tokio::test]
async fn test_details_fall_back_to_cache_when_remote_fails() {
    let remote = Arc::new(MockRemoteCatalog::new());
    let store = Arc::new(MemoryStore::new());
    let repo = Arc::new(CachedRepository::new(remote.clone(), store));
    remote.add_details(fixtures::details(5, "Cached Movie")).await;

    let controller = DetailsController::new(5, repo);
    controller.load().await;
    assert!(matches!(controller.state(), DetailsState::Loaded(_)));

    remote
        .set_error(RemoteError::HttpStatus {
            status: 503,
            body: String::new(),
        })
        .await;
    controller.retry().await;

    assert_eq!(controller.state().details().unwrap().title, "Cached Movie");
    assert_eq!(
        remote.recorded_queries().await,
        vec![RecordedRemoteQuery::Details(5), RecordedRemoteQuery::Details(5)]
    );
}

#[tokio::test]
async fn test_details_failure_without_cache() {
    let remote = Arc::new(MockRemoteCatalog::new());
    let repo = Arc::new(CachedRepository::new(remote.clone(), Arc::new(MemoryStore::new())));
    remote
        .set_error(RemoteError::Transport("offline".to_string()))
        .await;

    let controller = DetailsController::new(5, repo);
    controller.load().await;

    assert!(matches!(controller.state(), DetailsState::Failed(_)));
}
