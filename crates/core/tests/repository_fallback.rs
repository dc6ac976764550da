//! Repository integration tests against an on-disk cache.
//!
//! These tests verify the cache-aside policy end to end:
//! - Cache hits short-circuit the remote
//! - Remote successes are persisted and read back
//! - Remote failures fall back to the cached copy or to an absent value
//! - Unreadable cache files are treated as missing

use std::sync::Arc;

use tempfile::TempDir;

use reelcache_core::{
    cache::{CacheKey, DiskCache, KeyValueStore, KeyValueStoreExt},
    catalog::{Genre, Movie, MovieDetails, Page},
    remote::RemoteError,
    repository::{CachedRepository, CatalogRepository},
    testing::{fixtures, MockRemoteCatalog, RecordedRemoteQuery},
};

/// Test helper wiring a mock remote and a disk cache into a repository.
struct TestHarness {
    repo: CachedRepository,
    remote: Arc<MockRemoteCatalog>,
    cache: Arc<DiskCache>,
    _cache_dir: TempDir,
}

impl TestHarness {
    fn new() -> Self {
        let cache_dir = TempDir::new().expect("Failed to create temp dir");
        let cache = Arc::new(DiskCache::new(cache_dir.path()).expect("Failed to create cache"));
        let remote = Arc::new(MockRemoteCatalog::new());
        let repo = CachedRepository::new(remote.clone(), cache.clone());

        Self {
            repo,
            remote,
            cache,
            _cache_dir: cache_dir,
        }
    }

    async fn fail_remote(&self, status: u16) {
        self.remote
            .set_error(RemoteError::HttpStatus {
                status,
                body: String::new(),
            })
            .await;
    }
}

#[tokio::test]
async fn test_cache_hit_returns_cached_value_without_remote() {
    let h = TestHarness::new();
    let cached = fixtures::numbered_page(1, 5, 3);
    h.cache.save(&CacheKey::TrendingPage(1), &cached).unwrap();
    h.remote.add_page(fixtures::numbered_page(1, 9, 1)).await;

    let page = h.repo.fetch_trending(1, false).await.unwrap();

    assert_eq!(page, cached);
    assert_eq!(h.remote.query_count().await, 0);
}

#[tokio::test]
async fn test_write_then_read_consistency() {
    let h = TestHarness::new();
    h.remote.add_details(fixtures::details(550, "Fight Club")).await;

    let fresh = h.repo.fetch_details(550, true).await.unwrap();
    h.remote.clear_recorded().await;
    h.fail_remote(500).await;

    let again = h.repo.fetch_details(550, false).await.unwrap();
    assert_eq!(again, fresh);
    assert_eq!(h.remote.query_count().await, 0);
    assert!(h.cache.path_for(&CacheKey::Item(550)).exists());
}

#[tokio::test]
async fn test_stale_fallback_for_every_resource() {
    let h = TestHarness::new();
    h.cache.save(&CacheKey::Genres, &fixtures::genres()).unwrap();
    h.cache
        .save(&CacheKey::TrendingPage(2), &fixtures::numbered_page(2, 3, 2))
        .unwrap();
    h.cache
        .save(&CacheKey::Item(1), &fixtures::details(1, "Old"))
        .unwrap();
    h.remote
        .set_error(RemoteError::Transport("connection refused".to_string()))
        .await;

    assert_eq!(h.repo.fetch_genres(true).await, fixtures::genres());
    assert_eq!(h.repo.fetch_trending(2, true).await.unwrap().page, 2);
    assert_eq!(h.repo.fetch_details(1, true).await.unwrap().title, "Old");
    assert_eq!(h.remote.query_count().await, 3);
}

#[tokio::test]
async fn test_absent_values_with_empty_cache() {
    let h = TestHarness::new();
    h.fail_remote(503).await;

    assert!(h.repo.fetch_genres(false).await.is_empty());
    assert!(h.repo.fetch_genres(true).await.is_empty());
    assert!(h.repo.fetch_trending(1, false).await.is_none());
    assert!(h.repo.fetch_details(42, true).await.is_none());
}

#[tokio::test]
async fn test_cached_movie_survives_503() {
    let h = TestHarness::new();
    let page: Page<Movie> = fixtures::page(1, 1, vec![fixtures::movie(10, "Cached Movie")]);
    h.cache.save(&CacheKey::TrendingPage(1), &page).unwrap();
    h.fail_remote(503).await;

    let result = h.repo.fetch_trending(1, false).await.unwrap();

    assert_eq!(result.results.len(), 1);
    assert_eq!(result.results[0].title, "Cached Movie");
}

#[tokio::test]
async fn test_genres_refresh_then_cached_read() {
    let h = TestHarness::new();
    let genres = vec![Genre::new(1, "Action"), Genre::new(2, "Comedy")];
    h.remote.set_genres(genres.clone()).await;

    let fresh = h.repo.fetch_genres(true).await;
    assert_eq!(fresh, genres);

    h.remote.clear_recorded().await;
    let cached = h.repo.fetch_genres(false).await;

    assert_eq!(cached, genres);
    assert!(h.remote.recorded_queries().await.is_empty());
}

#[tokio::test]
async fn test_force_remote_overwrites_cache_entry() {
    let h = TestHarness::new();
    h.cache
        .save(&CacheKey::Genres, &vec![Genre::new(99, "Stale")])
        .unwrap();
    h.remote.set_genres(fixtures::genres()).await;

    h.repo.fetch_genres(true).await;

    let stored: Vec<Genre> = h.cache.load(&CacheKey::Genres).unwrap();
    assert_eq!(stored, fixtures::genres());
    assert_eq!(
        h.remote.recorded_queries().await,
        vec![RecordedRemoteQuery::Genres]
    );
}

#[tokio::test]
async fn test_corrupt_file_is_a_miss() {
    let h = TestHarness::new();
    std::fs::write(h.cache.path_for(&CacheKey::Item(3)), b"{\"id\": 3, \"tit").unwrap();
    h.remote.add_details(fixtures::details(3, "Fresh")).await;

    let details: MovieDetails = h.repo.fetch_details(3, false).await.unwrap();
    assert_eq!(details.title, "Fresh");

    let repaired: MovieDetails = h.cache.load(&CacheKey::Item(3)).unwrap();
    assert_eq!(repaired.title, "Fresh");
}

#[tokio::test]
async fn test_corrupt_file_with_failing_remote_is_absent() {
    let h = TestHarness::new();
    h.cache.write(&CacheKey::TrendingPage(1), b"not json").unwrap();
    h.fail_remote(502).await;

    assert!(h.repo.fetch_trending(1, false).await.is_none());
}
