//! Testing utilities and mock implementations.
//!
//! This module provides in-memory doubles for the remote catalog, the cache
//! store and the repository, so the controllers can be exercised without a
//! network or a filesystem.
//!
//! # Example
//!
//! ```rust,ignore
//! use reelcache_core::testing::{fixtures, MemoryStore, MockRemoteCatalog};
//!
//! let remote = MockRemoteCatalog::new();
//! remote.set_pages(vec![fixtures::page(1, 2, vec![fixtures::movie(1, "Heat")])]).await;
//!
//! let store = MemoryStore::new();
//! // Wire both into a CachedRepository...
//! ```

mod memory_store;
mod mock_remote;
mod mock_repository;

pub use memory_store::MemoryStore;
pub use mock_remote::{MockRemoteCatalog, RecordedRemoteQuery};
pub use mock_repository::{MockRepository, RecordedRepositoryCall};

/// Test fixtures and helper functions.
pub mod fixtures {
    use crate::catalog::{Genre, Movie, MovieDetails, Page, SpokenLanguage};

    /// Create a movie with a release date and no genres.
    pub fn movie(id: i64, title: &str) -> Movie {
        Movie {
            id,
            title: title.to_string(),
            poster_path: Some(format!("/poster_{}.jpg", id)),
            release_date: Some("2020-06-15".to_string()),
            genre_ids: None,
        }
    }

    /// Create a movie tagged with the given genres.
    pub fn movie_with_genres(id: i64, title: &str, genre_ids: &[i64]) -> Movie {
        Movie {
            genre_ids: Some(genre_ids.to_vec()),
            ..movie(id, title)
        }
    }

    /// The two-genre list used across repository tests.
    pub fn genres() -> Vec<Genre> {
        vec![Genre::new(1, "Action"), Genre::new(2, "Comedy")]
    }

    /// Create a listing page.
    pub fn page(page: u32, total_pages: u32, results: Vec<Movie>) -> Page<Movie> {
        Page {
            page,
            total_results: results.len() as u64 * total_pages as u64,
            results,
            total_pages,
        }
    }

    /// Create a page of `per_page` generated movies with IDs unique across pages.
    pub fn numbered_page(page: u32, total_pages: u32, per_page: usize) -> Page<Movie> {
        let results = (0..per_page)
            .map(|i| {
                let id = (page as i64 - 1) * per_page as i64 + i as i64 + 1;
                movie(id, &format!("Movie {}", id))
            })
            .collect();
        self::page(page, total_pages, results)
    }

    /// Create movie details with every optional field populated.
    pub fn details(id: i64, title: &str) -> MovieDetails {
        MovieDetails {
            id,
            title: title.to_string(),
            poster_path: Some(format!("/poster_{}.jpg", id)),
            release_date: Some("1995-09-22".to_string()),
            genres: Some(genres()),
            overview: Some(format!("An overview of {}.", title)),
            homepage: Some(format!("https://example.com/movie/{}", id)),
            budget: Some(160_000_000),
            revenue: Some(825_532_764),
            spoken_languages: Some(vec![SpokenLanguage {
                english_name: Some("English".to_string()),
                iso_639_1: Some("en".to_string()),
                name: Some("English".to_string()),
            }]),
            status: Some("Released".to_string()),
            runtime: Some(127),
        }
    }

    /// Details with only the required fields.
    pub fn sparse_details(id: i64, title: &str) -> MovieDetails {
        MovieDetails {
            id,
            title: title.to_string(),
            poster_path: None,
            release_date: None,
            genres: None,
            overview: None,
            homepage: None,
            budget: None,
            revenue: None,
            spoken_languages: None,
            status: None,
            runtime: None,
        }
    }
}
