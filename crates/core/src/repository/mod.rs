//! Cache-aside access to catalog data.
//!
//! A repository answers every request from either the remote catalog or the
//! local cache, and never fails: when neither source has the data the caller
//! gets an empty list or `None`.

mod cached;

pub use cached::CachedRepository;

use async_trait::async_trait;

use crate::catalog::{Genre, Movie, MovieDetails, Page};

/// Catalog data with remote-first or cache-first policy per call.
///
/// With `force_remote == false` a cached copy is returned without touching
/// the network. With `force_remote == true` the remote is always tried, and
/// the cached copy is only used when the remote call fails.
#[async_trait]
pub trait CatalogRepository: Send + Sync {
    /// The genre list; empty when unavailable.
    async fn fetch_genres(&self, force_remote: bool) -> Vec<Genre>;

    /// One page of the trending listing.
    async fn fetch_trending(&self, page: u32, force_remote: bool) -> Option<Page<Movie>>;

    /// Details of a single movie.
    async fn fetch_details(&self, id: i64, force_remote: bool) -> Option<MovieDetails>;
}
