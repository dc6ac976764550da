//! Remote catalog API access.
//!
//! The rest of the crate only sees the [`RemoteCatalog`] trait; [`TmdbClient`]
//! is the HTTP implementation against TMDB v3.

mod endpoint;
mod tmdb;

pub use endpoint::Endpoint;
pub use tmdb::TmdbClient;

use async_trait::async_trait;
use thiserror::Error;

use crate::catalog::{Genre, Movie, MovieDetails, Page};

/// Errors returned by a remote catalog call.
#[derive(Debug, Clone, Error)]
pub enum RemoteError {
    /// The request could not be built (bad parameters, bad base URL).
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// The server answered with a non-2xx status.
    #[error("HTTP {status}: {body}")]
    HttpStatus { status: u16, body: String },

    /// The response body did not match the expected shape.
    #[error("Failed to decode response: {0}")]
    DecodeFailure(String),

    /// Network-level failure (offline, DNS, timeout, connection reset).
    #[error("Transport error: {0}")]
    Transport(String),
}

impl RemoteError {
    /// Whether a later attempt may succeed without any change on our side.
    pub fn is_transient(&self) -> bool {
        match self {
            RemoteError::Transport(_) => true,
            RemoteError::HttpStatus { status, .. } => *status == 429 || *status >= 500,
            RemoteError::InvalidRequest(_) | RemoteError::DecodeFailure(_) => false,
        }
    }
}

impl From<reqwest::Error> for RemoteError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            RemoteError::DecodeFailure(e.to_string())
        } else if e.is_builder() {
            RemoteError::InvalidRequest(e.to_string())
        } else {
            RemoteError::Transport(e.to_string())
        }
    }
}

/// Source of authoritative catalog data.
///
/// Implementations perform exactly one request per call; retry and fallback
/// policy belongs to the repository.
#[async_trait]
pub trait RemoteCatalog: Send + Sync {
    /// Fetch the movie genre list.
    async fn fetch_genres(&self) -> Result<Vec<Genre>, RemoteError>;

    /// Fetch one page of movies sorted by descending popularity.
    async fn fetch_trending_page(&self, page: u32) -> Result<Page<Movie>, RemoteError>;

    /// Fetch details of a single movie.
    async fn fetch_details(&self, id: i64) -> Result<MovieDetails, RemoteError>;
}
