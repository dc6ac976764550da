//! TMDB (The Movie Database) v3 API client.
//!
//! Every request carries the configured API key and language, asks for JSON
//! and is bounded by the configured timeout. No retries are attempted here.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use reqwest::{header, Client, Url};
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use super::endpoint::Endpoint;
use super::{RemoteCatalog, RemoteError};
use crate::catalog::{Genre, GenresResponse, Movie, MovieDetails, Page};
use crate::config::ApiConfig;
use crate::metrics::REMOTE_REQUEST_DURATION;

/// TMDB API client.
#[derive(Debug, Clone)]
pub struct TmdbClient {
    client: Client,
    base_url: String,
    api_key: String,
    language: String,
}

impl TmdbClient {
    /// Create a new TMDB client from the API configuration.
    pub fn new(config: &ApiConfig) -> Result<Self, RemoteError> {
        if config.api_key.trim().is_empty() {
            return Err(RemoteError::InvalidRequest(
                "TMDB API key is required".to_string(),
            ));
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
            language: config.language.clone(),
        })
    }

    /// Full request URL for an endpoint, including the credential.
    pub fn url_for(&self, endpoint: &Endpoint) -> Result<Url, RemoteError> {
        let mut query = endpoint.query(&self.language);
        query.push(("api_key", self.api_key.clone()));

        Url::parse_with_params(&format!("{}{}", self.base_url, endpoint.path()), &query)
            .map_err(|e| RemoteError::InvalidRequest(format!("Bad URL for {}: {}", endpoint.name(), e)))
    }

    async fn get<T: DeserializeOwned>(&self, endpoint: Endpoint) -> Result<T, RemoteError> {
        let url = self.url_for(&endpoint)?;
        let started = Instant::now();

        debug!(endpoint = endpoint.name(), path = %endpoint.path(), "TMDB request");

        let result = self.send(url).await;
        let outcome = match &result {
            Ok(_) => "ok",
            Err(RemoteError::HttpStatus { .. }) => "http_status",
            Err(RemoteError::DecodeFailure(_)) => "decode",
            Err(RemoteError::Transport(_)) => "transport",
            Err(RemoteError::InvalidRequest(_)) => "invalid",
        };
        REMOTE_REQUEST_DURATION
            .with_label_values(&[endpoint.name(), outcome])
            .observe(started.elapsed().as_secs_f64());

        result
    }

    async fn send<T: DeserializeOwned>(&self, url: Url) -> Result<T, RemoteError> {
        let response = self
            .client
            .get(url)
            .header(header::ACCEPT, "application/json")
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!(status = status.as_u16(), body = %body, "TMDB error response");
            return Err(RemoteError::HttpStatus {
                status: status.as_u16(),
                body,
            });
        }

        let bytes = response.bytes().await?;
        serde_json::from_slice(&bytes).map_err(|e| RemoteError::DecodeFailure(e.to_string()))
    }
}

#[async_trait]
impl RemoteCatalog for TmdbClient {
    async fn fetch_genres(&self) -> Result<Vec<Genre>, RemoteError> {
        let response: GenresResponse = self.get(Endpoint::Genres).await?;
        Ok(response.genres)
    }

    async fn fetch_trending_page(&self, page: u32) -> Result<Page<Movie>, RemoteError> {
        if page == 0 {
            return Err(RemoteError::InvalidRequest(
                "Page numbers start at 1".to_string(),
            ));
        }
        self.get(Endpoint::Trending { page }).await
    }

    async fn fetch_details(&self, id: i64) -> Result<MovieDetails, RemoteError> {
        self.get(Endpoint::Details { id }).await
    }
}
