use std::sync::Arc;

use tracing::{debug, warn};

use super::state::{StatePublisher, Subscription};
use crate::catalog::MovieDetails;
use crate::repository::CatalogRepository;

/// Message shown when details could not be loaded from any source.
pub const DETAILS_FAILED_MESSAGE: &str = "Please check your internet connection and try again";

/// Observable state of a details screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DetailsState {
    Loading,
    Loaded(MovieDetails),
    Failed(String),
}

impl DetailsState {
    pub fn details(&self) -> Option<&MovieDetails> {
        match self {
            DetailsState::Loaded(details) => Some(details),
            _ => None,
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, DetailsState::Loading)
    }

    pub fn error_message(&self) -> Option<&str> {
        match self {
            DetailsState::Failed(message) => Some(message),
            _ => None,
        }
    }
}

/// Loads the details of one movie, always preferring fresh remote data.
pub struct DetailsController {
    movie_id: i64,
    repository: Arc<dyn CatalogRepository>,
    publisher: StatePublisher<DetailsState>,
}

impl DetailsController {
    pub fn new(movie_id: i64, repository: Arc<dyn CatalogRepository>) -> Self {
        Self {
            movie_id,
            repository,
            publisher: StatePublisher::new(DetailsState::Loading),
        }
    }

    pub fn movie_id(&self) -> i64 {
        self.movie_id
    }

    pub async fn load(&self) {
        self.publisher.publish(DetailsState::Loading);

        let state = match self.repository.fetch_details(self.movie_id, true).await {
            Some(details) => {
                debug!(id = self.movie_id, title = %details.title, "Details loaded");
                DetailsState::Loaded(details)
            }
            None => {
                warn!(id = self.movie_id, "Details unavailable");
                DetailsState::Failed(DETAILS_FAILED_MESSAGE.to_string())
            }
        };
        self.publisher.publish(state);
    }

    pub async fn retry(&self) {
        self.load().await;
    }

    pub fn state(&self) -> DetailsState {
        self.publisher.current()
    }

    pub fn subscribe(&self) -> Subscription<DetailsState> {
        self.publisher.subscribe()
    }
}
