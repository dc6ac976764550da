//! Paginated, filterable movie listing.
//!
//! The controller owns a single [`ListSnapshot`]. Pages are appended one at a
//! time with at most one load in flight; the filtered view is recomputed
//! locally whenever the items or the filters change. Going back online after
//! being offline discards everything and reloads from page 1.

use std::collections::BTreeSet;
use std::sync::{Arc, Weak};

use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use super::filter::apply_filters;
use super::state::{StatePublisher, Subscription};
use crate::catalog::{Genre, Movie};
use crate::connectivity::Connectivity;
use crate::repository::CatalogRepository;

/// Message shown when a page could not be loaded from any source.
pub const LOAD_FAILED_MESSAGE: &str = "Failed to load movies.";

/// Observable state of a listing session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListSnapshot {
    /// Every item loaded in this session, in page order.
    pub items: Vec<Movie>,
    /// `items` narrowed by the current filters.
    pub filtered: Vec<Movie>,
    pub genres: Vec<Genre>,
    /// Next page to request.
    pub current_page: u32,
    pub total_pages: u32,
    pub is_loading: bool,
    pub can_load_more: bool,
    pub search_text: String,
    pub selected_genre_ids: BTreeSet<i64>,
    pub error_message: Option<String>,
    pub is_offline: bool,
}

impl Default for ListSnapshot {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            filtered: Vec::new(),
            genres: Vec::new(),
            current_page: 1,
            total_pages: 1,
            is_loading: false,
            can_load_more: true,
            search_text: String::new(),
            selected_genre_ids: BTreeSet::new(),
            error_message: None,
            is_offline: false,
        }
    }
}

impl ListSnapshot {
    /// Whether loading has stopped because every page was loaded.
    pub fn is_exhausted(&self) -> bool {
        !self.can_load_more && self.error_message.is_none()
    }

    /// Name of a genre by ID, if known.
    pub fn genre_name(&self, id: i64) -> Option<&str> {
        self.genres
            .iter()
            .find(|g| g.id == id)
            .map(|g| g.name.as_str())
    }

    fn refilter(&mut self) {
        self.filtered = apply_filters(&self.items, &self.search_text, &self.selected_genre_ids);
    }
}

struct ListState {
    snapshot: ListSnapshot,
    /// Bumped on every reset; results from an older session are dropped.
    session: u64,
}

/// Drives an infinite-scroll listing over a [`CatalogRepository`].
pub struct ListController {
    repository: Arc<dyn CatalogRepository>,
    connectivity: Connectivity,
    state: Mutex<ListState>,
    publisher: StatePublisher<ListSnapshot>,
    listener: Mutex<Option<JoinHandle<()>>>,
}

impl ListController {
    pub fn new(repository: Arc<dyn CatalogRepository>, connectivity: Connectivity) -> Arc<Self> {
        let snapshot = ListSnapshot {
            is_offline: !connectivity.is_online(),
            ..ListSnapshot::default()
        };

        Arc::new(Self {
            repository,
            connectivity,
            publisher: StatePublisher::new(snapshot.clone()),
            state: Mutex::new(ListState {
                snapshot,
                session: 0,
            }),
            listener: Mutex::new(None),
        })
    }

    /// Initial load: genres from the remote, the first page, and the
    /// connectivity listener that resyncs on reconnect.
    pub async fn start(self: &Arc<Self>) {
        self.spawn_connectivity_listener().await;
        self.load_genres(true).await;
        self.reset_and_load().await;
    }

    pub fn subscribe(&self) -> Subscription<ListSnapshot> {
        self.publisher.subscribe()
    }

    pub fn snapshot(&self) -> ListSnapshot {
        self.publisher.current()
    }

    pub async fn load_genres(&self, force_remote: bool) {
        let genres = self.repository.fetch_genres(force_remote).await;
        debug!(count = genres.len(), force_remote, "Loaded genres");

        self.update(|s| {
            s.genres = genres;
            true
        })
        .await;
    }

    /// Drop every loaded item and load page 1 again. Filters are kept.
    pub async fn reset_and_load(&self) {
        {
            let mut state = self.state.lock().await;
            state.session += 1;
            let s = &mut state.snapshot;
            s.items.clear();
            s.filtered.clear();
            s.current_page = 1;
            s.total_pages = 1;
            s.can_load_more = true;
            s.is_loading = false;
            s.error_message = None;
            info!(session = state.session, "Listing reset");
            self.publisher.publish(state.snapshot.clone());
        }

        self.load_next_page().await;
    }

    /// Load the next page. Does nothing while a load is in flight or once the
    /// listing is exhausted or failed.
    pub async fn load_next_page(&self) {
        let (page, session) = {
            let mut state = self.state.lock().await;
            let s = &mut state.snapshot;
            if s.is_loading || !s.can_load_more {
                return;
            }
            s.is_loading = true;
            s.error_message = None;
            let page = s.current_page;
            self.publisher.publish(state.snapshot.clone());
            (page, state.session)
        };

        let force_remote = self.connectivity.is_online();
        debug!(page, force_remote, "Loading page");
        let result = self.repository.fetch_trending(page, force_remote).await;

        let mut state = self.state.lock().await;
        if state.session != session {
            debug!(page, session, "Dropping page from a previous session");
            return;
        }

        let s = &mut state.snapshot;
        s.is_loading = false;
        match result {
            Some(response) => {
                s.can_load_more = response.has_more();
                s.total_pages = response.total_pages;
                s.current_page += 1;
                s.items.extend(response.results);
                s.refilter();
                debug!(
                    page,
                    total_pages = s.total_pages,
                    items = s.items.len(),
                    "Page loaded"
                );
            }
            None => {
                warn!(page, "Page unavailable");
                s.error_message = Some(LOAD_FAILED_MESSAGE.to_string());
                s.can_load_more = false;
            }
        }
        self.publisher.publish(state.snapshot.clone());
    }

    /// Recover from a failed load by starting over.
    pub async fn retry(&self) {
        self.reset_and_load().await;
    }

    pub async fn set_search_text(&self, text: impl Into<String>) {
        let text = text.into();
        self.update(|s| {
            if s.search_text == text {
                return false;
            }
            s.search_text = text;
            s.refilter();
            true
        })
        .await;
    }

    pub async fn set_selected_genres(&self, genre_ids: BTreeSet<i64>) {
        self.update(|s| {
            if s.selected_genre_ids == genre_ids {
                return false;
            }
            s.selected_genre_ids = genre_ids;
            s.refilter();
            true
        })
        .await;
    }

    /// Add the genre to the selection, or remove it if already selected.
    pub async fn toggle_genre(&self, genre_id: i64) {
        self.update(|s| {
            if !s.selected_genre_ids.remove(&genre_id) {
                s.selected_genre_ids.insert(genre_id);
            }
            s.refilter();
            true
        })
        .await;
    }

    pub async fn clear_filters(&self) {
        self.update(|s| {
            if s.search_text.is_empty() && s.selected_genre_ids.is_empty() {
                return false;
            }
            s.search_text.clear();
            s.selected_genre_ids.clear();
            s.refilter();
            true
        })
        .await;
    }

    /// Stop reacting to connectivity changes.
    pub async fn stop(&self) {
        if let Some(handle) = self.listener.lock().await.take() {
            handle.abort();
        }
    }

    /// Apply `f` to the snapshot and publish if it reports a change.
    async fn update(&self, f: impl FnOnce(&mut ListSnapshot) -> bool) {
        let mut state = self.state.lock().await;
        if f(&mut state.snapshot) {
            self.publisher.publish(state.snapshot.clone());
        }
    }

    async fn set_offline(&self, offline: bool) {
        self.update(|s| {
            if s.is_offline == offline {
                return false;
            }
            s.is_offline = offline;
            true
        })
        .await;
    }

    async fn spawn_connectivity_listener(self: &Arc<Self>) {
        let mut listener = self.listener.lock().await;
        if listener.is_some() {
            return;
        }

        let weak: Weak<Self> = Arc::downgrade(self);
        let mut rx = self.connectivity.subscribe();
        let mut was_online = *rx.borrow_and_update();
        self.set_offline(!was_online).await;

        *listener = Some(tokio::spawn(async move {
            while rx.changed().await.is_ok() {
                let online = *rx.borrow_and_update();
                let Some(controller) = weak.upgrade() else {
                    break;
                };

                controller.set_offline(!online).await;
                if online && !was_online {
                    info!("Back online, reloading listing");
                    controller.reset_and_load().await;
                }
                was_online = online;
            }
        }));
    }
}

impl Drop for ListController {
    fn drop(&mut self) {
        if let Some(handle) = self.listener.get_mut().take() {
            handle.abort();
        }
    }
}
