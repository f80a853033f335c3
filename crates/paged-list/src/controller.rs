//! Lazy-loading controller for a remote paged list
//!
//! The controller owns what is on screen: the current page of items, the
//! remote total and the last requested window. Pagination events become
//! 1-based page queries against a [`PageSource`]; pushed updates are merged
//! into the visible page without a refetch.

use std::sync::atomic::{AtomicUsize, Ordering};

use tokio::sync::{broadcast, RwLock};
use tracing::{debug, warn};

use crate::error::ListError;
use crate::filters::ListFilters;
use crate::source::{ItemPatch, ListItem, PageSource};
use crate::window::{ListState, PageRequest, PageWindow};

const NOTICE_CAPACITY: usize = 64;

/// Outcome of a page load, broadcast to subscribers
#[derive(Debug, Clone, PartialEq)]
pub enum ListNotice {
    Loaded {
        window: PageWindow,
        total_count: u64,
    },
    LoadFailed {
        window: PageWindow,
        error: ListError,
    },
}

/// One outstanding request; released on drop, including when the load is cancelled
struct InFlight<'a>(&'a AtomicUsize);

impl<'a> InFlight<'a> {
    fn enter(counter: &'a AtomicUsize) -> Self {
        counter.fetch_add(1, Ordering::SeqCst);
        Self(counter)
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

pub struct PagedListController<T, S> {
    source: S,
    state: RwLock<ListState<T>>,
    filters: RwLock<ListFilters>,
    in_flight: AtomicUsize,
    notices: broadcast::Sender<ListNotice>,
}

impl<T, S> PagedListController<T, S>
where
    T: Clone + Send + Sync,
    S: PageSource<T>,
{
    pub fn new(source: S) -> Self {
        Self::with_filters(source, ListFilters::default())
    }

    pub fn with_filters(source: S, filters: ListFilters) -> Self {
        let (notices, _) = broadcast::channel(NOTICE_CAPACITY);
        Self {
            source,
            state: RwLock::new(ListState::default()),
            filters: RwLock::new(filters),
            in_flight: AtomicUsize::new(0),
            notices,
        }
    }

    /// Receive a notice for every completed load
    pub fn subscribe(&self) -> broadcast::Receiver<ListNotice> {
        self.notices.subscribe()
    }

    /// Fetch the page covering `window` and display it.
    ///
    /// `window` becomes the last window before the request is sent, so a
    /// later call always wins the window even if its response lands first.
    /// Items are written whenever a response arrives: a slow earlier
    /// response can still replace a faster later one. Failures keep the
    /// displayed items and are reported through [`subscribe`](Self::subscribe).
    pub async fn load_page(&self, window: PageWindow) {
        self.state.write().await.last_window = Some(window);
        let filters = self.filters.read().await.clone();
        let request = PageRequest::new(window, filters);

        let outcome = {
            let _loading = InFlight::enter(&self.in_flight);
            self.source.fetch_page(&request).await
        };

        match outcome {
            Ok(page) => {
                let total_count = page.total_count;
                {
                    let mut state = self.state.write().await;
                    state.items = page.items;
                    state.total_count = total_count;
                }
                debug!(
                    page = request.page,
                    limit = request.limit,
                    total = total_count,
                    "Loaded page"
                );
                let _ = self.notices.send(ListNotice::Loaded {
                    window,
                    total_count,
                });
            }
            Err(error) => {
                warn!(page = request.page, limit = request.limit, error = %error, "Failed to load page");
                let _ = self.notices.send(ListNotice::LoadFailed { window, error });
            }
        }
    }

    /// Refresh the current page, or jump back to the first one
    pub async fn reload(&self, reset_to_first_page: bool) {
        let last = self.state.read().await.last_window;
        let window = match last {
            Some(window) if reset_to_first_page => PageWindow::first(window.page_size()),
            Some(window) => window,
            None => PageWindow::default(),
        };
        self.load_page(window).await;
    }

    /// Replace the active filters and reload from the first page
    pub async fn set_filters(&self, filters: ListFilters) {
        *self.filters.write().await = filters;
        self.reload(true).await;
    }

    pub async fn filters(&self) -> ListFilters {
        self.filters.read().await.clone()
    }

    pub async fn items(&self) -> Vec<T> {
        self.state.read().await.items.clone()
    }

    pub async fn total_count(&self) -> u64 {
        self.state.read().await.total_count
    }

    pub async fn last_window(&self) -> Option<PageWindow> {
        self.state.read().await.last_window
    }

    pub async fn snapshot(&self) -> ListState<T> {
        self.state.read().await.clone()
    }

    /// True while at least one page request is outstanding
    pub fn is_loading(&self) -> bool {
        self.in_flight.load(Ordering::SeqCst) > 0
    }
}

impl<T, S> PagedListController<T, S>
where
    T: ListItem + Clone + Send + Sync,
    S: PageSource<T>,
{
    /// Merge `patch` into the displayed item whose key is `key`.
    ///
    /// The item keeps its position. Returns `false` and leaves the page
    /// untouched when no displayed item matches.
    pub async fn apply_remote_item_update<P>(&self, key: &T::Key, patch: P) -> bool
    where
        P: ItemPatch<T>,
    {
        let mut state = self.state.write().await;
        match state.items.iter_mut().find(|item| item.key() == key) {
            Some(item) => {
                patch.apply(item);
                true
            }
            None => false,
        }
    }
}
