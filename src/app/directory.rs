//! Directory controller: paginated acquisition plus the derived visible list.
//!
//! The controller never talks to the network itself. Starting a fetch yields
//! a [`PageRequest`] for the caller to hand to the fetch worker, and the
//! worker's [`FetchOutcome`] is fed back through [`DirectoryController::complete_fetch`].
//! At most one request is in flight; stale completions are dropped.

use tracing::{debug, info, warn};

use crate::error::FETCH_FAILED_MESSAGE;
use crate::model::UserRecord;
use crate::search::{SortKey, derive_visible};
use crate::source::{FetchOutcome, PageRequest};

/// Which loading indicator the directory screen should show.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum LoadingIndicator {
    None,
    /// Nothing loaded yet: cover the whole list area.
    FullScreen,
    /// More rows are on the way: show a footer row.
    Footer,
}

#[derive(Clone, Debug)]
pub struct DirectoryController {
    base: Vec<UserRecord>,
    visible: Vec<UserRecord>,
    page_cursor: u32,
    page_size: u32,
    search_query: String,
    sort_key: Option<SortKey>,
    last_requested: Option<u32>,
    in_flight: Option<u32>,
    last_failed: bool,
    exhausted: bool,
    error: Option<String>,
}

impl DirectoryController {
    pub fn new(page_size: u32) -> Self {
        Self {
            base: Vec::new(),
            visible: Vec::new(),
            page_cursor: 1,
            page_size: page_size.max(1),
            search_query: String::new(),
            sort_key: None,
            last_requested: None,
            in_flight: None,
            last_failed: false,
            exhausted: false,
            error: None,
        }
    }

    /// First fetch of the screen. Does nothing once any page was requested.
    pub fn mount(&mut self) -> Option<PageRequest> {
        if self.last_requested.is_some() || self.in_flight.is_some() {
            return None;
        }
        Some(self.begin_fetch(self.page_cursor))
    }

    /// Advance to the next page and request it.
    ///
    /// Returns `None` while a request is in flight or after the source ran
    /// out of users. After a failure the same page is requested again.
    pub fn load_more(&mut self) -> Option<PageRequest> {
        if self.in_flight.is_some() {
            debug!(page = self.page_cursor, "load more ignored: fetch in flight");
            return None;
        }
        if self.exhausted {
            return None;
        }
        if self.last_requested.is_some() && !self.last_failed {
            self.page_cursor += 1;
        }
        Some(self.begin_fetch(self.page_cursor))
    }

    fn begin_fetch(&mut self, cursor: u32) -> PageRequest {
        self.in_flight = Some(cursor);
        self.last_requested = Some(cursor);
        PageRequest {
            page: cursor,
            limit: self.page_size,
        }
    }

    /// Network-completion callback. Returns `false` for a stale outcome.
    pub fn complete_fetch(&mut self, outcome: FetchOutcome) -> bool {
        if self.in_flight != Some(outcome.page) {
            debug!(page = outcome.page, "dropping completion for a page not in flight");
            return false;
        }
        self.in_flight = None;
        match outcome.result {
            Ok(users) => {
                let count = users.len();
                self.base.extend(users);
                self.last_failed = false;
                self.error = None;
                if count < self.page_size as usize {
                    self.exhausted = true;
                }
                self.refresh();
                info!(
                    page = outcome.page,
                    count,
                    total = self.base.len(),
                    exhausted = self.exhausted,
                    "page loaded"
                );
            }
            Err(e) => {
                warn!(page = outcome.page, error = %e, "page fetch failed");
                self.last_failed = true;
                self.error = Some(FETCH_FAILED_MESSAGE.to_string());
            }
        }
        true
    }

    /// Filter by name from the full base collection, keeping the committed sort.
    pub fn apply_search(&mut self, query: &str) {
        self.search_query = query.to_string();
        self.refresh();
    }

    /// Order the visible users by `key` and remember it for later refreshes.
    pub fn apply_sort(&mut self, key: SortKey) {
        debug!(key = key.label(), "sort applied");
        self.sort_key = Some(key);
        self.refresh();
    }

    fn refresh(&mut self) {
        self.visible = derive_visible(&self.base, &self.search_query, self.sort_key);
    }

    pub fn base(&self) -> &[UserRecord] {
        &self.base
    }

    pub fn visible(&self) -> &[UserRecord] {
        &self.visible
    }

    pub fn page_cursor(&self) -> u32 {
        self.page_cursor
    }

    pub fn page_size(&self) -> u32 {
        self.page_size
    }

    pub fn search_query(&self) -> &str {
        &self.search_query
    }

    pub fn sort_key(&self) -> Option<SortKey> {
        self.sort_key
    }

    pub fn is_loading(&self) -> bool {
        self.in_flight.is_some()
    }

    pub fn is_exhausted(&self) -> bool {
        self.exhausted
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn loading_indicator(&self) -> LoadingIndicator {
        match (self.in_flight, self.base.is_empty()) {
            (None, _) => LoadingIndicator::None,
            (Some(_), true) => LoadingIndicator::FullScreen,
            (Some(_), false) => LoadingIndicator::Footer,
        }
    }
}

/// Whether `selected` sits within half a viewport of the end of the list.
pub fn is_near_end(selected: usize, len: usize, viewport_rows: usize) -> bool {
    let threshold = (viewport_rows / 2).max(1);
    selected.saturating_add(threshold) >= len
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FetchError;

    fn page(req: PageRequest, n: usize) -> FetchOutcome {
        let start = u64::from(req.page - 1) * u64::from(req.limit);
        FetchOutcome {
            page: req.page,
            result: Ok((0..n as u64)
                .map(|i| UserRecord {
                    id: start + i + 1,
                    name: format!("user {}", start + i + 1),
                    ..UserRecord::default()
                })
                .collect()),
        }
    }

    #[test]
    fn mount_requests_first_page_once() {
        let mut d = DirectoryController::new(10);
        let req = d.mount().unwrap();
        assert_eq!(req, PageRequest { page: 1, limit: 10 });
        assert!(d.mount().is_none());
        assert_eq!(d.loading_indicator(), LoadingIndicator::FullScreen);
        d.complete_fetch(page(req, 10));
        assert!(d.mount().is_none());
        assert_eq!(d.loading_indicator(), LoadingIndicator::None);
    }

    #[test]
    fn footer_indicator_once_rows_exist() {
        let mut d = DirectoryController::new(2);
        let req = d.mount().unwrap();
        d.complete_fetch(page(req, 2));
        d.load_more().unwrap();
        assert_eq!(d.loading_indicator(), LoadingIndicator::Footer);
    }

    #[test]
    fn stale_completion_is_ignored() {
        let mut d = DirectoryController::new(10);
        let req = d.mount().unwrap();
        assert!(!d.complete_fetch(page(PageRequest { page: 5, limit: 10 }, 10)));
        assert!(d.is_loading());
        assert!(d.complete_fetch(page(req, 10)));
        assert!(!d.complete_fetch(page(req, 10)));
        assert_eq!(d.base().len(), 10);
    }

    #[test]
    fn failed_fetch_keeps_data_and_retries_same_page() {
        let mut d = DirectoryController::new(10);
        let first = d.mount().unwrap();
        d.complete_fetch(page(first, 10));

        let second = d.load_more().unwrap();
        assert_eq!(second.page, 2);
        d.complete_fetch(FetchOutcome {
            page: 2,
            result: Err(FetchError::Transport("timeout".into())),
        });
        assert_eq!(d.error(), Some(FETCH_FAILED_MESSAGE));
        assert_eq!(d.base().len(), 10);
        assert!(!d.is_loading());

        let retry = d.load_more().unwrap();
        assert_eq!(retry.page, 2);
        d.complete_fetch(page(retry, 10));
        assert_eq!(d.error(), None);
        assert_eq!(d.base().len(), 20);
    }

    #[test]
    fn near_end_uses_half_viewport() {
        assert!(!is_near_end(0, 20, 10));
        assert!(is_near_end(15, 20, 10));
        assert!(is_near_end(0, 0, 10));
        assert!(is_near_end(0, 1, 0));
    }
}
