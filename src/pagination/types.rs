//! Pagination types and traits
//!
//! Defines the session state, the run outcome and the two seams the
//! paginator is driven through.

use crate::error::{Error, Result};
use crate::types::{Item, Page};
use async_trait::async_trait;
use std::time::Duration;

/// Fetches one page of a collection
#[async_trait]
pub trait PageSource: Send + Sync {
    /// Fetch the page after `cursor` (`None` for the first page)
    async fn fetch_page(&self, album_id: &str, cursor: Option<&str>, limit: u32) -> Result<Page>;
}

/// Persists one page of items
///
/// Called once per successfully fetched page, in page order. The paginator
/// awaits the returned future before it issues the next request, so side
/// effects for page N happen before page N+1 is fetched.
#[async_trait]
pub trait PageSink: Send {
    /// Handle the items of page `page` (1-based)
    async fn on_page(&mut self, page: u32, items: &[Item]) -> Result<()>;
}

/// Configuration for a pagination run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaginationConfig {
    /// Items requested per page
    pub page_size: u32,
    /// Highest page number to fetch, `None` for no ceiling
    pub page_limit: Option<u32>,
    /// Pause between a page's sink call and the next request
    pub delay: Duration,
}

impl Default for PaginationConfig {
    fn default() -> Self {
        Self {
            page_size: 100,
            page_limit: None,
            delay: Duration::ZERO,
        }
    }
}

impl PaginationConfig {
    /// Create a config with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Set page size
    #[must_use]
    pub fn with_page_size(mut self, size: u32) -> Self {
        self.page_size = size;
        self
    }

    /// Set the page ceiling
    #[must_use]
    pub fn with_page_limit(mut self, limit: Option<u32>) -> Self {
        self.page_limit = limit;
        self
    }

    /// Set the inter-page delay
    #[must_use]
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }
}

/// Tracks pagination state during one run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaginationState {
    /// Number of the next page to fetch (1-based)
    pub page: u32,
    /// Cursor to send with the next request
    pub cursor: Option<String>,
    /// Total items fetched so far
    pub total_fetched: u64,
    /// Is the collection exhausted?
    pub done: bool,
}

impl Default for PaginationState {
    fn default() -> Self {
        Self {
            page: 1,
            cursor: None,
            total_fetched: 0,
            done: false,
        }
    }
}

impl PaginationState {
    /// Create a new pagination state positioned at the first page
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a fetched page and move to the next one
    ///
    /// Returns the number of the page just recorded.
    pub fn advance(&mut self, page: &Page) -> u32 {
        let current = self.page;
        self.total_fetched += page.len() as u64;
        self.cursor.clone_from(&page.next_cursor);
        self.done = page.is_last();
        self.page += 1;
        current
    }

    /// Check whether the page ceiling has been passed
    pub fn past_limit(&self, limit: Option<u32>) -> bool {
        limit.is_some_and(|limit| self.page > limit)
    }

    /// Number of pages fetched so far
    pub fn pages_fetched(&self) -> u32 {
        self.page - 1
    }
}

/// Why a pagination run ended
#[derive(Debug)]
pub enum StopReason {
    /// The last page carried no next cursor
    Exhausted,
    /// The page ceiling was reached with pages remaining
    PageLimit,
    /// A page request failed; nothing after it was fetched
    FetchFailed(Error),
}

impl StopReason {
    /// Check if the whole collection was read
    pub fn is_exhausted(&self) -> bool {
        matches!(self, Self::Exhausted)
    }

    /// The fetch error, if the run ended on one
    pub fn failure(&self) -> Option<&Error> {
        match self {
            Self::FetchFailed(e) => Some(e),
            _ => None,
        }
    }
}

impl std::fmt::Display for StopReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Exhausted => write!(f, "collection exhausted"),
            Self::PageLimit => write!(f, "page limit reached"),
            Self::FetchFailed(e) => write!(f, "fetch failed: {e}"),
        }
    }
}

/// Result of a pagination run
///
/// `items` holds everything fetched regardless of how the run ended.
#[derive(Debug)]
pub struct PaginationOutcome {
    /// All items in page-then-within-page order
    pub items: Vec<Item>,
    /// Pages successfully fetched and handed to the sink
    pub pages_fetched: u32,
    /// How the run ended
    pub stop: StopReason,
    /// Duration in milliseconds
    pub duration_ms: u64,
}

impl PaginationOutcome {
    /// Check if the run read the whole collection
    pub fn is_complete(&self) -> bool {
        self.stop.is_exhausted()
    }

    /// Number of items fetched
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Check if no items were fetched
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
