//! Common types used throughout album-harvest
//!
//! This module contains the data model shared by the fetcher, the
//! paginator and the persisters.

use serde::{Deserialize, Serialize};

// ============================================================================
// Collection Items
// ============================================================================

/// One remote photo
///
/// `id` is unique within an album. `url` is time-limited and may stop
/// working between runs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    /// Remote identifier
    pub id: String,
    /// Resource locator for the binary payload
    pub url: String,
}

impl Item {
    /// Create a new item
    pub fn new(id: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            url: url.into(),
        }
    }

    /// Render the item as one manifest line (without the newline)
    pub fn manifest_line(&self, separator: &str) -> String {
        format!("{}{separator}{}", self.id, self.url)
    }
}

/// One bounded batch of items plus the cursor for the next batch
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Page {
    /// Items in server order
    pub items: Vec<Item>,
    /// Opaque token to echo back for the next page, `None` once exhausted
    pub next_cursor: Option<String>,
}

impl Page {
    /// Create a page
    pub fn new(items: Vec<Item>, next_cursor: Option<String>) -> Self {
        Self {
            items,
            next_cursor: next_cursor.none_if_empty(),
        }
    }

    /// Check if this page is the last one
    pub fn is_last(&self) -> bool {
        self.next_cursor.is_none()
    }

    /// Number of items on the page
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Check if the page carries no items
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

// ============================================================================
// Collection Metadata
// ============================================================================

/// Descriptive album metadata, fetched independently of pagination
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollectionInfo {
    /// Album identifier as requested
    pub id: String,
    /// Number of photos reported by the server
    #[serde(default)]
    pub count: Option<u64>,
    /// Public link to the album
    #[serde(default)]
    pub link: Option<String>,
    /// Album title
    #[serde(default)]
    pub name: Option<String>,
}

// ============================================================================
// Utilities
// ============================================================================

/// Extension trait for Option<String> to handle empty strings
pub trait OptionStringExt {
    /// Returns None if the string is empty
    fn none_if_empty(self) -> Option<String>;
}

impl OptionStringExt for Option<String> {
    fn none_if_empty(self) -> Option<String> {
        self.filter(|s| !s.is_empty())
    }
}

impl OptionStringExt for String {
    fn none_if_empty(self) -> Option<String> {
        if self.is_empty() {
            None
        } else {
            Some(self)
        }
    }
}
