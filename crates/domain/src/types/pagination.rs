//! Pagination request and result types
//!
//! Cursors are opaque strings issued by the adapter that produced a page.
//! They carry no meaning outside that adapter.

use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE, MIN_PAGE_SIZE};
use crate::errors::{PlatformError, Result};

/// Page request: where to resume and how many items to return.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaginationOptions {
    #[serde(default)]
    pub cursor: Option<String>,
    #[serde(default = "default_page_size")]
    pub page_size: u32,
}

fn default_page_size() -> u32 {
    DEFAULT_PAGE_SIZE
}

impl Default for PaginationOptions {
    fn default() -> Self {
        Self { cursor: None, page_size: DEFAULT_PAGE_SIZE }
    }
}

impl PaginationOptions {
    /// First page with the given size.
    pub fn first_page(page_size: u32) -> Self {
        Self { cursor: None, page_size }
    }

    /// Continue from a cursor returned by a previous page.
    pub fn after(cursor: impl Into<String>, page_size: u32) -> Self {
        Self { cursor: Some(cursor.into()), page_size }
    }

    /// Check bounds before any remote call is made.
    pub fn validate(&self) -> Result<()> {
        if !(MIN_PAGE_SIZE..=MAX_PAGE_SIZE).contains(&self.page_size) {
            return Err(PlatformError::InvalidInput(format!(
                "page size must be between {MIN_PAGE_SIZE} and {MAX_PAGE_SIZE}, got {}",
                self.page_size
            )));
        }
        if self.cursor.as_deref().is_some_and(|cursor| cursor.trim().is_empty()) {
            return Err(PlatformError::InvalidCursor("cursor must not be empty".into()));
        }
        Ok(())
    }
}

/// One page of results.
///
/// `has_more` is true exactly when `next_cursor` is present.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaginatedResult<T> {
    pub items: Vec<T>,
    pub next_cursor: Option<String>,
    pub has_more: bool,
}

impl<T> PaginatedResult<T> {
    pub fn new(items: Vec<T>, next_cursor: Option<String>) -> Self {
        let has_more = next_cursor.is_some();
        Self { items, next_cursor, has_more }
    }

    /// Final page.
    pub fn last(items: Vec<T>) -> Self {
        Self::new(items, None)
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> PaginatedResult<U> {
        PaginatedResult {
            items: self.items.into_iter().map(f).collect(),
            next_cursor: self.next_cursor,
            has_more: self.has_more,
        }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
