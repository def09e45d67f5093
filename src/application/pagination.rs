//! Page-number pagination shared by every list view.

use serde::Serialize;
use thiserror::Error;

use quire_api_types::PageResponse;

/// Position of a list view, recomputed from every response.
///
/// `loaded` counts how far into the server's list the client has read, so
/// local inserts and deletes shift it along with the server's own offsets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PageCursor {
    pub page: u32,
    pub page_size: u32,
    pub total: u64,
    pub total_pages: u32,
    pub loaded: u64,
}

impl PageCursor {
    /// Cursor for a full page `page`.
    pub fn new(page: u32, page_size: u32, total: u64) -> Self {
        let loaded = (u64::from(page) * u64::from(page_size)).min(total);
        Self::with_counts(page, page_size, total, loaded)
    }

    pub fn from_response<T>(response: &PageResponse<T>) -> Self {
        let before = u64::from(response.page.saturating_sub(1)) * u64::from(response.page_size);
        let loaded = before + response.items.len() as u64;
        Self::with_counts(response.page, response.page_size, response.total, loaded)
    }

    fn with_counts(page: u32, page_size: u32, total: u64, loaded: u64) -> Self {
        let total_pages = if page_size == 0 {
            0
        } else {
            u32::try_from(total.div_ceil(u64::from(page_size))).unwrap_or(u32::MAX)
        };
        Self {
            page,
            page_size,
            total,
            total_pages,
            loaded,
        }
    }

    pub fn has_more(&self) -> bool {
        self.page_size > 0 && self.loaded < self.total
    }

    /// Page holding the first item not loaded yet. After a local delete this
    /// can be the page that was already fetched, since the server shifted.
    pub fn next_page(&self) -> Option<u32> {
        self.has_more().then(|| {
            let index = self.loaded / u64::from(self.page_size);
            u32::try_from(index).unwrap_or(u32::MAX - 1) + 1
        })
    }

    /// An item within the loaded range went away.
    pub fn removed(self) -> Self {
        Self::with_counts(
            self.page,
            self.page_size,
            self.total.saturating_sub(1),
            self.loaded.saturating_sub(1),
        )
    }

    /// An item was added within the loaded range.
    pub fn inserted(self) -> Self {
        Self::with_counts(self.page, self.page_size, self.total + 1, self.loaded + 1)
    }

    /// An item was added past the loaded range.
    pub fn grew(self) -> Self {
        Self::with_counts(self.page, self.page_size, self.total + 1, self.loaded)
    }
}

/// One fetched page together with its cursor.
#[derive(Debug, Clone, Serialize)]
pub struct Paged<T> {
    pub items: Vec<T>,
    pub cursor: PageCursor,
}

impl<T> From<PageResponse<T>> for Paged<T> {
    fn from(response: PageResponse<T>) -> Self {
        let cursor = PageCursor::from_response(&response);
        Self {
            items: response.items,
            cursor,
        }
    }
}

#[derive(Debug, Error)]
pub enum PaginationError {
    #[error("page numbers start at 1, got {0}")]
    InvalidPage(u32),
    #[error("page size must be greater than zero")]
    InvalidPageSize,
}

pub fn validate(page: u32, page_size: u32) -> Result<(), PaginationError> {
    if page == 0 {
        return Err(PaginationError::InvalidPage(page));
    }
    if page_size == 0 {
        return Err(PaginationError::InvalidPageSize);
    }
    Ok(())
}
