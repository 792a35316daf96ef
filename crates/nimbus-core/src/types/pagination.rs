//! Pagination types for the search endpoint.
//!
//! The drive API pages with zero-based page numbers and returns the
//! Spring-style page object (`content`, `totalElements`, ...).

use serde::{Deserialize, Serialize};

/// Default page size.
const DEFAULT_PAGE_SIZE: u32 = 20;
/// Maximum page size.
const MAX_PAGE_SIZE: u32 = 100;

/// Request parameters for paginated queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRequest {
    /// Page number (0-based).
    #[serde(default)]
    pub page: u32,
    /// Number of items per page.
    #[serde(default = "default_page_size")]
    pub size: u32,
}

impl PageRequest {
    /// Create a new page request, clamping the size into `1..=100`.
    pub fn new(page: u32, size: u32) -> Self {
        Self {
            page,
            size: size.clamp(1, MAX_PAGE_SIZE),
        }
    }

    /// The request for the following page.
    pub fn next(&self) -> Self {
        Self {
            page: self.page.saturating_add(1),
            size: self.size,
        }
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: 0,
            size: DEFAULT_PAGE_SIZE,
        }
    }
}

/// Paginated response as sent by the server.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    /// The items on this page.
    #[serde(default = "Vec::new")]
    pub content: Vec<T>,
    /// Current page number (0-based).
    #[serde(default)]
    pub number: u32,
    /// Requested page size.
    #[serde(default)]
    pub size: u32,
    /// Total number of items across all pages.
    #[serde(default)]
    pub total_elements: u64,
    /// Total number of pages.
    #[serde(default)]
    pub total_pages: u32,
}

impl<T> Page<T> {
    /// Build a page from a full result set and a request.
    pub fn slice(all: Vec<T>, request: PageRequest) -> Self {
        let total_elements = all.len() as u64;
        let size = request.size.max(1);
        let total_pages = total_elements.div_ceil(u64::from(size)) as u32;
        let content = all
            .into_iter()
            .skip(request.page as usize * size as usize)
            .take(size as usize)
            .collect();
        Self {
            content,
            number: request.page,
            size,
            total_elements,
            total_pages,
        }
    }

    /// Whether another page follows this one.
    pub fn has_next(&self) -> bool {
        self.number + 1 < self.total_pages
    }
}

fn default_page_size() -> u32 {
    DEFAULT_PAGE_SIZE
}
