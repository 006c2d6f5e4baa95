//! Resource parameters and pagination utilities

use crate::config::PagingConfig;
use crate::core::error::{ProjectionError, ProjectionResult, RequestError};
use axum::http::HeaderValue;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Name of the response header carrying [`PaginationHeader`]
pub const PAGINATION_HEADER: &str = "X-Pagination";

/// Query parameters for shaping, sorting and paging a collection
///
/// This structure is decoded from the URL query string by the request layer.
/// Page number and size have defaults; call [`normalize`](Self::normalize)
/// to apply the configured page size ceiling.
///
/// # Example
/// ```text
/// GET /api/authors?pageNumber=2&pageSize=5
/// GET /api/authors?fields=id,name&orderBy=age desc,name
/// GET /api/authors?mainCategory=Rum&searchQuery=jack
/// ```
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ResourceParameters {
    /// Comma-separated field list for data shaping
    pub fields: Option<String>,

    /// Comma-separated sort clauses over logical keys
    pub order_by: Option<String>,

    /// Page number (starts at 1)
    pub page_number: u32,

    /// Number of items per page
    pub page_size: u32,

    /// Free-text search term
    pub search_query: Option<String>,

    /// Category filter
    #[serde(alias = "mainCategory")]
    pub category: Option<String>,
}

impl Default for ResourceParameters {
    fn default() -> Self {
        Self {
            fields: None,
            order_by: None,
            page_number: 1,
            page_size: PagingConfig::DEFAULT_PAGE_SIZE,
            search_query: None,
            category: None,
        }
    }
}

impl ResourceParameters {
    /// Bring paging within the configured limits
    ///
    /// A zero page size becomes [`PagingConfig::DEFAULT_PAGE_SIZE`], then the
    /// size is capped at `max_page_size`. The page number is at least 1.
    pub fn normalize(mut self, paging: &PagingConfig) -> Self {
        self.page_number = self.page_number.max(1);
        if self.page_size == 0 {
            self.page_size = PagingConfig::DEFAULT_PAGE_SIZE;
        }
        self.page_size = self.page_size.min(paging.max_page_size.max(1));
        self
    }

    pub fn fields(&self) -> Option<&str> {
        self.fields.as_deref()
    }

    pub fn order_by(&self) -> Option<&str> {
        self.order_by.as_deref()
    }

    /// The same parameters pointing at another page
    pub fn with_page(&self, page_number: u32) -> Self {
        Self {
            page_number,
            ..self.clone()
        }
    }
}

/// Pagination metadata
///
/// Derived from the storage layer's count, never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PageMeta {
    /// Current page number (starts at 1)
    pub current_page: u32,

    /// Number of items per page
    pub page_size: u32,

    /// Total number of items (after filters)
    pub total_count: u64,

    /// Total number of pages
    pub total_pages: u64,

    /// Whether there is a previous page
    pub has_previous: bool,

    /// Whether there is a next page
    pub has_next: bool,
}

impl PageMeta {
    /// Create pagination metadata from calculation
    pub fn new(current_page: u32, page_size: u32, total_count: u64) -> Self {
        // Ensure page size is at least 1 to avoid division by zero
        let page_size = page_size.max(1);
        let total_pages = total_count.div_ceil(u64::from(page_size));

        Self {
            current_page,
            page_size,
            total_count,
            total_pages,
            has_previous: current_page > 1,
            has_next: u64::from(current_page) < total_pages,
        }
    }
}

/// One page of resources as returned by the storage layer
#[derive(Debug, Clone)]
pub struct PagedList<T> {
    pub items: Vec<T>,
    pub meta: PageMeta,
}

impl<T> PagedList<T> {
    pub fn new(items: Vec<T>, current_page: u32, page_size: u32, total_count: u64) -> Self {
        Self {
            items,
            meta: PageMeta::new(current_page, page_size, total_count),
        }
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.items.iter()
    }
}

impl<'a, T> IntoIterator for &'a PagedList<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

/// Pagination metadata as written to the `X-Pagination` response header
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct PaginationHeader {
    pub current_page: u32,
    pub page_size: u32,
    pub total_count: u64,
    pub total_pages: u64,

    /// Absolute URI of the previous page
    #[serde(skip_serializing_if = "Option::is_none")]
    pub previous_page: Option<String>,

    /// Absolute URI of the next page
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_page: Option<String>,
}

impl PaginationHeader {
    pub fn new(meta: &PageMeta) -> Self {
        Self {
            current_page: meta.current_page,
            page_size: meta.page_size,
            total_count: meta.total_count,
            total_pages: meta.total_pages,
            previous_page: None,
            next_page: None,
        }
    }

    pub fn with_page_links(mut self, previous: Option<String>, next: Option<String>) -> Self {
        self.previous_page = previous;
        self.next_page = next;
        self
    }

    /// Serialize as a flat JSON object suitable for a header value
    pub fn to_header_value(&self) -> ProjectionResult<HeaderValue> {
        let json = serde_json::to_string(self)?;
        HeaderValue::from_str(&json).map_err(|e| {
            ProjectionError::Internal(format!("invalid pagination header value: {}", e))
        })
    }
}

/// Parse a comma-separated list of ids, as in `/authorcollections/(id1,id2)`
///
/// Empty elements are skipped. A missing or blank value yields `None`.
pub fn parse_id_list(value: Option<&str>) -> ProjectionResult<Option<Vec<Uuid>>> {
    let Some(value) = value.filter(|v| !v.trim().is_empty()) else {
        return Ok(None);
    };

    value
        .split(',')
        .map(str::trim)
        .filter(|element| !element.is_empty())
        .map(|element| {
            Uuid::parse_str(element).map_err(|_| {
                ProjectionError::from(RequestError::InvalidIdList {
                    value: element.to_string(),
                })
            })
        })
        .collect::<ProjectionResult<Vec<_>>>()
        .map(Some)
}
