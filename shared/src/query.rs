//! 分页请求与分页响应

use serde::{Deserialize, Serialize};

/// Default number of items per page
pub const DEFAULT_PAGE_SIZE: u32 = 20;
/// Upper bound for a single page
pub const MAX_PAGE_SIZE: u32 = 100;

/// Pagination parameters as they arrive on the query string
///
/// `limit` is accepted as an alias of `pageSize`.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageRequest {
    #[serde(default)]
    pub page: Option<u32>,
    #[serde(default, alias = "limit", alias = "page_size")]
    pub page_size: Option<u32>,
}

impl PageRequest {
    pub fn new(page: u32, page_size: u32) -> Self {
        Self {
            page: Some(page),
            page_size: Some(page_size),
        }
    }

    /// 1-indexed page, anything below 1 becomes 1
    pub fn page(&self) -> u32 {
        self.page.unwrap_or(1).max(1)
    }

    /// Page size clamped to `1..=MAX_PAGE_SIZE`
    pub fn page_size(&self) -> u32 {
        self.page_size
            .unwrap_or(DEFAULT_PAGE_SIZE)
            .clamp(1, MAX_PAGE_SIZE)
    }

    /// Number of items to skip
    pub fn offset(&self) -> usize {
        (self.page() as usize - 1) * self.page_size() as usize
    }
}

/// One page of an ordered result set
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    pub items: Vec<T>,
    pub page: u32,
    pub page_size: u32,
    pub total: u64,
    pub total_pages: u32,
    pub has_prev: bool,
    pub has_next: bool,
}

impl<T> Page<T> {
    /// Slice a fully ordered result set down to the requested page
    pub fn from_ordered(all: Vec<T>, request: &PageRequest) -> Self {
        let page = request.page();
        let page_size = request.page_size();
        let total = all.len() as u64;
        let total_pages = total.div_ceil(page_size as u64) as u32;

        let items: Vec<T> = all
            .into_iter()
            .skip(request.offset())
            .take(page_size as usize)
            .collect();

        Self {
            items,
            page,
            page_size,
            total,
            total_pages,
            has_prev: page > 1,
            has_next: page < total_pages,
        }
    }

    /// Map the items while keeping the paging metadata
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            page: self.page,
            page_size: self.page_size,
            total: self.total,
            total_pages: self.total_pages,
            has_prev: self.has_prev,
            has_next: self.has_next,
        }
    }
}
