//! Page-number pagination: `?page=N&limit=M`.
//!
//! Links are relative (`/api/recipes/?page=3&limit=6`) and keep every other
//! query parameter, so filters survive navigation.

use thiserror::Error;
use url::form_urlencoded;

pub const DEFAULT_PAGE_SIZE: i64 = 6;
pub const MAX_PAGE_SIZE: i64 = 100;

const PAGE_PARAM: &str = "page";

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaginationError {
    #[error("Invalid page")]
    InvalidPage,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: i64,
    pub limit: i64,
}

impl PageRequest {
    /// Apply defaults; `limit` is clamped into `1..=MAX_PAGE_SIZE`.
    pub fn new(
        page: Option<i64>,
        limit: Option<i64>,
        default_limit: i64,
    ) -> Result<Self, PaginationError> {
        let page = page.unwrap_or(1);
        if page < 1 {
            return Err(PaginationError::InvalidPage);
        }
        let limit = limit.unwrap_or(default_limit).clamp(1, MAX_PAGE_SIZE);
        Ok(Self { page, limit })
    }

    pub fn offset(&self) -> i64 {
        (self.page - 1) * self.limit
    }

    /// Number of pages for `count` items; an empty result still has one page.
    pub fn page_count(&self, count: i64) -> i64 {
        if count <= 0 {
            1
        } else {
            (count + self.limit - 1) / self.limit
        }
    }

    /// Reject pages past the end. Page 1 is always valid, even when empty.
    pub fn check_in_range(&self, count: i64) -> Result<(), PaginationError> {
        if self.page > self.page_count(count) {
            return Err(PaginationError::InvalidPage);
        }
        Ok(())
    }

    pub fn links(&self, path: &str, raw_query: Option<&str>, count: i64) -> PageLinks {
        let next = (self.page < self.page_count(count))
            .then(|| page_url(path, raw_query, Some(self.page + 1)));
        let previous = match self.page {
            1 => None,
            2 => Some(page_url(path, raw_query, None)),
            page => Some(page_url(path, raw_query, Some(page - 1))),
        };
        PageLinks { next, previous }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PageLinks {
    pub next: Option<String>,
    pub previous: Option<String>,
}

/// Rebuild `path?query` with the `page` parameter replaced (or removed when `None`).
pub fn page_url(path: &str, raw_query: Option<&str>, page: Option<i64>) -> String {
    let mut serializer = form_urlencoded::Serializer::new(String::new());
    let mut has_pairs = false;

    let existing = raw_query.unwrap_or_default();
    for (key, value) in form_urlencoded::parse(existing.as_bytes()) {
        if key == PAGE_PARAM {
            continue;
        }
        serializer.append_pair(&key, &value);
        has_pairs = true;
    }
    if let Some(page) = page {
        serializer.append_pair(PAGE_PARAM, &page.to_string());
        has_pairs = true;
    }

    if has_pairs {
        format!("{path}?{}", serializer.finish())
    } else {
        path.to_string()
    }
}
