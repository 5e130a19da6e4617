use crate::error::ApiError;
use foodgram_core::pagination::{PageLinks, PageRequest};
use serde::Deserialize;
use utoipa::IntoParams;

#[derive(Debug, Default, Deserialize, IntoParams)]
pub struct PageParams {
    /// Page number, starting at 1
    pub page: Option<i64>,
    /// Page size (default 6, max 100)
    pub limit: Option<i64>,
}

impl PageParams {
    pub fn request(&self, default_limit: i64) -> Result<PageRequest, ApiError> {
        Ok(PageRequest::new(self.page, self.limit, default_limit)?)
    }
}

/// Validate the page against the total and build the navigation links.
pub fn page_links(
    request: &PageRequest,
    path: &str,
    raw_query: Option<&str>,
    count: i64,
) -> Result<PageLinks, ApiError> {
    request.check_in_range(count)?;
    Ok(request.links(path, raw_query, count))
}
