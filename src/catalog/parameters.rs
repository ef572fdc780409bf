//! Query-string parameters of the author listing

use crate::config::ListingConfig;
use crate::core::error::ShapeResult;
use crate::core::query::PageRequest;
use serde::{Deserialize, Serialize};

/// Raw listing parameters as sent by the caller.
///
/// Everything is optional; [`AuthorResourceParameters::resolve`] fills the
/// gaps from [`ListingConfig`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthorResourceParameters {
    pub main_category: Option<String>,
    pub search_query: Option<String>,
    pub page_number: Option<i64>,
    pub page_size: Option<i64>,
    pub order_by: Option<String>,
    pub fields: Option<String>,
}

/// Listing parameters with defaults applied and paging validated
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthorListing {
    pub main_category: Option<String>,
    pub search_query: Option<String>,
    /// An empty string means unsorted
    pub order_by: String,
    pub page: PageRequest,
    pub fields: Option<String>,
}

impl AuthorResourceParameters {
    /// The caller's order-by string, or the configured default when absent
    pub fn order_by_or_default<'a>(&'a self, config: &'a ListingConfig) -> &'a str {
        self.order_by
            .as_deref()
            .unwrap_or(config.default_order_by.as_str())
    }

    pub fn page_request(&self, config: &ListingConfig) -> ShapeResult<PageRequest> {
        let page_size = self
            .page_size
            .unwrap_or_else(|| i64::try_from(config.default_page_size).unwrap_or(i64::MAX));
        let page_number = self
            .page_number
            .unwrap_or_else(|| i64::try_from(config.default_page_number).unwrap_or(i64::MAX));

        PageRequest::new(page_size, page_number, config.max_page_size)
    }

    pub fn resolve(&self, config: &ListingConfig) -> ShapeResult<AuthorListing> {
        Ok(AuthorListing {
            main_category: non_blank(self.main_category.as_deref()),
            search_query: non_blank(self.search_query.as_deref()),
            order_by: self.order_by_or_default(config).to_string(),
            page: self.page_request(config)?,
            fields: non_blank(self.fields.as_deref()),
        })
    }
}

fn non_blank(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}
