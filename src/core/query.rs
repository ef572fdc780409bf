//! Page requests, page results and the pagination calculator

use crate::core::error::{ShapeResult, ValidationError};
use crate::core::store::LazyQuery;
use serde::{Deserialize, Serialize};

/// A validated `(page size, page number)` pair.
///
/// Page size is silently capped at the configured maximum; a page size or
/// page number of zero or less is rejected instead of reaching the
/// calculator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    page_size: usize,
    page_number: usize,
}

impl PageRequest {
    pub fn new(page_size: i64, page_number: i64, max_page_size: usize) -> ShapeResult<Self> {
        if page_size <= 0 {
            return Err(ValidationError::InvalidPageSize { page_size }.into());
        }
        if page_number <= 0 {
            return Err(ValidationError::InvalidPageNumber { page_number }.into());
        }

        let page_size = usize::try_from(page_size)
            .unwrap_or(usize::MAX)
            .min(max_page_size.max(1));
        let page_number = usize::try_from(page_number).unwrap_or(usize::MAX);

        Ok(Self {
            page_size,
            page_number,
        })
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn page_number(&self) -> usize {
        self.page_number
    }

    /// Number of records before this page
    pub fn skip(&self) -> usize {
        self.page_size.saturating_mul(self.page_number - 1)
    }
}

/// Pagination metadata handed to the transport layer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginationMetadata {
    pub total_count: usize,
    pub page_size: usize,
    pub page_number: usize,
    pub total_pages: usize,
}

/// One bounded page of a query plus its metadata. Immutable once built.
#[derive(Debug, Clone, PartialEq)]
pub struct PageResult<T> {
    items: Vec<T>,
    total_count: usize,
    page_size: usize,
    current_page: usize,
    total_pages: usize,
}

impl<T> PageResult<T> {
    pub fn new(items: Vec<T>, total_count: usize, request: PageRequest) -> Self {
        let total_pages = total_count.div_ceil(request.page_size);

        Self {
            items,
            total_count,
            page_size: request.page_size,
            current_page: request.page_number,
            total_pages,
        }
    }

    pub fn items(&self) -> &[T] {
        &self.items
    }

    pub fn into_items(self) -> Vec<T> {
        self.items
    }

    pub fn total_count(&self) -> usize {
        self.total_count
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn current_page(&self) -> usize {
        self.current_page
    }

    pub fn total_pages(&self) -> usize {
        self.total_pages
    }

    /// Always false for an empty result set
    pub fn has_previous(&self) -> bool {
        self.total_count > 0 && self.current_page > 1
    }

    pub fn has_next(&self) -> bool {
        self.current_page < self.total_pages
    }

    pub fn metadata(&self) -> PaginationMetadata {
        PaginationMetadata {
            total_count: self.total_count,
            page_size: self.page_size,
            page_number: self.current_page,
            total_pages: self.total_pages,
        }
    }
}

/// Execute one count and one bounded fetch over an already filtered and
/// sorted query.
///
/// A page number past the end yields no items with otherwise correct
/// metadata.
pub async fn paginate<Q: LazyQuery>(query: &Q, request: PageRequest) -> ShapeResult<PageResult<Q::Item>> {
    let total_count = query.count().await?;
    let items = query.fetch(request.skip(), request.page_size).await?;

    let page = PageResult::new(items, total_count, request);
    tracing::debug!(
        total_count,
        page_size = page.page_size(),
        page_number = page.current_page(),
        total_pages = page.total_pages(),
        returned = page.items().len(),
        "paginated query"
    );
    Ok(page)
}
