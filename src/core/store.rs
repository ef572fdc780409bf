//! Lazy query abstraction consumed by sorting and pagination

use crate::core::error::ShapeResult;
use crate::core::sort::SortSpec;
use async_trait::async_trait;

/// A composable, not-yet-executed query over a storage collection.
///
/// Filtering is backend-specific and happens on the concrete query type
/// before it is handed to [`apply_sort`](crate::core::sort::apply_sort) and
/// [`paginate`](crate::core::query::paginate). Nothing touches storage until
/// [`count`](LazyQuery::count) or [`fetch`](LazyQuery::fetch) is awaited.
#[async_trait]
pub trait LazyQuery: Send + Sync {
    /// The stored record type
    type Item: Send;

    /// Replace the query's ordering with `spec`, applied as one multi-key sort
    fn order_by(self, spec: SortSpec) -> Self
    where
        Self: Sized;

    /// Number of records matching the query's filters
    async fn count(&self) -> ShapeResult<usize>;

    /// Materialize at most `take` records after skipping `skip`, in query order
    async fn fetch(&self, skip: usize, take: usize) -> ShapeResult<Vec<Self::Item>>;
}
