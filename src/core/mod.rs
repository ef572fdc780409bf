//! Core module: the dynamic-projection subsystem
//!
//! Listing requests compose these pieces strictly in this order:
//! filter (on the concrete query) → [`sort::apply_sort`] →
//! [`query::paginate`] → [`shaping::shape_data`].

pub mod error;
pub mod field;
pub mod mapping;
pub mod query;
pub mod shaping;
pub mod sort;
pub mod store;
pub mod validation;

pub use error::{ShapeError, ShapeResult};
pub use field::{FieldValue, Shapeable};
pub use mapping::{MappingEntry, MappingRegistry, MappingTable};
pub use query::{PageRequest, PageResult, PaginationMetadata, paginate};
pub use shaping::{ShapedRecord, shape_data, shape_one};
pub use sort::{SortDirection, SortKey, SortSpec, apply_sort};
pub use store::LazyQuery;
