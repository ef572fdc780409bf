//! # shape-rs
//!
//! Paged, filterable, sortable and field-shaped resource listings for REST
//! APIs in Rust.
//!
//! ## Features
//!
//! - **Property Mappings**: Public field names fan out to one or more storage
//!   fields, with optional sort-direction reversal
//! - **Dynamic Sorting**: `orderBy=name desc, age` composed into one multi-key ordering
//! - **Data Shaping**: `fields=id,name` reduces each record to the requested fields
//! - **Pagination**: One count and one bounded fetch per page, with page metadata
//! - **Type-Safe**: Field descriptors generated per type, no runtime reflection
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use shape::prelude::*;
//!
//! let registry = default_registry()?;
//! let table = registry.lookup::<AuthorDto, Author>()?;
//!
//! ensure_order_by_valid(table, Some("age desc"))?;
//! let query = apply_sort(authors.query(), "age desc", table)?;
//! let page = paginate(&query, PageRequest::new(10, 1, 20)?).await?;
//!
//! let dtos: Vec<AuthorDto> = page.items().iter().map(AuthorDto::from).collect();
//! let shaped: Vec<ShapedRecord> = shape_data(&dtos, Some("id, name"))?.collect();
//! ```

pub mod catalog;
pub mod config;
pub mod core;
pub mod entities;
pub mod links;
pub mod server;
pub mod storage;

/// Re-exports of commonly used types and traits
pub mod prelude {
    // === Core ===
    pub use crate::core::{
        error::{
            ConfigError, EntityError, ErrorResponse, ShapeError, ShapeResult, SortError,
            StorageError, ValidationError,
        },
        field::{FieldValue, Shapeable},
        mapping::{MappingEntry, MappingRegistry, MappingTable},
        query::{PageRequest, PageResult, PaginationMetadata, paginate},
        shaping::{ShapedRecord, resolve_field_set, shape_data, shape_one},
        sort::{OrderClause, SortDirection, SortKey, SortSpec, apply_sort, build_sort_spec},
        store::LazyQuery,
        validation::{
            Validated, ValidatedList, ensure_order_by_valid, ensure_type_has_fields,
            fields_are_valid, type_has_fields,
        },
    };

    // === Macros ===
    pub use crate::impl_shapeable;

    // === Catalog ===
    pub use crate::catalog::{
        Author, AuthorDto, AuthorForCreationDto, AuthorFullDto, AuthorListing,
        AuthorRepository, AuthorResourceParameters, author_mapping_table, current_age,
        default_registry,
    };

    // === Storage ===
    pub use crate::storage::{InMemoryAuthorRepository, InMemoryQuery, InMemoryTable};

    // === Links ===
    pub use crate::links::LinkDto;

    // === Server ===
    pub use crate::server::{AppState, ServerBuilder};

    // === Config ===
    pub use crate::config::ListingConfig;

    // === Re-exports from dependencies ===
    pub use async_trait::async_trait;
    pub use chrono::{DateTime, Utc};
    pub use uuid::Uuid;
}
