//! Property mappings for the author catalog

use crate::catalog::author::{Author, AuthorDto};
use crate::core::error::ShapeResult;
use crate::core::mapping::{MappingEntry, MappingRegistry, MappingTable};

/// Sortable `AuthorDto` fields translated to `Author` columns.
///
/// `age` is stored as a date of birth, so its direction is reversed.
pub fn author_mapping_table() -> ShapeResult<MappingTable> {
    MappingTable::new()
        .with("id", MappingEntry::new(["id"]))?
        .with("mainCategory", MappingEntry::new(["main_category"]))?
        .with("age", MappingEntry::reverted(["date_of_birth"]))?
        .with("name", MappingEntry::new(["first_name", "last_name"]))
}

/// The registry every catalog request shares
pub fn default_registry() -> ShapeResult<MappingRegistry> {
    Ok(MappingRegistry::builder()
        .register::<AuthorDto, Author>(author_mapping_table()?)?
        .build())
}
