//! Field-list and order-by validation

use crate::core::error::{ShapeResult, ValidationError};
use crate::core::field::Shapeable;
use crate::core::mapping::MappingTable;
use crate::core::shaping::resolve_field_set;
use crate::core::sort::parse_order_by;

/// Check that every name in a comma-separated list is mapped in `table`.
///
/// Serves both plain field lists and order-by strings: a trailing direction
/// keyword is ignored. A blank list is valid. All-or-nothing: the first
/// unmapped name makes the whole list invalid.
pub fn fields_are_valid(table: &MappingTable, fields: Option<&str>) -> bool {
    let Some(raw) = fields else {
        return true;
    };

    parse_order_by(raw)
        .iter()
        .all(|clause| table.contains(clause.field))
}

/// [`fields_are_valid`] as a `Result`, for use with `?`
pub fn ensure_order_by_valid(table: &MappingTable, order_by: Option<&str>) -> ShapeResult<()> {
    if fields_are_valid(table, order_by) {
        Ok(())
    } else {
        Err(ValidationError::InvalidOrderBy {
            order_by: order_by.unwrap_or_default().to_string(),
        }
        .into())
    }
}

/// Check a shaping field list directly against `T`'s own field descriptors
pub fn type_has_fields<T: Shapeable>(fields: Option<&str>) -> bool {
    resolve_field_set::<T>(fields).is_ok()
}

/// [`type_has_fields`] as a `Result`, for use with `?`
pub fn ensure_type_has_fields<T: Shapeable>(fields: Option<&str>) -> ShapeResult<()> {
    resolve_field_set::<T>(fields).map(|_| ())
}
