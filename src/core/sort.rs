//! Dynamic multi-key sorting
//!
//! Turns a caller-supplied order-by string (`"name desc, age"`) into a single
//! [`SortSpec`] over storage fields, using a [`MappingTable`] to translate
//! public names and apply direction reversal.

use crate::core::error::{ShapeResult, SortError};
use crate::core::mapping::MappingTable;
use crate::core::store::LazyQuery;
use std::fmt;

/// Sort direction of a single key
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum SortDirection {
    #[default]
    Ascending,
    Descending,
}

impl SortDirection {
    pub fn reversed(self) -> Self {
        match self {
            SortDirection::Ascending => SortDirection::Descending,
            SortDirection::Descending => SortDirection::Ascending,
        }
    }

    /// XOR the direction with a mapping entry's revert flag
    pub fn apply_revert(self, revert: bool) -> Self {
        if revert { self.reversed() } else { self }
    }

    pub fn is_descending(self) -> bool {
        self == SortDirection::Descending
    }
}

impl fmt::Display for SortDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SortDirection::Ascending => write!(f, "ascending"),
            SortDirection::Descending => write!(f, "descending"),
        }
    }
}

/// One `(field, direction)` unit of an order-by string
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrderClause<'a> {
    pub field: &'a str,
    pub direction: SortDirection,
}

impl<'a> OrderClause<'a> {
    /// Parse a single clause.
    ///
    /// The clause is trimmed; it is descending iff it ends with `" desc"`,
    /// and the field name is everything before the first space.
    pub fn parse(raw: &'a str) -> Self {
        let trimmed = raw.trim();
        let direction = if trimmed.ends_with(" desc") {
            SortDirection::Descending
        } else {
            SortDirection::Ascending
        };
        let field = trimmed
            .split_once(' ')
            .map_or(trimmed, |(field, _)| field);

        Self { field, direction }
    }
}

/// Split an order-by string into clauses, leftmost first.
///
/// An empty or whitespace-only string yields no clauses.
pub fn parse_order_by(raw: &str) -> Vec<OrderClause<'_>> {
    if raw.trim().is_empty() {
        return Vec::new();
    }
    raw.split(',').map(OrderClause::parse).collect()
}

/// A storage field with its resolved direction
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortKey {
    pub field: String,
    pub direction: SortDirection,
}

/// An ordered list of sort keys applied as one multi-key ordering.
///
/// The first key has primary precedence; later keys only break ties.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SortSpec {
    keys: Vec<SortKey>,
}

impl SortSpec {
    pub fn new(keys: Vec<SortKey>) -> Self {
        Self { keys }
    }

    pub fn keys(&self) -> &[SortKey] {
        &self.keys
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}

impl fmt::Display for SortSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, key) in self.keys.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{} {}", key.field, key.direction)?;
        }
        Ok(())
    }
}

/// Compose the storage ordering for an order-by string.
///
/// Every clause must resolve through `table`; an unmapped name means the
/// caller skipped validation and fails with [`SortError::MissingKeyMapping`].
pub fn build_sort_spec(order_by: &str, table: &MappingTable) -> ShapeResult<SortSpec> {
    let mut keys = Vec::new();

    for clause in parse_order_by(order_by) {
        let entry = table
            .get(clause.field)
            .ok_or_else(|| SortError::MissingKeyMapping {
                field: clause.field.to_string(),
            })?;

        let direction = clause.direction.apply_revert(entry.revert());
        keys.extend(entry.destinations().iter().map(|destination| SortKey {
            field: destination.clone(),
            direction,
        }));
    }

    Ok(SortSpec::new(keys))
}

/// Apply an order-by string to a lazy query.
///
/// A blank `order_by` returns the query untouched. Otherwise the composed
/// [`SortSpec`] is applied in one `order_by` call.
pub fn apply_sort<Q: LazyQuery>(query: Q, order_by: &str, table: &MappingTable) -> ShapeResult<Q> {
    if order_by.trim().is_empty() {
        return Ok(query);
    }

    let spec = build_sort_spec(order_by, table)?;
    tracing::debug!(order_by, ordering = %spec, "composed sort");
    Ok(query.order_by(spec))
}
