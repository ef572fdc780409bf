//! Data shaping: reduce records to exactly the fields a caller asked for
//!
//! Shaping works on the *output* type's own field descriptors. It has no
//! relationship with the mapping registry, which translates public names to
//! *storage* fields for sorting.

use crate::core::error::{ShapeError, ShapeResult, ValidationError};
use crate::core::field::{FieldValue, Shapeable};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// An ordered field name → value mapping built from a single source item
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ShapedRecord {
    fields: IndexMap<String, FieldValue>,
}

impl ShapedRecord {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a field, replacing any previous value under the same name
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<FieldValue>) {
        self.fields.insert(name.into(), value.into());
    }

    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.fields.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.fields.contains_key(name)
    }

    /// Field names in insertion order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldValue)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl<K: Into<String>, V: Into<FieldValue>> FromIterator<(K, V)> for ShapedRecord {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut record = ShapedRecord::new();
        for (name, value) in iter {
            record.insert(name, value);
        }
        record
    }
}

/// Resolve a raw comma-separated field list against `T`'s descriptors.
///
/// An empty or whitespace-only list selects every public field in declaration
/// order. Otherwise the caller's order is kept and every token must resolve
/// to a distinct field, or the whole call fails.
pub fn resolve_field_set<T: Shapeable>(fields: Option<&str>) -> ShapeResult<Vec<&'static str>> {
    let raw = match fields {
        Some(raw) if !raw.trim().is_empty() => raw,
        _ => return Ok(T::field_names().to_vec()),
    };

    let mut field_set: Vec<&'static str> = Vec::new();
    for token in raw.split(',') {
        let declared = T::resolve_field(token.trim()).ok_or_else(|| {
            ShapeError::from(ValidationError::UnknownFields {
                resource: T::type_name(),
                fields: raw.to_string(),
            })
        })?;

        if field_set.contains(&declared) {
            return Err(ValidationError::DuplicateFields {
                resource: T::type_name(),
                fields: raw.to_string(),
            }
            .into());
        }
        field_set.push(declared);
    }

    Ok(field_set)
}

/// Shape a sequence of items.
///
/// The field set is resolved once up front, so an unknown field fails the
/// call before any record is built. The returned iterator is lazy and makes a
/// single pass over `items`.
pub fn shape_data<I>(
    items: I,
    fields: Option<&str>,
) -> ShapeResult<impl Iterator<Item = ShapedRecord> + use<I>>
where
    I: IntoIterator,
    I::Item: Shapeable,
{
    let field_set = resolve_field_set::<I::Item>(fields)?;
    tracing::debug!(
        resource = <I::Item as Shapeable>::type_name(),
        fields = ?field_set,
        "shaping records"
    );

    Ok(items
        .into_iter()
        .map(move |item| project(&item, &field_set)))
}

/// Shape a single item
pub fn shape_one<T: Shapeable>(item: &T, fields: Option<&str>) -> ShapeResult<ShapedRecord> {
    let field_set = resolve_field_set::<T>(fields)?;
    Ok(project(item, &field_set))
}

fn project<T: Shapeable>(item: &T, field_set: &[&'static str]) -> ShapedRecord {
    field_set
        .iter()
        .map(|name| {
            let value = item.field_value(name).unwrap_or(FieldValue::Null);
            (*name, value)
        })
        .collect()
}
