//! Field mapping registry
//!
//! Translates public (output-type) field names into one or more storage
//! fields, with an optional sort-direction reversal. One [`MappingTable`] is
//! registered per (public type, storage type) pair at startup; the resulting
//! [`MappingRegistry`] is immutable and shared read-only by every request.

use crate::core::error::{ConfigError, ShapeError, ShapeResult};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::any::{TypeId, type_name};
use std::collections::HashMap;

/// Storage fields a single public field fans out to
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MappingEntry {
    /// Storage field names, applied in order with the same direction
    destinations: Vec<String>,

    /// Invert the requested direction (e.g. `age` stored as `date_of_birth`)
    #[serde(default)]
    revert: bool,
}

impl MappingEntry {
    pub fn new<I, S>(destinations: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            destinations: destinations.into_iter().map(Into::into).collect(),
            revert: false,
        }
    }

    /// Same as [`MappingEntry::new`] but with the direction reversed
    pub fn reverted<I, S>(destinations: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            revert: true,
            ..Self::new(destinations)
        }
    }

    pub fn destinations(&self) -> &[String] {
        &self.destinations
    }

    pub fn revert(&self) -> bool {
        self.revert
    }
}

/// Public field name → [`MappingEntry`], matched case-insensitively
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(try_from = "IndexMap<String, MappingEntry>")]
pub struct MappingTable {
    entries: IndexMap<String, MappingEntry>,
}

impl MappingTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an entry, rejecting entries with no destination fields
    pub fn insert(&mut self, name: &str, entry: MappingEntry) -> ShapeResult<()> {
        if entry.destinations.is_empty() {
            return Err(ConfigError::EmptyMappingEntry {
                field: name.to_string(),
            }
            .into());
        }
        self.entries.insert(name.to_ascii_lowercase(), entry);
        Ok(())
    }

    /// Builder-style [`MappingTable::insert`]
    pub fn with(mut self, name: &str, entry: MappingEntry) -> ShapeResult<Self> {
        self.insert(name, entry)?;
        Ok(self)
    }

    /// Load a table from YAML, e.g.
    ///
    /// ```yaml
    /// name:
    ///   destinations: [first_name, last_name]
    /// age:
    ///   destinations: [date_of_birth]
    ///   revert: true
    /// ```
    pub fn from_yaml_str(yaml: &str) -> ShapeResult<Self> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    pub fn get(&self, name: &str) -> Option<&MappingEntry> {
        self.entries.get(&name.to_ascii_lowercase())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Mapped public names (lowercased), in registration order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl TryFrom<IndexMap<String, MappingEntry>> for MappingTable {
    type Error = ShapeError;

    fn try_from(raw: IndexMap<String, MappingEntry>) -> Result<Self, Self::Error> {
        raw.into_iter()
            .try_fold(MappingTable::new(), |table, (name, entry)| {
                table.with(&name, entry)
            })
    }
}

/// Immutable registry of mapping tables keyed by (public type, storage type)
#[derive(Debug, Default)]
pub struct MappingRegistry {
    tables: HashMap<(TypeId, TypeId), MappingTable>,
}

impl MappingRegistry {
    pub fn builder() -> MappingRegistryBuilder {
        MappingRegistryBuilder::default()
    }

    /// Get the table registered for exactly `<P, S>`.
    ///
    /// An unregistered pair is a programming error, reported as
    /// [`ConfigError::MissingMapping`]; nothing is inferred.
    pub fn lookup<P: 'static, S: 'static>(&self) -> ShapeResult<&MappingTable> {
        self.tables
            .get(&(TypeId::of::<P>(), TypeId::of::<S>()))
            .ok_or_else(|| {
                ConfigError::MissingMapping {
                    public_type: type_name::<P>(),
                    storage_type: type_name::<S>(),
                }
                .into()
            })
    }

    pub fn len(&self) -> usize {
        self.tables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }
}

/// Collects tables at startup; [`MappingRegistryBuilder::build`] freezes them
#[derive(Debug, Default)]
pub struct MappingRegistryBuilder {
    tables: HashMap<(TypeId, TypeId), MappingTable>,
}

impl MappingRegistryBuilder {
    /// Register the table for `<P, S>`. Registering the same pair twice fails.
    pub fn register<P: 'static, S: 'static>(mut self, table: MappingTable) -> ShapeResult<Self> {
        let key = (TypeId::of::<P>(), TypeId::of::<S>());
        if self.tables.contains_key(&key) {
            return Err(ConfigError::DuplicateMapping {
                public_type: type_name::<P>(),
                storage_type: type_name::<S>(),
            }
            .into());
        }
        tracing::debug!(
            public_type = type_name::<P>(),
            storage_type = type_name::<S>(),
            fields = table.len(),
            "registered property mapping"
        );
        self.tables.insert(key, table);
        Ok(self)
    }

    pub fn build(self) -> MappingRegistry {
        MappingRegistry {
            tables: self.tables,
        }
    }
}
