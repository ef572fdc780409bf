//! In-memory lazy queries for testing and development

use crate::core::error::{ShapeError, ShapeResult, StorageError};
use crate::core::field::{FieldValue, Shapeable};
use crate::core::sort::{SortDirection, SortSpec};
use crate::core::store::LazyQuery;
use async_trait::async_trait;
use std::cmp::Ordering;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

/// A filter predicate over stored rows
pub type Predicate<T> = Arc<dyn Fn(&T) -> bool + Send + Sync>;

/// Thread-safe row store backing [`InMemoryQuery`].
///
/// Rows keep their insertion order, which is also the order of rows that
/// compare equal under every sort key.
pub struct InMemoryTable<T> {
    rows: Arc<RwLock<Vec<T>>>,
}

impl<T> Clone for InMemoryTable<T> {
    fn clone(&self) -> Self {
        Self {
            rows: Arc::clone(&self.rows),
        }
    }
}

impl<T> Default for InMemoryTable<T> {
    fn default() -> Self {
        Self::from_rows(Vec::new())
    }
}

impl<T> InMemoryTable<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_rows(rows: Vec<T>) -> Self {
        Self {
            rows: Arc::new(RwLock::new(rows)),
        }
    }

    fn read(&self) -> ShapeResult<RwLockReadGuard<'_, Vec<T>>> {
        Ok(self.rows.read().map_err(|e| StorageError::LockPoisoned {
            kind: "read",
            message: e.to_string(),
        })?)
    }

    fn write(&self) -> ShapeResult<RwLockWriteGuard<'_, Vec<T>>> {
        Ok(self.rows.write().map_err(|e| StorageError::LockPoisoned {
            kind: "write",
            message: e.to_string(),
        })?)
    }

    pub fn insert(&self, row: T) -> ShapeResult<()> {
        self.write()?.push(row);
        Ok(())
    }

    /// Append `row` unless a stored row matches `conflicts`.
    ///
    /// The check and the append happen under one write lock. Returns whether
    /// the row was stored.
    pub fn insert_if_absent(&self, row: T, conflicts: impl Fn(&T) -> bool) -> ShapeResult<bool> {
        let mut rows = self.write()?;
        if rows.iter().any(|stored| conflicts(stored)) {
            return Ok(false);
        }
        rows.push(row);
        Ok(true)
    }

    pub fn len(&self) -> ShapeResult<usize> {
        Ok(self.read()?.len())
    }

    pub fn is_empty(&self) -> ShapeResult<bool> {
        Ok(self.len()? == 0)
    }

    /// Start a lazy query over the table; nothing is read until it executes
    pub fn query(&self) -> InMemoryQuery<T> {
        InMemoryQuery {
            table: self.clone(),
            filters: Vec::new(),
            ordering: SortSpec::default(),
        }
    }
}

impl<T: Clone> InMemoryTable<T> {
    /// First row matching `predicate`
    pub fn find(&self, predicate: impl Fn(&T) -> bool) -> ShapeResult<Option<T>> {
        Ok(self.read()?.iter().find(|row| predicate(row)).cloned())
    }
}

/// A deferred filter/sort plan over an [`InMemoryTable`].
///
/// Filters and ordering only record the plan; the table is read when
/// [`count`](LazyQuery::count) or [`fetch`](LazyQuery::fetch) runs.
pub struct InMemoryQuery<T> {
    table: InMemoryTable<T>,
    filters: Vec<Predicate<T>>,
    ordering: SortSpec,
}

impl<T> Clone for InMemoryQuery<T> {
    fn clone(&self) -> Self {
        Self {
            table: self.table.clone(),
            filters: self.filters.clone(),
            ordering: self.ordering.clone(),
        }
    }
}

impl<T> InMemoryQuery<T> {
    /// Keep only rows matching `predicate`. Filters combine with AND.
    pub fn filter<F>(mut self, predicate: F) -> Self
    where
        F: Fn(&T) -> bool + Send + Sync + 'static,
    {
        self.filters.push(Arc::new(predicate));
        self
    }

    pub fn ordering(&self) -> &SortSpec {
        &self.ordering
    }

    fn matches(&self, row: &T) -> bool {
        self.filters.iter().all(|predicate| predicate(row))
    }
}

impl<T: Shapeable + Clone> InMemoryQuery<T> {
    /// Resolve the ordering's storage fields against `T`'s columns
    fn columns(&self) -> ShapeResult<Vec<(&'static str, SortDirection)>> {
        self.ordering
            .keys()
            .iter()
            .map(|key| {
                T::resolve_field(&key.field)
                    .map(|column| (column, key.direction))
                    .ok_or_else(|| {
                        ShapeError::from(StorageError::UnknownColumn {
                            entity_type: T::type_name(),
                            column: key.field.clone(),
                        })
                    })
            })
            .collect()
    }

    fn count_matching(&self) -> ShapeResult<usize> {
        let rows = self.table.read()?;
        Ok(rows.iter().filter(|row| self.matches(row)).count())
    }

    fn execute(&self, skip: usize, take: usize) -> ShapeResult<Vec<T>> {
        let columns = self.columns()?;
        let rows = self.table.read()?;

        let matched = rows.iter().filter(|row| self.matches(row));
        if columns.is_empty() {
            return Ok(matched.skip(skip).take(take).cloned().collect());
        }

        let mut keyed: Vec<(Vec<FieldValue>, &T)> = matched
            .map(|row| {
                let keys = columns
                    .iter()
                    .map(|(column, _)| row.field_value(column).unwrap_or(FieldValue::Null))
                    .collect();
                (keys, row)
            })
            .collect();

        // stable, so equal rows stay in insertion order
        keyed.sort_by(|(a, _), (b, _)| compare_keys(a, b, &columns));

        Ok(keyed
            .into_iter()
            .skip(skip)
            .take(take)
            .map(|(_, row)| row.clone())
            .collect())
    }
}

fn compare_keys(a: &[FieldValue], b: &[FieldValue], columns: &[(&str, SortDirection)]) -> Ordering {
    a.iter()
        .zip(b)
        .zip(columns)
        .map(|((left, right), (_, direction))| {
            let ordering = left.compare(right);
            if direction.is_descending() {
                ordering.reverse()
            } else {
                ordering
            }
        })
        .find(|ordering| ordering.is_ne())
        .unwrap_or(Ordering::Equal)
}

#[async_trait]
impl<T> LazyQuery for InMemoryQuery<T>
where
    T: Shapeable + Clone + Send + Sync + 'static,
{
    type Item = T;

    fn order_by(mut self, spec: SortSpec) -> Self {
        self.ordering = spec;
        self
    }

    async fn count(&self) -> ShapeResult<usize> {
        self.count_matching()
    }

    async fn fetch(&self, skip: usize, take: usize) -> ShapeResult<Vec<T>> {
        self.execute(skip, take)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::mapping::{MappingEntry, MappingTable};
    use crate::core::query::{PageRequest, paginate};
    use crate::core::sort::{SortKey, apply_sort};
    use crate::impl_shapeable;

    #[derive(Debug, Clone, PartialEq)]
    struct Person {
        first_name: String,
        last_name: String,
        born: i64,
    }

    impl_shapeable!(Person, "Person", {
        "first_name" => first_name,
        "last_name" => last_name,
        "born" => born,
    });

    fn person(first: &str, last: &str, born: i64) -> Person {
        Person {
            first_name: first.to_string(),
            last_name: last.to_string(),
            born,
        }
    }

    fn names(rows: &[Person]) -> Vec<(&str, &str)> {
        rows.iter()
            .map(|p| (p.first_name.as_str(), p.last_name.as_str()))
            .collect()
    }

    fn people_table() -> MappingTable {
        MappingTable::new()
            .with("name", MappingEntry::new(["first_name", "last_name"]))
            .and_then(|t| t.with("age", MappingEntry::reverted(["born"])))
            .unwrap()
    }

    #[tokio::test]
    async fn test_name_desc_sorts_first_then_last_name() {
        let table = InMemoryTable::from_rows(vec![person("Ann", "Young", 1980), person("Bob", "Zed", 1970)]);

        let query = apply_sort(table.query(), "name desc", &people_table()).unwrap();
        let rows = query.fetch(0, 10).await.unwrap();

        assert_eq!(names(&rows), vec![("Bob", "Zed"), ("Ann", "Young")]);
    }

    #[tokio::test]
    async fn test_secondary_key_breaks_ties() {
        let table = InMemoryTable::from_rows(vec![
            person("Ann", "Young", 1980),
            person("Ann", "Adams", 1990),
            person("Bob", "Zed", 1970),
        ]);

        let query = apply_sort(table.query(), "name", &people_table()).unwrap();
        let rows = query.fetch(0, 10).await.unwrap();

        assert_eq!(
            names(&rows),
            vec![("Ann", "Adams"), ("Ann", "Young"), ("Bob", "Zed")]
        );
    }

    #[tokio::test]
    async fn test_reverted_ascending_matches_stored_descending() {
        let table = InMemoryTable::from_rows(vec![
            person("Mid", "One", 1980),
            person("Old", "One", 1950),
            person("Young", "One", 2001),
        ]);

        let by_age = apply_sort(table.query(), "age", &people_table()).unwrap();
        let by_born_desc = table.query().order_by(SortSpec::new(vec![SortKey {
            field: "born".to_string(),
            direction: SortDirection::Descending,
        }]));

        let age_rows = by_age.fetch(0, 10).await.unwrap();
        assert_eq!(age_rows, by_born_desc.fetch(0, 10).await.unwrap());
        assert_eq!(age_rows[0].first_name, "Young");
    }

    #[tokio::test]
    async fn test_filters_apply_to_count_and_fetch() {
        let table = InMemoryTable::from_rows((1..=30).map(|i| person("P", "Q", i)).collect());
        let query = table.query().filter(|p: &Person| p.born % 2 == 0);

        let page = paginate(&query, PageRequest::new(10, 2, 20).unwrap())
            .await
            .unwrap();

        assert_eq!(page.total_count(), 15);
        assert_eq!(page.total_pages(), 2);
        let born: Vec<i64> = page.items().iter().map(|p| p.born).collect();
        assert_eq!(born, vec![22, 24, 26, 28, 30]);
    }

    #[tokio::test]
    async fn test_query_is_deferred_until_execution() {
        let table = InMemoryTable::new();
        let query = table.query().filter(|p: &Person| p.last_name == "Late");

        table.insert(person("Kate", "Late", 1990)).unwrap();

        assert_eq!(query.count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_unknown_column_fails_at_execution() {
        let table = InMemoryTable::from_rows(vec![person("A", "B", 1)]);
        let query = table.query().order_by(SortSpec::new(vec![SortKey {
            field: "shoe_size".to_string(),
            direction: SortDirection::Ascending,
        }]));

        let err = query.fetch(0, 10).await.unwrap_err();
        assert!(matches!(
            err,
            ShapeError::Storage(StorageError::UnknownColumn { .. })
        ));
    }

    #[test]
    fn test_insert_if_absent() {
        let table = InMemoryTable::from_rows(vec![person("A", "B", 1)]);

        assert!(!table.insert_if_absent(person("A", "Z", 5), |p| p.first_name == "A").unwrap());
        assert!(table.insert_if_absent(person("C", "D", 2), |p| p.first_name == "C").unwrap());
        assert_eq!(table.len().unwrap(), 2);
    }

    #[test]
    fn test_find() {
        let table = InMemoryTable::from_rows(vec![person("A", "B", 1), person("C", "D", 2)]);
        let found = table.find(|p| p.born == 2).unwrap();
        assert_eq!(found.map(|p| p.first_name), Some("C".to_string()));
        assert!(table.find(|p| p.born == 3).unwrap().is_none());
        assert_eq!(table.len().unwrap(), 2);
    }
}
