//! In-memory implementation of AuthorRepository

use crate::catalog::author::{Author, AuthorDto};
use crate::catalog::parameters::AuthorListing;
use crate::catalog::repository::AuthorRepository;
use crate::core::error::{EntityError, ShapeResult};
use crate::core::mapping::MappingRegistry;
use crate::core::query::{PageResult, paginate};
use crate::core::sort::apply_sort;
use crate::storage::in_memory::InMemoryTable;
use async_trait::async_trait;
use std::sync::Arc;
use uuid::Uuid;

/// In-memory author repository
///
/// Useful for testing and development. Listings read the table only when
/// the page is counted and fetched.
#[derive(Clone)]
pub struct InMemoryAuthorRepository {
    authors: InMemoryTable<Author>,
    registry: Arc<MappingRegistry>,
}

impl InMemoryAuthorRepository {
    pub fn new(registry: Arc<MappingRegistry>) -> Self {
        Self::with_authors(registry, Vec::new())
    }

    pub fn with_authors(registry: Arc<MappingRegistry>, authors: Vec<Author>) -> Self {
        Self {
            authors: InMemoryTable::from_rows(authors),
            registry,
        }
    }
}

#[async_trait]
impl AuthorRepository for InMemoryAuthorRepository {
    async fn get_authors(&self, listing: &AuthorListing) -> ShapeResult<PageResult<Author>> {
        let mapping = self.registry.lookup::<AuthorDto, Author>()?;
        let mut query = self.authors.query();

        if let Some(main_category) = &listing.main_category {
            let main_category = main_category.to_lowercase();
            query = query.filter(move |author: &Author| {
                author.main_category.trim().to_lowercase() == main_category
            });
        }

        if let Some(search_query) = &listing.search_query {
            let search_query = search_query.to_lowercase();
            query = query.filter(move |author: &Author| {
                [&author.main_category, &author.first_name, &author.last_name]
                    .iter()
                    .any(|value| value.to_lowercase().contains(&search_query))
            });
        }

        let query = apply_sort(query, &listing.order_by, mapping)?;
        paginate(&query, listing.page).await
    }

    async fn get_author(&self, id: &Uuid) -> ShapeResult<Option<Author>> {
        self.authors.find(|author| &author.id == id)
    }

    async fn add_author(&self, author: Author) -> ShapeResult<Author> {
        let id = author.id;
        if !self
            .authors
            .insert_if_absent(author.clone(), |stored| stored.id == id)?
        {
            return Err(EntityError::AlreadyExists {
                entity_type: "Author".to_string(),
                id,
            }
            .into());
        }

        tracing::debug!(author_id = %id, "stored author");
        Ok(author)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::mapping::default_registry;
    use crate::catalog::parameters::AuthorResourceParameters;
    use crate::config::ListingConfig;
    use crate::core::error::ShapeError;
    use chrono::{TimeZone, Utc};

    fn author(first: &str, last: &str, year: i32, category: &str) -> Author {
        Author::new(
            first,
            last,
            Utc.with_ymd_and_hms(year, 1, 1, 0, 0, 0).unwrap(),
            category,
        )
    }

    fn repository() -> InMemoryAuthorRepository {
        InMemoryAuthorRepository::with_authors(
            Arc::new(default_registry().unwrap()),
            vec![
                author("Nancy", "Rye", 1978, "Rum"),
                author("Berry", "Eldritch", 1980, "Ships"),
                author("Eli", "Ivory Bones Sweet", 1957, "Ships"),
                author("Arnold", "Ulysses", 1963, "Rum"),
                author("Seabury", "Toxic Reyson", 1975, "Maps"),
            ],
        )
    }

    fn listing(params: AuthorResourceParameters) -> AuthorListing {
        params.resolve(&ListingConfig::default()).unwrap()
    }

    fn first_names(page: &PageResult<Author>) -> Vec<&str> {
        page.items().iter().map(|a| a.first_name.as_str()).collect()
    }

    #[tokio::test]
    async fn test_default_listing_is_sorted_by_name() {
        let page = repository()
            .get_authors(&listing(AuthorResourceParameters::default()))
            .await
            .unwrap();

        assert_eq!(page.total_count(), 5);
        assert_eq!(
            first_names(&page),
            vec!["Arnold", "Berry", "Eli", "Nancy", "Seabury"]
        );
    }

    #[tokio::test]
    async fn test_main_category_filter_is_case_insensitive() {
        let page = repository()
            .get_authors(&listing(AuthorResourceParameters {
                main_category: Some(" ships ".to_string()),
                ..Default::default()
            }))
            .await
            .unwrap();

        assert_eq!(first_names(&page), vec!["Berry", "Eli"]);
    }

    #[tokio::test]
    async fn test_search_query_matches_names_and_category() {
        let repo = repository();
        let search = |query: &str| {
            listing(AuthorResourceParameters {
                search_query: Some(query.to_string()),
                ..Default::default()
            })
        };

        let by_category = repo.get_authors(&search("sHIP")).await.unwrap();
        assert_eq!(first_names(&by_category), vec!["Berry", "Eli"]);

        let by_last_name = repo.get_authors(&search("RYE")).await.unwrap();
        assert_eq!(first_names(&by_last_name), vec!["Nancy"]);

        let by_first_name = repo.get_authors(&search("seab")).await.unwrap();
        assert_eq!(first_names(&by_first_name), vec!["Seabury"]);
    }

    #[tokio::test]
    async fn test_filter_then_sort_then_paginate() {
        let page = repository()
            .get_authors(&listing(AuthorResourceParameters {
                order_by: Some("age desc".to_string()),
                page_size: Some(2),
                page_number: Some(2),
                ..Default::default()
            }))
            .await
            .unwrap();

        // oldest first: Eli 1957, Arnold 1963, Seabury 1975, Nancy 1978, Berry 1980
        assert_eq!(first_names(&page), vec!["Seabury", "Nancy"]);
        assert_eq!(page.total_pages(), 3);
        assert!(page.has_next());
        assert!(page.has_previous());
    }

    #[tokio::test]
    async fn test_unvalidated_order_by_fails() {
        let err = repository()
            .get_authors(&listing(AuthorResourceParameters {
                order_by: Some("shoeSize".to_string()),
                ..Default::default()
            }))
            .await
            .unwrap_err();

        assert!(matches!(err, ShapeError::Sort(_)));
    }

    #[tokio::test]
    async fn test_add_and_get_author() {
        let repo = repository();
        let created = repo
            .add_author(author("Kate", "Late", 1990, "Rum"))
            .await
            .unwrap();

        assert!(repo.author_exists(&created.id).await.unwrap());
        let fetched = repo.get_author(&created.id).await.unwrap().unwrap();
        assert_eq!(fetched, created);

        let err = repo.add_author(created).await.unwrap_err();
        assert!(matches!(
            err,
            ShapeError::Entity(EntityError::AlreadyExists { .. })
        ));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_adds_of_one_author_store_it_once() {
        let repo = repository();
        let author = author("Kate", "Late", 1990, "Rum");

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let repo = repo.clone();
                let author = author.clone();
                tokio::spawn(async move { repo.add_author(author).await })
            })
            .collect();

        let mut stored = 0;
        for handle in handles {
            match handle.await.unwrap() {
                Ok(_) => stored += 1,
                Err(ShapeError::Entity(EntityError::AlreadyExists { .. })) => {}
                Err(other) => panic!("unexpected error: {:?}", other),
            }
        }

        assert_eq!(stored, 1);
        assert_eq!(repo.authors.len().unwrap(), 6);
    }

    #[tokio::test]
    async fn test_missing_author() {
        let repo = repository();
        assert!(repo.get_author(&Uuid::new_v4()).await.unwrap().is_none());
    }
}
