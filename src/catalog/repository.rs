//! Storage-agnostic access to authors

use crate::catalog::author::Author;
use crate::catalog::parameters::AuthorListing;
use crate::core::error::ShapeResult;
use crate::core::query::PageResult;
use async_trait::async_trait;
use uuid::Uuid;

/// Author storage as seen by the HTTP layer.
///
/// Implementations run a listing as filter → sort → paginate over their own
/// lazy query type, translating the public order-by string through the
/// `(AuthorDto, Author)` mapping table.
#[async_trait]
pub trait AuthorRepository: Send + Sync {
    /// One page of authors matching `listing`
    async fn get_authors(&self, listing: &AuthorListing) -> ShapeResult<PageResult<Author>>;

    async fn get_author(&self, id: &Uuid) -> ShapeResult<Option<Author>>;

    async fn add_author(&self, author: Author) -> ShapeResult<Author>;

    async fn author_exists(&self, id: &Uuid) -> ShapeResult<bool> {
        Ok(self.get_author(id).await?.is_some())
    }
}
