//! Link construction for the author resources

use crate::catalog::parameters::AuthorListing;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Collection path of the author resource
pub const AUTHORS_PATH: &str = "/api/authors";

/// Path of author collections created or fetched together
pub const AUTHOR_COLLECTIONS_PATH: &str = "/api/authorcollections";

/// A single hypermedia link
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkDto {
    pub href: String,
    pub rel: String,
    pub method: String,
}

impl LinkDto {
    pub fn new(href: impl Into<String>, rel: &str, method: &str) -> Self {
        Self {
            href: href.into(),
            rel: rel.to_string(),
            method: method.to_string(),
        }
    }
}

/// Which page a collection URI points at, relative to the current one
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceUriType {
    PreviousPage,
    CurrentPage,
    NextPage,
}

pub fn author_uri(author_id: Uuid) -> String {
    format!("{}/{}", AUTHORS_PATH, author_id)
}

/// `/api/authorcollections/(id1,id2,...)`
pub fn author_collection_uri(author_ids: &[Uuid]) -> String {
    let ids = author_ids
        .iter()
        .map(Uuid::to_string)
        .collect::<Vec<_>>()
        .join(",");
    format!("{}/({})", AUTHOR_COLLECTIONS_PATH, ids)
}

/// Parse the `(id1,id2,...)` segment of an author collection URI.
///
/// Parentheses are optional, blanks between commas are skipped.
pub fn parse_author_ids(segment: &str) -> Option<Vec<Uuid>> {
    let trimmed = segment.trim();
    let inner = trimmed
        .strip_prefix('(')
        .and_then(|rest| rest.strip_suffix(')'))
        .unwrap_or(trimmed);

    let ids = inner
        .split(',')
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .map(|token| Uuid::parse_str(token).ok())
        .collect::<Option<Vec<_>>>()?;

    if ids.is_empty() { None } else { Some(ids) }
}

/// URI of one page of the author collection, keeping every listing parameter
pub fn authors_resource_uri(listing: &AuthorListing, kind: ResourceUriType) -> String {
    let current = listing.page.page_number();
    let page_number = match kind {
        ResourceUriType::PreviousPage => current.saturating_sub(1),
        ResourceUriType::CurrentPage => current,
        ResourceUriType::NextPage => current.saturating_add(1),
    };

    let mut params: Vec<(&str, String)> = Vec::new();
    if let Some(fields) = &listing.fields {
        params.push(("fields", fields.clone()));
    }
    params.push(("orderBy", listing.order_by.clone()));
    params.push(("pageNumber", page_number.to_string()));
    params.push(("pageSize", listing.page.page_size().to_string()));
    if let Some(main_category) = &listing.main_category {
        params.push(("mainCategory", main_category.clone()));
    }
    if let Some(search_query) = &listing.search_query {
        params.push(("searchQuery", search_query.clone()));
    }

    let query = params
        .iter()
        .map(|(key, value)| format!("{}={}", key, urlencoding::encode(value)))
        .collect::<Vec<_>>()
        .join("&");

    format!("{}?{}", AUTHORS_PATH, query)
}

/// Links attached to a single author
pub fn author_links(author_id: Uuid, fields: Option<&str>) -> Vec<LinkDto> {
    let href = match fields.map(str::trim).filter(|f| !f.is_empty()) {
        Some(fields) => format!(
            "{}?fields={}",
            author_uri(author_id),
            urlencoding::encode(fields)
        ),
        None => author_uri(author_id),
    };

    vec![LinkDto::new(href, "self", "GET")]
}

/// Links attached to a page of the author collection
pub fn authors_links(listing: &AuthorListing, has_next: bool, has_previous: bool) -> Vec<LinkDto> {
    let mut links = vec![LinkDto::new(
        authors_resource_uri(listing, ResourceUriType::CurrentPage),
        "self",
        "GET",
    )];

    if has_next {
        links.push(LinkDto::new(
            authors_resource_uri(listing, ResourceUriType::NextPage),
            "next_page",
            "GET",
        ));
    }

    if has_previous {
        links.push(LinkDto::new(
            authors_resource_uri(listing, ResourceUriType::PreviousPage),
            "previous_page",
            "GET",
        ));
    }

    links
}

/// Entry points of the API
pub fn root_links() -> Vec<LinkDto> {
    vec![
        LinkDto::new("/api", "self", "GET"),
        LinkDto::new(AUTHORS_PATH, "get_authors", "GET"),
        LinkDto::new(AUTHORS_PATH, "create_author", "POST"),
    ]
}
