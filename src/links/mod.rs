//! Hypermedia links attached to resources and collections

pub mod resource;

pub use resource::{
    AUTHOR_COLLECTIONS_PATH, AUTHORS_PATH, LinkDto, ResourceUriType, author_collection_uri,
    author_links, author_uri, authors_links, authors_resource_uri, parse_author_ids, root_links,
};
