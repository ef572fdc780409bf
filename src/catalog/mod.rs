//! The author catalog: entity, public representations and mappings

pub mod age;
pub mod author;
pub mod mapping;
pub mod parameters;
pub mod repository;

pub use age::current_age;
pub use author::{Author, AuthorDto, AuthorForCreationDto, AuthorFullDto};
pub use mapping::{author_mapping_table, default_registry};
pub use parameters::{AuthorListing, AuthorResourceParameters};
pub use repository::AuthorRepository;
