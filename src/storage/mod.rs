//! Storage implementations

pub mod authors;
pub mod in_memory;

pub use authors::InMemoryAuthorRepository;
pub use in_memory::{InMemoryQuery, InMemoryTable};
