//! Server module exposing the author catalog over REST
//!
//! `ServerBuilder` wires a repository, the mapping registry and the listing
//! configuration into an axum `Router`.

pub mod builder;
pub mod handlers;
pub mod router;
pub mod state;

pub use builder::ServerBuilder;
pub use router::build_router;
pub use state::AppState;
