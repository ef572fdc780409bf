//! Application state shared across handlers

use crate::catalog::repository::AuthorRepository;
use crate::config::ListingConfig;
use crate::core::mapping::MappingRegistry;
use std::sync::Arc;

/// Everything a request handler needs; cheap to clone
#[derive(Clone)]
pub struct AppState {
    pub repository: Arc<dyn AuthorRepository>,
    /// Read-only after startup
    pub registry: Arc<MappingRegistry>,
    pub config: Arc<ListingConfig>,
}
