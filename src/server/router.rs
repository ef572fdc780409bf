//! Route table for the REST exposure

use crate::links::{AUTHOR_COLLECTIONS_PATH, AUTHORS_PATH};
use crate::server::handlers::{
    authors_options, create_author, create_author_collection, get_author,
    get_author_collection, health_check, list_authors, root,
};
use crate::server::state::AppState;
use axum::{
    Router,
    routing::{get, post},
};
use tower_http::trace::TraceLayer;

/// Build the API routes:
/// - GET /health, /healthz - Liveness check
/// - GET /api - Root links
/// - GET|HEAD /api/authors - Paged, filtered, sorted and shaped listing
/// - POST /api/authors - Create an author
/// - OPTIONS /api/authors - Allowed methods
/// - GET /api/authors/{author_id} - Single author
/// - POST /api/authorcollections - Create several authors at once
/// - GET /api/authorcollections/({author_ids}) - Several authors by id
pub fn build_router(state: AppState) -> Router {
    let api = Router::new()
        .route("/api", get(root))
        .route(
            AUTHORS_PATH,
            get(list_authors)
                .post(create_author)
                .options(authors_options),
        )
        .route(&format!("{}/{{author_id}}", AUTHORS_PATH), get(get_author))
        .route(AUTHOR_COLLECTIONS_PATH, post(create_author_collection))
        .route(
            &format!("{}/{{author_ids}}", AUTHOR_COLLECTIONS_PATH),
            get(get_author_collection),
        )
        .with_state(state);

    Router::new()
        .route("/health", get(health_check))
        .route("/healthz", get(health_check))
        .merge(api)
        .layer(TraceLayer::new_for_http())
}
