//! Author catalog server
//!
//! Loads the listing configuration from the path in `SHAPE_CONFIG` (or the
//! first argument), seeds an in-memory repository and serves the REST API.

use anyhow::{Context, Result};
use chrono::{TimeZone, Utc};
use shape::prelude::*;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = match std::env::var("SHAPE_CONFIG").ok().or_else(|| std::env::args().nth(1)) {
        Some(path) => ListingConfig::from_yaml_file(&path)
            .with_context(|| format!("loading listing configuration from {}", path))?,
        None => ListingConfig::default(),
    };

    let registry = Arc::new(default_registry()?);
    let repository = InMemoryAuthorRepository::with_authors(registry.clone(), seed_authors()?);

    tracing::info!(
        max_page_size = config.max_page_size,
        default_order_by = %config.default_order_by,
        "starting author catalog"
    );

    ServerBuilder::new()
        .with_registry(registry)
        .with_repository(repository)
        .with_config(config)
        .serve()
        .await
}

fn seed_authors() -> Result<Vec<Author>> {
    let born = |y, m, d| {
        Utc.with_ymd_and_hms(y, m, d, 0, 0, 0)
            .single()
            .context("invalid seed date")
    };

    Ok(vec![
        Author::new("Berry", "Griffin Beak Eldritch", born(1980, 7, 23)?, "Ships"),
        Author::new("Nancy", "Swashbuckler Rye", born(1978, 5, 21)?, "Rum"),
        Author::new("Eli", "Ivory Bones Sweet", born(1957, 12, 16)?, "Singing"),
        Author::new("Arnold", "The Unseen Stafford", born(1957, 3, 6)?, "Singing"),
        Author::new("Seabury", "Toxic Reyson", born(1956, 11, 23)?, "Maps"),
        Author::new("Rutherford", "Fearless Settlemight", born(1981, 12, 5)?, "General debauchery"),
        Author::new("Atherton", "Bartholomew Crow", born(1971, 5, 11)?, "Ships"),
        Author::new("Huxford", "The Hive Bonecrusher", born(1960, 6, 3)?, "Rum")
            .with_date_of_death(born(2011, 3, 1)?),
    ])
}
