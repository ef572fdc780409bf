//! ServerBuilder for fluent API to build HTTP servers

use super::router::build_router;
use super::state::AppState;
use crate::catalog::mapping::default_registry;
use crate::catalog::repository::AuthorRepository;
use crate::config::ListingConfig;
use crate::core::mapping::MappingRegistry;
use anyhow::Result;
use axum::Router;
use std::sync::Arc;
use tokio::net::TcpListener;

/// Builder for the author API server
///
/// # Example
///
/// ```ignore
/// let registry = Arc::new(default_registry()?);
/// let app = ServerBuilder::new()
///     .with_registry(registry.clone())
///     .with_repository(InMemoryAuthorRepository::new(registry))
///     .build()?;
/// ```
pub struct ServerBuilder {
    repository: Option<Arc<dyn AuthorRepository>>,
    registry: Option<Arc<MappingRegistry>>,
    config: ListingConfig,
    custom_routes: Vec<Router>,
}

impl ServerBuilder {
    pub fn new() -> Self {
        Self {
            repository: None,
            registry: None,
            config: ListingConfig::default(),
            custom_routes: Vec::new(),
        }
    }

    /// Set the author repository (required)
    pub fn with_repository(mut self, repository: impl AuthorRepository + 'static) -> Self {
        self.repository = Some(Arc::new(repository));
        self
    }

    /// Use a prebuilt mapping registry instead of the catalog default
    pub fn with_registry(mut self, registry: Arc<MappingRegistry>) -> Self {
        self.registry = Some(registry);
        self
    }

    pub fn with_config(mut self, config: ListingConfig) -> Self {
        self.config = config;
        self
    }

    /// Merge additional routes into the server
    pub fn with_custom_routes(mut self, routes: Router) -> Self {
        self.custom_routes.push(routes);
        self
    }

    /// Freeze the shared state handed to every handler
    pub fn build_state(&mut self) -> Result<AppState> {
        let repository = self
            .repository
            .take()
            .ok_or_else(|| anyhow::anyhow!("AuthorRepository is required. Call .with_repository()"))?;

        let registry = match self.registry.take() {
            Some(registry) => registry,
            None => Arc::new(default_registry()?),
        };

        Ok(AppState {
            repository,
            registry,
            config: Arc::new(self.config.clone()),
        })
    }

    /// Build the final REST router
    pub fn build(mut self) -> Result<Router> {
        let state = self.build_state()?;
        let mut app = build_router(state);

        for custom_router in std::mem::take(&mut self.custom_routes) {
            app = app.merge(custom_router);
        }

        Ok(app)
    }

    /// Serve the application with graceful shutdown
    ///
    /// Binds to the configured `bind_address` and stops on SIGTERM or Ctrl+C.
    pub async fn serve(self) -> Result<()> {
        let addr = self.config.bind_address.clone();
        let app = self.build()?;
        let listener = TcpListener::bind(&addr).await?;

        tracing::info!("Server listening on {}", addr);

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        tracing::info!("Server shutdown complete");
        Ok(())
    }
}

impl Default for ServerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Wait for shutdown signal (SIGTERM or Ctrl+C)
async fn shutdown_signal() {
    use tokio::signal;

    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C signal, initiating graceful shutdown...");
        },
        _ = terminate => {
            tracing::info!("Received SIGTERM signal, initiating graceful shutdown...");
        },
    }
}
