//! Application startup and lifecycle management.

use crate::config::RecipeConfig;
use crate::handlers::{
    health::{health_check, metrics_handler, not_found, readiness_check},
    index::index,
    recipes::{add_recipe, get_recipes},
    transform::transform_recipe,
};
use crate::middleware::http_metrics_middleware;
use crate::services::{init_metrics, ModelHandle, RecipeDb};
use axum::{
    middleware::from_fn,
    routing::{get, post},
    Router,
};
use service_core::error::{panic_response, AppError};
use service_core::middleware::security_headers::security_headers_middleware;
use service_core::middleware::tracing::{make_request_span, request_id_middleware};
use tokio::net::TcpListener;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::trace::{DefaultOnResponse, TraceLayer};
use tracing::Level;

/// Shared application state.
///
/// Everything in here is read-only after start-up.
#[derive(Clone)]
pub struct AppState {
    pub config: RecipeConfig,
    pub db: RecipeDb,
    pub model: ModelHandle,
}

/// Build the HTTP router for the given state.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/transform_recipe", post(transform_recipe))
        .route("/add_recipe", post(add_recipe))
        .route("/get_recipes", get(get_recipes))
        .route("/health", get(health_check))
        .route("/ready", get(readiness_check))
        .route("/metrics", get(metrics_handler))
        .fallback(not_found)
        .layer(CatchPanicLayer::custom(panic_response))
        .layer(from_fn(security_headers_middleware))
        .layer(from_fn(http_metrics_middleware))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(make_request_span::<axum::body::Body>)
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(from_fn(request_id_middleware))
        .with_state(state)
}

/// Application container for managing server lifecycle.
pub struct Application {
    port: u16,
    listener: TcpListener,
    state: AppState,
}

impl Application {
    /// Build the application with the given configuration.
    ///
    /// The Gemini client is created from the configured key; without one the
    /// service still starts and answers transform requests with 503.
    pub async fn build(config: RecipeConfig) -> Result<Self, AppError> {
        let model = ModelHandle::from_settings(&config.gemini);
        Self::build_with_model(config, model).await
    }

    /// Build the application with an explicit model handle.
    /// Tests use this to plug in the mock provider.
    pub async fn build_with_model(
        config: RecipeConfig,
        model: ModelHandle,
    ) -> Result<Self, AppError> {
        init_metrics();

        let db = RecipeDb::connect(&config.database).await.map_err(|e| {
            tracing::error!(error = %e, "Failed to open recipe database");
            e
        })?;

        db.ensure_schema().await.map_err(|e| {
            tracing::error!(error = %e, "Failed to initialize recipe schema");
            e
        })?;

        // Port 0 binds a random port for testing
        let address = config.common.bind_address();
        let listener = TcpListener::bind(&address).await.map_err(|e| {
            tracing::error!("Failed to bind HTTP listener to {}: {}", address, e);
            AppError::from(e)
        })?;
        let port = listener.local_addr()?.port();

        tracing::info!(
            port,
            model_ready = model.is_ready(),
            "Recipe service listening"
        );

        Ok(Self {
            port,
            listener,
            state: AppState { config, db, model },
        })
    }

    /// Get the HTTP port the server is listening on.
    pub fn port(&self) -> u16 {
        self.port
    }

    /// Get a reference to the database.
    pub fn db(&self) -> &RecipeDb {
        &self.state.db
    }

    /// Run the application until stopped.
    pub async fn run_until_stopped(self) -> std::io::Result<()> {
        let router = build_router(self.state);

        axum::serve(self.listener, router).await.map_err(|e| {
            tracing::error!("HTTP server error: {}", e);
            std::io::Error::other(format!("HTTP server error: {}", e))
        })
    }
}
