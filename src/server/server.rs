use std::sync::Arc;
use std::error::Error;
use tokio::net::TcpListener;
use axum::{Router, extract::DefaultBodyLimit, routing::{get, post}};
use tracing::{info, warn};

use crate::summarizer::{GenerationParams, Summarizer};
use super::routes;

/// State shared by every handler.
///
/// The summarizer is set once before the listener binds and never replaced;
/// `None` means the model failed to load.
#[derive(Clone)]
pub struct AppState {
    pub summarizer: Option<Arc<dyn Summarizer>>,
    pub params: GenerationParams,
}

impl AppState {
    pub fn new(summarizer: Option<Arc<dyn Summarizer>>) -> Self {
        Self {
            summarizer,
            params: GenerationParams::SUMMARY,
        }
    }
}

/// Builds the application router.
///
/// Request bodies are not size-capped; inputs too long for the model fail in
/// the backend's context check and come back as the generic internal error.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(routes::home))
        .route("/summarize", post(routes::summarize))
        .route("/health", get(routes::health_check))
        .layer(DefaultBodyLimit::disable())
        .with_state(state)
}

/// API Server for summarization requests
pub struct ApiServer {
    state: AppState,
    host: String,
    port: u16,
}

impl ApiServer {
    pub fn new(state: AppState, host: String, port: u16) -> Self {
        match &state.summarizer {
            Some(summarizer) => info!("Serving model: {}", summarizer.model_name()),
            None => warn!("No model loaded; /summarize will report the model as unavailable"),
        }

        info!("Creating new API server on {}:{}", host, port);
        Self { state, host, port }
    }

    /// Binds the listener and serves until Ctrl-C.
    pub async fn start(self) -> Result<(), Box<dyn Error + Send + Sync>> {
        let app = router(self.state);

        info!("Starting server on {}:{}", self.host, self.port);
        let listener = TcpListener::bind((self.host.as_str(), self.port)).await?;
        info!("Server listening on http://{}", listener.local_addr()?);

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        info!("Server stopped");
        Ok(())
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to install Ctrl-C handler: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
