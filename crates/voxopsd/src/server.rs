//! HTTP server for voxopsd

use crate::routes;
use anyhow::{Context, Result};
use axum::Router;
use std::sync::Arc;
use std::time::Instant;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;
use voxops_common::{Pipeline, ProcessRunner, Speaker, ToolRunner};

/// Application state shared across handlers
pub struct AppState<R = ProcessRunner> {
    pub pipeline: Pipeline<R>,
    pub speaker: Arc<dyn Speaker>,
    pub start_time: Instant,
}

impl<R: ToolRunner> AppState<R> {
    pub fn new(pipeline: Pipeline<R>, speaker: Arc<dyn Speaker>) -> Self {
        Self {
            pipeline,
            speaker,
            start_time: Instant::now(),
        }
    }
}

/// Full application router
pub fn app<R: ToolRunner + 'static>(state: AppState<R>) -> Router {
    Router::new()
        .merge(routes::index_routes::<R>())
        .merge(routes::health_routes::<R>())
        .merge(routes::command_routes::<R>())
        .with_state(Arc::new(state))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
}

/// Run the HTTP server until Ctrl-C
pub async fn run(state: AppState, bind: &str) -> Result<()> {
    let listener = tokio::net::TcpListener::bind(bind)
        .await
        .with_context(|| format!("Failed to bind {}", bind))?;
    info!("  Listening on http://{}", bind);

    axum::serve(listener, app(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Shutting down gracefully");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for Ctrl-C: {}", e);
        std::future::pending::<()>().await;
    }
}
