//! HTTP API serving aggregated feeds and calendars.
//!
//! - `GET /api/feeds`: articles from enabled feeds
//! - `GET /api/calendar`: today's events from enabled calendars
//! - `GET /api/config`: the loaded configuration
//! - `POST /api/refresh`: clear both caches
//!
//! Any other path is served from the public directory. The config file is
//! re-read on every request; if it cannot be loaded the defaults are used.

mod handlers;
mod types;

use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::aggregator::Aggregator;

pub use handlers::*;
pub use types::*;

/// API server state shared across handlers
#[derive(Clone)]
pub struct ApiState {
    pub aggregator: Arc<Aggregator>,
    /// `None` reads the default config path.
    pub config_path: Option<PathBuf>,
}

impl ApiState {
    pub fn new(aggregator: Arc<Aggregator>, config_path: Option<PathBuf>) -> Self {
        Self {
            aggregator,
            config_path,
        }
    }
}

/// Build the API router, with static files from `public_dir` as fallback.
pub fn build_router(state: ApiState, public_dir: &Path) -> Router {
    Router::new()
        .route("/api/feeds", get(get_feeds))
        .route("/api/calendar", get(get_calendar))
        .route("/api/config", get(get_config))
        .route("/api/refresh", post(refresh))
        .fallback_service(ServeDir::new(public_dir))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Start the API server
pub async fn start_server(
    addr: SocketAddr,
    state: ApiState,
    public_dir: &Path,
) -> Result<(), std::io::Error> {
    tracing::info!("Starting API server on {}", addr);

    let app = build_router(state, public_dir);
    let listener = tokio::net::TcpListener::bind(addr).await?;

    axum::serve(listener, app).await
}
