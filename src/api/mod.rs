//! REST API around the forecast engine.
//!
//! Provides GET endpoints:
//! - `/health`: liveness
//! - `/organizations/{org_id}/forecast`: 24-hour forecast and optimal windows
//! - `/organizations/{org_id}/surplus`: current surplus status
//! - `/organizations/{org_id}/members/{member_id}/recommendations`: member advice

pub mod error;
mod handlers;
mod types;

use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use axum::routing::get;
use tracing::info;

use crate::clock::HourSource;
use crate::config::EngineConfig;
use crate::history::HistorySource;

/// Immutable application state shared across all request handlers.
///
/// Every request computes its forecast from scratch, so the state is
/// read-only and wrapped in `Arc` without locks.
pub struct AppState {
    /// Engine policy constants.
    pub config: EngineConfig,
    /// Stored community history.
    pub history: Arc<dyn HistorySource>,
    /// Source of the current hour.
    pub clock: Arc<dyn HourSource>,
}

/// Builds the axum router with all API routes.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(handlers::get_health))
        .route("/organizations/{org_id}/forecast", get(handlers::get_forecast))
        .route("/organizations/{org_id}/surplus", get(handlers::get_surplus))
        .route(
            "/organizations/{org_id}/members/{member_id}/recommendations",
            get(handlers::get_recommendations),
        )
        .with_state(state)
}

/// Binds to the given address and serves the API until the server stops.
///
/// # Errors
///
/// Returns an `io::Error` if the listener cannot bind or the server fails.
pub async fn serve(state: Arc<AppState>, addr: SocketAddr) -> std::io::Result<()> {
    let app = router(state);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(%addr, "API server listening");
    axum::serve(listener, app).await
}
