//! API route handlers

pub mod config;
pub mod health;
pub mod claim;

use axum::{routing::get, Router};

use crate::AppState;

/// Create the API router with all routes
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_check))
        .nest("/config", config::router())
        .nest("/ito", claim::router())
        .with_state(state)
}
