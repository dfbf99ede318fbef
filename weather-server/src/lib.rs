//! HTTP surface of the weather lookup service.
//!
//! Two GET endpoints proxy OpenWeather and reshape its answers:
//! - `/api/location?lat=..&long=..` resolves coordinates to a place
//! - `/api/weather?city=..` returns the current weather report
//!
//! Every failure is answered with an `{ "error": ... }` JSON body.

use axum::{Router, routing::get};
use std::sync::Arc;
use weather_core::Config;

mod handlers;
mod response;

/// Shared, read-only state for all handlers.
#[derive(Debug, Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub http: reqwest::Client,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        Self { config: Arc::new(config), http: reqwest::Client::new() }
    }
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/api/location", get(handlers::location_handler))
        .route("/api/weather", get(handlers::weather_handler))
        .with_state(state)
}
