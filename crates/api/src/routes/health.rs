//! Health check endpoints.

use axum::{Json, Router, extract::State, routing::get};
use serde::Serialize;
use tracing::warn;

use crate::AppState;

/// Health check response.
#[derive(Serialize)]
pub struct HealthResponse {
    /// `healthy`, or `degraded` when the rate store cannot be read.
    pub status: &'static str,
    /// Service version.
    pub version: &'static str,
    /// Number of stored exchange rates, if the store answered.
    pub stored_rates: Option<usize>,
}

/// Health check handler.
async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let stored_rates = match state.store().list_rates().await {
        Ok(rates) => Some(rates.len()),
        Err(e) => {
            warn!(error = %e, "Rate store unavailable during health check");
            None
        }
    };

    Json(HealthResponse {
        status: if stored_rates.is_some() {
            "healthy"
        } else {
            "degraded"
        },
        version: env!("CARGO_PKG_VERSION"),
        stored_rates,
    })
}

/// Creates health check routes.
pub fn routes() -> Router<AppState> {
    Router::new().route("/health", get(health_check))
}
