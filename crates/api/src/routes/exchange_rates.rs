//! Exchange rate diagnostics routes.

use axum::{Json, Router, extract::State, routing::get};
use chrono::{DateTime, Utc};
use serde::Serialize;
use worklio_core::currency::{ExchangeRate, MetricsSnapshot};

use crate::{AppState, error::ApiError};

/// Creates the exchange rate routes.
pub fn routes() -> Router<AppState> {
    Router::new().route("/exchange-rates", get(list_exchange_rates))
}

/// Stored rates plus conversion counters.
#[derive(Debug, Serialize)]
pub struct ExchangeRatesResponse {
    /// Every stored row, ordered by base then target.
    pub rates: Vec<ExchangeRate>,
    /// Most recent refresh across all rows.
    pub last_updated: Option<DateTime<Utc>>,
    /// Conversion and fallback counters since startup.
    ///
    /// Counts only work done through this state's converter, including
    /// aggregators obtained from [`AppState::aggregator`]. Fallbacks stay at
    /// zero until something aggregates through it.
    pub metrics: MetricsSnapshot,
}

/// GET `/exchange-rates` - List stored rates and fallback counters.
async fn list_exchange_rates(
    State(state): State<AppState>,
) -> Result<Json<ExchangeRatesResponse>, ApiError> {
    let rates = state.store().list_rates().await?;
    let last_updated = rates.iter().map(|rate| rate.updated_at).max();

    Ok(Json(ExchangeRatesResponse {
        rates,
        last_updated,
        metrics: state.converter.metrics().snapshot(),
    }))
}
