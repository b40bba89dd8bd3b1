//! HTTP API layer with Axum routes.
//!
//! This crate provides:
//! - Currency listing and conversion routes
//! - Exchange rate diagnostics
//! - JSON error responses

pub mod error;
pub mod routes;

use std::sync::Arc;

use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use worklio_core::currency::{CurrencyAggregator, CurrencyConverter, RateStore};
use worklio_shared::config::ExchangeRateSettings;
use worklio_shared::types::{CurrencyCode, SupportedCurrencies};

pub use error::ApiError;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    /// Converter over the shared rate store.
    pub converter: CurrencyConverter,
    /// Currencies accepted at the API boundary.
    pub supported: Arc<SupportedCurrencies>,
}

impl AppState {
    /// Creates state over a rate store whose rows are quoted against `base`.
    pub fn new(
        store: Arc<dyn RateStore>,
        supported: SupportedCurrencies,
        base: CurrencyCode,
    ) -> Self {
        Self {
            converter: CurrencyConverter::with_bridge(store, base),
            supported: Arc::new(supported),
        }
    }

    /// Creates state from the same settings the refresher was built from.
    pub fn from_settings(store: Arc<dyn RateStore>, settings: &ExchangeRateSettings) -> Self {
        Self::new(
            store,
            settings.supported.clone(),
            settings.base_currency.clone(),
        )
    }

    /// Aggregator sharing this state's converter and counters.
    pub fn aggregator(&self) -> CurrencyAggregator {
        CurrencyAggregator::new(self.converter.clone())
    }

    /// The underlying rate store.
    pub fn store(&self) -> &Arc<dyn RateStore> {
        self.converter.store()
    }
}

/// Creates the main application router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .nest("/api/v1", routes::api_routes())
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}
