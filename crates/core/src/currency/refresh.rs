//! Rate refresh cycle.
//!
//! One cycle fetches a snapshot from a [`RateSource`] and upserts a row for
//! every supported currency the snapshot quotes. The provider call happens
//! before any write, so a failed or malformed response leaves the store
//! untouched. Scheduling and timeouts are owned by the caller.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use tracing::{info, warn};
use worklio_shared::types::{CurrencyCode, SupportedCurrencies};

use super::error::RefreshError;
use super::exchange::normalize_rate;
use super::store::RateStore;

/// Latest rates quoted against one base currency.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RateSnapshot {
    /// Currency the rates are quoted against.
    pub base: CurrencyCode,
    /// Date the provider publishes the rates for.
    pub date: NaiveDate,
    /// Units of each currency per unit of base, keyed by upper-case code.
    pub rates: HashMap<String, Decimal>,
}

/// External source of daily exchange rates.
#[async_trait]
pub trait RateSource: Send + Sync {
    /// Provider name used in logs and errors.
    fn name(&self) -> &str;

    /// Fetches all rates relative to `base`.
    async fn latest(&self, base: &CurrencyCode) -> Result<RateSnapshot, RefreshError>;
}

/// Outcome of a completed refresh cycle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RefreshReport {
    /// Publication date reported by the provider.
    pub as_of: NaiveDate,
    /// Currencies written this cycle.
    pub updated: Vec<CurrencyCode>,
    /// Supported currencies the provider did not quote.
    pub missing: Vec<CurrencyCode>,
}

impl RefreshReport {
    /// Number of rows written.
    #[must_use]
    pub fn updated_count(&self) -> usize {
        self.updated.len()
    }
}

/// Pulls rates from a source into a store.
#[derive(Clone)]
pub struct RateRefresher {
    source: Arc<dyn RateSource>,
    store: Arc<dyn RateStore>,
    supported: SupportedCurrencies,
    base: CurrencyCode,
}

impl std::fmt::Debug for RateRefresher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RateRefresher")
            .field("source", &self.source.name())
            .field("supported", &self.supported)
            .field("base", &self.base)
            .finish_non_exhaustive()
    }
}

impl RateRefresher {
    /// Creates a refresher anchored at `base`.
    #[must_use]
    pub fn new(
        source: Arc<dyn RateSource>,
        store: Arc<dyn RateStore>,
        supported: SupportedCurrencies,
        base: CurrencyCode,
    ) -> Self {
        Self {
            source,
            store,
            supported,
            base,
        }
    }

    /// Name of the configured source.
    #[must_use]
    pub fn source_name(&self) -> &str {
        self.source.name()
    }

    /// Runs one refresh cycle.
    ///
    /// # Errors
    ///
    /// Returns the source error if the provider call fails, in which case
    /// nothing is written. Returns [`RefreshError::Storage`] if an upsert
    /// fails; rows written earlier in the cycle are kept.
    pub async fn refresh(&self) -> Result<RefreshReport, RefreshError> {
        let snapshot = self.source.latest(&self.base).await?;
        if snapshot.base != self.base {
            return Err(RefreshError::MalformedBody {
                provider: self.source.name().to_string(),
                message: format!(
                    "expected rates based on {}, got {}",
                    self.base, snapshot.base
                ),
            });
        }

        let mut rates = snapshot.rates;
        // Providers omit the base from their own list.
        rates.insert(self.base.to_string(), Decimal::ONE);

        let now = Utc::now();
        let mut updated = Vec::with_capacity(self.supported.len());
        let mut missing = Vec::new();

        for code in self.supported.iter() {
            let rate = match rates.get(code.as_str()) {
                Some(rate) if *rate > Decimal::ZERO => normalize_rate(*rate),
                Some(rate) => {
                    warn!(
                        currency = %code,
                        rate = %rate,
                        "Ignoring non-positive rate from provider"
                    );
                    missing.push(code.clone());
                    continue;
                }
                None => {
                    warn!(
                        currency = %code,
                        provider = self.source.name(),
                        "Rate missing from provider response, keeping stored value"
                    );
                    missing.push(code.clone());
                    continue;
                }
            };

            self.store.upsert_rate(&self.base, code, rate, now).await?;
            updated.push(code.clone());
        }

        info!(
            provider = self.source.name(),
            as_of = %snapshot.date,
            updated = updated.len(),
            missing = missing.len(),
            "Exchange rates refreshed"
        );

        Ok(RefreshReport {
            as_of: snapshot.date,
            updated,
            missing,
        })
    }
}

#[cfg(test)]
#[path = "refresh_tests.rs"]
mod tests;
