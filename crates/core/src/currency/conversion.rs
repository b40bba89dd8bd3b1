//! Conversion engine.
//!
//! Every stored rate is quoted against one bridge currency (USD), so any pair
//! is reachable through at most two rows:
//!
//! ```text
//! converted = amount / rate(bridge -> from) * rate(bridge -> to)
//! ```
//!
//! No rounding happens here. Callers sum first and round for display last.

use std::sync::Arc;

use rust_decimal::Decimal;
use tracing::debug;
use worklio_shared::types::CurrencyCode;

use super::error::ConversionError;
use super::metrics::ConversionMetrics;
use super::store::RateStore;

/// Result of a conversion together with the pair rate that produced it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Conversion {
    /// Converted amount, unrounded.
    pub amount: Decimal,
    /// Units of target per unit of source.
    pub rate: Decimal,
}

/// Converts amounts between currencies using the rates in a [`RateStore`].
#[derive(Clone)]
pub struct CurrencyConverter {
    store: Arc<dyn RateStore>,
    bridge: CurrencyCode,
    metrics: Arc<ConversionMetrics>,
}

impl std::fmt::Debug for CurrencyConverter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CurrencyConverter")
            .field("bridge", &self.bridge)
            .finish_non_exhaustive()
    }
}

impl CurrencyConverter {
    /// Creates a converter bridging through USD.
    #[must_use]
    pub fn new(store: Arc<dyn RateStore>) -> Self {
        Self::with_bridge(store, CurrencyCode::usd())
    }

    /// Creates a converter bridging through `bridge`.
    #[must_use]
    pub fn with_bridge(store: Arc<dyn RateStore>, bridge: CurrencyCode) -> Self {
        Self {
            store,
            bridge,
            metrics: Arc::new(ConversionMetrics::new()),
        }
    }

    /// Bridge currency all rates are quoted against.
    #[must_use]
    pub const fn bridge(&self) -> &CurrencyCode {
        &self.bridge
    }

    /// Shared conversion counters.
    #[must_use]
    pub fn metrics(&self) -> &Arc<ConversionMetrics> {
        &self.metrics
    }

    /// Underlying rate store.
    #[must_use]
    pub fn store(&self) -> &Arc<dyn RateStore> {
        &self.store
    }

    /// Converts `amount` from `from` into `to`.
    ///
    /// Same-currency conversion returns `amount` unchanged without touching
    /// the store.
    ///
    /// # Errors
    ///
    /// Returns [`ConversionError::RateNotFound`] if either bridge row is
    /// missing and [`ConversionError::Storage`] if the store fails.
    pub async fn convert(
        &self,
        amount: Decimal,
        from: &CurrencyCode,
        to: &CurrencyCode,
    ) -> Result<Decimal, ConversionError> {
        self.convert_detailed(amount, from, to)
            .await
            .map(|conversion| conversion.amount)
    }

    /// Like [`convert`](Self::convert), also returning the pair rate.
    ///
    /// # Errors
    ///
    /// See [`convert`](Self::convert).
    pub async fn convert_detailed(
        &self,
        amount: Decimal,
        from: &CurrencyCode,
        to: &CurrencyCode,
    ) -> Result<Conversion, ConversionError> {
        if from == to {
            return Ok(Conversion {
                amount,
                rate: Decimal::ONE,
            });
        }

        let rate_to = self.bridge_rate(to).await?;
        let rate_from = self.bridge_rate(from).await?;

        let overflow = || ConversionError::Overflow {
            from: from.clone(),
            to: to.clone(),
        };
        let converted = amount
            .checked_div(rate_from)
            .and_then(|bridged| bridged.checked_mul(rate_to))
            .ok_or_else(overflow)?;
        let rate = rate_to.checked_div(rate_from).ok_or_else(overflow)?;

        self.metrics.conversion();
        debug!(
            from = %from,
            to = %to,
            amount = %amount,
            converted = %converted,
            "Converted amount"
        );

        Ok(Conversion {
            amount: converted,
            rate,
        })
    }

    async fn bridge_rate(&self, currency: &CurrencyCode) -> Result<Decimal, ConversionError> {
        let rate = self.store.get_rate(&self.bridge, currency).await?;
        if rate <= Decimal::ZERO {
            return Err(ConversionError::InvalidRate {
                currency: currency.clone(),
            });
        }
        Ok(rate)
    }
}

#[cfg(test)]
#[path = "conversion_tests.rs"]
mod tests;
