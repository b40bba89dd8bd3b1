//! Aggregation of multi-currency amounts into one reporting currency.
//!
//! A pass resolves one multiplier per distinct foreign currency and reuses it
//! for every item in that currency. A multiplier that cannot be resolved is
//! fixed at 1 for the rest of the pass: the total is still produced, the
//! fallback is logged with structured fields and counted in
//! [`ConversionMetrics`], and the currency is listed in the result so callers
//! can flag the total as approximate.
//!
//! Folding never panics. An item whose converted amount overflows is taken
//! unconverted and reported like any other fallback; a sum that overflows
//! saturates at the decimal bounds.

use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::sync::Arc;

use rust_decimal::Decimal;
use serde::Serialize;
use tracing::{error, warn};
use worklio_shared::types::{CurrencyCode, Money};

use super::conversion::CurrencyConverter;
use super::error::ConversionError;
use super::metrics::ConversionMetrics;

/// Per-pass multipliers from source currencies into the reporting currency.
#[derive(Debug, Clone)]
pub struct ConversionTable {
    reporting: CurrencyCode,
    multipliers: HashMap<CurrencyCode, Decimal>,
    fallbacks: BTreeSet<CurrencyCode>,
    metrics: Arc<ConversionMetrics>,
}

impl ConversionTable {
    /// Table with no foreign currencies; every amount is taken as-is.
    #[must_use]
    pub fn identity(reporting: CurrencyCode) -> Self {
        Self::with_metrics(reporting, Arc::new(ConversionMetrics::new()))
    }

    fn with_metrics(reporting: CurrencyCode, metrics: Arc<ConversionMetrics>) -> Self {
        Self {
            reporting,
            multipliers: HashMap::new(),
            fallbacks: BTreeSet::new(),
            metrics,
        }
    }

    /// Reporting currency of this pass.
    #[must_use]
    pub const fn reporting(&self) -> &CurrencyCode {
        &self.reporting
    }

    /// Multiplier used for `currency`, 1 for the reporting currency.
    #[must_use]
    pub fn multiplier(&self, currency: &CurrencyCode) -> Decimal {
        if currency == &self.reporting {
            return Decimal::ONE;
        }
        self.multipliers
            .get(currency)
            .copied()
            .unwrap_or(Decimal::ONE)
    }

    /// Converts one amount with the cached multiplier.
    ///
    /// An overflowing product falls back to the unconverted amount and marks
    /// the currency as a fallback for this pass.
    pub fn apply(&mut self, amount: Decimal, currency: &CurrencyCode) -> Decimal {
        if currency == &self.reporting {
            return amount;
        }
        if let Some(converted) = amount.checked_mul(self.multiplier(currency)) {
            return converted;
        }

        if !self.fallbacks.contains(currency) {
            let err = ConversionError::Overflow {
                from: currency.clone(),
                to: self.reporting.clone(),
            };
            record_fallback(&self.metrics, currency, &self.reporting, &err);
            self.fallbacks.insert(currency.clone());
        }
        amount
    }

    /// Sums amounts in the reporting currency without intermediate rounding.
    pub fn sum<'a, I>(&mut self, items: I) -> Decimal
    where
        I: IntoIterator<Item = (Decimal, &'a CurrencyCode)>,
    {
        let mut total = Decimal::ZERO;
        for (amount, currency) in items {
            let converted = self.apply(amount, currency);
            total = accumulate(total, converted, &self.reporting);
        }
        total
    }

    /// Sums amounts into per-key subtotals and a grand total.
    pub fn sum_partitioned<'a, K, I>(&mut self, items: I) -> (BTreeMap<K, Decimal>, Decimal)
    where
        K: Ord,
        I: IntoIterator<Item = (K, Decimal, &'a CurrencyCode)>,
    {
        let mut subtotals: BTreeMap<K, Decimal> = BTreeMap::new();
        let mut total = Decimal::ZERO;
        for (key, amount, currency) in items {
            let converted = self.apply(amount, currency);
            let subtotal = subtotals.entry(key).or_default();
            *subtotal = accumulate(*subtotal, converted, &self.reporting);
            total = accumulate(total, converted, &self.reporting);
        }
        (subtotals, total)
    }

    /// Currencies that fell back to 1:1 in this pass.
    #[must_use]
    pub fn fallbacks(&self) -> Vec<CurrencyCode> {
        self.fallbacks.iter().cloned().collect()
    }

    /// Returns true if every foreign currency had a usable rate.
    #[must_use]
    pub fn is_exact(&self) -> bool {
        self.fallbacks.is_empty()
    }
}

/// Adds `value` to `total`, saturating at the decimal bounds.
fn accumulate(total: Decimal, value: Decimal, reporting: &CurrencyCode) -> Decimal {
    total.checked_add(value).unwrap_or_else(|| {
        warn!(
            reporting_currency = %reporting,
            "Aggregate total overflowed, saturating"
        );
        total.saturating_add(value)
    })
}

fn record_fallback(
    metrics: &ConversionMetrics,
    currency: &CurrencyCode,
    reporting: &CurrencyCode,
    err: &ConversionError,
) {
    metrics.fallback(err);
    if matches!(err, ConversionError::Storage(_)) {
        error!(
            currency = %currency,
            reporting_currency = %reporting,
            reason = err.reason(),
            error = %err,
            "Rate store failed during aggregation, using 1:1 rate"
        );
    } else {
        warn!(
            currency = %currency,
            reporting_currency = %reporting,
            reason = err.reason(),
            error = %err,
            "Exchange rate unavailable, using 1:1 rate"
        );
    }
}

/// Single reporting total.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AggregateTotal {
    /// Total in the reporting currency, unrounded.
    pub total: Money,
    /// Currencies summed at 1:1 because no rate was available.
    pub fallback_currencies: Vec<CurrencyCode>,
}

/// Reporting total with per-key subtotals.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PartitionedTotal<K: Ord> {
    /// Reporting currency.
    pub currency: CurrencyCode,
    /// Subtotal per key; keys with no items are absent.
    pub subtotals: BTreeMap<K, Decimal>,
    /// Grand total across all keys.
    pub total: Decimal,
    /// Currencies summed at 1:1 because no rate was available.
    pub fallback_currencies: Vec<CurrencyCode>,
}

impl<K: Ord> PartitionedTotal<K> {
    /// Subtotal for `key`, zero if it had no items.
    pub fn subtotal(&self, key: &K) -> Decimal {
        self.subtotals.get(key).copied().unwrap_or_default()
    }
}

/// Folds currency-tagged amounts into one reporting currency.
#[derive(Debug, Clone)]
pub struct CurrencyAggregator {
    converter: CurrencyConverter,
}

impl CurrencyAggregator {
    /// Creates an aggregator over `converter`.
    #[must_use]
    pub const fn new(converter: CurrencyConverter) -> Self {
        Self { converter }
    }

    /// Underlying converter.
    #[must_use]
    pub const fn converter(&self) -> &CurrencyConverter {
        &self.converter
    }

    /// Resolves one multiplier per distinct foreign currency.
    ///
    /// Never fails: unresolved currencies get a multiplier of 1.
    pub async fn conversion_table<'a, I>(
        &self,
        currencies: I,
        reporting: &CurrencyCode,
    ) -> ConversionTable
    where
        I: IntoIterator<Item = &'a CurrencyCode>,
    {
        let distinct: BTreeSet<&CurrencyCode> = currencies
            .into_iter()
            .filter(|currency| *currency != reporting)
            .collect();

        let mut table =
            ConversionTable::with_metrics(reporting.clone(), self.converter.metrics().clone());
        for currency in distinct {
            let multiplier = match self
                .converter
                .convert(Decimal::ONE, currency, reporting)
                .await
            {
                Ok(multiplier) => multiplier,
                Err(err) => {
                    record_fallback(self.converter.metrics(), currency, reporting, &err);
                    table.fallbacks.insert(currency.clone());
                    Decimal::ONE
                }
            };
            table.multipliers.insert(currency.clone(), multiplier);
        }
        table
    }

    /// Sums `items` into `reporting`.
    pub async fn total(&self, items: &[Money], reporting: &CurrencyCode) -> AggregateTotal {
        let mut table = self
            .conversion_table(items.iter().map(|m| &m.currency), reporting)
            .await;
        let total = table.sum(items.iter().map(|m| (m.amount, &m.currency)));
        AggregateTotal {
            total: Money::new(total, reporting.clone()),
            fallback_currencies: table.fallbacks(),
        }
    }

    /// Sums `items` into `reporting`, partitioned by key.
    pub async fn total_partitioned<K>(
        &self,
        items: &[(K, Money)],
        reporting: &CurrencyCode,
    ) -> PartitionedTotal<K>
    where
        K: Ord + Clone,
    {
        let mut table = self
            .conversion_table(items.iter().map(|(_, m)| &m.currency), reporting)
            .await;
        let (subtotals, total) = table.sum_partitioned(
            items
                .iter()
                .map(|(key, m)| (key.clone(), m.amount, &m.currency)),
        );
        PartitionedTotal {
            currency: reporting.clone(),
            subtotals,
            total,
            fallback_currencies: table.fallbacks(),
        }
    }
}

#[cfg(test)]
#[path = "aggregation_tests.rs"]
mod tests;
