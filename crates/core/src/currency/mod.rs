//! Multi-currency handling: rate storage, conversion, aggregation and refresh.

pub mod aggregation;
pub mod conversion;
pub mod error;
pub mod exchange;
pub mod metrics;
pub mod refresh;
pub mod store;

#[cfg(test)]
mod props;

pub use aggregation::{AggregateTotal, ConversionTable, CurrencyAggregator, PartitionedTotal};
pub use conversion::{Conversion, CurrencyConverter};
pub use error::{ConversionError, RateStoreError, RefreshError};
pub use exchange::{ExchangeRate, RATE_SCALE, normalize_rate};
pub use metrics::{ConversionMetrics, MetricsSnapshot};
pub use refresh::{RateRefresher, RateSnapshot, RateSource, RefreshReport};
pub use store::{InMemoryRateStore, RateStore};
