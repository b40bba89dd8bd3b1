//! Counters for conversion fallbacks.

use std::sync::atomic::{AtomicU64, Ordering};

use serde::Serialize;

use super::error::ConversionError;

/// Process-wide conversion counters.
///
/// A rising fallback count means reports are being produced with 1:1 rates,
/// usually because the refresher has not run or the rate table is unreachable.
#[derive(Debug, Default)]
pub struct ConversionMetrics {
    /// Successful cross-currency conversions.
    pub conversions: AtomicU64,
    /// Fallbacks caused by a pair that was never refreshed.
    pub fallback_rate_not_found: AtomicU64,
    /// Fallbacks caused by a storage failure.
    pub fallback_storage_error: AtomicU64,
    /// Fallbacks caused by an unusable stored rate or an overflowing result.
    pub fallback_invalid_rate: AtomicU64,
}

/// Point-in-time copy of [`ConversionMetrics`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MetricsSnapshot {
    /// Successful cross-currency conversions.
    pub conversions: u64,
    /// Fallbacks caused by a missing pair.
    pub fallback_rate_not_found: u64,
    /// Fallbacks caused by a storage failure.
    pub fallback_storage_error: u64,
    /// Fallbacks caused by an unusable stored rate or an overflowing result.
    pub fallback_invalid_rate: u64,
}

impl MetricsSnapshot {
    /// Sum of all fallback counters.
    #[must_use]
    pub const fn total_fallbacks(&self) -> u64 {
        self.fallback_rate_not_found + self.fallback_storage_error + self.fallback_invalid_rate
    }
}

impl ConversionMetrics {
    /// Creates zeroed counters.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a successful conversion.
    pub fn conversion(&self) {
        self.conversions.fetch_add(1, Ordering::Relaxed);
    }

    /// Records a 1:1 fallback for the given cause.
    pub fn fallback(&self, cause: &ConversionError) {
        let counter = match cause {
            ConversionError::RateNotFound { .. } => &self.fallback_rate_not_found,
            ConversionError::Storage(_) => &self.fallback_storage_error,
            ConversionError::InvalidRate { .. } | ConversionError::Overflow { .. } => {
                &self.fallback_invalid_rate
            }
        };
        counter.fetch_add(1, Ordering::Relaxed);
    }

    /// Reads all counters.
    #[must_use]
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            conversions: self.conversions.load(Ordering::Relaxed),
            fallback_rate_not_found: self.fallback_rate_not_found.load(Ordering::Relaxed),
            fallback_storage_error: self.fallback_storage_error.load(Ordering::Relaxed),
            fallback_invalid_rate: self.fallback_invalid_rate.load(Ordering::Relaxed),
        }
    }
}
