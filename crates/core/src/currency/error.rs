//! Currency engine error types.

use std::time::Duration;

use thiserror::Error;
use worklio_shared::AppError;
use worklio_shared::types::CurrencyCode;

/// Errors returned by a [`RateStore`](super::store::RateStore).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RateStoreError {
    /// No row exists for the pair yet.
    #[error("No exchange rate stored for {base}/{target}")]
    NotFound {
        /// Base currency.
        base: CurrencyCode,
        /// Target currency.
        target: CurrencyCode,
    },

    /// The backing storage failed.
    #[error("Rate storage error: {0}")]
    Storage(String),
}

/// Errors returned by the conversion engine.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConversionError {
    /// A rate needed for the bridge has never been refreshed.
    #[error("Exchange rate not available for {base}/{target}")]
    RateNotFound {
        /// Base currency.
        base: CurrencyCode,
        /// Target currency.
        target: CurrencyCode,
    },

    /// The rate store could not be read.
    #[error("Rate storage error: {0}")]
    Storage(String),

    /// A stored rate is zero or negative.
    #[error("Stored rate for {currency} is not positive")]
    InvalidRate {
        /// Currency with the unusable rate.
        currency: CurrencyCode,
    },

    /// The converted amount does not fit in a decimal.
    #[error("Converting {from} to {to} overflowed")]
    Overflow {
        /// Source currency.
        from: CurrencyCode,
        /// Target currency.
        to: CurrencyCode,
    },
}

impl ConversionError {
    /// Short label used as a structured log field and metric dimension.
    #[must_use]
    pub const fn reason(&self) -> &'static str {
        match self {
            Self::RateNotFound { .. } => "rate_not_found",
            Self::Storage(_) => "storage_error",
            Self::InvalidRate { .. } | Self::Overflow { .. } => "invalid_rate",
        }
    }
}

impl From<RateStoreError> for ConversionError {
    fn from(err: RateStoreError) -> Self {
        match err {
            RateStoreError::NotFound { base, target } => Self::RateNotFound { base, target },
            RateStoreError::Storage(message) => Self::Storage(message),
        }
    }
}

/// Errors that abort one refresh cycle.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RefreshError {
    /// The provider could not be reached.
    #[error("Rate provider '{provider}' request failed: {message}")]
    Source {
        /// Provider name.
        provider: String,
        /// Transport error message.
        message: String,
    },

    /// The provider answered with a non-success status.
    #[error("Rate provider '{provider}' returned status {status}")]
    Status {
        /// Provider name.
        provider: String,
        /// HTTP status code.
        status: u16,
    },

    /// The provider body could not be parsed.
    #[error("Rate provider '{provider}' returned an unusable body: {message}")]
    MalformedBody {
        /// Provider name.
        provider: String,
        /// Parse error message.
        message: String,
    },

    /// Writing a rate failed.
    #[error("Failed to store refreshed rate: {0}")]
    Storage(String),

    /// The cycle exceeded its deadline.
    #[error("Refresh cycle timed out after {0:?}")]
    TimedOut(Duration),
}

impl From<RateStoreError> for RefreshError {
    fn from(err: RateStoreError) -> Self {
        Self::Storage(err.to_string())
    }
}

impl From<RateStoreError> for AppError {
    fn from(err: RateStoreError) -> Self {
        match err {
            RateStoreError::NotFound { .. } => Self::RateNotFound(err.to_string()),
            RateStoreError::Storage(_) => Self::Storage(err.to_string()),
        }
    }
}

impl From<ConversionError> for AppError {
    fn from(err: ConversionError) -> Self {
        match err {
            ConversionError::RateNotFound { .. } => Self::RateNotFound(err.to_string()),
            ConversionError::Storage(_) => Self::Storage(err.to_string()),
            ConversionError::InvalidRate { .. } | ConversionError::Overflow { .. } => {
                Self::Internal(err.to_string())
            }
        }
    }
}

impl From<RefreshError> for AppError {
    fn from(err: RefreshError) -> Self {
        match err {
            RefreshError::Storage(_) => Self::Storage(err.to_string()),
            _ => Self::ExternalService(err.to_string()),
        }
    }
}
