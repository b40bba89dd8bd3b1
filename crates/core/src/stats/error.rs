//! Statistics error types.

use chrono::NaiveDate;
use thiserror::Error;

/// Errors raised while validating statistics parameters.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StatsError {
    /// Unknown view mode.
    #[error("view_mode must be daily, weekly, or monthly, got '{0}'")]
    InvalidViewMode(String),

    /// Unknown invoice status.
    #[error("Invalid invoice status: {0}")]
    InvalidStatus(String),

    /// Invalid date range.
    #[error("Invalid date range: start {start} is after end {end}")]
    InvalidDateRange {
        /// Start date.
        start: NaiveDate,
        /// End date.
        end: NaiveDate,
    },
}
