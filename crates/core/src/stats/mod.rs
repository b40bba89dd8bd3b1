//! Reporting statistics in the user's currency.
//!
//! This module builds the three multi-currency reports on top of
//! [`CurrencyAggregator`](crate::currency::CurrencyAggregator):
//! - Dashboard totals
//! - Invoice statistics
//! - Time-entry statistics for a day, week or month
//!
//! Inputs are plain records loaded by the caller; nothing here touches a
//! database.

pub mod error;
pub mod service;
pub mod types;


pub use error::StatsError;
pub use service::StatsService;
pub use types::*;
