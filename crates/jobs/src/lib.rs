//! Background jobs for Worklio.
//!
//! - `provider` - HTTP client for the public exchange rate API
//! - `schedule` - Wall-clock arithmetic for the daily run
//! - `scheduler` - Startup and daily refresh loop with a per-cycle deadline

pub mod provider;
pub mod schedule;
pub mod scheduler;

pub use provider::FrankfurterSource;
pub use schedule::next_run_after;
pub use scheduler::RefreshScheduler;

use std::sync::Arc;

use worklio_core::currency::{RateRefresher, RateStore, RefreshError};
use worklio_shared::config::ExchangeRateSettings;

/// Builds the refresh scheduler for `store` from validated settings.
///
/// # Errors
///
/// Returns an error if the HTTP client cannot be constructed.
pub fn build_scheduler(
    settings: &ExchangeRateSettings,
    store: Arc<dyn RateStore>,
) -> Result<RefreshScheduler, RefreshError> {
    let source = FrankfurterSource::new(&settings.provider_url, settings.request_timeout)?;
    let refresher = RateRefresher::new(
        Arc::new(source),
        store,
        settings.supported.clone(),
        settings.base_currency.clone(),
    );
    Ok(RefreshScheduler::new(refresher, settings))
}
