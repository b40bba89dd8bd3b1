//! Exchange rate refresh scheduler.
//!
//! Runs one refresh at startup (if enabled) and then one per day at the
//! configured wall-clock time. Each cycle runs under a hard deadline; a cycle
//! that exceeds it is dropped, which closes its HTTP request and leaves the
//! remaining rows as they were. Failures are logged and never stop the loop.

use std::time::Duration;

use chrono::{NaiveTime, Utc};
use chrono_tz::Tz;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};
use worklio_core::currency::{RateRefresher, RefreshError, RefreshReport};
use worklio_shared::config::ExchangeRateSettings;

use crate::schedule::next_run_after;

const FALLBACK_INTERVAL: Duration = Duration::from_secs(24 * 60 * 60);

/// Why a cycle is running.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Trigger {
    Startup,
    Daily,
}

impl Trigger {
    const fn as_str(self) -> &'static str {
        match self {
            Self::Startup => "startup",
            Self::Daily => "daily",
        }
    }
}

/// Drives a [`RateRefresher`] on a daily schedule.
#[derive(Debug, Clone)]
pub struct RefreshScheduler {
    refresher: RateRefresher,
    refresh_at: NaiveTime,
    timezone: Tz,
    cycle_timeout: Duration,
    refresh_on_startup: bool,
}

impl RefreshScheduler {
    /// Creates a scheduler from validated settings.
    #[must_use]
    pub fn new(refresher: RateRefresher, settings: &ExchangeRateSettings) -> Self {
        Self {
            refresher,
            refresh_at: settings.refresh_at,
            timezone: settings.timezone,
            cycle_timeout: settings.cycle_timeout,
            refresh_on_startup: settings.refresh_on_startup,
        }
    }

    /// Overrides the per-cycle deadline.
    #[must_use]
    pub const fn with_cycle_timeout(mut self, cycle_timeout: Duration) -> Self {
        self.cycle_timeout = cycle_timeout;
        self
    }

    /// Runs one refresh cycle under the deadline.
    ///
    /// # Errors
    ///
    /// Returns [`RefreshError::TimedOut`] if the deadline passes, otherwise
    /// whatever the refresher returned.
    pub async fn run_cycle(&self) -> Result<RefreshReport, RefreshError> {
        tokio::time::timeout(self.cycle_timeout, self.refresher.refresh())
            .await
            .map_err(|_| RefreshError::TimedOut(self.cycle_timeout))?
    }

    /// Spawns [`run`](Self::run) on the current runtime.
    pub fn spawn(self, shutdown: CancellationToken) -> JoinHandle<()> {
        tokio::spawn(self.run(shutdown))
    }

    /// Runs until `shutdown` is cancelled.
    pub async fn run(self, shutdown: CancellationToken) {
        info!(
            provider = self.refresher.source_name(),
            refresh_at = %self.refresh_at,
            timezone = %self.timezone,
            timeout_secs = self.cycle_timeout.as_secs(),
            "Exchange rate scheduler started"
        );

        if self.refresh_on_startup && !self.run_until_cancelled(Trigger::Startup, &shutdown).await {
            return;
        }

        loop {
            let now = Utc::now();
            let wait = next_run_after(now, self.refresh_at, self.timezone)
                .and_then(|next| {
                    info!(next_run = %next, "Next exchange rate refresh scheduled");
                    (next - now).to_std().ok()
                })
                .unwrap_or(FALLBACK_INTERVAL);

            tokio::select! {
                () = shutdown.cancelled() => break,
                () = tokio::time::sleep(wait) => {}
            }

            if !self.run_until_cancelled(Trigger::Daily, &shutdown).await {
                break;
            }
        }

        info!("Exchange rate scheduler stopped");
    }

    /// Returns false if shutdown interrupted the cycle.
    async fn run_until_cancelled(&self, trigger: Trigger, shutdown: &CancellationToken) -> bool {
        tokio::select! {
            () = shutdown.cancelled() => {
                info!(trigger = trigger.as_str(), "Refresh cycle abandoned for shutdown");
                false
            }
            result = self.run_cycle() => {
                log_outcome(trigger, &result);
                true
            }
        }
    }
}

fn log_outcome(trigger: Trigger, result: &Result<RefreshReport, RefreshError>) {
    match result {
        Ok(report) => info!(
            trigger = trigger.as_str(),
            as_of = %report.as_of,
            updated = report.updated_count(),
            missing = ?report.missing,
            "Exchange rate refresh completed"
        ),
        // The server keeps serving stored rates after a failed startup refresh.
        Err(err) if trigger == Trigger::Startup => warn!(
            trigger = trigger.as_str(),
            error = %err,
            "Initial exchange rate refresh failed"
        ),
        Err(err) => error!(
            trigger = trigger.as_str(),
            error = %err,
            "Exchange rate refresh failed"
        ),
    }
}

#[cfg(test)]
#[path = "scheduler_tests.rs"]
mod tests;
