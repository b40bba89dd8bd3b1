//! Application configuration management.

use std::time::Duration;

use chrono::NaiveTime;
use chrono_tz::Tz;
use serde::Deserialize;
use thiserror::Error;

use crate::types::{CurrencyCode, CurrencyError, DEFAULT_SUPPORTED_CURRENCIES, SupportedCurrencies};

/// Application configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Server configuration.
    #[serde(default)]
    pub server: ServerConfig,
    /// Database configuration.
    pub database: DatabaseConfig,
    /// Exchange rate refresh and conversion configuration.
    #[serde(default)]
    pub exchange_rates: ExchangeRateConfig,
}

/// Server configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Host to bind to.
    #[serde(default = "default_host")]
    pub host: String,
    /// Port to listen on.
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

/// Database configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// Database connection URL.
    pub url: String,
    /// Maximum number of connections in the pool.
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    /// Minimum number of connections in the pool.
    #[serde(default = "default_min_connections")]
    pub min_connections: u32,
}

fn default_max_connections() -> u32 {
    10
}

fn default_min_connections() -> u32 {
    1
}

/// Exchange rate configuration as read from files and environment.
///
/// Values are kept as raw strings here; [`ExchangeRateConfig::resolve`]
/// turns them into typed settings and reports anything malformed.
#[derive(Debug, Clone, Deserialize)]
pub struct ExchangeRateConfig {
    /// Base URL of the rate provider.
    #[serde(default = "default_provider_url")]
    pub provider_url: String,
    /// Currency all stored rates are anchored to.
    #[serde(default = "default_base_currency")]
    pub base_currency: String,
    /// Currencies that are refreshed and accepted from users.
    #[serde(default = "default_supported_currencies")]
    pub supported_currencies: Vec<String>,
    /// Wall-clock time of the daily refresh, `HH:MM`.
    #[serde(default = "default_refresh_at")]
    pub refresh_at: String,
    /// IANA time zone the refresh time is expressed in.
    #[serde(default = "default_timezone")]
    pub timezone: String,
    /// Upper bound for one refresh cycle, in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// Timeout for the outbound provider request, in seconds.
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
    /// Whether to run one refresh immediately at startup.
    #[serde(default = "default_refresh_on_startup")]
    pub refresh_on_startup: bool,
}

fn default_provider_url() -> String {
    "https://api.frankfurter.app".to_string()
}

fn default_base_currency() -> String {
    "USD".to_string()
}

fn default_supported_currencies() -> Vec<String> {
    DEFAULT_SUPPORTED_CURRENCIES
        .iter()
        .map(ToString::to_string)
        .collect()
}

fn default_refresh_at() -> String {
    "02:00".to_string()
}

fn default_timezone() -> String {
    "UTC".to_string()
}

fn default_timeout_secs() -> u64 {
    300 // 5 minutes
}

fn default_request_timeout_secs() -> u64 {
    30
}

fn default_refresh_on_startup() -> bool {
    true
}

impl Default for ExchangeRateConfig {
    fn default() -> Self {
        Self {
            provider_url: default_provider_url(),
            base_currency: default_base_currency(),
            supported_currencies: default_supported_currencies(),
            refresh_at: default_refresh_at(),
            timezone: default_timezone(),
            timeout_secs: default_timeout_secs(),
            request_timeout_secs: default_request_timeout_secs(),
            refresh_on_startup: default_refresh_on_startup(),
        }
    }
}

/// Errors raised while resolving exchange rate settings.
#[derive(Debug, Error)]
pub enum SettingsError {
    /// A currency code in the configuration is malformed.
    #[error("Invalid currency in configuration: {0}")]
    Currency(#[from] CurrencyError),

    /// The supported currency list is empty.
    #[error("At least one supported currency must be configured")]
    NoSupportedCurrencies,

    /// The refresh time is not `HH:MM`.
    #[error("Invalid refresh time '{0}', expected HH:MM")]
    RefreshTime(String),

    /// The time zone is not a known IANA name.
    #[error("Unknown time zone '{0}'")]
    Timezone(String),

    /// A timeout of zero seconds was configured.
    #[error("Timeout for {0} must be greater than zero")]
    ZeroTimeout(&'static str),
}

/// Validated exchange rate settings.
#[derive(Debug, Clone)]
pub struct ExchangeRateSettings {
    /// Provider base URL.
    pub provider_url: String,
    /// Anchor currency.
    pub base_currency: CurrencyCode,
    /// Supported set.
    pub supported: SupportedCurrencies,
    /// Daily refresh time.
    pub refresh_at: NaiveTime,
    /// Time zone of `refresh_at`.
    pub timezone: Tz,
    /// Cycle timeout.
    pub cycle_timeout: Duration,
    /// Provider request timeout.
    pub request_timeout: Duration,
    /// Run once at startup.
    pub refresh_on_startup: bool,
}

impl ExchangeRateConfig {
    /// Validates raw values into typed settings.
    pub fn resolve(&self) -> Result<ExchangeRateSettings, SettingsError> {
        let base_currency = CurrencyCode::new(&self.base_currency)?;
        let supported = SupportedCurrencies::parse(&self.supported_currencies)?;
        if supported.is_empty() {
            return Err(SettingsError::NoSupportedCurrencies);
        }

        let refresh_at = NaiveTime::parse_from_str(self.refresh_at.trim(), "%H:%M")
            .map_err(|_| SettingsError::RefreshTime(self.refresh_at.clone()))?;

        let timezone = self
            .timezone
            .parse::<Tz>()
            .map_err(|_| SettingsError::Timezone(self.timezone.clone()))?;

        if self.timeout_secs == 0 {
            return Err(SettingsError::ZeroTimeout("refresh cycle"));
        }
        if self.request_timeout_secs == 0 {
            return Err(SettingsError::ZeroTimeout("provider request"));
        }

        Ok(ExchangeRateSettings {
            provider_url: self.provider_url.trim_end_matches('/').to_string(),
            base_currency,
            supported,
            refresh_at,
            timezone,
            cycle_timeout: Duration::from_secs(self.timeout_secs),
            request_timeout: Duration::from_secs(self.request_timeout_secs),
            refresh_on_startup: self.refresh_on_startup,
        })
    }
}

impl AppConfig {
    /// Loads configuration from environment and config files.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be loaded.
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{run_mode}")).required(false))
            .add_source(
                config::Environment::with_prefix("WORKLIO")
                    .separator("__")
                    .list_separator(",")
                    .with_list_parse_key("exchange_rates.supported_currencies")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
