//! Common types used across the application.

pub mod currency;
pub mod money;

pub use currency::{
    BRIDGE_CURRENCY, CurrencyCode, CurrencyError, CurrencyInfo, DEFAULT_SUPPORTED_CURRENCIES,
    SupportedCurrencies, currency_info, currency_symbol,
};
pub use money::Money;
