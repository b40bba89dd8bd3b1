//! Currency codes and the configured set of supported currencies.
//!
//! Codes are plain ISO-4217-style strings wrapped in [`CurrencyCode`] so that
//! a malformed code can never reach the rate store. Whether a code is
//! *supported* is a separate question answered by [`SupportedCurrencies`],
//! which is built from configuration rather than hardcoded.

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;

/// Code of the currency every stored rate is anchored to.
pub const BRIDGE_CURRENCY: &str = "USD";

/// Codes supported out of the box, in display order.
pub const DEFAULT_SUPPORTED_CURRENCIES: [&str; 13] = [
    "USD", "EUR", "GBP", "JPY", "AUD", "CAD", "CHF", "CNY", "SEK", "NZD", "IDR", "SGD", "INR",
];

/// Errors produced while parsing or validating currency codes.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CurrencyError {
    /// The input is not a three-letter code.
    #[error("Invalid currency code: '{0}'")]
    InvalidCode(String),

    /// The code is well formed but not in the supported set.
    #[error("Unsupported currency: {0}")]
    Unsupported(String),
}

/// A three-letter currency code, always upper case.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct CurrencyCode(String);

impl CurrencyCode {
    /// Parses and normalizes a currency code.
    ///
    /// Surrounding whitespace is ignored and lower case is accepted.
    pub fn new(code: &str) -> Result<Self, CurrencyError> {
        let trimmed = code.trim();
        if trimmed.len() != 3 || !trimmed.chars().all(|c| c.is_ascii_alphabetic()) {
            return Err(CurrencyError::InvalidCode(code.to_string()));
        }
        Ok(Self(trimmed.to_ascii_uppercase()))
    }

    /// The bridge currency (USD).
    #[must_use]
    pub fn usd() -> Self {
        Self(BRIDGE_CURRENCY.to_string())
    }

    /// Returns the code as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CurrencyCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for CurrencyCode {
    type Err = CurrencyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl AsRef<str> for CurrencyCode {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl<'de> Deserialize<'de> for CurrencyCode {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        Self::new(&raw).map_err(serde::de::Error::custom)
    }
}

/// Display metadata for a currency.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CurrencyInfo {
    /// Currency code.
    pub code: &'static str,
    /// Display symbol.
    pub symbol: &'static str,
    /// English name.
    pub name: &'static str,
}

const CATALOG: [CurrencyInfo; 13] = [
    CurrencyInfo { code: "USD", symbol: "$", name: "US Dollar" },
    CurrencyInfo { code: "EUR", symbol: "€", name: "Euro" },
    CurrencyInfo { code: "GBP", symbol: "£", name: "British Pound" },
    CurrencyInfo { code: "JPY", symbol: "¥", name: "Japanese Yen" },
    CurrencyInfo { code: "AUD", symbol: "A$", name: "Australian Dollar" },
    CurrencyInfo { code: "CAD", symbol: "C$", name: "Canadian Dollar" },
    CurrencyInfo { code: "CHF", symbol: "CHF", name: "Swiss Franc" },
    CurrencyInfo { code: "CNY", symbol: "¥", name: "Chinese Yuan" },
    CurrencyInfo { code: "SEK", symbol: "kr", name: "Swedish Krona" },
    CurrencyInfo { code: "NZD", symbol: "NZ$", name: "New Zealand Dollar" },
    CurrencyInfo { code: "IDR", symbol: "Rp", name: "Indonesian Rupiah" },
    CurrencyInfo { code: "SGD", symbol: "S$", name: "Singapore Dollar" },
    CurrencyInfo { code: "INR", symbol: "₹", name: "Indian Rupee" },
];

/// Looks up display metadata for a code.
#[must_use]
pub fn currency_info(code: &str) -> Option<&'static CurrencyInfo> {
    CATALOG.iter().find(|info| info.code == code)
}

/// Returns the display symbol for a code, defaulting to `$`.
#[must_use]
pub fn currency_symbol(code: &str) -> &'static str {
    currency_info(code).map_or("$", |info| info.symbol)
}

/// The set of currencies a deployment accepts and refreshes.
///
/// Iteration follows the order the codes were configured in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SupportedCurrencies {
    codes: Vec<CurrencyCode>,
}

impl SupportedCurrencies {
    /// Builds a set from codes, dropping duplicates while keeping order.
    #[must_use]
    pub fn new(codes: impl IntoIterator<Item = CurrencyCode>) -> Self {
        let mut seen = BTreeSet::new();
        let codes = codes
            .into_iter()
            .filter(|code| seen.insert(code.clone()))
            .collect();
        Self { codes }
    }

    /// Parses a list of raw codes.
    pub fn parse<S: AsRef<str>>(codes: &[S]) -> Result<Self, CurrencyError> {
        let parsed = codes
            .iter()
            .map(|code| CurrencyCode::new(code.as_ref()))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self::new(parsed))
    }

    /// Returns true if the code is in the set.
    #[must_use]
    pub fn contains(&self, code: &CurrencyCode) -> bool {
        self.codes.contains(code)
    }

    /// Parses a user-selected code and checks it is supported.
    pub fn validate(&self, raw: &str) -> Result<CurrencyCode, CurrencyError> {
        let code = CurrencyCode::new(raw)?;
        if self.contains(&code) {
            Ok(code)
        } else {
            Err(CurrencyError::Unsupported(code.0))
        }
    }

    /// Iterates over the codes in configured order.
    pub fn iter(&self) -> impl Iterator<Item = &CurrencyCode> {
        self.codes.iter()
    }

    /// Number of supported codes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.codes.len()
    }

    /// Returns true if no currency is supported.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }

    /// Display metadata for every supported code that has a catalog entry.
    #[must_use]
    pub fn catalog(&self) -> Vec<&'static CurrencyInfo> {
        self.codes
            .iter()
            .filter_map(|code| currency_info(code.as_str()))
            .collect()
    }
}

impl Default for SupportedCurrencies {
    fn default() -> Self {
        Self::new(
            DEFAULT_SUPPORTED_CURRENCIES
                .iter()
                .map(|code| CurrencyCode((*code).to_string())),
        )
    }
}

#[cfg(test)]
#[path = "currency_tests.rs"]
mod tests;
