//! Exchange rate types.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use worklio_shared::types::CurrencyCode;

/// Decimal places kept for stored rates.
pub const RATE_SCALE: u32 = 10;

/// A stored exchange rate row.
///
/// `rate` means "1 unit of `base_currency` = `rate` units of `target_currency`".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExchangeRate {
    /// Anchor currency, the configured base.
    pub base_currency: CurrencyCode,
    /// Quoted currency.
    pub target_currency: CurrencyCode,
    /// Units of target per unit of base.
    pub rate: Decimal,
    /// When the row was last refreshed.
    pub updated_at: DateTime<Utc>,
}

impl ExchangeRate {
    /// Creates a new exchange rate.
    #[must_use]
    pub const fn new(
        base_currency: CurrencyCode,
        target_currency: CurrencyCode,
        rate: Decimal,
        updated_at: DateTime<Utc>,
    ) -> Self {
        Self {
            base_currency,
            target_currency,
            rate,
            updated_at,
        }
    }
}

/// Rounds a provider rate to the stored precision.
#[must_use]
pub fn normalize_rate(rate: Decimal) -> Decimal {
    rate.round_dp(RATE_SCALE).normalize()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_normalize_rate_keeps_ten_places() {
        assert_eq!(normalize_rate(dec!(0.123456789012345)), dec!(0.1234567890));
        assert_eq!(normalize_rate(dec!(15000.5)), dec!(15000.5));
    }
}
