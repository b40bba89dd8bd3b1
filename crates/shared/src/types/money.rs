//! Money type with decimal precision and currency.
//!
//! CRITICAL: Never use floating-point for money calculations.
//! This type wraps `rust_decimal::Decimal` for arbitrary precision.

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use super::currency::{CurrencyCode, currency_symbol};

/// Decimal places used when presenting monetary amounts.
pub const AMOUNT_DISPLAY_DP: u32 = 2;

/// Decimal places used when presenting hourly rates.
pub const RATE_DISPLAY_DP: u32 = 0;

/// Represents a monetary amount with currency.
///
/// Uses `Decimal` internally to avoid floating-point precision errors.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Money {
    /// The amount in major units (e.g. dollars, not cents).
    pub amount: Decimal,
    /// Currency the amount is denominated in.
    pub currency: CurrencyCode,
}

impl Money {
    /// Creates a new Money instance.
    #[must_use]
    pub const fn new(amount: Decimal, currency: CurrencyCode) -> Self {
        Self { amount, currency }
    }

    /// Creates a zero amount in the specified currency.
    #[must_use]
    pub fn zero(currency: CurrencyCode) -> Self {
        Self {
            amount: Decimal::ZERO,
            currency,
        }
    }

    /// Returns true if the amount is zero.
    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.amount.is_zero()
    }

    /// Returns true if the amount is negative.
    #[must_use]
    pub fn is_negative(&self) -> bool {
        self.amount.is_sign_negative() && !self.amount.is_zero()
    }

    /// Formats with the currency symbol, e.g. `€1,234.50`.
    #[must_use]
    pub fn display(&self) -> String {
        format_amount(self.amount, &self.currency)
    }
}

/// Rounds a value for presentation using Banker's Rounding.
#[must_use]
pub fn round_for_display(value: Decimal, decimal_places: u32) -> Decimal {
    value.round_dp_with_strategy(decimal_places, RoundingStrategy::MidpointNearestEven)
}

/// Formats an amount with symbol and thousands separators, two decimals.
#[must_use]
pub fn format_amount(amount: Decimal, currency: &CurrencyCode) -> String {
    format!(
        "{}{}",
        currency_symbol(currency.as_str()),
        format_number(amount, AMOUNT_DISPLAY_DP)
    )
}

/// Formats an hourly rate with symbol and no decimals.
#[must_use]
pub fn format_hourly_rate(rate: Decimal, currency: &CurrencyCode) -> String {
    format!(
        "{}{}",
        currency_symbol(currency.as_str()),
        format_number(rate, RATE_DISPLAY_DP)
    )
}

/// ASCII-only amount formatting (`EUR 1,234.50`) for documents that cannot
/// render currency symbols.
#[must_use]
pub fn format_amount_ascii(amount: Decimal, currency: &CurrencyCode) -> String {
    format!("{currency} {}", format_number(amount, AMOUNT_DISPLAY_DP))
}

/// ASCII-only hourly rate formatting (`EUR 75`).
#[must_use]
pub fn format_hourly_rate_ascii(rate: Decimal, currency: &CurrencyCode) -> String {
    format!("{currency} {}", format_number(rate, RATE_DISPLAY_DP))
}

/// Formats a number with comma thousands separators and a fixed number of
/// decimals.
#[must_use]
pub fn format_number(value: Decimal, decimal_places: u32) -> String {
    let rounded = round_for_display(value, decimal_places);
    let negative = rounded.is_sign_negative() && !rounded.is_zero();
    let text = format!("{:.*}", decimal_places as usize, rounded.abs());

    let (integer, fraction) = match text.split_once('.') {
        Some((integer, fraction)) => (integer, Some(fraction)),
        None => (text.as_str(), None),
    };

    let mut grouped = String::with_capacity(integer.len() + integer.len() / 3);
    for (i, digit) in integer.chars().enumerate() {
        if i > 0 && (integer.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    let mut out = String::new();
    if negative {
        out.push('-');
    }
    out.push_str(&grouped);
    if let Some(fraction) = fraction {
        out.push('.');
        out.push_str(fraction);
    }
    out
}

#[cfg(test)]
#[path = "money_tests.rs"]
mod tests;
