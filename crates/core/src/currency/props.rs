//! Property-based tests for conversion and aggregation.
//!
//! - Identity: converting into the same currency returns the amount exactly
//! - Round trip: x -> y -> x returns the amount within rate precision
//! - Bridge consistency: x -> y equals x -> USD -> y exactly
//! - Fallback: aggregation always yields a total, using 1:1 for missing rates

use std::future::Future;
use std::sync::Arc;

use proptest::prelude::*;
use rust_decimal::Decimal;
use worklio_shared::types::{CurrencyCode, Money};

use super::aggregation::CurrencyAggregator;
use super::conversion::CurrencyConverter;
use super::store::InMemoryRateStore;

const CODES: [&str; 6] = ["USD", "EUR", "GBP", "JPY", "IDR", "INR"];

fn block_on<F: Future>(future: F) -> F::Output {
    tokio::runtime::Builder::new_current_thread()
        .build()
        .unwrap()
        .block_on(future)
}

fn code(raw: &str) -> CurrencyCode {
    CurrencyCode::new(raw).unwrap()
}

/// Strategy to generate positive decimal amounts (0.01 to 1,000,000.00).
fn positive_amount() -> impl Strategy<Value = Decimal> {
    (1i64..100_000_000i64).prop_map(|cents| Decimal::new(cents, 2))
}

/// Strategy to generate signed amounts, zero included.
fn any_amount() -> impl Strategy<Value = Decimal> {
    (-100_000_000i64..100_000_000i64).prop_map(|cents| Decimal::new(cents, 2))
}

/// Strategy to generate stored rates (0.0001 to 20,000.0000).
fn positive_rate() -> impl Strategy<Value = Decimal> {
    (1i64..200_000_000i64).prop_map(|v| Decimal::new(v, 4))
}

fn currency() -> impl Strategy<Value = CurrencyCode> {
    prop::sample::select(CODES.to_vec()).prop_map(code)
}

/// Rates for every code except USD, which is always stored as 1.
fn rate_table() -> impl Strategy<Value = Vec<Decimal>> {
    prop::collection::vec(positive_rate(), CODES.len() - 1)
}

fn converter_for(rates: &[Decimal]) -> CurrencyConverter {
    let codes: Vec<CurrencyCode> = CODES.iter().map(|c| code(c)).collect();
    let quoted = codes
        .iter()
        .zip(std::iter::once(Decimal::ONE).chain(rates.iter().copied()));
    CurrencyConverter::new(Arc::new(InMemoryRateStore::with_rates(
        &CurrencyCode::usd(),
        quoted,
    )))
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Same-currency conversion never rounds and never reads the store.
    #[test]
    fn prop_identity_is_exact(
        amount in any_amount(),
        currency in currency(),
    ) {
        let store = Arc::new(InMemoryRateStore::new());
        store.set_unavailable(true);
        let converter = CurrencyConverter::new(store);

        let result = block_on(converter.convert(amount, &currency, &currency)).unwrap();
        prop_assert_eq!(result, amount);
    }

    /// Converting there and back stays within rate precision.
    #[test]
    fn prop_round_trip_is_close(
        amount in positive_amount(),
        rates in rate_table(),
        from in currency(),
        to in currency(),
    ) {
        let converter = converter_for(&rates);
        let back = block_on(async {
            let there = converter.convert(amount, &from, &to).await.unwrap();
            converter.convert(there, &to, &from).await.unwrap()
        });

        let epsilon = Decimal::new(1, 6);
        prop_assert!(
            (back - amount).abs() <= epsilon,
            "{} -> {} -> {} returned {} for {}",
            from, to, from, back, amount
        );
    }

    /// A direct conversion is exactly the two bridge hops.
    #[test]
    fn prop_bridge_consistency_is_exact(
        amount in positive_amount(),
        rates in rate_table(),
        from in currency(),
        to in currency(),
    ) {
        prop_assume!(from != to);
        let converter = converter_for(&rates);
        let usd = CurrencyCode::usd();

        let (direct, bridged) = block_on(async {
            let direct = converter.convert(amount, &from, &to).await.unwrap();
            let via_usd = converter.convert(amount, &from, &usd).await.unwrap();
            let bridged = converter.convert(via_usd, &usd, &to).await.unwrap();
            (direct, bridged)
        });

        prop_assert_eq!(direct, bridged);
    }

    /// Aggregation over currencies with no stored rate sums them 1:1.
    #[test]
    fn prop_fallback_never_fails(
        amounts in prop::collection::vec(positive_amount(), 1..20),
        currencies in prop::collection::vec(currency(), 20),
    ) {
        let aggregator = CurrencyAggregator::new(CurrencyConverter::new(Arc::new(
            InMemoryRateStore::new(),
        )));
        let items: Vec<Money> = amounts
            .iter()
            .zip(currencies.iter())
            .map(|(amount, currency)| Money::new(*amount, currency.clone()))
            .collect();
        let expected: Decimal = amounts.iter().copied().sum();

        let result = block_on(aggregator.total(&items, &CurrencyCode::usd()));

        prop_assert_eq!(result.total.amount, expected);
        let all_usd = items.iter().all(|m| m.currency == CurrencyCode::usd());
        prop_assert_eq!(result.fallback_currencies.is_empty(), all_usd);
    }
}
