use std::sync::Arc;

use super::*;
use crate::currency::store::InMemoryRateStore;
use rust_decimal_macros::dec;
use worklio_shared::types::money::round_for_display;

fn code(raw: &str) -> CurrencyCode {
    CurrencyCode::new(raw).unwrap()
}

fn money(amount: Decimal, currency: &str) -> Money {
    Money::new(amount, code(currency))
}

fn aggregator_with(rates: &[(&str, Decimal)]) -> (CurrencyAggregator, Arc<InMemoryRateStore>) {
    let codes: Vec<(CurrencyCode, Decimal)> =
        rates.iter().map(|(c, r)| (code(c), *r)).collect();
    let store = Arc::new(InMemoryRateStore::with_rates(
        &CurrencyCode::usd(),
        codes.iter().map(|(c, r)| (c, *r)),
    ));
    let converter = CurrencyConverter::new(store.clone());
    (CurrencyAggregator::new(converter), store)
}

#[tokio::test]
async fn test_mixed_currency_total_scenario() {
    let (aggregator, _) = aggregator_with(&[("USD", dec!(1)), ("EUR", dec!(0.92))]);
    let items = [
        money(dec!(50), "USD"),
        money(dec!(40), "EUR"),
        money(dec!(10), "USD"),
    ];

    let result = aggregator.total(&items, &code("USD")).await;

    assert_eq!(result.total.currency, code("USD"));
    assert_eq!(round_for_display(result.total.amount, 2), dec!(103.48));
    assert!(result.fallback_currencies.is_empty());
}

#[tokio::test]
async fn test_missing_rate_falls_back_to_raw_amount() {
    let (aggregator, _) = aggregator_with(&[("USD", dec!(1)), ("EUR", dec!(0.8))]);
    let items = [
        money(dec!(100), "USD"),
        money(dec!(40), "EUR"),
        money(dec!(250), "INR"),
    ];

    let result = aggregator.total(&items, &code("USD")).await;

    assert_eq!(result.total.amount, dec!(400));
    assert_eq!(result.fallback_currencies, vec![code("INR")]);

    let snapshot = aggregator.converter().metrics().snapshot();
    assert_eq!(snapshot.fallback_rate_not_found, 1);
}

#[tokio::test]
async fn test_storage_failure_still_produces_total() {
    let (aggregator, store) = aggregator_with(&[("USD", dec!(1)), ("EUR", dec!(0.8))]);
    store.set_unavailable(true);
    let items = [money(dec!(10), "USD"), money(dec!(20), "EUR")];

    let result = aggregator.total(&items, &code("USD")).await;

    assert_eq!(result.total.amount, dec!(30));
    assert_eq!(result.fallback_currencies, vec![code("EUR")]);
    assert_eq!(
        aggregator
            .converter()
            .metrics()
            .snapshot()
            .fallback_storage_error,
        1
    );
}

#[tokio::test]
async fn test_multiplier_resolved_once_per_currency() {
    let (aggregator, _) = aggregator_with(&[("USD", dec!(1)), ("EUR", dec!(0.5))]);
    let items: Vec<Money> = (0..5).map(|_| money(dec!(1), "EUR")).collect();

    let result = aggregator.total(&items, &code("USD")).await;

    assert_eq!(result.total.amount, dec!(10));
    assert_eq!(aggregator.converter().metrics().snapshot().conversions, 1);
}

#[tokio::test]
async fn test_fallback_is_counted_once_per_pass() {
    let (aggregator, _) = aggregator_with(&[("USD", dec!(1))]);
    let items = [money(dec!(1), "GBP"), money(dec!(2), "GBP")];

    let result = aggregator.total(&items, &code("USD")).await;

    assert_eq!(result.total.amount, dec!(3));
    assert_eq!(
        aggregator
            .converter()
            .metrics()
            .snapshot()
            .fallback_rate_not_found,
        1
    );
}

#[tokio::test]
async fn test_same_currency_items_need_no_rates() {
    let (aggregator, store) = aggregator_with(&[]);
    store.set_unavailable(true);
    let items = [money(dec!(1.005), "JPY"), money(dec!(2.005), "JPY")];

    let result = aggregator.total(&items, &code("JPY")).await;

    assert_eq!(result.total.amount, dec!(3.010));
    assert!(result.fallback_currencies.is_empty());
}

#[tokio::test]
async fn test_reporting_in_non_usd_currency() {
    let (aggregator, _) = aggregator_with(&[("USD", dec!(1)), ("EUR", dec!(0.8))]);
    let items = [money(dec!(10), "USD"), money(dec!(8), "EUR")];

    let result = aggregator.total(&items, &code("EUR")).await;

    assert_eq!(result.total.amount, dec!(16));
}

#[tokio::test]
async fn test_partitioned_subtotals_use_same_multipliers() {
    let (aggregator, _) = aggregator_with(&[("USD", dec!(1)), ("EUR", dec!(0.5))]);
    let items = [
        ("paid", money(dec!(10), "USD")),
        ("unpaid", money(dec!(5), "EUR")),
        ("paid", money(dec!(1), "EUR")),
    ];

    let result = aggregator.total_partitioned(&items, &code("USD")).await;

    assert_eq!(result.subtotal(&"paid"), dec!(12));
    assert_eq!(result.subtotal(&"unpaid"), dec!(10));
    assert_eq!(result.subtotal(&"draft"), Decimal::ZERO);
    assert_eq!(result.total, dec!(22));
}

#[test]
fn test_identity_table_passes_amounts_through() {
    let mut table = ConversionTable::identity(code("USD"));
    assert_eq!(table.apply(dec!(7.25), &code("USD")), dec!(7.25));
    assert_eq!(table.multiplier(&code("EUR")), Decimal::ONE);
    assert!(table.is_exact());
}

#[tokio::test]
async fn test_overflowing_item_falls_back_to_raw_amount() {
    let (aggregator, _) = aggregator_with(&[("USD", dec!(1)), ("IDR", dec!(16000))]);
    let huge = dec!(10000000000000000000000000);
    let items = [money(huge, "USD"), money(dec!(2), "USD")];

    let direct = aggregator
        .converter()
        .convert(huge, &code("USD"), &code("IDR"))
        .await;
    assert!(matches!(direct, Err(ConversionError::Overflow { .. })));

    let result = aggregator.total(&items, &code("IDR")).await;

    assert_eq!(result.total.amount, dec!(10000000000000000000032000));
    assert_eq!(result.fallback_currencies, vec![code("USD")]);
    assert_eq!(
        aggregator.converter().metrics().snapshot().fallback_invalid_rate,
        1
    );
}

#[tokio::test]
async fn test_overflowing_partition_keeps_other_subtotals() {
    let (aggregator, _) = aggregator_with(&[("USD", dec!(1)), ("IDR", dec!(16000))]);
    let huge = dec!(10000000000000000000000000);
    let items = [("paid", money(huge, "USD")), ("sent", money(dec!(1), "USD"))];

    let result = aggregator.total_partitioned(&items, &code("IDR")).await;

    assert_eq!(result.subtotal(&"paid"), huge);
    assert_eq!(result.subtotal(&"sent"), dec!(16000));
    assert_eq!(result.fallback_currencies, vec![code("USD")]);
}

#[test]
fn test_sum_saturates_instead_of_panicking() {
    let mut table = ConversionTable::identity(code("USD"));
    let usd = code("USD");

    let total = table.sum([(Decimal::MAX, &usd), (Decimal::MAX, &usd)]);

    assert_eq!(total, Decimal::MAX);
    assert!(table.is_exact());
}
