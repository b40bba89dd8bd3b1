use super::*;
use rstest::rstest;
use rust_decimal_macros::dec;

fn code(raw: &str) -> CurrencyCode {
    CurrencyCode::new(raw).unwrap()
}

#[test]
fn test_money_creation() {
    let money = Money::new(dec!(1.00), code("USD"));
    assert_eq!(money.amount, dec!(1.00));
    assert_eq!(money.currency, code("USD"));
}

#[test]
fn test_money_zero() {
    let money = Money::zero(code("IDR"));
    assert_eq!(money.amount, Decimal::ZERO);
    assert!(money.is_zero());
    assert!(!money.is_negative());
}

#[test]
fn test_money_negative() {
    let money = Money::new(dec!(-1.00), code("USD"));
    assert!(money.is_negative());
}

#[test]
fn test_money_display() {
    let money = Money::new(dec!(1234.5), code("EUR"));
    assert_eq!(money.display(), "€1,234.50");
}

#[rstest]
#[case(dec!(0), 2, "0.00")]
#[case(dec!(999.999), 2, "1,000.00")]
#[case(dec!(1234567.891), 2, "1,234,567.89")]
#[case(dec!(-98765.4), 2, "-98,765.40")]
#[case(dec!(75.5), 0, "76")]
#[case(dec!(74.5), 0, "74")]
#[case(dec!(100), 0, "100")]
#[case(dec!(-0.001), 2, "0.00")]
fn test_format_number(#[case] value: Decimal, #[case] dp: u32, #[case] expected: &str) {
    assert_eq!(format_number(value, dp), expected);
}

#[test]
fn test_format_amount_uses_symbol() {
    assert_eq!(format_amount(dec!(108.695652), &code("USD")), "$108.70");
    assert_eq!(format_amount(dec!(1500000), &code("IDR")), "Rp1,500,000.00");
    assert_eq!(format_amount(dec!(12), &code("BRL")), "$12.00");
}

#[test]
fn test_format_hourly_rate_has_no_decimals() {
    assert_eq!(format_hourly_rate(dec!(85.4), &code("GBP")), "£85");
    assert_eq!(format_hourly_rate(dec!(12000), &code("JPY")), "¥12,000");
}

#[test]
fn test_ascii_formatting_uses_code() {
    assert_eq!(format_amount_ascii(dec!(2500.5), &code("EUR")), "EUR 2,500.50");
    assert_eq!(format_hourly_rate_ascii(dec!(90), &code("CHF")), "CHF 90");
}

#[test]
fn test_round_for_display_is_bankers() {
    assert_eq!(round_for_display(dec!(2.345), 2), dec!(2.34));
    assert_eq!(round_for_display(dec!(2.355), 2), dec!(2.36));
}
