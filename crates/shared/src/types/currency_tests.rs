use super::*;
use rstest::rstest;

#[rstest]
#[case("USD", "USD")]
#[case("eur", "EUR")]
#[case(" gbp ", "GBP")]
#[case("Idr", "IDR")]
fn test_currency_code_normalizes(#[case] input: &str, #[case] expected: &str) {
    let code = CurrencyCode::new(input).unwrap();
    assert_eq!(code.as_str(), expected);
}

#[rstest]
#[case("")]
#[case("US")]
#[case("USDT")]
#[case("U$D")]
#[case("123")]
fn test_currency_code_rejects_malformed(#[case] input: &str) {
    assert_eq!(
        CurrencyCode::new(input),
        Err(CurrencyError::InvalidCode(input.to_string()))
    );
}

#[test]
fn test_currency_code_deserialize_validates() {
    let code: CurrencyCode = serde_json::from_str("\"chf\"").unwrap();
    assert_eq!(code.as_str(), "CHF");

    let bad: Result<CurrencyCode, _> = serde_json::from_str("\"swiss\"");
    assert!(bad.is_err());
}

#[test]
fn test_default_supported_set_has_thirteen_codes() {
    let supported = SupportedCurrencies::default();
    assert_eq!(supported.len(), 13);
    assert!(supported.contains(&CurrencyCode::usd()));
    assert!(supported.contains(&CurrencyCode::new("INR").unwrap()));
    assert!(!supported.contains(&CurrencyCode::new("BRL").unwrap()));
}

#[test]
fn test_supported_set_preserves_order_and_dedups() {
    let supported = SupportedCurrencies::parse(&["EUR", "usd", "EUR", "JPY"]).unwrap();
    let codes: Vec<&str> = supported.iter().map(CurrencyCode::as_str).collect();
    assert_eq!(codes, vec!["EUR", "USD", "JPY"]);
}

#[test]
fn test_supported_set_parse_rejects_bad_code() {
    let result = SupportedCurrencies::parse(&["EUR", "EURO"]);
    assert_eq!(result, Err(CurrencyError::InvalidCode("EURO".to_string())));
}

#[rstest]
#[case("usd", Ok("USD"))]
#[case("BRL", Err(CurrencyError::Unsupported("BRL".to_string())))]
#[case("dollars", Err(CurrencyError::InvalidCode("dollars".to_string())))]
fn test_validate_selected_currency(
    #[case] input: &str,
    #[case] expected: Result<&str, CurrencyError>,
) {
    let supported = SupportedCurrencies::default();
    let result = supported.validate(input).map(|code| code.as_str().to_string());
    assert_eq!(result, expected.map(str::to_string));
}

#[rstest]
#[case("USD", "$")]
#[case("EUR", "€")]
#[case("SEK", "kr")]
#[case("INR", "₹")]
#[case("XYZ", "$")]
fn test_currency_symbol(#[case] code: &str, #[case] symbol: &str) {
    assert_eq!(currency_symbol(code), symbol);
}

#[test]
fn test_catalog_follows_supported_set() {
    let supported = SupportedCurrencies::parse(&["JPY", "USD"]).unwrap();
    let catalog = supported.catalog();
    assert_eq!(catalog.len(), 2);
    assert_eq!(catalog[0].name, "Japanese Yen");
    assert_eq!(catalog[1].symbol, "$");
}
