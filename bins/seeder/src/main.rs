//! Seeds approximate USD-based exchange rates for local development.
//!
//! Lets reports convert without reaching the rate provider. Uses the same
//! configuration as the server, so only supported currencies are written and
//! rows are quoted against the configured base. Existing rows are
//! overwritten; the next scheduled refresh replaces them with live rates.
//!
//! Usage: cargo run --bin seeder

use std::collections::HashMap;
use std::str::FromStr;

use anyhow::{Context, anyhow};
use chrono::Utc;
use rust_decimal::Decimal;
use worklio_core::currency::{RateStore, normalize_rate};
use worklio_db::{ExchangeRateRepository, connect_with};
use worklio_shared::AppConfig;
use worklio_shared::types::{CurrencyCode, SupportedCurrencies};

/// Units per US dollar (approximate values for testing).
const RATES: [(&str, &str); 13] = [
    ("USD", "1"),
    ("EUR", "0.92"),
    ("GBP", "0.79"),
    ("JPY", "149.50"),
    ("AUD", "1.53"),
    ("CAD", "1.36"),
    ("CHF", "0.88"),
    ("CNY", "7.24"),
    ("SEK", "10.45"),
    ("NZD", "1.64"),
    ("IDR", "15750.00"),
    ("SGD", "1.34"),
    ("INR", "83.12"),
];

/// Seed rates for each supported currency, quoted against `base`.
///
/// Supported codes missing from the static table are skipped.
fn seed_rates(
    base: &CurrencyCode,
    supported: &SupportedCurrencies,
) -> anyhow::Result<Vec<(CurrencyCode, Decimal)>> {
    let per_usd = RATES
        .iter()
        .map(|(code, rate)| Ok(((*code).to_string(), Decimal::from_str(rate)?)))
        .collect::<anyhow::Result<HashMap<_, _>>>()?;

    let base_per_usd = per_usd
        .get(base.as_str())
        .copied()
        .ok_or_else(|| anyhow!("No seed rate for base currency {base}"))?;

    let mut rates = Vec::with_capacity(supported.len());
    for target in supported.iter() {
        let Some(rate) = per_usd.get(target.as_str()) else {
            println!("  Skipping {target}: no seed rate");
            continue;
        };
        let rate = rate
            .checked_div(base_per_usd)
            .map(normalize_rate)
            .ok_or_else(|| anyhow!("Cannot rebase {target} onto {base}"))?;
        rates.push((target.clone(), rate));
    }
    Ok(rates)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let config = AppConfig::load().context("Failed to load configuration")?;
    let settings = config
        .exchange_rates
        .resolve()
        .context("Invalid exchange rate configuration")?;

    println!("Connecting to database...");
    let db = connect_with(&config.database)
        .await
        .context("Failed to connect to database")?;
    let repo = ExchangeRateRepository::new(db);

    let base = settings.base_currency;
    println!("Seeding exchange rates against {base}...");
    let now = Utc::now();
    let mut seeded = 0;

    for (target, rate) in seed_rates(&base, &settings.supported)? {
        repo.upsert_rate(&base, &target, rate, now)
            .await
            .with_context(|| format!("Failed to seed {base}/{target}"))?;
        seeded += 1;
    }

    println!("  Seeded {seeded} exchange rates");
    println!("Seeding complete!");
    Ok(())
}
