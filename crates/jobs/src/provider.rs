//! Frankfurter exchange rate provider.
//!
//! `GET {base_url}/latest?from=USD` answers with
//! `{"amount":1.0,"base":"USD","date":"2024-03-15","rates":{"EUR":0.92,...}}`.
//! The base currency itself is not part of `rates`.

use std::collections::HashMap;
use std::str::FromStr;
use std::time::Duration;

use async_trait::async_trait;
use chrono::NaiveDate;
use reqwest::StatusCode;
use rust_decimal::Decimal;
use serde::Deserialize;
use tracing::{debug, warn};
use worklio_core::currency::{RateSnapshot, RateSource, RefreshError};
use worklio_shared::types::CurrencyCode;

const PROVIDER_NAME: &str = "frankfurter";

#[derive(Debug, Deserialize)]
struct LatestResponse {
    base: String,
    date: NaiveDate,
    rates: HashMap<String, f64>,
}

/// [`RateSource`] backed by the Frankfurter API.
#[derive(Debug, Clone)]
pub struct FrankfurterSource {
    client: reqwest::Client,
    base_url: String,
}

impl FrankfurterSource {
    /// Creates a source for `base_url` with a per-request timeout.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(base_url: &str, request_timeout: Duration) -> Result<Self, RefreshError> {
        let client = reqwest::Client::builder()
            .timeout(request_timeout)
            .build()
            .map_err(|e| source_error(&e))?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }
}

fn source_error(err: &reqwest::Error) -> RefreshError {
    RefreshError::Source {
        provider: PROVIDER_NAME.to_string(),
        message: err.to_string(),
    }
}

fn malformed(message: impl Into<String>) -> RefreshError {
    RefreshError::MalformedBody {
        provider: PROVIDER_NAME.to_string(),
        message: message.into(),
    }
}

/// Parses a `/latest` response body.
///
/// Codes are upper-cased. Rates go through their shortest decimal text so
/// `0.92` is stored as `0.92` rather than the nearest binary fraction.
///
/// # Errors
///
/// Returns [`RefreshError::MalformedBody`] if the body is not the expected
/// JSON document.
pub fn parse_latest(body: &str) -> Result<RateSnapshot, RefreshError> {
    let response: LatestResponse =
        serde_json::from_str(body).map_err(|e| malformed(e.to_string()))?;

    let base = CurrencyCode::new(&response.base).map_err(|e| malformed(e.to_string()))?;

    let mut rates = HashMap::with_capacity(response.rates.len());
    for (code, rate) in response.rates {
        match Decimal::from_str(&rate.to_string()) {
            Ok(rate) => {
                rates.insert(code.to_ascii_uppercase(), rate);
            }
            Err(e) => {
                warn!(currency = %code, error = %e, "Skipping unparseable rate");
            }
        }
    }

    Ok(RateSnapshot {
        base,
        date: response.date,
        rates,
    })
}

#[async_trait]
impl RateSource for FrankfurterSource {
    fn name(&self) -> &str {
        PROVIDER_NAME
    }

    async fn latest(&self, base: &CurrencyCode) -> Result<RateSnapshot, RefreshError> {
        let url = format!("{}/latest", self.base_url);
        debug!(url = %url, base = %base, "Fetching latest exchange rates");

        let response = self
            .client
            .get(&url)
            .query(&[("from", base.as_str())])
            .send()
            .await
            .map_err(|e| source_error(&e))?;

        let status = response.status();
        if status != StatusCode::OK {
            return Err(RefreshError::Status {
                provider: PROVIDER_NAME.to_string(),
                status: status.as_u16(),
            });
        }

        let body = response.text().await.map_err(|e| source_error(&e))?;
        parse_latest(&body)
    }
}
