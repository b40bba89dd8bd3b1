//! Rate Store abstraction.
//!
//! The store maps a `(base, target)` pair to a single rate row. Writes are
//! upserts; a pair that has never been refreshed is reported as
//! [`RateStoreError::NotFound`], which is distinct from a storage failure.

use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use dashmap::DashMap;
use rust_decimal::Decimal;
use worklio_shared::types::CurrencyCode;

use super::error::RateStoreError;
use super::exchange::ExchangeRate;

/// Persistent lookup from `(base, target)` to rate.
#[async_trait]
pub trait RateStore: Send + Sync {
    /// Returns the stored rate for the pair.
    async fn get_rate(
        &self,
        base: &CurrencyCode,
        target: &CurrencyCode,
    ) -> Result<Decimal, RateStoreError>;

    /// Inserts the pair or overwrites its rate and timestamp.
    async fn upsert_rate(
        &self,
        base: &CurrencyCode,
        target: &CurrencyCode,
        rate: Decimal,
        updated_at: DateTime<Utc>,
    ) -> Result<(), RateStoreError>;

    /// Returns every row ordered by base, then target.
    async fn list_rates(&self) -> Result<Vec<ExchangeRate>, RateStoreError>;
}

/// In-process [`RateStore`] backed by a `DashMap`.
///
/// Each entry is replaced atomically, so concurrent readers never see a torn
/// row. Used by tests and local tooling that run without Postgres.
#[derive(Debug, Default)]
pub struct InMemoryRateStore {
    rates: DashMap<(CurrencyCode, CurrencyCode), ExchangeRate>,
    unavailable: AtomicBool,
}

impl InMemoryRateStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store pre-populated with `base -> target` rates.
    #[must_use]
    pub fn with_rates<'a>(
        base: &CurrencyCode,
        rates: impl IntoIterator<Item = (&'a CurrencyCode, Decimal)>,
    ) -> Self {
        let store = Self::new();
        let now = Utc::now();
        for (target, rate) in rates {
            store.insert(ExchangeRate::new(base.clone(), target.clone(), rate, now));
        }
        store
    }

    /// Makes every subsequent operation fail with a storage error until reset.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    /// Number of stored rows.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rates.len()
    }

    /// Returns true if no rows are stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rates.is_empty()
    }

    /// Returns the full row for a pair, if present.
    #[must_use]
    pub fn row(&self, base: &CurrencyCode, target: &CurrencyCode) -> Option<ExchangeRate> {
        self.rates
            .get(&(base.clone(), target.clone()))
            .map(|entry| entry.value().clone())
    }

    fn insert(&self, rate: ExchangeRate) {
        let key = (rate.base_currency.clone(), rate.target_currency.clone());
        self.rates.insert(key, rate);
    }

    fn check_available(&self) -> Result<(), RateStoreError> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(RateStoreError::Storage(
                "in-memory store marked unavailable".to_string(),
            ));
        }
        Ok(())
    }
}

#[async_trait]
impl RateStore for InMemoryRateStore {
    async fn get_rate(
        &self,
        base: &CurrencyCode,
        target: &CurrencyCode,
    ) -> Result<Decimal, RateStoreError> {
        self.check_available()?;
        self.rates
            .get(&(base.clone(), target.clone()))
            .map(|entry| entry.rate)
            .ok_or_else(|| RateStoreError::NotFound {
                base: base.clone(),
                target: target.clone(),
            })
    }

    async fn upsert_rate(
        &self,
        base: &CurrencyCode,
        target: &CurrencyCode,
        rate: Decimal,
        updated_at: DateTime<Utc>,
    ) -> Result<(), RateStoreError> {
        self.check_available()?;
        self.insert(ExchangeRate::new(
            base.clone(),
            target.clone(),
            rate,
            updated_at,
        ));
        Ok(())
    }

    async fn list_rates(&self) -> Result<Vec<ExchangeRate>, RateStoreError> {
        self.check_available()?;
        let mut rows: Vec<ExchangeRate> =
            self.rates.iter().map(|entry| entry.value().clone()).collect();
        rows.sort_by(|a, b| {
            a.base_currency
                .as_str()
                .cmp(b.base_currency.as_str())
                .then_with(|| a.target_currency.as_str().cmp(b.target_currency.as_str()))
        });
        Ok(rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use rust_decimal_macros::dec;

    fn code(raw: &str) -> CurrencyCode {
        CurrencyCode::new(raw).unwrap()
    }

    #[tokio::test]
    async fn test_get_missing_pair_is_not_found() {
        let store = InMemoryRateStore::new();
        let err = store.get_rate(&code("USD"), &code("EUR")).await.unwrap_err();
        assert_eq!(
            err,
            RateStoreError::NotFound {
                base: code("USD"),
                target: code("EUR"),
            }
        );
    }

    #[tokio::test]
    async fn test_upsert_is_idempotent_per_pair() {
        let store = InMemoryRateStore::new();
        let t1 = Utc::now();
        let t2 = t1 + Duration::days(1);

        store
            .upsert_rate(&code("USD"), &code("EUR"), dec!(0.92), t1)
            .await
            .unwrap();
        store
            .upsert_rate(&code("USD"), &code("EUR"), dec!(0.95), t2)
            .await
            .unwrap();

        assert_eq!(store.len(), 1);
        let row = store.row(&code("USD"), &code("EUR")).unwrap();
        assert_eq!(row.rate, dec!(0.95));
        assert_eq!(row.updated_at, t2);
    }

    #[tokio::test]
    async fn test_list_is_ordered_by_base_then_target() {
        let store = InMemoryRateStore::new();
        let now = Utc::now();
        for (base, target) in [("USD", "JPY"), ("EUR", "USD"), ("USD", "AUD")] {
            store
                .upsert_rate(&code(base), &code(target), dec!(1), now)
                .await
                .unwrap();
        }

        let pairs: Vec<(String, String)> = store
            .list_rates()
            .await
            .unwrap()
            .into_iter()
            .map(|r| (r.base_currency.to_string(), r.target_currency.to_string()))
            .collect();

        assert_eq!(
            pairs,
            vec![
                ("EUR".to_string(), "USD".to_string()),
                ("USD".to_string(), "AUD".to_string()),
                ("USD".to_string(), "JPY".to_string()),
            ]
        );
    }

    #[tokio::test]
    async fn test_unavailable_store_reports_storage_error() {
        let store = InMemoryRateStore::with_rates(&code("USD"), [(&code("EUR"), dec!(0.92))]);
        store.set_unavailable(true);

        let err = store.get_rate(&code("USD"), &code("EUR")).await.unwrap_err();
        assert!(matches!(err, RateStoreError::Storage(_)));

        store.set_unavailable(false);
        assert_eq!(
            store.get_rate(&code("USD"), &code("EUR")).await.unwrap(),
            dec!(0.92)
        );
    }
}
