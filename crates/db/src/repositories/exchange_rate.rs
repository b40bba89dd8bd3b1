//! Exchange rate repository backed by the `exchange_rates` table.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sea_orm::sea_query::OnConflict;
use sea_orm::{ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter, QueryOrder, Set};
use tracing::debug;
use uuid::Uuid;
use worklio_core::currency::{ExchangeRate, RateStore, RateStoreError};
use worklio_shared::types::{CurrencyCode, CurrencyError};

use crate::entities::exchange_rates;

/// Error types for exchange rate operations.
#[derive(Debug, thiserror::Error)]
pub enum ExchangeRateError {
    /// A stored row holds a code that is not a currency code.
    #[error("Corrupt exchange rate row {id}: {source}")]
    CorruptRow {
        /// Row ID.
        id: Uuid,
        /// Parse failure.
        source: CurrencyError,
    },

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

impl From<ExchangeRateError> for RateStoreError {
    fn from(err: ExchangeRateError) -> Self {
        Self::Storage(err.to_string())
    }
}

/// Exchange rate repository.
#[derive(Debug, Clone)]
pub struct ExchangeRateRepository {
    db: DatabaseConnection,
}

impl ExchangeRateRepository {
    /// Creates a new exchange rate repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Finds the rate for a pair.
    pub async fn find_rate(
        &self,
        base: &CurrencyCode,
        target: &CurrencyCode,
    ) -> Result<Option<Decimal>, ExchangeRateError> {
        let row = exchange_rates::Entity::find()
            .filter(exchange_rates::Column::BaseCurrency.eq(base.as_str()))
            .filter(exchange_rates::Column::TargetCurrency.eq(target.as_str()))
            .one(&self.db)
            .await?;
        Ok(row.map(|model| model.rate))
    }

    /// Inserts the pair or overwrites its rate and timestamp.
    ///
    /// A single `INSERT ... ON CONFLICT DO UPDATE`, so concurrent refreshes
    /// cannot create duplicates or lose an update halfway.
    pub async fn upsert(
        &self,
        base: &CurrencyCode,
        target: &CurrencyCode,
        rate: Decimal,
        updated_at: DateTime<Utc>,
    ) -> Result<(), ExchangeRateError> {
        let model = exchange_rates::ActiveModel {
            id: Set(Uuid::new_v4()),
            base_currency: Set(base.to_string()),
            target_currency: Set(target.to_string()),
            rate: Set(rate),
            updated_at: Set(updated_at.fixed_offset()),
        };

        exchange_rates::Entity::insert(model)
            .on_conflict(
                OnConflict::columns([
                    exchange_rates::Column::BaseCurrency,
                    exchange_rates::Column::TargetCurrency,
                ])
                .update_columns([exchange_rates::Column::Rate, exchange_rates::Column::UpdatedAt])
                .to_owned(),
            )
            .exec_without_returning(&self.db)
            .await?;

        debug!(base = %base, target = %target, rate = %rate, "Upserted exchange rate");
        Ok(())
    }

    /// Lists all rows ordered by base, then target.
    pub async fn list(&self) -> Result<Vec<ExchangeRate>, ExchangeRateError> {
        exchange_rates::Entity::find()
            .order_by_asc(exchange_rates::Column::BaseCurrency)
            .order_by_asc(exchange_rates::Column::TargetCurrency)
            .all(&self.db)
            .await?
            .into_iter()
            .map(to_exchange_rate)
            .collect()
    }
}

fn to_exchange_rate(model: exchange_rates::Model) -> Result<ExchangeRate, ExchangeRateError> {
    let corrupt = |source| ExchangeRateError::CorruptRow {
        id: model.id,
        source,
    };
    let base = CurrencyCode::new(&model.base_currency).map_err(corrupt)?;
    let target = CurrencyCode::new(&model.target_currency).map_err(corrupt)?;
    Ok(ExchangeRate::new(
        base,
        target,
        model.rate,
        model.updated_at.with_timezone(&Utc),
    ))
}

#[async_trait]
impl RateStore for ExchangeRateRepository {
    async fn get_rate(
        &self,
        base: &CurrencyCode,
        target: &CurrencyCode,
    ) -> Result<Decimal, RateStoreError> {
        self.find_rate(base, target)
            .await?
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
        Ok(self.upsert(base, target, rate, updated_at).await?)
    }

    async fn list_rates(&self) -> Result<Vec<ExchangeRate>, RateStoreError> {
        Ok(self.list().await?)
    }
}
