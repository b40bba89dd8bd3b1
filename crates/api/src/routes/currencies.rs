//! Currency listing and conversion routes.

use std::str::FromStr;

use axum::{
    Json, Router,
    extract::{Query, State},
    routing::get,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use worklio_shared::AppError;
use worklio_shared::types::{CurrencyCode, CurrencyInfo};

use crate::{AppState, error::ApiError};

/// Creates the currency routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/supported-currencies", get(list_supported_currencies))
        .route("/convert-currency", get(convert_currency))
}

/// GET `/supported-currencies` - List the currencies this deployment accepts.
async fn list_supported_currencies(State(state): State<AppState>) -> Json<Vec<CurrencyInfo>> {
    Json(state.supported.catalog().into_iter().copied().collect())
}

/// Query parameters for a conversion.
///
/// Fields stay raw so each one can be rejected with its own error code.
#[derive(Debug, Deserialize)]
pub struct ConvertQuery {
    /// Amount in the source currency.
    pub amount: Option<String>,
    /// Source currency code.
    pub from: Option<String>,
    /// Target currency code.
    pub to: Option<String>,
}

/// Response for a conversion.
#[derive(Debug, Serialize)]
pub struct ConvertResponse {
    /// Amount as requested.
    pub amount: Decimal,
    /// Source currency.
    pub from: CurrencyCode,
    /// Target currency.
    pub to: CurrencyCode,
    /// Converted amount, unrounded.
    pub converted_amount: Decimal,
    /// Units of `to` per unit of `from`.
    pub rate: Decimal,
}

/// GET `/convert-currency?amount=&from=&to=` - Convert an amount.
async fn convert_currency(
    State(state): State<AppState>,
    Query(query): Query<ConvertQuery>,
) -> Result<Json<ConvertResponse>, ApiError> {
    let present = |value: Option<String>| value.filter(|v| !v.trim().is_empty());
    let (Some(amount), Some(from), Some(to)) =
        (present(query.amount), present(query.from), present(query.to))
    else {
        return Err(AppError::MissingParameters("amount, from and to are required".into()).into());
    };

    let amount =
        Decimal::from_str(amount.trim()).map_err(|_| AppError::InvalidAmount(amount.clone()))?;
    let from = state.supported.validate(&from)?;
    let to = state.supported.validate(&to)?;

    let conversion = state.converter.convert_detailed(amount, &from, &to).await?;

    Ok(Json(ConvertResponse {
        amount,
        from,
        to,
        converted_amount: conversion.amount,
        rate: conversion.rate,
    }))
}
