//! JSON error responses.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use tracing::error;
use worklio_shared::AppError;

/// Handler error rendered as `{"error": code, "message": message}`.
///
/// Anything convertible into [`AppError`] can be returned with `?`.
#[derive(Debug)]
pub struct ApiError(pub AppError);

impl<E> From<E> for ApiError
where
    E: Into<AppError>,
{
    fn from(err: E) -> Self {
        Self(err.into())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let err = self.0;
        let status =
            StatusCode::from_u16(err.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        if err.is_server_error() {
            error!(error = %err, code = err.error_code(), "Request failed");
        }

        (
            status,
            Json(json!({
                "error": err.error_code(),
                "message": err.public_message(),
            })),
        )
            .into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::BodyExt;
    use worklio_core::currency::ConversionError;
    use worklio_shared::types::{CurrencyCode, CurrencyError};

    async fn render(err: ApiError) -> (StatusCode, serde_json::Value) {
        let response = err.into_response();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_rate_not_found_is_404() {
        let err: ApiError = ConversionError::RateNotFound {
            base: CurrencyCode::usd(),
            target: CurrencyCode::new("EUR").unwrap(),
        }
        .into();

        let (status, body) = render(err).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], "rate_not_found");
        assert_eq!(body["message"], "Exchange rate not available for USD/EUR");
    }

    #[tokio::test]
    async fn test_storage_error_hides_cause() {
        let err: ApiError = ConversionError::Storage("connection refused".into()).into();

        let (status, body) = render(err).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"], "internal_error");
        assert_eq!(body["message"], "An error occurred");
    }

    #[tokio::test]
    async fn test_currency_error_is_400() {
        let err: ApiError = CurrencyError::Unsupported("BRL".into()).into();

        let (status, body) = render(err).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "unsupported_currency");
        assert_eq!(body["message"], "Unsupported currency: BRL");
    }
}
