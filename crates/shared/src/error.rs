//! Application-wide error types.

use thiserror::Error;

use crate::config::SettingsError;
use crate::types::CurrencyError;

/// Result type alias using `AppError`.
pub type AppResult<T> = Result<T, AppError>;

/// Errors surfaced to callers of the currency engine.
///
/// Server-side variants carry a cause for logs; [`AppError::public_message`]
/// is what a client may see.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AppError {
    /// A selected currency is malformed or not accepted by this deployment.
    #[error("Unsupported currency: {0}")]
    UnsupportedCurrency(String),

    /// An amount could not be parsed as a decimal.
    #[error("Invalid amount: '{0}'")]
    InvalidAmount(String),

    /// A required request parameter was absent.
    #[error("Missing parameters: {0}")]
    MissingParameters(String),

    /// Other malformed input.
    #[error("Validation error: {0}")]
    Validation(String),

    /// No stored rate for a pair the caller asked for.
    #[error("{0}")]
    RateNotFound(String),

    /// The rate store failed.
    #[error("Storage error: {0}")]
    Storage(String),

    /// The rate provider failed.
    #[error("External service error: {0}")]
    ExternalService(String),

    /// Invalid configuration.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Returns the HTTP status code for this error.
    #[must_use]
    pub const fn status_code(&self) -> u16 {
        match self {
            Self::UnsupportedCurrency(_)
            | Self::InvalidAmount(_)
            | Self::MissingParameters(_)
            | Self::Validation(_) => 400,
            Self::RateNotFound(_) => 404,
            Self::ExternalService(_) => 502,
            Self::Storage(_) | Self::Configuration(_) | Self::Internal(_) => 500,
        }
    }

    /// Returns the error code for API responses.
    ///
    /// Every server-side failure shares `internal_error`.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::UnsupportedCurrency(_) => "unsupported_currency",
            Self::InvalidAmount(_) => "invalid_amount",
            Self::MissingParameters(_) => "missing_parameters",
            Self::Validation(_) => "validation_error",
            Self::RateNotFound(_) => "rate_not_found",
            Self::ExternalService(_) => "external_service_error",
            Self::Storage(_) | Self::Configuration(_) | Self::Internal(_) => "internal_error",
        }
    }

    /// Returns true for errors caused by the server rather than the request.
    #[must_use]
    pub const fn is_server_error(&self) -> bool {
        self.status_code() >= 500
    }

    /// Message safe to show a client.
    #[must_use]
    pub fn public_message(&self) -> String {
        if self.is_server_error() {
            "An error occurred".to_string()
        } else {
            self.to_string()
        }
    }
}

impl From<CurrencyError> for AppError {
    fn from(err: CurrencyError) -> Self {
        match err {
            // A malformed code can never be supported.
            CurrencyError::Unsupported(code) | CurrencyError::InvalidCode(code) => {
                Self::UnsupportedCurrency(code)
            }
        }
    }
}

impl From<SettingsError> for AppError {
    fn from(err: SettingsError) -> Self {
        Self::Configuration(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(AppError::UnsupportedCurrency("BRL".into()), 400, "unsupported_currency")]
    #[case(AppError::InvalidAmount("ten".into()), 400, "invalid_amount")]
    #[case(AppError::MissingParameters("amount".into()), 400, "missing_parameters")]
    #[case(AppError::Validation("bad".into()), 400, "validation_error")]
    #[case(AppError::RateNotFound("USD/GBP".into()), 404, "rate_not_found")]
    #[case(AppError::Storage("down".into()), 500, "internal_error")]
    #[case(AppError::ExternalService("timeout".into()), 502, "external_service_error")]
    #[case(AppError::Configuration("bad zone".into()), 500, "internal_error")]
    #[case(AppError::Internal("oops".into()), 500, "internal_error")]
    fn test_status_and_code(#[case] err: AppError, #[case] status: u16, #[case] code: &str) {
        assert_eq!(err.status_code(), status);
        assert_eq!(err.error_code(), code);
    }

    #[test]
    fn test_public_message_hides_server_causes() {
        let err = AppError::Storage("connection refused".into());
        assert!(err.is_server_error());
        assert_eq!(err.public_message(), "An error occurred");

        let err = AppError::InvalidAmount("ten".into());
        assert!(!err.is_server_error());
        assert_eq!(err.public_message(), "Invalid amount: 'ten'");
    }

    #[test]
    fn test_currency_errors_are_unsupported() {
        let unsupported: AppError = CurrencyError::Unsupported("BRL".into()).into();
        assert_eq!(unsupported, AppError::UnsupportedCurrency("BRL".into()));

        let invalid: AppError = CurrencyError::InvalidCode("EURO".into()).into();
        assert_eq!(invalid.to_string(), "Unsupported currency: EURO");
    }
}
