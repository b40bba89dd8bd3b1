//! Shared types, errors, and configuration for Worklio.
//!
//! This crate provides common types used across all other crates:
//! - Currency codes and the configured supported-currency set
//! - Money types with decimal precision and display formatting
//! - Application-wide error types
//! - Configuration management

pub mod config;
pub mod error;
pub mod types;

pub use config::{AppConfig, ExchangeRateConfig};
pub use error::{AppError, AppResult};
