//! Core business logic for Worklio.
//!
//! This crate contains pure business logic with ZERO web or database dependencies.
//! Storage is reached through the [`currency::RateStore`] trait and rate
//! providers through [`currency::RateSource`].
//!
//! # Modules
//!
//! - `currency` - Rate store, conversion, aggregation and rate refresh
//! - `stats` - Dashboard, invoice and time-entry statistics

pub mod currency;
pub mod stats;
