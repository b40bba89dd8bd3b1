//! `SeaORM` entity definitions.

pub mod exchange_rates;
