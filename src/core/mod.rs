//! Core types: currencies, dates, rates, caching and the transport contract

pub mod cache;
pub mod config;
pub mod currency;
pub mod date;
pub mod error;
pub mod log;
pub mod rate;
pub mod transport;

// Re-export main types for cleaner imports
pub use currency::{Currency, CurrencyRegistry, Table};
pub use error::{ApiError, Error, Result};
pub use rate::{Amount, Conversion, ExchangeRate, RateField, RateValue};
pub use transport::{Query, RateRecord, RateTable, RateTransport};
