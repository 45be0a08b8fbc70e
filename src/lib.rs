//! Client for the National Bank of Poland exchange rate API.
//!
//! ```no_run
//! use nbp_rates::{Client, ClientConfig, QuoteMode};
//!
//! # async fn run() -> nbp_rates::Result<()> {
//! let mut client = Client::from_config(&ClientConfig::new("EUR"))?;
//! if let Some(rate) = client.date("2017-10-02", QuoteMode::Mid).await? {
//!     println!("{rate}: {:?}", rate.convert(1000)?);
//! }
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod core;
pub mod providers;

pub use crate::client::{Client, QuoteMode};
pub use crate::core::config::ClientConfig;
pub use crate::core::{
    Amount, ApiError, Conversion, Currency, CurrencyRegistry, Error, ExchangeRate, Query,
    RateField, RateTransport, RateValue, Result, Table,
};
pub use crate::providers::NbpTransport;
