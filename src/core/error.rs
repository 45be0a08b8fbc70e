//! Error taxonomy for rate lookups and conversions.

use chrono::NaiveDate;
use thiserror::Error;

/// Result alias used across the crate.
pub type Result<T> = std::result::Result<T, Error>;

/// Root error type.
///
/// Only [`Error::Api`] is subject to `suppress_errors`; every other variant
/// is a caller mistake and always propagates.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    #[error("Unknown currency code: {0}")]
    UnknownCurrencyCode(String),

    #[error("{0} is not a properly formatted date (YYYY-MM-DD)")]
    DateFormatting(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Cannot multiply {rate} rate by {amount} amount")]
    IncompatibleAmount {
        rate: &'static str,
        amount: &'static str,
    },

    #[error("Conversion overflow: {amount} * {rate}")]
    Overflow { rate: String, amount: String },

    #[error(transparent)]
    Api(#[from] ApiError),
}

impl Error {
    /// Whether this error belongs to the operational class that
    /// `suppress_errors` turns into `None`.
    pub fn is_api(&self) -> bool {
        matches!(self, Error::Api(_))
    }
}

/// Transport and data-availability failures.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ApiError {
    #[error("HTTP error: {status} for {url}")]
    Http { status: u16, url: String },

    #[error("Request error: {0}")]
    Transport(String),

    #[error("No data available for {0}")]
    NoData(String),

    #[error("Invalid date range {start} - {end}: must be ordered and span at most 93 days")]
    RangeTooLarge { start: NaiveDate, end: NaiveDate },

    #[error("Bid/ask rates are not published for {0}")]
    BidAskUnavailable(String),

    #[error("Malformed response: {0}")]
    MalformedResponse(String),
}
