//! Transport abstractions: what the client asks for and what comes back.

use crate::core::currency::Table;
use crate::core::date::format_date;
use crate::core::error::ApiError;
use async_trait::async_trait;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt::Display;

/// The period a rate request covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd)]
pub enum Query {
    /// Most recent published rate, as resolved by the service.
    Current,
    Today,
    Date(NaiveDate),
    Last(u32),
    Range(NaiveDate, NaiveDate),
}

/// Renders the trailing path segment of the service endpoint.
impl Display for Query {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Query::Current => Ok(()),
            Query::Today => write!(f, "today"),
            Query::Date(date) => write!(f, "{}", format_date(*date)),
            Query::Last(n) => write!(f, "last/{n}"),
            Query::Range(start, end) => {
                write!(f, "{}/{}", format_date(*start), format_date(*end))
            }
        }
    }
}

/// A rate table response for one currency.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RateTable {
    pub table: String,
    pub currency: String,
    pub code: String,
    pub rates: Vec<RateRecord>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RateRecord {
    pub no: Option<String>,
    #[serde(rename = "effectiveDate")]
    pub effective_date: String,
    pub mid: Option<serde_json::Number>,
    pub bid: Option<serde_json::Number>,
    pub ask: Option<serde_json::Number>,
}

/// Fetches raw rate tables. Any failure is reported as an [`ApiError`].
#[async_trait]
pub trait RateTransport: Send + Sync {
    async fn fetch(&self, table: Table, code: &str, query: &Query) -> Result<RateTable, ApiError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_path_segments() {
        let start = NaiveDate::from_ymd_opt(2017, 10, 1).unwrap();
        let end = NaiveDate::from_ymd_opt(2017, 10, 14).unwrap();

        assert_eq!(Query::Current.to_string(), "");
        assert_eq!(Query::Today.to_string(), "today");
        assert_eq!(Query::Date(start).to_string(), "2017-10-01");
        assert_eq!(Query::Last(5).to_string(), "last/5");
        assert_eq!(Query::Range(start, end).to_string(), "2017-10-01/2017-10-14");
    }

    #[test]
    fn test_rate_table_deserialization() {
        let json = r#"{
            "table": "C",
            "currency": "euro",
            "code": "EUR",
            "rates": [
                {"no": "190/C/NBP/2017", "effectiveDate": "2017-10-02", "bid": 4.2710, "ask": 4.3572}
            ]
        }"#;

        let table: RateTable = serde_json::from_str(json).unwrap();
        assert_eq!(table.code, "EUR");
        assert_eq!(table.rates.len(), 1);
        let record = &table.rates[0];
        assert_eq!(record.effective_date, "2017-10-02");
        assert!(record.mid.is_none());
        assert_eq!(record.bid.as_ref().unwrap().as_f64(), Some(4.2710));
        assert_eq!(record.no.as_deref(), Some("190/C/NBP/2017"));
    }
}
