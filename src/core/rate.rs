//! Exchange rate values and conversion to PLN.

use crate::core::currency::Currency;
use crate::core::date::{format_date, parse_date};
use crate::core::error::{ApiError, Error, Result};
use crate::core::transport::RateRecord;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt::Display;
use std::str::FromStr;

/// A published rate magnitude, stored at the precision the client was
/// configured with.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum RateValue {
    Decimal(Decimal),
    Float(f64),
}

impl RateValue {
    /// Reads a JSON number at the requested precision. Decimals are built from
    /// the number's textual form so no binary rounding leaks in.
    pub fn from_number(number: &serde_json::Number, use_float: bool) -> Result<Self> {
        if use_float {
            return number.as_f64().map(RateValue::Float).ok_or_else(|| {
                ApiError::MalformedResponse(format!("{number} is not a valid rate")).into()
            });
        }

        let text = number.to_string();
        Decimal::from_str(&text)
            .or_else(|_| Decimal::from_scientific(&text))
            .map(RateValue::Decimal)
            .map_err(|e| ApiError::MalformedResponse(format!("{text} is not a valid rate: {e}")).into())
    }

    pub fn as_decimal(&self) -> Option<Decimal> {
        match self {
            RateValue::Decimal(value) => Some(*value),
            RateValue::Float(_) => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            RateValue::Float(value) => Some(*value),
            RateValue::Decimal(_) => None,
        }
    }

    pub fn is_float(&self) -> bool {
        matches!(self, RateValue::Float(_))
    }

    fn kind(&self) -> &'static str {
        match self {
            RateValue::Decimal(_) => "decimal",
            RateValue::Float(_) => "float",
        }
    }

    /// `amount * self`, keeping the rate's precision.
    pub fn multiply(&self, amount: Amount) -> Result<RateValue> {
        let overflow = |factor: Decimal, value: Decimal| Error::Overflow {
            rate: value.to_string(),
            amount: factor.to_string(),
        };

        match (*self, amount) {
            (RateValue::Decimal(value), Amount::Integer(amount)) => {
                let factor = Decimal::from(amount);
                factor
                    .checked_mul(value)
                    .map(RateValue::Decimal)
                    .ok_or_else(|| overflow(factor, value))
            }
            (RateValue::Decimal(value), Amount::Decimal(amount)) => amount
                .checked_mul(value)
                .map(RateValue::Decimal)
                .ok_or_else(|| overflow(amount, value)),
            (RateValue::Float(value), Amount::Integer(amount)) => {
                Ok(RateValue::Float(amount as f64 * value))
            }
            (RateValue::Float(value), Amount::Float(amount)) => Ok(RateValue::Float(amount * value)),
            (RateValue::Decimal(_), Amount::Float(_)) | (RateValue::Float(_), Amount::Decimal(_)) => {
                Err(Error::IncompatibleAmount {
                    rate: self.kind(),
                    amount: amount.kind(),
                })
            }
        }
    }
}

impl Display for RateValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RateValue::Decimal(value) => write!(f, "{value}"),
            RateValue::Float(value) => write!(f, "{value}"),
        }
    }
}

/// An amount of foreign currency to convert.
///
/// Integers combine with either precision; decimal and float amounts must
/// match the precision of the rate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Amount {
    Integer(i64),
    Decimal(Decimal),
    Float(f64),
}

impl Amount {
    fn kind(&self) -> &'static str {
        match self {
            Amount::Integer(_) => "integer",
            Amount::Decimal(_) => "decimal",
            Amount::Float(_) => "float",
        }
    }
}

impl From<i32> for Amount {
    fn from(value: i32) -> Self {
        Amount::Integer(value.into())
    }
}

impl From<u32> for Amount {
    fn from(value: u32) -> Self {
        Amount::Integer(value.into())
    }
}

impl From<i64> for Amount {
    fn from(value: i64) -> Self {
        Amount::Integer(value)
    }
}

impl From<Decimal> for Amount {
    fn from(value: Decimal) -> Self {
        Amount::Decimal(value)
    }
}

impl From<f64> for Amount {
    fn from(value: f64) -> Self {
        Amount::Float(value)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub enum RateField {
    Mid,
    Bid,
    Ask,
}

impl Display for RateField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                RateField::Mid => "mid",
                RateField::Bid => "bid",
                RateField::Ask => "ask",
            }
        )
    }
}

/// Result of converting an amount: one PLN value per published field.
pub type Conversion = BTreeMap<RateField, RateValue>;

/// One currency's rate(s) against PLN on one date.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExchangeRate {
    currency_code: String,
    currency_name: String,
    date: NaiveDate,
    source_id: Option<String>,
    mid: Option<RateValue>,
    bid: Option<RateValue>,
    ask: Option<RateValue>,
}

impl ExchangeRate {
    /// Builds a rate from a mid value, a bid/ask pair, or both.
    pub fn new(
        currency: &Currency,
        date: NaiveDate,
        mid: Option<RateValue>,
        bid_ask: Option<(RateValue, RateValue)>,
    ) -> Result<Self> {
        if mid.is_none() && bid_ask.is_none() {
            return Err(Error::InvalidArgument(format!(
                "exchange rate for {} on {} has neither mid nor bid/ask",
                currency.code(),
                format_date(date)
            )));
        }

        let (bid, ask) = match bid_ask {
            Some((bid, ask)) => (Some(bid), Some(ask)),
            None => (None, None),
        };

        Ok(Self {
            currency_code: currency.code().to_string(),
            currency_name: currency.name().to_string(),
            date,
            source_id: None,
            mid,
            bid,
            ask,
        })
    }

    /// Builds a rate from one record of a service response.
    ///
    /// A bid without an ask (or the reverse) is dropped; a record with no
    /// usable value is a malformed response.
    pub fn from_record(currency: &Currency, record: &RateRecord, use_float: bool) -> Result<Self> {
        let date = parse_date(record.effective_date.as_str()).map_err(|_| {
            ApiError::MalformedResponse(format!(
                "invalid effectiveDate {:?} for {}",
                record.effective_date,
                currency.code()
            ))
        })?;

        let read = |number: &Option<serde_json::Number>| -> Result<Option<RateValue>> {
            number
                .as_ref()
                .map(|n| RateValue::from_number(n, use_float))
                .transpose()
        };

        let mid = read(&record.mid)?;
        let bid_ask = match (read(&record.bid)?, read(&record.ask)?) {
            (Some(bid), Some(ask)) => Some((bid, ask)),
            _ => None,
        };

        if mid.is_none() && bid_ask.is_none() {
            return Err(ApiError::MalformedResponse(format!(
                "rate for {} on {} has neither mid nor bid/ask",
                currency.code(),
                record.effective_date
            ))
            .into());
        }

        let mut rate = Self::new(currency, date, mid, bid_ask)?;
        rate.source_id = record.no.clone();
        Ok(rate)
    }

    pub fn with_source_id(mut self, source_id: &str) -> Self {
        self.source_id = Some(source_id.to_string());
        self
    }

    pub fn currency_code(&self) -> &str {
        &self.currency_code
    }

    pub fn currency_name(&self) -> &str {
        &self.currency_name
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    /// Publication number of the table this rate came from, e.g. `190/A/NBP/2017`.
    pub fn source_id(&self) -> Option<&str> {
        self.source_id.as_deref()
    }

    pub fn mid(&self) -> Option<RateValue> {
        self.mid
    }

    pub fn bid(&self) -> Option<RateValue> {
        self.bid
    }

    pub fn ask(&self) -> Option<RateValue> {
        self.ask
    }

    pub fn has_bid_ask(&self) -> bool {
        self.bid.is_some() && self.ask.is_some()
    }

    /// Converts `amount` of this currency to PLN, once per published field.
    pub fn convert<A: Into<Amount>>(&self, amount: A) -> Result<Conversion> {
        let amount = amount.into();
        let mut conversion = Conversion::new();
        for (field, value) in [
            (RateField::Mid, self.mid),
            (RateField::Bid, self.bid),
            (RateField::Ask, self.ask),
        ] {
            if let Some(value) = value {
                conversion.insert(field, value.multiply(amount)?);
            }
        }
        Ok(conversion)
    }
}

impl PartialEq for ExchangeRate {
    fn eq(&self, other: &Self) -> bool {
        self.currency_code == other.currency_code
            && self.date == other.date
            && self.mid == other.mid
            && self.bid == other.bid
            && self.ask == other.ask
    }
}

impl Display for ExchangeRate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "ExchangeRate({}->PLN, {}",
            self.currency_code,
            format_date(self.date)
        )?;
        if let Some(mid) = self.mid {
            write!(f, ", mid={mid}")?;
        }
        if let (Some(bid), Some(ask)) = (self.bid, self.ask) {
            write!(f, ", bid={bid}, ask={ask}")?;
        }
        write!(f, ")")
    }
}
