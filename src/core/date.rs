//! Date parsing and range checks for rate queries.

use crate::core::error::{ApiError, Error, Result};
use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};
use chrono_tz::Europe::Warsaw;

/// Longest span, in days, the service accepts for a single range query.
pub const MAX_RANGE_DAYS: i64 = 93;

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Anything a rate query accepts as a date.
pub trait IntoDate {
    fn into_date(self) -> Result<NaiveDate>;
}

impl IntoDate for NaiveDate {
    fn into_date(self) -> Result<NaiveDate> {
        Ok(self)
    }
}

impl IntoDate for &NaiveDate {
    fn into_date(self) -> Result<NaiveDate> {
        Ok(*self)
    }
}

impl IntoDate for NaiveDateTime {
    fn into_date(self) -> Result<NaiveDate> {
        Ok(self.date())
    }
}

impl<Tz: TimeZone> IntoDate for DateTime<Tz> {
    fn into_date(self) -> Result<NaiveDate> {
        Ok(self.date_naive())
    }
}

impl IntoDate for &str {
    fn into_date(self) -> Result<NaiveDate> {
        // chrono alone would also take "2017-1-2" or a signed/5-digit year
        if !has_iso_shape(self) {
            return Err(Error::DateFormatting(self.to_string()));
        }
        NaiveDate::parse_from_str(self, DATE_FORMAT)
            .map_err(|_| Error::DateFormatting(self.to_string()))
    }
}

impl IntoDate for &String {
    fn into_date(self) -> Result<NaiveDate> {
        self.as_str().into_date()
    }
}

impl IntoDate for String {
    fn into_date(self) -> Result<NaiveDate> {
        self.as_str().into_date()
    }
}

fn has_iso_shape(input: &str) -> bool {
    let bytes = input.as_bytes();
    bytes.len() == 10
        && bytes.iter().enumerate().all(|(i, b)| match i {
            4 | 7 => *b == b'-',
            _ => b.is_ascii_digit(),
        })
}

/// Parses a structured date or a strict `YYYY-MM-DD` string.
pub fn parse_date<D: IntoDate>(input: D) -> Result<NaiveDate> {
    input.into_date()
}

pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

/// Calendar date in Warsaw at `instant`; the service publishes by that clock.
pub fn service_date(instant: DateTime<Utc>) -> NaiveDate {
    instant.with_timezone(&Warsaw).date_naive()
}

/// Today's date as the rate service sees it.
pub fn service_today() -> NaiveDate {
    service_date(Utc::now())
}

/// Number of days between `start` and `end` (negative when reversed).
pub fn range_span(start: NaiveDate, end: NaiveDate) -> i64 {
    (end - start).num_days()
}

/// Checks that `[start, end]` is ordered and no longer than [`MAX_RANGE_DAYS`].
pub fn validate_range(start: NaiveDate, end: NaiveDate) -> std::result::Result<(), ApiError> {
    let span = range_span(start, end);
    if !(0..=MAX_RANGE_DAYS).contains(&span) {
        return Err(ApiError::RangeTooLarge { start, end });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, FixedOffset};

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_parse_valid_strings() {
        assert_eq!(parse_date("2017-10-02").unwrap(), ymd(2017, 10, 2));
        assert_eq!(parse_date("2016-02-29").unwrap(), ymd(2016, 2, 29));
        assert_eq!(
            parse_date("2017-01-01".to_string()).unwrap(),
            ymd(2017, 1, 1)
        );
    }

    #[test]
    fn test_parse_structured_dates() {
        let date = ymd(2017, 10, 15);
        assert_eq!(parse_date(date).unwrap(), date);
        assert_eq!(parse_date(&date).unwrap(), date);
        assert_eq!(
            parse_date(date.and_hms_opt(23, 59, 0).unwrap()).unwrap(),
            date
        );
        let now = Utc::now();
        assert_eq!(parse_date(now).unwrap(), now.date_naive());
    }

    #[test]
    fn test_parse_rejects_malformed_strings() {
        for input in [
            "",
            "this is not a date",
            "2017-01-40",
            "2017-15-01",
            "2017-02-29",
            "1-2-3-4",
            "01/02/2017",
            "02/10/17",
            "2017-1-2",
            "2017/01/02",
            "+2017-01-02",
            " 2017-01-02",
            "2017-01-02T00:00:00",
        ] {
            assert_eq!(
                parse_date(input).unwrap_err(),
                Error::DateFormatting(input.to_string()),
                "input {input:?} should be rejected"
            );
        }
    }

    #[test]
    fn test_validate_range_bounds() {
        let start = ymd(2017, 10, 1);

        assert!(validate_range(start, start).is_ok());
        assert!(validate_range(start, start + Duration::days(MAX_RANGE_DAYS)).is_ok());

        let too_far = start + Duration::days(MAX_RANGE_DAYS + 1);
        assert_eq!(
            validate_range(start, too_far).unwrap_err(),
            ApiError::RangeTooLarge {
                start,
                end: too_far
            }
        );

        let before = start - Duration::days(1);
        assert!(matches!(
            validate_range(start, before),
            Err(ApiError::RangeTooLarge { .. })
        ));
    }

    #[test]
    fn test_range_span_and_format() {
        assert_eq!(range_span(ymd(2017, 10, 1), ymd(2017, 10, 14)), 13);
        assert_eq!(range_span(ymd(2017, 10, 14), ymd(2017, 10, 1)), -13);
        assert_eq!(format_date(ymd(2017, 1, 5)), "2017-01-05");
    }

    #[test]
    fn test_service_date_follows_warsaw() {
        let utc = |y, m, d, h, min| Utc.with_ymd_and_hms(y, m, d, h, min, 0).unwrap();

        // CEST, UTC+2
        assert_eq!(service_date(utc(2026, 10, 16, 21, 30)), ymd(2026, 10, 16));
        assert_eq!(service_date(utc(2026, 10, 16, 22, 30)), ymd(2026, 10, 17));
        // CET, UTC+1
        assert_eq!(service_date(utc(2026, 12, 31, 22, 30)), ymd(2026, 12, 31));
        assert_eq!(service_date(utc(2026, 12, 31, 23, 30)), ymd(2027, 1, 1));
    }

    #[test]
    fn test_service_date_ignores_caller_zone() {
        // Already the 17th at UTC+14 while Warsaw is still on the 16th
        let kiritimati = FixedOffset::east_opt(14 * 3600).unwrap();
        let instant = Utc.with_ymd_and_hms(2026, 10, 16, 11, 0, 0).unwrap();
        assert_eq!(instant.with_timezone(&kiritimati).date_naive(), ymd(2026, 10, 17));
        assert_eq!(service_date(instant), ymd(2026, 10, 16));
    }
}
