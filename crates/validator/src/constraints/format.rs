//! Format constraints: email, URL and calendar values
//!
//! `Date`, `Time` and `DateTime` parse text and hand the parsed value to the
//! next check, so a `date` field ends up holding a [`NaiveDate`].

use std::sync::LazyLock;

use chrono::{DateTime as ChronoDateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};

use crate::foundation::{AsValidatable, Check, CheckContext, CheckError, FieldError, Value};

static EMAIL_REGEX: LazyLock<regex::Regex> = LazyLock::new(|| {
    regex::Regex::new(
        r"^[a-zA-Z0-9.!#$%&'*+/=?^_`{|}~-]+@[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?(?:\.[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?)+$"
    ).unwrap()
});

static DATE_SHAPE: LazyLock<regex::Regex> =
    LazyLock::new(|| regex::Regex::new(r"^\d{4}-\d{2}-\d{2}$").unwrap());

static TIME_SHAPE: LazyLock<regex::Regex> =
    LazyLock::new(|| regex::Regex::new(r"^\d{2}:\d{2}(:\d{2})?$").unwrap());

// ============================================================================
// EMAIL / URL
// ============================================================================

crate::constraint! {
    /// Rejects strings that are not a plausible email address with a dotted domain.
    pub Email for str;
    rule(input) { EMAIL_REGEX.is_match(input) }
    error(input) { FieldError::new("email", "Must be a valid email address.") }
    fn email();
}

crate::constraint! {
    /// Rejects strings that are not an absolute URL with a host.
    pub Url for str;
    rule(input) { url::Url::parse(input).is_ok_and(|url| url.has_host()) }
    error(input) { FieldError::new("url", "Must be a valid URL.") }
    fn url();
}

// ============================================================================
// CALENDAR VALUES
// ============================================================================

/// Parses `YYYY-MM-DD` into a date. Impossible dates such as `2023-02-30`
/// are rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Date;

impl Date {
    fn parse(input: &str) -> Option<NaiveDate> {
        let input = input.trim();
        if !DATE_SHAPE.is_match(input) {
            return None;
        }
        NaiveDate::parse_from_str(input, "%Y-%m-%d").ok()
    }
}

impl Check for Date {
    fn check(&self, value: Value, _ctx: &CheckContext<'_>) -> Result<Value, CheckError> {
        if let Value::Date(_) = value {
            return Ok(value);
        }
        let input = AsValidatable::<str>::as_validatable(&value)?;
        Self::parse(input)
            .map(Value::Date)
            .ok_or_else(|| FieldError::new("date", "Must be a valid date string.").into())
    }
}

#[must_use]
pub const fn date() -> Date {
    Date
}

/// Parses `HH:MM` or `HH:MM:SS` into a time of day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Time;

impl Time {
    fn parse(input: &str) -> Option<NaiveTime> {
        let input = input.trim();
        if !TIME_SHAPE.is_match(input) {
            return None;
        }
        NaiveTime::parse_from_str(input, "%H:%M:%S")
            .or_else(|_| NaiveTime::parse_from_str(input, "%H:%M"))
            .ok()
    }
}

impl Check for Time {
    fn check(&self, value: Value, _ctx: &CheckContext<'_>) -> Result<Value, CheckError> {
        if let Value::Time(_) = value {
            return Ok(value);
        }
        let input = AsValidatable::<str>::as_validatable(&value)?;
        Self::parse(input)
            .map(Value::Time)
            .ok_or_else(|| FieldError::new("time", "Must be a valid time string.").into())
    }
}

#[must_use]
pub const fn time() -> Time {
    Time
}

/// Parses an RFC 3339 timestamp. A timestamp without offset
/// (`YYYY-MM-DDTHH:MM:SS` or with a space separator) is read as UTC.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct DateTime;

impl DateTime {
    fn parse(input: &str) -> Option<ChronoDateTime<chrono::FixedOffset>> {
        let input = input.trim();
        if let Ok(parsed) = ChronoDateTime::parse_from_rfc3339(input) {
            return Some(parsed);
        }
        ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S"]
            .iter()
            .find_map(|format| NaiveDateTime::parse_from_str(input, format).ok())
            .map(|naive| naive.and_utc().fixed_offset())
    }
}

impl Check for DateTime {
    fn check(&self, value: Value, _ctx: &CheckContext<'_>) -> Result<Value, CheckError> {
        if let Value::DateTime(_) = value {
            return Ok(value);
        }
        let input = AsValidatable::<str>::as_validatable(&value)?;
        Self::parse(input)
            .map(Value::DateTime)
            .ok_or_else(|| FieldError::new("datetime", "Must be a valid datetime string.").into())
    }
}

#[must_use]
pub const fn datetime() -> DateTime {
    DateTime
}

/// Current UTC time in the representation `DateTime` produces. Handy for
/// `default_with` on timestamp fields.
#[must_use]
pub fn now() -> Value {
    Value::DateTime(Utc::now().fixed_offset())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::check;
    use rstest::rstest;

    #[rstest]
    #[case("user@example.com", true)]
    #[case("first.last+tag@sub.example.org", true)]
    #[case("user@localhost", false)]
    #[case("not-an-email", false)]
    #[case("@example.com", false)]
    fn test_email(#[case] input: &str, #[case] valid: bool) {
        assert_eq!(check(&email(), input).is_ok(), valid);
    }

    #[rstest]
    #[case("https://example.com/path?q=1", true)]
    #[case("ftp://files.example.com", true)]
    #[case("example.com", false)]
    #[case("mailto:user@example.com", false)]
    fn test_url(#[case] input: &str, #[case] valid: bool) {
        assert_eq!(check(&url(), input).is_ok(), valid);
    }

    #[test]
    fn test_date_parses() {
        let parsed = check(&date(), "2024-02-29").unwrap();
        assert_eq!(parsed, Value::Date(NaiveDate::from_ymd_opt(2024, 2, 29).unwrap()));
        assert_eq!(check(&date(), "2023-02-30").unwrap_err(), "date");
        assert_eq!(check(&date(), "24-2-29").unwrap_err(), "date");
    }

    #[test]
    fn test_time_parses_with_and_without_seconds() {
        assert_eq!(
            check(&time(), "14:30").unwrap(),
            Value::Time(NaiveTime::from_hms_opt(14, 30, 0).unwrap())
        );
        assert!(check(&time(), "14:30:15").is_ok());
        assert_eq!(check(&time(), "25:00").unwrap_err(), "time");
    }

    #[test]
    fn test_datetime_parses() {
        let parsed = check(&datetime(), "2024-05-01T10:00:00+02:00").unwrap();
        let Value::DateTime(dt) = parsed else {
            panic!("expected datetime, got {parsed:?}");
        };
        assert_eq!(dt.offset().local_minus_utc(), 7200);

        let naive = check(&datetime(), "2024-05-01 10:00:00").unwrap();
        assert!(matches!(naive, Value::DateTime(dt) if dt.offset().local_minus_utc() == 0));
        assert_eq!(check(&datetime(), "yesterday").unwrap_err(), "datetime");
    }

    #[test]
    fn test_already_parsed_passes() {
        let value = Value::Date(NaiveDate::from_ymd_opt(2020, 1, 1).unwrap());
        assert_eq!(check(&date(), value.clone()).unwrap(), value);
    }
}
