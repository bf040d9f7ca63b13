//! Date parsing and relative date bounds.
//!
//! The engine never reads the clock directly; it asks a [`Calendar`]. The
//! wall-clock implementation is [`SystemCalendar`]; [`FixedCalendar`] pins
//! "now" so relative bounds are reproducible.

use crate::filter::ArgumentError;
use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Utc};
use serde_json::Value;

const NAIVE_DATE_TIME_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"];
const DATE_FORMAT: &str = "%Y-%m-%d";

/// Source of the current instant plus the date parsing the engine needs.
pub trait Calendar: Send + Sync {
    /// The instant relative bounds are measured from.
    fn now(&self) -> DateTime<Utc>;

    /// Parse a raw value into an instant.
    ///
    /// With a `format` (chrono strftime syntax) only strings are accepted and
    /// they must match it; without one the generic parser is used.
    fn parse(&self, value: &Value, format: Option<&str>) -> Option<DateTime<Utc>> {
        match (value, format) {
            (Value::String(s), Some(format)) => parse_with_format(s, format),
            (Value::String(s), None) => parse_generic(s),
            (Value::Number(n), None) => n.as_i64().and_then(DateTime::from_timestamp_millis),
            _ => None,
        }
    }

    /// Resolve a `before`/`after` bound for `field`.
    ///
    /// Accepts `now`, `today`, `N <unit>s ago`, `N <unit>s from now`, or any
    /// absolute date the generic parser understands.
    fn resolve_relative(&self, field: &str, expression: &str) -> Result<DateTime<Utc>, ArgumentError> {
        let now = self.now();
        let expr = expression.trim().to_ascii_lowercase();

        match expr.as_str() {
            "now" => return Ok(now),
            "today" => return Ok(start_of_day(now.date_naive())),
            _ => {}
        }

        let resolved = match parse_offset(&expr) {
            Some(offset) => now.checked_add_signed(offset),
            None => parse_generic(expression.trim()),
        };
        resolved.ok_or_else(|| {
            ArgumentError::new(field, format!("has an unrecognized date bound '{}'", expression))
        })
    }
}

/// Calendar backed by the system clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemCalendar;

impl Calendar for SystemCalendar {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Calendar whose "now" never moves.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FixedCalendar(pub DateTime<Utc>);

impl Calendar for FixedCalendar {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

fn start_of_day(date: NaiveDate) -> DateTime<Utc> {
    Utc.from_utc_datetime(&date.and_time(NaiveTime::MIN))
}

fn parse_generic(s: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    NAIVE_DATE_TIME_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(s, format).ok())
        .map(|naive| Utc.from_utc_datetime(&naive))
        .or_else(|| NaiveDate::parse_from_str(s, DATE_FORMAT).ok().map(start_of_day))
}

fn parse_with_format(s: &str, format: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_str(s, format) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(s, format) {
        return Some(Utc.from_utc_datetime(&naive));
    }
    NaiveDate::parse_from_str(s, format).ok().map(start_of_day)
}

/// `"7 days ago"` -> -7 days, `"2 hours from now"` -> +2 hours.
fn parse_offset(expr: &str) -> Option<Duration> {
    let words: Vec<&str> = expr.split_whitespace().collect();
    let (amount, unit, sign): (&str, &str, i32) = match words.as_slice() {
        [amount, unit, "ago"] => (*amount, *unit, -1),
        [amount, unit, "from", "now"] => (*amount, *unit, 1),
        _ => return None,
    };

    let amount: i64 = amount.parse().ok()?;
    let unit = unit.strip_suffix('s').unwrap_or(unit);
    let offset = match unit {
        "second" => Duration::try_seconds(amount)?,
        "minute" => Duration::try_minutes(amount)?,
        "hour" => Duration::try_hours(amount)?,
        "day" => Duration::try_days(amount)?,
        "week" => Duration::try_weeks(amount)?,
        _ => return None,
    };
    Some(offset * sign)
}
