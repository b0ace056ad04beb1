//! Calendar-aware duration decomposition for the datetime-duration counter.
//!
//! A duration counter animates the distance between two instants. The
//! distance is sampled as milliseconds, then every sample is split into one
//! value per unit between the configured minimum and maximum precision
//! (days, hours, minutes, seconds by default).

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Months, NaiveDate, NaiveDateTime, TimeDelta, TimeZone, Utc};
use serde::{Deserialize, Deserializer};

use crate::error::{Error, Result};

/// A unit a duration can be broken into.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum DurationPart {
    Millisecond,
    Second,
    Minute,
    Hour,
    Day,
    Week,
    Month,
    Quarter,
    Year,
}

impl DurationPart {
    /// Every unit, largest first.
    pub const DESCENDING: [Self; 9] = [
        Self::Year,
        Self::Quarter,
        Self::Month,
        Self::Week,
        Self::Day,
        Self::Hour,
        Self::Minute,
        Self::Second,
        Self::Millisecond,
    ];

    /// Nominal length in milliseconds; months and years use the mean
    /// Julian year.
    #[must_use]
    pub const fn milliseconds(self) -> i64 {
        match self {
            Self::Millisecond => 1,
            Self::Second => 1_000,
            Self::Minute => 60_000,
            Self::Hour => 3_600_000,
            Self::Day => 86_400_000,
            Self::Week => 604_800_000,
            Self::Month => 2_629_800_000,
            Self::Quarter => 7_889_400_000,
            Self::Year => 31_557_600_000,
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Millisecond => "millisecond",
            Self::Second => "second",
            Self::Minute => "minute",
            Self::Hour => "hour",
            Self::Day => "day",
            Self::Week => "week",
            Self::Month => "month",
            Self::Quarter => "quarter",
            Self::Year => "year",
        }
    }
}

impl fmt::Display for DurationPart {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DurationPart {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::DESCENDING
            .into_iter()
            .find(|part| part.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| Error::UnknownDurationPart(s.to_string()))
    }
}

impl<'de> Deserialize<'de> for DurationPart {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// Smallest and largest unit a duration counter shows.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DurationPrecision {
    pub min: DurationPart,
    pub max: DurationPart,
}

impl Default for DurationPrecision {
    fn default() -> Self {
        Self {
            min: DurationPart::Second,
            max: DurationPart::Day,
        }
    }
}

impl DurationPrecision {
    /// Show exactly one unit.
    #[must_use]
    pub fn single(part: DurationPart) -> Self {
        Self {
            min: part,
            max: part,
        }
    }

    /// Units within `[min, max]`, largest first.
    #[must_use]
    pub fn available_parts(&self) -> Vec<DurationPart> {
        let lo = self.min.milliseconds();
        let hi = self.max.milliseconds();
        DurationPart::DESCENDING
            .into_iter()
            .filter(|part| (lo..=hi).contains(&part.milliseconds()))
            .collect()
    }

    /// Parse `"second"` or `["second", "day"]`.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

impl<'de> Deserialize<'de> for DurationPrecision {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Single(DurationPart),
            Range(DurationPart, DurationPart),
        }
        Ok(match Raw::deserialize(deserializer)? {
            Raw::Single(part) => Self::single(part),
            Raw::Range(min, max) => Self { min, max },
        })
    }
}

/// Move `from` so the distance to `to` is a whole number of
/// `min_precision` units, rounding partial units away from `to`.
#[must_use]
pub fn optimize_from(from_ms: i64, to_ms: i64, min_precision: DurationPart) -> i64 {
    let unit = min_precision.milliseconds();
    let base = from_ms - from_ms % unit;
    let offset = (to_ms - from_ms).abs() % unit;
    let carry = match (offset > 0, from_ms < to_ms) {
        (false, _) => 0,
        (true, true) => -unit,
        (true, false) => unit,
    };
    base + carry + to_ms % unit
}

/// Milliseconds between `from` and `to` after [`optimize_from`].
#[must_use]
pub fn duration_milliseconds(from: DateTime<Utc>, to: DateTime<Utc>, min_precision: DurationPart) -> i64 {
    let to_ms = to.timestamp_millis();
    (to_ms - optimize_from(from.timestamp_millis(), to_ms, min_precision)).abs()
}

fn full_months(start: DateTime<Utc>, end: DateTime<Utc>) -> u32 {
    let guess = (end.year_month_index() - start.year_month_index()).max(0);
    let mut months = u32::try_from(guess).unwrap_or(0);
    while months > 0
        && start
            .checked_add_months(Months::new(months))
            .is_none_or(|shifted| shifted > end)
    {
        months -= 1;
    }
    months
}

trait YearMonthIndex {
    fn year_month_index(&self) -> i64;
}

impl YearMonthIndex for DateTime<Utc> {
    fn year_month_index(&self) -> i64 {
        use chrono::Datelike;
        i64::from(self.year()) * 12 + i64::from(self.month0())
    }
}

fn sub_months(date: DateTime<Utc>, months: u32) -> DateTime<Utc> {
    date.checked_sub_months(Months::new(months)).unwrap_or(date)
}

/// Split the span `[start, end]` into whole units, largest first. Each unit
/// takes as many whole steps as fit, the remainder carries to the next.
#[must_use]
pub fn decompose(start: DateTime<Utc>, end: DateTime<Utc>, parts: &[DurationPart]) -> Vec<(DurationPart, i64)> {
    let mut remain = end;
    parts
        .iter()
        .map(|&part| {
            let value = match part {
                DurationPart::Year | DurationPart::Quarter | DurationPart::Month => {
                    let step = match part {
                        DurationPart::Year => 12,
                        DurationPart::Quarter => 3,
                        _ => 1,
                    };
                    let count = full_months(start, remain) / step;
                    remain = sub_months(remain, count * step);
                    i64::from(count)
                }
                _ => {
                    let unit = part.milliseconds();
                    let count = ((remain - start).num_milliseconds() / unit).max(0);
                    remain -= TimeDelta::milliseconds(count * unit);
                    count
                }
            };
            (part, value)
        })
        .collect()
}

/// Split a millisecond distance, measured from the Unix epoch so calendar
/// units are reproducible.
#[must_use]
pub fn split_milliseconds(ms: i64, parts: &[DurationPart]) -> Vec<(DurationPart, i64)> {
    let at = |offset: i64| DateTime::from_timestamp_millis(offset).unwrap_or_default();
    decompose(at(ms.min(0)), at(ms.max(0)), parts)
}

/// ISO 8601 duration text, e.g. `P1DT1H1M1S`.
#[must_use]
pub fn iso8601(values: &[(DurationPart, i64)]) -> String {
    let get = |wanted: DurationPart| {
        values
            .iter()
            .filter(|(part, _)| *part == wanted)
            .map(|(_, v)| *v)
            .sum::<i64>()
    };
    let years = get(DurationPart::Year);
    let months = get(DurationPart::Month) + 3 * get(DurationPart::Quarter);
    let weeks = get(DurationPart::Week);
    let days = get(DurationPart::Day);
    let hours = get(DurationPart::Hour);
    let minutes = get(DurationPart::Minute);
    let millis = get(DurationPart::Second) * 1000 + get(DurationPart::Millisecond);

    let mut out = String::from("P");
    for (value, unit) in [(years, 'Y'), (months, 'M'), (weeks, 'W'), (days, 'D')] {
        if value != 0 {
            out.push_str(&format!("{value}{unit}"));
        }
    }
    let mut time = String::new();
    for (value, unit) in [(hours, 'H'), (minutes, 'M')] {
        if value != 0 {
            time.push_str(&format!("{value}{unit}"));
        }
    }
    if millis != 0 {
        if millis % 1000 == 0 {
            time.push_str(&format!("{}S", millis / 1000));
        } else {
            let seconds = format!("{:.3}", millis as f64 / 1000.0);
            time.push_str(seconds.trim_end_matches('0'));
            time.push('S');
        }
    }
    if !time.is_empty() {
        out.push('T');
        out.push_str(&time);
    } else if out.len() == 1 {
        out.push_str("T0S");
    }
    out
}

/// Parse RFC 3339, `YYYY-MM-DD[ HH:MM:SS]` (UTC) or epoch milliseconds.
pub fn parse_date(raw: &str) -> Result<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(date) = DateTime::parse_from_rfc3339(raw) {
        return Ok(date.with_timezone(&Utc));
    }
    for format in ["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, format) {
            return Ok(Utc.from_utc_datetime(&naive));
        }
    }
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Ok(Utc.from_utc_datetime(&date.and_time(chrono::NaiveTime::MIN)));
    }
    raw.parse::<i64>()
        .ok()
        .and_then(DateTime::from_timestamp_millis)
        .ok_or_else(|| Error::InvalidDate(raw.to_string()))
}

fn date_from_json(value: &serde_json::Value) -> Result<DateTime<Utc>> {
    match value {
        serde_json::Value::String(s) => parse_date(s),
        serde_json::Value::Number(n) => n
            .as_i64()
            .and_then(DateTime::from_timestamp_millis)
            .ok_or_else(|| Error::InvalidDate(n.to_string())),
        other => Err(Error::InvalidDate(other.to_string())),
    }
}

/// Parse a duration counter value: a date, or a JSON `[from, to]` pair. A
/// single date means `[d, d]`.
pub fn parse_date_range(raw: &str) -> Result<(DateTime<Utc>, DateTime<Utc>)> {
    match serde_json::from_str::<serde_json::Value>(raw) {
        Ok(serde_json::Value::Array(items)) => match items.as_slice() {
            [from, to] => Ok((date_from_json(from)?, date_from_json(to)?)),
            [single] => {
                let date = date_from_json(single)?;
                Ok((date, date))
            }
            _ => Err(Error::InvalidDate(raw.to_string())),
        },
        Ok(value @ (serde_json::Value::String(_) | serde_json::Value::Number(_))) => {
            let date = date_from_json(&value)?;
            Ok((date, date))
        }
        _ => {
            let date = parse_date(raw)?;
            Ok((date, date))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use DurationPart::{Day, Hour, Millisecond, Minute, Month, Quarter, Second, Week, Year};

    #[test]
    fn test_available_parts() {
        assert_eq!(
            DurationPrecision::default().available_parts(),
            [Day, Hour, Minute, Second]
        );
        assert_eq!(DurationPrecision::single(Hour).available_parts(), [Hour]);
        let all = DurationPrecision {
            min: Millisecond,
            max: Year,
        };
        assert_eq!(all.available_parts().len(), 9);
    }

    #[test]
    fn test_precision_json() {
        assert_eq!(
            DurationPrecision::from_json(r#"["minute", "week"]"#).unwrap(),
            DurationPrecision { min: Minute, max: Week }
        );
        assert_eq!(
            DurationPrecision::from_json(r#""hour""#).unwrap(),
            DurationPrecision::single(Hour)
        );
        assert!(DurationPrecision::from_json(r#""fortnight""#).is_err());
        assert!(matches!(
            "fortnight".parse::<DurationPart>(),
            Err(Error::UnknownDurationPart(_))
        ));
    }

    #[test]
    fn test_split_day_hour_minute_second() {
        let parts = DurationPrecision::default().available_parts();
        let split = split_milliseconds(90_061_000, &parts);
        assert_eq!(split, [(Day, 1), (Hour, 1), (Minute, 1), (Second, 1)]);
    }

    #[test]
    fn test_split_calendar_units() {
        // 1970-01-01 + 400 days = 1971-02-05
        let split = split_milliseconds(400 * 86_400_000, &[Year, Quarter, Month, Day]);
        assert_eq!(split, [(Year, 1), (Quarter, 0), (Month, 1), (Day, 4)]);
    }

    #[test]
    fn test_optimize_from() {
        assert_eq!(optimize_from(0, 90_061_000, Second), 0);
        // A partial second rounds the distance up.
        assert_eq!(2_300 - optimize_from(500, 2_300, Second), 3_000);
        // Counting up from a later start.
        assert_eq!((0 - optimize_from(1_500, 0, Second)).abs(), 2_000);
    }

    #[test]
    fn test_iso8601() {
        assert_eq!(
            iso8601(&[(Day, 1), (Hour, 1), (Minute, 1), (Second, 1)]),
            "P1DT1H1M1S"
        );
        assert_eq!(iso8601(&[(Day, 0), (Second, 0)]), "PT0S");
        assert_eq!(iso8601(&[(Quarter, 1), (Month, 1)]), "P4M");
        assert_eq!(iso8601(&[(Second, 1), (Millisecond, 500)]), "PT1.5S");
    }

    #[test]
    fn test_parse_date_formats() {
        let a = parse_date("2024-01-02T03:04:05Z").unwrap();
        let b = parse_date("2024-01-02 03:04:05").unwrap();
        assert_eq!(a, b);
        let c = parse_date("2024-01-02").unwrap();
        assert_eq!(c.timestamp_millis(), 1_704_153_600_000);
        assert_eq!(parse_date("0").unwrap().timestamp_millis(), 0);
        assert!(matches!(parse_date("yesterday"), Err(Error::InvalidDate(_))));
    }

    #[test]
    fn test_parse_date_range() {
        let (from, to) = parse_date_range(r#"["2024-01-01", "2024-01-02"]"#).unwrap();
        assert_eq!((to - from).num_days(), 1);
        let (from, to) = parse_date_range("2024-01-01").unwrap();
        assert_eq!(from, to);
        let (from, to) = parse_date_range("[0, 1000]").unwrap();
        assert_eq!(to.timestamp_millis() - from.timestamp_millis(), 1000);
        assert!(parse_date_range(r#"["2024-01-01", "nope"]"#).is_err());
    }
}
