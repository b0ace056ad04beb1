//! Countdown/count-up between two instants, one part per duration unit.

use chrono::{DateTime, Utc};

use super::{Counter, CounterFlavor, FlavorContext, ValueChange};
use crate::duration::{
    DurationPart, DurationPrecision, duration_milliseconds, iso8601, parse_date_range,
    split_milliseconds,
};
use crate::error::Result;
use crate::locale::unit_labels;
use crate::number::NumericValue;

/// Anything a duration counter accepts as a value.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DurationInput {
    /// A date, or a JSON `[from, to]` pair.
    Text(String),
    Range(DateTime<Utc>, DateTime<Utc>),
    /// A single instant, i.e. a zero duration.
    At(DateTime<Utc>),
}

impl From<&str> for DurationInput {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for DurationInput {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<(DateTime<Utc>, DateTime<Utc>)> for DurationInput {
    fn from((from, to): (DateTime<Utc>, DateTime<Utc>)) -> Self {
        Self::Range(from, to)
    }
}

impl From<DateTime<Utc>> for DurationInput {
    fn from(value: DateTime<Utc>) -> Self {
        Self::At(value)
    }
}

#[derive(Clone, Debug, Default)]
pub struct DurationCounter {
    precision: DurationPrecision,
    milliseconds: i64,
}

impl DurationCounter {
    #[must_use]
    pub fn new(precision: DurationPrecision) -> Self {
        Self {
            precision,
            milliseconds: 0,
        }
    }

    #[must_use]
    pub fn precision(&self) -> DurationPrecision {
        self.precision
    }

    pub fn set_precision(&mut self, precision: DurationPrecision) {
        self.precision = precision;
    }

    /// Units shown, largest first.
    #[must_use]
    pub fn available_parts(&self) -> Vec<DurationPart> {
        self.precision.available_parts()
    }

    /// Length of the current duration after precision rounding.
    #[must_use]
    pub fn milliseconds(&self) -> i64 {
        self.milliseconds
    }

    fn measure(&self, input: DurationInput) -> Result<i64> {
        let (from, to) = match input {
            DurationInput::Text(raw) => parse_date_range(&raw)?,
            DurationInput::Range(from, to) => (from, to),
            DurationInput::At(at) => (at, at),
        };
        Ok(duration_milliseconds(from, to, self.precision.min))
    }
}

impl CounterFlavor for DurationCounter {
    type Input = DurationInput;

    fn role(&self) -> Option<&'static str> {
        Some("timer")
    }

    fn convert_initial(&mut self, ctx: &FlavorContext<'_>, input: DurationInput) -> Result<NumericValue> {
        let ms = self.measure(input)?;
        Ok(ctx.adapters.number.from_f64(ms as f64))
    }

    fn convert_value(&mut self, ctx: &FlavorContext<'_>, input: DurationInput) -> Result<ValueChange> {
        self.milliseconds = self.measure(input)?;
        Ok(ValueChange {
            value: ctx.adapters.number.from_f64(self.milliseconds as f64),
            old_value: None,
        })
    }

    /// One part per available unit, each sample split calendar-aware.
    fn sample_split(&self, ctx: &FlavorContext<'_>, samples: Vec<NumericValue>) -> Vec<Vec<NumericValue>> {
        let na = &ctx.adapters.number;
        let units = self.available_parts();
        let mut parts: Vec<Vec<NumericValue>> = vec![Vec::with_capacity(samples.len()); units.len()];
        for sample in &samples {
            let ms = na.to_number(sample).round() as i64;
            for (part, (_, value)) in parts.iter_mut().zip(split_milliseconds(ms, &units)) {
                part.push(na.from_f64(value as f64));
            }
        }
        parts
    }

    fn aria_label(&self, _ctx: &FlavorContext<'_>, _value: &NumericValue) -> String {
        iso8601(&split_milliseconds(self.milliseconds, &self.available_parts()))
    }

    fn part_labels(&self, ctx: &FlavorContext<'_>) -> Vec<String> {
        unit_labels(ctx.locale, &self.available_parts())
    }
}

impl Counter<DurationCounter> {
    /// Change the units shown. The current value keeps the rounding it was
    /// set with; the frame is rebuilt with the new units.
    pub fn set_precision(&mut self, precision: DurationPrecision) -> Result<()> {
        self.configure(|flavor| flavor.set_precision(precision))
    }

    /// Set precision from the `precision` attribute (`"hour"` or
    /// `["second", "day"]`).
    pub fn set_precision_json(&mut self, json: &str) -> Result<()> {
        let raw = super::parse_json_string(json);
        self.set_precision(serde_json::from_value(raw)?)
    }
}
