//! Plain numeric counter with optional locale formatting.

use super::{CounterFlavor, FlavorContext, ValueChange};
use crate::error::Result;
use crate::locale::{LocaleNumber, NumberFormat, NumberFormatOptions};
use crate::number::NumericValue;
use crate::parts::{PartsOptions, PartsOptionsPatch};

/// Anything a number counter accepts as a value.
#[derive(Clone, Debug, PartialEq)]
pub enum NumberInput {
    /// Attribute text, parsed by the number adapter.
    Text(String),
    Native(f64),
    Value(NumericValue),
}

impl From<&str> for NumberInput {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for NumberInput {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<f64> for NumberInput {
    fn from(value: f64) -> Self {
        Self::Native(value)
    }
}

impl From<i64> for NumberInput {
    fn from(value: i64) -> Self {
        Self::Native(value as f64)
    }
}

impl From<NumericValue> for NumberInput {
    fn from(value: NumericValue) -> Self {
        Self::Value(value)
    }
}

#[derive(Clone, Debug, Default)]
pub struct NumberCounter {
    locale_number: LocaleNumber,
    format: Option<NumberFormat>,
}

impl NumberCounter {
    #[must_use]
    pub fn new(locale_number: LocaleNumber) -> Self {
        Self {
            locale_number,
            format: None,
        }
    }

    #[must_use]
    pub fn locale_number(&self) -> &LocaleNumber {
        &self.locale_number
    }

    pub fn set_locale_number(&mut self, locale_number: LocaleNumber) {
        self.locale_number = locale_number;
    }

    /// Active formatter, when locale formatting is on and prepared.
    #[must_use]
    pub fn number_format(&self) -> Option<&NumberFormat> {
        self.format.as_ref()
    }

    fn coerce(ctx: &FlavorContext<'_>, input: NumberInput) -> NumericValue {
        let na = &ctx.adapters.number;
        match input {
            NumberInput::Text(raw) => na.create(&raw),
            NumberInput::Native(v) => na.from_f64(v),
            // Route through text so the active adapter owns the value.
            NumberInput::Value(v) => na.create(&na.to_string(&v)),
        }
    }
}

impl CounterFlavor for NumberCounter {
    type Input = NumberInput;

    fn prepare(&mut self, ctx: &FlavorContext<'_>) {
        self.format = match &self.locale_number {
            LocaleNumber::Off => None,
            LocaleNumber::On(options) => Some(NumberFormat::new(ctx.locale, options.clone())),
        };
    }

    fn parts_options(&self, _ctx: &FlavorContext<'_>, patch: &PartsOptionsPatch) -> PartsOptions {
        let mut options = PartsOptions::default().with_patch(patch);
        if let Some(format) = &self.format {
            options.decimal_separator = format.decimal_separator().to_string();
        }
        options
    }

    fn convert_initial(&mut self, ctx: &FlavorContext<'_>, input: NumberInput) -> Result<NumericValue> {
        Ok(Self::coerce(ctx, input))
    }

    fn convert_value(&mut self, ctx: &FlavorContext<'_>, input: NumberInput) -> Result<ValueChange> {
        Ok(ValueChange {
            value: Self::coerce(ctx, input),
            old_value: None,
        })
    }

    fn sample_to_string(&self, ctx: &FlavorContext<'_>, value: &NumericValue) -> Result<String> {
        let na = &ctx.adapters.number;
        Ok(match &self.format {
            Some(format) => format.format(na.to_number(value)),
            None => na.to_string(value),
        })
    }
}

impl super::Counter<NumberCounter> {
    /// Turn locale number formatting on or off.
    pub fn set_locale_number(&mut self, locale_number: LocaleNumber) -> Result<()> {
        self.configure(|flavor| flavor.set_locale_number(locale_number))
    }

    /// Enable locale formatting with `options`.
    pub fn format_with(&mut self, options: NumberFormatOptions) -> Result<()> {
        self.set_locale_number(LocaleNumber::On(options))
    }
}

#[cfg(test)]
mod tests {
    use super::super::Counter;
    use super::*;
    use crate::locale::Locale;
    use crate::number::{DecimalConfig, register_decimal};
    use crate::registry::AdapterRegistry;

    fn tails(counter: &Counter<NumberCounter>) -> String {
        counter.parts()[0].tail_text()
    }

    #[test]
    fn test_nine_to_ten() {
        let mut counter = Counter::new(NumberCounter::default());
        counter.set_initial_value(9.0).unwrap();
        counter.set_value(10.0).unwrap();
        counter.connect().unwrap();

        let digits = &counter.parts()[0].digits;
        assert_eq!(digits.len(), 2);
        assert_eq!(digits[0].place, 2);
        assert_eq!(digits[1].place, 1);
        assert_eq!(digits[1].data, ["0", "9"]);
        assert!(counter.transitions()[0].iter().all(|d| d.animate));
    }

    #[test]
    fn test_garbage_text_is_zero() {
        let mut counter = Counter::new(NumberCounter::default());
        counter.set_value("twelve").unwrap();
        counter.connect().unwrap();
        assert_eq!(counter.aria_label(), "0");
    }

    #[test]
    fn test_locale_number_formatting() {
        let mut counter = Counter::new(NumberCounter::new(LocaleNumber::On(Default::default())));
        counter.set_locale(Locale::parse("de-DE")).unwrap();
        counter.set_value(1234.5).unwrap();
        counter.connect().unwrap();

        assert_eq!(counter.parts_options().decimal_separator, ",");
        assert_eq!(tails(&counter), "1.234,5");
        // aria label keeps the plain number
        assert_eq!(counter.aria_label(), "1234.5");
    }

    #[test]
    fn test_toggle_locale_number() {
        let mut counter = Counter::new(NumberCounter::default());
        counter.set_value(1234.0).unwrap();
        counter.connect().unwrap();
        assert_eq!(tails(&counter), "1234");

        counter.format_with(NumberFormatOptions::default()).unwrap();
        assert_eq!(tails(&counter), "1,234");
        assert!(counter.flavor().number_format().is_some());

        counter.set_locale_number(LocaleNumber::Off).unwrap();
        assert_eq!(tails(&counter), "1234");
    }

    #[test]
    fn test_decimal_adapter_counter() {
        let mut registry = AdapterRegistry::new();
        register_decimal(&mut registry, DecimalConfig::default());
        registry.set_number_adapter("decimal.js");

        let mut counter = Counter::with_registry(NumberCounter::default(), &registry);
        counter.set_value("99999999999999999999").unwrap();
        counter.connect().unwrap();
        counter.set_value("100000000000000000000").unwrap();

        assert_eq!(counter.aria_label(), "100000000000000000000");
        assert_eq!(counter.parts()[0].digits.len(), 21);
        assert_eq!(counter.direction(), crate::transition::Direction::Down);
    }
}
