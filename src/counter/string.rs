//! Text counter: rolls between arbitrary strings.
//!
//! Both texts are read as numerals over an alphabet made of their own
//! units, so the numeric pipeline can sample between them. The alphabet is
//! rebuilt on every change from the old and the new text.

use std::sync::Arc;

use super::{CounterFlavor, FlavorContext, Seed, ValueChange};
use crate::anybase::Alphabet;
use crate::error::{Error, Result};
use crate::number::NumericValue;
use crate::parts::{DigitToChar, PartsOptions, PartsOptionsPatch, ValueKind};
use crate::unicode::StringAdapter;

const NBSP: &str = "\u{A0}";

#[derive(Clone, Debug, Default)]
pub struct StringCounter {
    alphabet: Option<Alphabet>,
    text: String,
    initial_text: String,
}

impl StringCounter {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Units of the current alphabet, sentinel first.
    #[must_use]
    pub fn alphabet(&self) -> &[String] {
        self.alphabet.as_ref().map(Alphabet::units).unwrap_or_default()
    }

    /// The text currently shown.
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    fn rebuild_alphabet(&mut self, strings: &Arc<dyn StringAdapter>, new: &str, old: &str) {
        let alphabet = Alphabet::from_values(Arc::clone(strings), new, old);
        tracing::debug!(units = alphabet.len(), "alphabet rebuilt");
        self.alphabet = Some(alphabet);
    }

    fn encode(&self, ctx: &FlavorContext<'_>, text: &str) -> Result<NumericValue> {
        let na = &ctx.adapters.number;
        match &self.alphabet {
            Some(alphabet) if !text.is_empty() && alphabet.len() >= 2 => {
                let digits = alphabet.to_decimal(text)?;
                let value = na.create(&digits);
                if na.to_string(&value) != digits {
                    return Err(Error::PrecisionLoss { digits });
                }
                Ok(value)
            }
            _ => Ok(na.from_f64(0.0)),
        }
    }
}

impl CounterFlavor for StringCounter {
    type Input = String;

    /// Text defaults: no fractional split, non-breaking space padding and
    /// spaces shown as non-breaking spaces.
    fn parts_options(&self, _ctx: &FlavorContext<'_>, patch: &PartsOptionsPatch) -> PartsOptions {
        let mut digit_to_char = DigitToChar::new();
        digit_to_char.insert(" ".to_string(), NBSP.to_string());
        let defaults = PartsOptions {
            kind: ValueKind::String,
            fill_char: NBSP.to_string(),
            ..PartsOptions::default()
        };
        let mut options = defaults.with_patch(patch);
        digit_to_char.extend(options.digit_to_char);
        options.digit_to_char = digit_to_char;
        options
    }

    fn convert_initial(&mut self, ctx: &FlavorContext<'_>, input: String) -> Result<NumericValue> {
        self.initial_text = input;
        self.encode(ctx, &self.initial_text)
    }

    fn convert_value(&mut self, ctx: &FlavorContext<'_>, input: String) -> Result<ValueChange> {
        let na = &ctx.adapters.number;
        if input == self.text {
            let value = self.encode(ctx, &input)?;
            return Ok(ValueChange {
                old_value: Some(value.clone()),
                value,
            });
        }
        let old_text = std::mem::replace(&mut self.text, input);
        if self.text.is_empty() {
            return Ok(ValueChange {
                value: na.from_f64(0.0),
                old_value: None,
            });
        }
        let new_text = self.text.clone();
        let previous = self.alphabet.take();
        self.rebuild_alphabet(&ctx.adapters.strings, &new_text, &old_text);
        let encoded = self
            .encode(ctx, &old_text)
            .and_then(|old| Ok((old, self.encode(ctx, &new_text)?)));
        match encoded {
            Ok((old, value)) => Ok(ValueChange {
                old_value: Some(old),
                value,
            }),
            Err(err) => {
                // keep showing the last text that could be encoded
                self.alphabet = previous;
                self.text = old_text;
                Err(err)
            }
        }
    }

    /// The alphabet covers both texts, so the first frame can roll from the
    /// initial text.
    fn connect(
        &mut self,
        ctx: &FlavorContext<'_>,
        initial: Option<String>,
        value: Option<String>,
    ) -> Result<Seed> {
        self.text = value.unwrap_or_default();
        self.initial_text = initial.clone().unwrap_or_default();
        let (text, initial_text) = (self.text.clone(), self.initial_text.clone());
        self.rebuild_alphabet(&ctx.adapters.strings, &text, &initial_text);
        Ok(Seed {
            initial_value: initial.map(|text| self.encode(ctx, &text)).transpose()?,
            value: self.encode(ctx, &text)?,
        })
    }

    fn sample_to_string(&self, ctx: &FlavorContext<'_>, value: &NumericValue) -> Result<String> {
        match &self.alphabet {
            Some(alphabet) if alphabet.len() >= 2 => {
                alphabet.from_decimal(&ctx.adapters.number.to_string(value))
            }
            _ => Ok(String::new()),
        }
    }

    fn aria_label(&self, _ctx: &FlavorContext<'_>, _value: &NumericValue) -> String {
        self.text.clone()
    }
}
