//! Positional numeral conversion between arbitrary digit alphabets.
//!
//! The string counter encodes text as a numeral over an [`Alphabet`] built
//! from the old and new text, converts it to base 10 so the numeric sampler
//! can interpolate it, then maps every sample back.
//!
//! # Examples
//!
//! ```
//! use rolling_counter::anybase::{DEC, HEX, convert};
//!
//! let dec: Vec<&str> = DEC.split("").filter(|s| !s.is_empty()).collect();
//! let hex: Vec<&str> = HEX.split("").filter(|s| !s.is_empty()).collect();
//! assert_eq!(convert(&dec, &hex, &["2", "5", "5"]).unwrap(), "ff");
//! ```

use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;

use crate::error::{Error, Result};
use crate::unicode::StringAdapter;

pub const BIN: &str = "01";
pub const OCT: &str = "01234567";
pub const DEC: &str = "0123456789";
pub const HEX: &str = "0123456789abcdef";

/// Lowest-ordered unit of every [`Alphabet`]; it plays the role of zero.
pub const SENTINEL: &str = "\0";

fn join<S: AsRef<str>>(units: &[S]) -> String {
    units.iter().map(AsRef::as_ref).collect()
}

/// Re-express `number`, a big-endian numeral over `src`, as a numeral over
/// `dst`.
///
/// Fails if a unit of `number` is missing from `src`. Identical alphabets
/// return the input unchanged. An empty numeral converts to the zero digit
/// of `dst`.
pub fn convert<S, D, N>(src: &[S], dst: &[D], number: &[N]) -> Result<String>
where
    S: AsRef<str>,
    D: AsRef<str>,
    N: AsRef<str>,
{
    let mut index: HashMap<&str, usize> = HashMap::with_capacity(src.len());
    for (i, unit) in src.iter().enumerate() {
        index.entry(unit.as_ref()).or_insert(i);
    }

    let mut digits = Vec::with_capacity(number.len());
    for unit in number {
        match index.get(unit.as_ref()) {
            Some(&digit) => digits.push(digit),
            None => {
                return Err(Error::NotInAlphabet {
                    input: join(number),
                    alphabet: join(src),
                });
            }
        }
    }

    let identical = src.len() == dst.len()
        && src.iter().zip(dst).all(|(a, b)| a.as_ref() == b.as_ref());
    if identical {
        return Ok(join(number));
    }
    if dst.len() < 2 {
        return Err(Error::InvalidAlphabet { len: dst.len() });
    }

    let from_base = src.len();
    let to_base = dst.len();
    let mut length = digits.len();
    let mut result: Vec<&str> = Vec::new();

    // Repeated long division of the source numeral by the target base.
    loop {
        let mut divide = 0usize;
        let mut new_len = 0usize;
        for i in 0..length {
            divide = divide * from_base + digits[i];
            if divide >= to_base {
                digits[new_len] = divide / to_base;
                new_len += 1;
                divide %= to_base;
            } else if new_len > 0 {
                digits[new_len] = 0;
                new_len += 1;
            }
        }
        length = new_len;
        result.push(dst[divide].as_ref());
        if new_len == 0 {
            break;
        }
    }

    result.reverse();
    Ok(result.concat())
}

/// A reusable converter between two alphabets, split by a string adapter.
#[derive(Clone, Debug)]
pub struct AnyBase {
    strings: Arc<dyn StringAdapter>,
    src: Vec<String>,
    dst: Vec<String>,
}

impl AnyBase {
    #[must_use]
    pub fn new(strings: Arc<dyn StringAdapter>, src: &str, dst: &str) -> Self {
        let src = strings.string_to_chars(src);
        let dst = strings.string_to_chars(dst);
        Self { strings, src, dst }
    }

    /// Build a converter from alphabets that are already split into units.
    #[must_use]
    pub fn from_units(strings: Arc<dyn StringAdapter>, src: Vec<String>, dst: Vec<String>) -> Self {
        Self { strings, src, dst }
    }

    /// Convert a numeral written over the source alphabet.
    pub fn convert(&self, number: &str) -> Result<String> {
        convert(&self.src, &self.dst, &self.strings.string_to_chars(number))
    }
}

/// Ordered, deduplicated character units of a value and its predecessor.
#[derive(Clone, Debug)]
pub struct Alphabet {
    units: Vec<String>,
    to_decimal: AnyBase,
    from_decimal: AnyBase,
}

impl Alphabet {
    /// Build the alphabet for a transition from `old` to `new`.
    ///
    /// Both empty yields an empty alphabet. Otherwise [`SENTINEL`] is
    /// included so the alphabet always has at least two units once any text
    /// exists and no real unit ever sits in the zero position.
    #[must_use]
    pub fn from_values(strings: Arc<dyn StringAdapter>, new: &str, old: &str) -> Self {
        let units: Vec<String> = if new.is_empty() && old.is_empty() {
            Vec::new()
        } else {
            let all = format!("{SENTINEL}{old}{new}");
            let set: BTreeSet<String> = strings.string_to_chars(&all).into_iter().collect();
            set.into_iter().collect()
        };
        let dec: Vec<String> = DEC.chars().map(String::from).collect();
        Self {
            to_decimal: AnyBase::from_units(Arc::clone(&strings), units.clone(), dec.clone()),
            from_decimal: AnyBase::from_units(strings, dec, units.clone()),
            units,
        }
    }

    #[must_use]
    pub fn units(&self) -> &[String] {
        &self.units
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.units.len()
    }

    /// Encode text as a base-10 numeral.
    pub fn to_decimal(&self, text: &str) -> Result<String> {
        self.to_decimal.convert(text)
    }

    /// Decode a base-10 numeral back into text.
    pub fn from_decimal(&self, digits: &str) -> Result<String> {
        self.from_decimal.convert(digits)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::unicode::{CharAdapter, SegmenterAdapter};

    fn units(s: &str) -> Vec<String> {
        CharAdapter.string_to_chars(s)
    }

    #[test]
    fn test_decimal_to_binary_and_hex() {
        assert_eq!(convert(&units(DEC), &units(BIN), &units("10")).unwrap(), "1010");
        assert_eq!(convert(&units(DEC), &units(HEX), &units("255")).unwrap(), "ff");
        assert_eq!(convert(&units(HEX), &units(OCT), &units("ff")).unwrap(), "377");
    }

    #[test]
    fn test_zero_and_empty() {
        assert_eq!(convert(&units(DEC), &units(BIN), &units("0")).unwrap(), "0");
        assert_eq!(convert(&units(DEC), &units(BIN), &units("")).unwrap(), "0");
    }

    #[test]
    fn test_leading_zeros_are_dropped() {
        assert_eq!(convert(&units(DEC), &units(HEX), &units("0016")).unwrap(), "10");
    }

    #[test]
    fn test_identical_alphabets_skip_arithmetic() {
        assert_eq!(convert(&units(DEC), &units(DEC), &units("0042")).unwrap(), "0042");
    }

    #[test]
    fn test_unknown_unit_fails() {
        let err = convert(&units(BIN), &units(DEC), &units("102")).unwrap_err();
        assert!(matches!(err, Error::NotInAlphabet { .. }));
        // Validation runs even when the alphabets match.
        assert!(convert(&units(BIN), &units(BIN), &units("2")).is_err());
    }

    #[test]
    fn test_single_unit_target_is_rejected() {
        let err = convert(&units(DEC), &units("x"), &units("5")).unwrap_err();
        assert!(matches!(err, Error::InvalidAlphabet { len: 1 }));
    }

    #[test]
    fn test_alphabet_includes_sentinel() {
        let alphabet = Alphabet::from_values(Arc::new(CharAdapter), "abc", "ab");
        assert_eq!(alphabet.units(), &["\0", "a", "b", "c"]);
        assert_eq!(alphabet.to_decimal("ab").unwrap(), "6");
        assert_eq!(alphabet.to_decimal("abc").unwrap(), "27");
        assert_eq!(alphabet.from_decimal("27").unwrap(), "abc");
    }

    #[test]
    fn test_empty_alphabet() {
        let alphabet = Alphabet::from_values(Arc::new(CharAdapter), "", "");
        assert!(alphabet.is_empty());
    }

    #[test]
    fn test_alphabet_over_graphemes() {
        let alphabet = Alphabet::from_values(Arc::new(SegmenterAdapter), "👍🏽🎉", "🎉");
        assert_eq!(alphabet.len(), 3);
        let encoded = alphabet.to_decimal("👍🏽🎉").unwrap();
        assert_eq!(alphabet.from_decimal(&encoded).unwrap(), "👍🏽🎉");
    }
}
