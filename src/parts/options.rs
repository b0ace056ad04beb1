//! Builder configuration and its JSON patch form.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Whether sample text is split into integer and fractional halves.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueKind {
    #[default]
    Number,
    /// Text counters: no fractional split regardless of separator.
    String,
}

/// Minimum padded place counts for the integer and fractional halves.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct MinPlaces {
    pub integer: usize,
    pub fraction: usize,
}

impl Default for MinPlaces {
    fn default() -> Self {
        Self {
            integer: 1,
            fraction: 0,
        }
    }
}

/// Glyph substitution applied to every raw column unit.
pub type DigitToChar = BTreeMap<String, String>;

/// `digitToChar` as written in JSON: a list where entry `i` replaces digit
/// `i`, or an explicit map.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum DigitToCharSpec {
    List(Vec<String>),
    Map(BTreeMap<String, String>),
}

impl DigitToCharSpec {
    /// Flatten into a lookup map. List index `i` is keyed by the character
    /// with code point `48 + i`, so indices 0..=9 map the ASCII digits.
    #[must_use]
    pub fn into_map(self) -> DigitToChar {
        match self {
            Self::Map(map) => map,
            Self::List(list) => list
                .into_iter()
                .enumerate()
                .filter_map(|(i, glyph)| {
                    let code = u32::try_from(i).ok()?.checked_add(48)?;
                    char::from_u32(code).map(|c| (c.to_string(), glyph))
                })
                .collect(),
        }
    }
}

/// Configuration consumed by the part builder.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PartsOptions {
    /// Interpolation frames per transition.
    pub sample_count: usize,
    pub digit_to_char: DigitToChar,
    /// Marker between integer and fractional halves. Empty disables the
    /// split.
    pub decimal_separator: String,
    pub min_places: MinPlaces,
    /// Pad glyph for missing places.
    pub fill_char: String,
    pub kind: ValueKind,
}

impl Default for PartsOptions {
    fn default() -> Self {
        Self {
            sample_count: 16,
            digit_to_char: DigitToChar::new(),
            decimal_separator: ".".to_string(),
            min_places: MinPlaces::default(),
            fill_char: "0".to_string(),
            kind: ValueKind::Number,
        }
    }
}

impl PartsOptions {
    /// Overlay `patch` on these options. Present fields replace the current
    /// ones wholesale; a missing `minPlaces` entry falls back to `[1, 0]`.
    #[must_use]
    pub fn with_patch(&self, patch: &PartsOptionsPatch) -> Self {
        let defaults = MinPlaces::default();
        Self {
            sample_count: patch.sample_count.unwrap_or(self.sample_count),
            digit_to_char: patch
                .digit_to_char
                .clone()
                .map_or_else(|| self.digit_to_char.clone(), DigitToCharSpec::into_map),
            decimal_separator: patch
                .decimal_separator
                .clone()
                .unwrap_or_else(|| self.decimal_separator.clone()),
            min_places: patch.min_places.as_ref().map_or(self.min_places, |places| MinPlaces {
                integer: places.first().copied().flatten().unwrap_or(defaults.integer),
                fraction: places.get(1).copied().flatten().unwrap_or(defaults.fraction),
            }),
            fill_char: patch
                .fill_char
                .clone()
                .unwrap_or_else(|| self.fill_char.clone()),
            kind: patch.kind.unwrap_or(self.kind),
        }
    }
}

/// Partial [`PartsOptions`], as accepted from the `parts-options`
/// attribute.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PartsOptionsPatch {
    pub sample_count: Option<usize>,
    pub digit_to_char: Option<DigitToCharSpec>,
    pub decimal_separator: Option<String>,
    pub min_places: Option<Vec<Option<usize>>>,
    pub fill_char: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<ValueKind>,
}

impl PartsOptionsPatch {
    /// Parse a JSON object.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let options = PartsOptions::default();
        assert_eq!(options.sample_count, 16);
        assert_eq!(options.decimal_separator, ".");
        assert_eq!(options.fill_char, "0");
        assert_eq!(options.min_places, MinPlaces { integer: 1, fraction: 0 });
        assert_eq!(options.kind, ValueKind::Number);
    }

    #[test]
    fn test_patch_from_json() {
        let patch = PartsOptionsPatch::from_json(
            r#"{"sampleCount": 4, "decimalSeparator": ",", "minPlaces": [3], "type": "string"}"#,
        )
        .unwrap();
        let options = PartsOptions::default().with_patch(&patch);
        assert_eq!(options.sample_count, 4);
        assert_eq!(options.decimal_separator, ",");
        assert_eq!(options.min_places, MinPlaces { integer: 3, fraction: 0 });
        assert_eq!(options.kind, ValueKind::String);
        assert_eq!(options.fill_char, "0");
    }

    #[test]
    fn test_digit_to_char_list() {
        let patch = PartsOptionsPatch::from_json(r#"{"digitToChar": ["零", "一", "二"]}"#).unwrap();
        let options = PartsOptions::default().with_patch(&patch);
        assert_eq!(options.digit_to_char.get("1").map(String::as_str), Some("一"));
        assert_eq!(options.digit_to_char.len(), 3);
    }

    #[test]
    fn test_digit_to_char_map() {
        let patch = PartsOptionsPatch::from_json(r#"{"digitToChar": {"7": "🍀"}}"#).unwrap();
        let options = PartsOptions::default().with_patch(&patch);
        assert_eq!(options.digit_to_char.get("7").map(String::as_str), Some("🍀"));
    }

    #[test]
    fn test_invalid_json_is_error() {
        assert!(PartsOptionsPatch::from_json("{sampleCount").is_err());
        assert!(PartsOptionsPatch::from_json("{}").unwrap().is_empty());
    }
}
