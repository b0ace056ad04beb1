//! Locale-aware number formatting and duration unit labels.
//!
//! A small table-driven subset of what a full i18n library offers: decimal
//! and grouping separators per language (with a few regional overrides) and
//! the display name of every duration unit.

use std::fmt;

use serde::{Deserialize, Deserializer};

use crate::duration::DurationPart;

/// A BCP 47 language tag reduced to language and region.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Locale {
    language: String,
    region: Option<String>,
}

impl Default for Locale {
    fn default() -> Self {
        Self {
            language: "en".to_string(),
            region: Some("US".to_string()),
        }
    }
}

impl Locale {
    /// Parse a tag such as `de-CH` or `zh_Hans_CN`. Script and variant
    /// subtags are ignored; an empty tag is `en-US`.
    #[must_use]
    pub fn parse(tag: &str) -> Self {
        let mut subtags = tag.split(['-', '_']).filter(|s| !s.is_empty());
        let Some(language) = subtags.next() else {
            return Self::default();
        };
        let region = subtags
            .find(|s| (s.len() == 2 && s.chars().all(|c| c.is_ascii_alphabetic())) || (s.len() == 3 && s.chars().all(|c| c.is_ascii_digit())))
            .map(str::to_ascii_uppercase);
        Self {
            language: language.to_ascii_lowercase(),
            region,
        }
    }

    /// Parse the `locale` attribute: a bare tag, or JSON `"tag"` /
    /// `["tag", {"region": "XX"}]`.
    #[must_use]
    pub fn from_attribute(raw: &str) -> Self {
        serde_json::from_str(raw).unwrap_or_else(|_| Self::parse(raw))
    }

    #[must_use]
    pub fn language(&self) -> &str {
        &self.language
    }

    #[must_use]
    pub fn region(&self) -> Option<&str> {
        self.region.as_deref()
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.region {
            Some(region) => write!(f, "{}-{region}", self.language),
            None => f.write_str(&self.language),
        }
    }
}

impl<'de> Deserialize<'de> for Locale {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        struct LocaleOptions {
            region: Option<String>,
        }

        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Tag(String),
            WithOptions(String, LocaleOptions),
        }

        Ok(match Raw::deserialize(deserializer)? {
            Raw::Tag(tag) => Self::parse(&tag),
            Raw::WithOptions(tag, options) => {
                let mut locale = Self::parse(&tag);
                if let Some(region) = options.region {
                    locale.region = Some(region.to_ascii_uppercase());
                }
                locale
            }
        })
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Grouping {
    /// Groups of three.
    Standard,
    /// Three, then groups of two (`12,34,567`).
    Indian,
}

struct Symbols {
    decimal: &'static str,
    group: &'static str,
    grouping: Grouping,
}

fn symbols(locale: &Locale) -> Symbols {
    let standard = |decimal, group| Symbols {
        decimal,
        group,
        grouping: Grouping::Standard,
    };
    match (locale.language(), locale.region()) {
        ("de" | "it", Some("CH" | "LI")) => standard(".", "\u{2019}"),
        ("es", Some("MX" | "US")) => standard(".", ","),
        ("en" | "hi" | "bn", Some("IN")) | ("hi" | "bn", _) => Symbols {
            decimal: ".",
            group: ",",
            grouping: Grouping::Indian,
        },
        ("fr", _) => standard(",", "\u{202F}"),
        ("de" | "es" | "it" | "nl" | "pt" | "id" | "tr" | "da" | "el" | "ro" | "hr" | "sl" | "sr" | "vi", _) => {
            standard(",", ".")
        }
        ("ru" | "uk" | "pl" | "cs" | "sk" | "sv" | "fi" | "nb" | "no" | "hu" | "bg" | "lt" | "lv" | "et", _) => {
            standard(",", "\u{A0}")
        }
        _ => standard(".", ","),
    }
}

/// Subset of `Intl.NumberFormat` options.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NumberFormatOptions {
    pub use_grouping: bool,
    pub minimum_integer_digits: usize,
    pub minimum_fraction_digits: usize,
    pub maximum_fraction_digits: usize,
}

impl Default for NumberFormatOptions {
    fn default() -> Self {
        Self {
            use_grouping: true,
            minimum_integer_digits: 1,
            minimum_fraction_digits: 0,
            maximum_fraction_digits: 3,
        }
    }
}

/// The `locale-number` setting of a number counter.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum LocaleNumber {
    #[default]
    Off,
    On(NumberFormatOptions),
}

impl LocaleNumber {
    /// `None` and `false` disable formatting, `true` or anything that is
    /// not an options object enables it with defaults.
    #[must_use]
    pub fn from_attribute(raw: Option<&str>) -> Self {
        let Some(raw) = raw else {
            return Self::Off;
        };
        match serde_json::from_str::<serde_json::Value>(raw) {
            Ok(serde_json::Value::Bool(false)) => Self::Off,
            Ok(value @ serde_json::Value::Object(_)) => {
                Self::On(serde_json::from_value(value).unwrap_or_default())
            }
            _ => Self::On(NumberFormatOptions::default()),
        }
    }

    #[must_use]
    pub fn is_on(&self) -> bool {
        matches!(self, Self::On(_))
    }
}

/// Formats native numbers for a locale.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NumberFormat {
    decimal: &'static str,
    group: &'static str,
    grouping: Grouping,
    options: NumberFormatOptions,
}

impl NumberFormat {
    #[must_use]
    pub fn new(locale: &Locale, options: NumberFormatOptions) -> Self {
        let symbols = symbols(locale);
        Self {
            decimal: symbols.decimal,
            group: symbols.group,
            grouping: symbols.grouping,
            options,
        }
    }

    #[must_use]
    pub fn decimal_separator(&self) -> &str {
        self.decimal
    }

    /// Empty when grouping is disabled.
    #[must_use]
    pub fn group_separator(&self) -> &str {
        if self.options.use_grouping { self.group } else { "" }
    }

    #[must_use]
    pub fn format(&self, value: f64) -> String {
        if value.is_nan() {
            return "NaN".to_string();
        }
        let sign = if value.is_sign_negative() && value != 0.0 { "-" } else { "" };
        if value.is_infinite() {
            return format!("{sign}\u{221E}");
        }

        let max = self.options.maximum_fraction_digits.max(self.options.minimum_fraction_digits);
        let fixed = format!("{:.*}", max, value.abs());
        let (integer, fraction) = fixed.split_once('.').unwrap_or((fixed.as_str(), ""));

        let mut fraction = fraction.to_string();
        while fraction.len() > self.options.minimum_fraction_digits && fraction.ends_with('0') {
            fraction.pop();
        }

        let width = self.options.minimum_integer_digits.max(1);
        let integer = format!("{integer:0>width$}");
        let integer = if self.options.use_grouping {
            self.group_digits(&integer)
        } else {
            integer
        };

        if fraction.is_empty() {
            format!("{sign}{integer}")
        } else {
            format!("{sign}{integer}{}{fraction}", self.decimal)
        }
    }

    fn group_digits(&self, digits: &str) -> String {
        let mut groups = Vec::new();
        let mut rest = digits;
        let mut size = 3;
        while rest.len() > size {
            let (head, tail) = rest.split_at(rest.len() - size);
            groups.push(tail);
            rest = head;
            if self.grouping == Grouping::Indian {
                size = 2;
            }
        }
        groups.push(rest);
        groups.reverse();
        groups.join(self.group)
    }
}

/// Display name of a duration unit.
#[must_use]
pub fn unit_label(locale: &Locale, part: DurationPart) -> &'static str {
    use DurationPart::{Day, Hour, Millisecond, Minute, Month, Quarter, Second, Week, Year};

    let table: [&'static str; 9] = match locale.language() {
        "de" => ["Jahr", "Quartal", "Monat", "Woche", "Tag", "Stunde", "Minute", "Sekunde", "Millisekunde"],
        "fr" => ["année", "trimestre", "mois", "semaine", "jour", "heure", "minute", "seconde", "milliseconde"],
        "es" => ["año", "trimestre", "mes", "semana", "día", "hora", "minuto", "segundo", "milisegundo"],
        "it" => ["anno", "trimestre", "mese", "settimana", "giorno", "ora", "minuto", "secondo", "millisecondo"],
        "pt" => ["ano", "trimestre", "mês", "semana", "dia", "hora", "minuto", "segundo", "milissegundo"],
        "ru" => ["год", "квартал", "месяц", "неделя", "день", "час", "минута", "секунда", "миллисекунда"],
        "ja" => ["年", "四半期", "月", "週", "日", "時", "分", "秒", "ミリ秒"],
        "zh" => ["年", "季度", "月", "周", "日", "小时", "分钟", "秒", "毫秒"],
        "ko" => ["년", "분기", "월", "주", "일", "시", "분", "초", "밀리초"],
        _ => ["year", "quarter", "month", "week", "day", "hour", "minute", "second", "millisecond"],
    };
    let index = match part {
        Year => 0,
        Quarter => 1,
        Month => 2,
        Week => 3,
        Day => 4,
        Hour => 5,
        Minute => 6,
        Second => 7,
        Millisecond => 8,
    };
    table[index]
}

/// Labels for `parts`, in order.
#[must_use]
pub fn unit_labels(locale: &Locale, parts: &[DurationPart]) -> Vec<String> {
    parts
        .iter()
        .map(|&part| unit_label(locale, part).to_string())
        .collect()
}
