//! Inline styles and the text-colour overlay.
//!
//! [`Style`] is a small CSS declaration block. [`color_overlay`] turns the
//! counter's text colour into one style per rendered element: a plain
//! `color` for CSS colours, or a gradient/image clipped to the glyphs and
//! positioned so one continuous image spans the whole counter.
//!
//! # Examples
//!
//! ```
//! use rolling_counter::style::Style;
//!
//! let base = Style::new().with("fontSize", "2em");
//! let combined = base.merge(&Style::new().with("color", "red"));
//! assert_eq!(combined.to_css(), "color: red; font-size: 2em");
//! ```

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::color::TextColor;
use crate::error::{Error, Result};
use crate::event::{LogLevel, emit_log};
use crate::parts::PartData;

/// Part id of the prefix slot.
pub const PREFIX_PART_ID: i64 = -1;
/// Part id of the suffix slot.
pub const SUFFIX_PART_ID: i64 = -2;

/// CSS declarations keyed by property name.
///
/// Keys may be camelCase (`fontSize`) or kebab-case (`font-size`);
/// [`Style::to_css`] emits kebab-case.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Style(BTreeMap<String, String>);

impl Style {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a declaration, builder style.
    #[must_use]
    pub fn with(mut self, property: impl Into<String>, value: impl Into<String>) -> Self {
        self.set(property, value);
        self
    }

    pub fn set(&mut self, property: impl Into<String>, value: impl Into<String>) {
        self.0.insert(property.into(), value.into());
    }

    #[must_use]
    pub fn get(&self, property: &str) -> Option<&str> {
        self.0.get(property).map(String::as_str)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Overlay `other` onto this style; `other` wins on conflicts.
    #[must_use]
    pub fn merge(&self, other: &Self) -> Self {
        let mut merged = self.clone();
        merged.extend_from(other);
        merged
    }

    pub fn extend_from(&mut self, other: &Self) {
        self.0
            .extend(other.0.iter().map(|(k, v)| (k.clone(), v.clone())));
    }

    /// Render as an inline `style` attribute value.
    #[must_use]
    pub fn to_css(&self) -> String {
        let mut declarations: Vec<String> = self
            .0
            .iter()
            .map(|(k, v)| format!("{}: {v}", kebab_case(k)))
            .collect();
        declarations.sort();
        declarations.join("; ")
    }
}

fn kebab_case(property: &str) -> String {
    if property.contains('-') {
        return property.to_string();
    }
    let mut out = String::with_capacity(property.len() + 4);
    for c in property.chars() {
        if c.is_ascii_uppercase() {
            out.push('-');
            out.push(c.to_ascii_lowercase());
        } else {
            out.push(c);
        }
    }
    out
}

fn px(value: f64) -> String {
    if value == 0.0 {
        "0px".to_string()
    } else {
        format!("{value}px")
    }
}

/// Size of the element holding every rolling column.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ContainerRect {
    pub width: f64,
    pub height: f64,
}

/// A rendered column wrapper (or the prefix/suffix slot) and its offset
/// inside the container.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ElementBox {
    /// `data-part-id`; [`PREFIX_PART_ID`] and [`SUFFIX_PART_ID`] mark the
    /// slots.
    pub part_id: Option<i64>,
    /// `data-digit-id`.
    pub digit_id: Option<i64>,
    pub offset_left: f64,
    pub offset_top: f64,
}

/// Colour styles keyed by `(part id, digit id)`.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ColorStyles {
    styles: BTreeMap<(i64, i64), Style>,
}

impl ColorStyles {
    #[must_use]
    pub fn get(&self, part_id: i64, digit_id: i64) -> Option<&Style> {
        self.styles.get(&(part_id, digit_id))
    }

    #[must_use]
    pub fn prefix(&self) -> Option<&Style> {
        self.get(PREFIX_PART_ID, 0)
    }

    #[must_use]
    pub fn suffix(&self) -> Option<&Style> {
        self.get(SUFFIX_PART_ID, 0)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.styles.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.styles.is_empty()
    }

    /// Digit-shaped matrix for `parts`; columns without an element get an
    /// empty style.
    #[must_use]
    pub fn digit_matrix(&self, parts: &[PartData]) -> Vec<Vec<Style>> {
        parts
            .iter()
            .enumerate()
            .map(|(i, part)| {
                (0..part.digits.len())
                    .map(|j| {
                        let key = (i64::try_from(i).unwrap_or(i64::MAX), i64::try_from(j).unwrap_or(i64::MAX));
                        self.styles.get(&key).cloned().unwrap_or_default()
                    })
                    .collect()
            })
            .collect()
    }
}

fn overlay_style(color: &TextColor, container: ContainerRect, element: &ElementBox) -> Style {
    match color {
        TextColor::Color(value) => Style::new().with("color", value.as_str()),
        TextColor::Image(image) => Style::new()
            .with("background-image", image.as_str())
            .with("background-clip", "text")
            .with(
                "background-size",
                format!("{} {}", px(container.width), px(container.height)),
            )
            .with("background-position-x", px(-element.offset_left))
            .with("background-position-y", px(-element.offset_top))
            .with("background-repeat", "no-repeat")
            .with("color", "transparent")
            .with("-webkit-text-fill-color", "transparent"),
        TextColor::Unsupported(_) => Style::new(),
    }
}

/// Compute the text-colour style of every element.
///
/// Returns `Ok(None)` while the container has not been measured yet; the
/// caller retries once layout settles. Elements without ids are a rendering
/// bug and fail.
pub fn color_overlay(
    color: &str,
    container: Option<ContainerRect>,
    elements: &[ElementBox],
) -> Result<Option<ColorStyles>> {
    let Some(container) = container else {
        return Ok(None);
    };

    let text_color = TextColor::classify(color);
    if let TextColor::Unsupported(value) = &text_color {
        emit_log(
            LogLevel::Warn,
            &format!("the text colour {value:?} is neither a CSS colour nor an image"),
        );
    }

    let mut styles = BTreeMap::new();
    for element in elements {
        let part_id = element.part_id.ok_or(Error::MissingDataAttribute {
            attribute: "data-part-id",
        })?;
        let digit_id = element.digit_id.ok_or(Error::MissingDataAttribute {
            attribute: "data-digit-id",
        })?;
        styles.insert(
            (part_id, digit_id),
            overlay_style(&text_color, container, element),
        );
    }
    Ok(Some(ColorStyles { styles }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parts::DigitColumn;

    fn element(part_id: i64, digit_id: i64, left: f64) -> ElementBox {
        ElementBox {
            part_id: Some(part_id),
            digit_id: Some(digit_id),
            offset_left: left,
            offset_top: 0.0,
        }
    }

    const RECT: ContainerRect = ContainerRect {
        width: 120.0,
        height: 40.0,
    };

    #[test]
    fn test_style_merge_and_css() {
        let a = Style::new().with("color", "red").with("fontWeight", "bold");
        let b = Style::new().with("color", "blue");
        let merged = a.merge(&b);
        assert_eq!(merged.get("color"), Some("blue"));
        assert_eq!(merged.to_css(), "color: blue; font-weight: bold");
    }

    #[test]
    fn test_style_from_json() {
        let style: Style = serde_json::from_str(r#"{"fontSize": "2em"}"#).unwrap();
        assert_eq!(style.get("fontSize"), Some("2em"));
    }

    #[test]
    fn test_plain_color() {
        let styles = color_overlay("red", Some(RECT), &[element(0, 0, 0.0)])
            .unwrap()
            .unwrap();
        assert_eq!(styles.get(0, 0), Some(&Style::new().with("color", "red")));
    }

    #[test]
    fn test_gradient_overlay() {
        let elements = [
            element(PREFIX_PART_ID, 0, 0.0),
            element(0, 0, 10.0),
            element(0, 1, 20.5),
            element(SUFFIX_PART_ID, 0, 30.0),
        ];
        let styles = color_overlay("linear-gradient(90deg, red, blue)", Some(RECT), &elements)
            .unwrap()
            .unwrap();
        let digit = styles.get(0, 1).unwrap();
        assert_eq!(digit.get("background-clip"), Some("text"));
        assert_eq!(digit.get("background-size"), Some("120px 40px"));
        assert_eq!(digit.get("background-position-x"), Some("-20.5px"));
        assert_eq!(digit.get("background-position-y"), Some("0px"));
        assert_eq!(digit.get("color"), Some("transparent"));
        assert_eq!(
            styles.prefix().and_then(|s| s.get("background-position-x")),
            Some("0px")
        );
        assert!(styles.suffix().is_some());
    }

    #[test]
    fn test_unsupported_color_degrades() {
        let styles = color_overlay("12px", Some(RECT), &[element(0, 0, 0.0)])
            .unwrap()
            .unwrap();
        assert_eq!(styles.get(0, 0), Some(&Style::new()));
    }

    #[test]
    fn test_unmeasured_container() {
        assert!(color_overlay("red", None, &[]).unwrap().is_none());
    }

    #[test]
    fn test_missing_ids_fail() {
        let mut bad = element(0, 0, 0.0);
        bad.digit_id = None;
        let err = color_overlay("red", Some(RECT), &[bad]).unwrap_err();
        assert!(matches!(
            err,
            Error::MissingDataAttribute {
                attribute: "data-digit-id"
            }
        ));
    }

    #[test]
    fn test_digit_matrix_shape() {
        let parts = vec![PartData::new(vec![
            DigitColumn::new(vec!["1".into()], 2),
            DigitColumn::new(vec!["2".into()], 1),
        ])];
        let styles = color_overlay("red", Some(RECT), &[element(0, 1, 0.0)])
            .unwrap()
            .unwrap();
        let matrix = styles.digit_matrix(&parts);
        assert!(matrix[0][0].is_empty());
        assert_eq!(matrix[0][1].get("color"), Some("red"));
    }
}
