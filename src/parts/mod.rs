//! Part and digit-column model.
//!
//! A frame is a list of [`PartData`], each holding the [`DigitColumn`]s that
//! roll together. Column `data` is the keyframe list for one place: the
//! glyph shown by every sample, with consecutive repeats collapsed.

mod builder;
mod options;

use serde::Serialize;

use crate::unicode::column_width;

pub use builder::{build_part, build_parts, collapse_runs, split_halves};
pub use options::{DigitToChar, DigitToCharSpec, MinPlaces, PartsOptions, PartsOptionsPatch, ValueKind};

/// The glyphs one place rolls through.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct DigitColumn {
    /// Glyphs in sample order, consecutive duplicates removed.
    pub data: Vec<String>,
    /// Position counted from the least significant column, starting at 1.
    pub place: usize,
}

impl DigitColumn {
    #[must_use]
    pub fn new(data: Vec<String>, place: usize) -> Self {
        Self { data, place }
    }

    #[must_use]
    pub fn head(&self) -> Option<&str> {
        self.data.first().map(String::as_str)
    }

    #[must_use]
    pub fn tail(&self) -> Option<&str> {
        self.data.last().map(String::as_str)
    }

    /// Number of distinct keyframes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Width of the widest glyph, for reserving a stable placeholder.
    #[must_use]
    pub fn display_width(&self) -> usize {
        column_width(&self.data)
    }
}

/// One independently animated group of columns.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct PartData {
    pub digits: Vec<DigitColumn>,
}

impl PartData {
    #[must_use]
    pub fn new(digits: Vec<DigitColumn>) -> Self {
        Self { digits }
    }

    /// Find the column occupying `place`.
    #[must_use]
    pub fn column_at_place(&self, place: usize) -> Option<&DigitColumn> {
        self.digits.iter().find(|d| d.place == place)
    }

    /// First glyph of every column, concatenated.
    #[must_use]
    pub fn head_text(&self) -> String {
        self.digits.iter().filter_map(DigitColumn::head).collect()
    }

    /// Last glyph of every column, concatenated.
    #[must_use]
    pub fn tail_text(&self) -> String {
        self.digits.iter().filter_map(DigitColumn::tail).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn column(data: &[&str], place: usize) -> DigitColumn {
        DigitColumn::new(data.iter().map(|s| (*s).to_string()).collect(), place)
    }

    #[test]
    fn test_column_accessors() {
        let c = column(&["1", "0"], 2);
        assert_eq!(c.head(), Some("1"));
        assert_eq!(c.tail(), Some("0"));
        assert_eq!(c.len(), 2);
        assert!(!c.is_empty());
    }

    #[test]
    fn test_column_display_width() {
        assert_eq!(column(&["1", "漢"], 1).display_width(), 2);
        assert_eq!(column(&[], 1).display_width(), 0);
    }

    #[test]
    fn test_lookup_by_place() {
        let part = PartData::new(vec![column(&["1"], 2), column(&["0", "9"], 1)]);
        assert_eq!(part.column_at_place(1).map(DigitColumn::len), Some(2));
        assert!(part.column_at_place(3).is_none());
        assert_eq!(part.tail_text(), "19");
        assert_eq!(part.head_text(), "10");
    }
}
