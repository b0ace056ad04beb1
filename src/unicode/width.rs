//! Display width of rolling glyphs.
//!
//! A rolling column must reserve the width of its widest glyph, otherwise
//! the layout jitters as digits of different widths scroll past.

use unicode_width::UnicodeWidthStr;

/// Display width of a glyph in terminal-style columns.
#[must_use]
pub fn display_width(s: &str) -> usize {
    UnicodeWidthStr::width(s)
}

/// Width of the widest glyph in a column.
#[must_use]
pub fn column_width<S: AsRef<str>>(glyphs: &[S]) -> usize {
    glyphs
        .iter()
        .map(|g| display_width(g.as_ref()))
        .max()
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ascii_width() {
        assert_eq!(display_width("7"), 1);
        assert_eq!(display_width(""), 0);
    }

    #[test]
    fn test_column_width_takes_widest() {
        assert_eq!(column_width(&["1", "漢", "2"]), 2);
        assert_eq!(column_width::<&str>(&[]), 0);
    }
}
