//! String adapters: splitting text into user-perceived character units.
//!
//! Padding math counts units, never bytes or scalar values, so the adapter
//! decides what "one column" means for emoji, combining marks and
//! multi-byte scripts.

mod grapheme;
mod width;

use std::fmt;

pub use grapheme::{
    CharAdapter, GRAPHEME_SPLITTER_KEYWORDS, GraphemeIterator, GraphemeSplitterAdapter,
    SegmenterAdapter, graphemes, register_grapheme_splitter,
};
pub use width::{column_width, display_width};

/// Splits a string into ordered character units.
pub trait StringAdapter: fmt::Debug + Send + Sync {
    /// Keyword the adapter is usually registered under.
    fn name(&self) -> &'static str;

    /// Split `s` into units. Joining the units reproduces `s` up to the
    /// adapter's normalisation.
    fn string_to_chars(&self, s: &str) -> Vec<String>;

    /// Number of units in `s`.
    fn unit_count(&self, s: &str) -> usize {
        self.string_to_chars(s).len()
    }
}
