//! Grapheme cluster segmentation.

use std::sync::Arc;

use unicode_normalization::UnicodeNormalization;
use unicode_segmentation::UnicodeSegmentation;

use super::StringAdapter;
use crate::registry::AdapterRegistry;

/// Keywords the grapheme-splitter plugin registers under.
pub const GRAPHEME_SPLITTER_KEYWORDS: [&str; 1] = ["grapheme-splitter"];

/// Iterator over extended grapheme clusters in a string.
pub struct GraphemeIterator<'a> {
    inner: unicode_segmentation::Graphemes<'a>,
}

impl<'a> Iterator for GraphemeIterator<'a> {
    type Item = &'a str;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next()
    }
}

/// Iterate over extended grapheme clusters in a string.
#[must_use]
pub fn graphemes(s: &str) -> GraphemeIterator<'_> {
    GraphemeIterator {
        inner: s.graphemes(true),
    }
}

/// Naive splitter, one unit per Unicode scalar value. Registered as
/// `"string"`.
///
/// Fast, but splits flags, ZWJ sequences, skin-tone modifiers and combining
/// marks into several units.
#[derive(Clone, Copy, Debug, Default)]
pub struct CharAdapter;

impl StringAdapter for CharAdapter {
    fn name(&self) -> &'static str {
        "string"
    }

    fn string_to_chars(&self, s: &str) -> Vec<String> {
        s.chars().map(String::from).collect()
    }

    fn unit_count(&self, s: &str) -> usize {
        s.chars().count()
    }
}

/// Segmentation on user-perceived grapheme boundaries. Registered as
/// `"intl-segmenter"`.
///
/// Each cluster is NFC-normalised, so `"e\u{301}"` and `"é"` become the
/// same unit.
#[derive(Clone, Copy, Debug, Default)]
pub struct SegmenterAdapter;

impl StringAdapter for SegmenterAdapter {
    fn name(&self) -> &'static str {
        "intl-segmenter"
    }

    fn string_to_chars(&self, s: &str) -> Vec<String> {
        graphemes(s).map(|g| g.nfc().collect()).collect()
    }

    fn unit_count(&self, s: &str) -> usize {
        graphemes(s).count()
    }
}

/// Raw extended grapheme clusters, opt-in via
/// [`register_grapheme_splitter`].
#[derive(Clone, Copy, Debug, Default)]
pub struct GraphemeSplitterAdapter;

impl StringAdapter for GraphemeSplitterAdapter {
    fn name(&self) -> &'static str {
        "grapheme-splitter"
    }

    fn string_to_chars(&self, s: &str) -> Vec<String> {
        graphemes(s).map(str::to_owned).collect()
    }

    fn unit_count(&self, s: &str) -> usize {
        graphemes(s).count()
    }
}

/// Register [`GraphemeSplitterAdapter`] under
/// [`GRAPHEME_SPLITTER_KEYWORDS`].
pub fn register_grapheme_splitter(registry: &mut AdapterRegistry) {
    registry.register_string_adapter(&GRAPHEME_SPLITTER_KEYWORDS, || {
        Arc::new(GraphemeSplitterAdapter) as Arc<dyn StringAdapter>
    });
}
