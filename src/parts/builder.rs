//! Turning stringified samples into aligned digit columns.

use std::iter;

use super::{DigitColumn, PartData, PartsOptions, ValueKind};
use crate::unicode::StringAdapter;

/// Split sample text into integer and fractional halves.
///
/// Text counters and an empty separator keep the whole text as the integer
/// half.
#[must_use]
pub fn split_halves<'a>(text: &'a str, options: &PartsOptions) -> (&'a str, &'a str) {
    if options.kind == ValueKind::String || options.decimal_separator.is_empty() {
        return (text, "");
    }
    text.split_once(options.decimal_separator.as_str())
        .unwrap_or((text, ""))
}

/// Drop consecutive repeats, keeping the first of each run.
#[must_use]
pub fn collapse_runs<T: PartialEq + Clone>(items: &[T]) -> Vec<T> {
    let mut out = items.to_vec();
    out.dedup();
    out
}

/// Build one part from its stringified samples, ordered head to tail.
///
/// Place counts are measured across every sample, so a part that grows from
/// `9` to `10` gets two integer places.
#[must_use]
pub fn build_part<S: AsRef<str>>(
    samples: &[S],
    strings: &dyn StringAdapter,
    options: &PartsOptions,
) -> PartData {
    let halves: Vec<(Vec<String>, Vec<String>)> = samples
        .iter()
        .map(|text| {
            let (integer, fraction) = split_halves(text.as_ref(), options);
            (
                strings.string_to_chars(integer),
                strings.string_to_chars(fraction),
            )
        })
        .collect();

    let integer_places = halves
        .iter()
        .map(|(integer, _)| integer.len())
        .max()
        .unwrap_or(0)
        .max(options.min_places.integer);
    let fraction_places = halves
        .iter()
        .map(|(_, fraction)| fraction.len())
        .max()
        .unwrap_or(0)
        .max(options.min_places.fraction);

    let fill = || iter::repeat(options.fill_char.clone());
    let rows: Vec<Vec<String>> = halves
        .into_iter()
        .map(|(integer, fraction)| {
            let mut row: Vec<String> = fill().take(integer_places - integer.len()).collect();
            row.extend(integer);
            if fraction_places > 0 {
                let pad = fraction_places - fraction.len();
                row.push(options.decimal_separator.clone());
                row.extend(fraction);
                row.extend(fill().take(pad));
            }
            row
        })
        .collect();

    let width = rows.first().map_or(0, Vec::len);
    let digits = (0..width)
        .map(|j| {
            let column: Vec<String> = rows.iter().map(|row| row[j].clone()).collect();
            let data = collapse_runs(&column)
                .into_iter()
                .map(|unit| options.digit_to_char.get(&unit).cloned().unwrap_or(unit))
                .collect();
            DigitColumn::new(data, width - j)
        })
        .collect();

    PartData::new(digits)
}

/// Build every part of a frame.
#[must_use]
pub fn build_parts<S: AsRef<str>>(
    parts: &[Vec<S>],
    strings: &dyn StringAdapter,
    options: &PartsOptions,
) -> Vec<PartData> {
    let frame: Vec<PartData> = parts
        .iter()
        .map(|samples| build_part(samples, strings, options))
        .collect();
    tracing::debug!(
        parts = frame.len(),
        columns = frame.iter().map(|p| p.digits.len()).sum::<usize>(),
        "built parts"
    );
    frame
}
