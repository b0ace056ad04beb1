//! Interpolated frames between two values.

use crate::number::{NumberAdapter, NumericValue};

/// Sample `count` evenly spaced values from `from` to `to`, inclusive.
///
/// Equal endpoints yield exactly one sample. When both endpoints are
/// integers every sample is rounded to an integer. Samples never leave the
/// closed range between the endpoints. A `count` of zero is treated as one.
///
/// ```
/// use rolling_counter::number::{FloatAdapter, NumberAdapter};
/// use rolling_counter::sampler::sample;
///
/// let na = FloatAdapter;
/// let frames = sample(&na, &na.create("10"), &na.create("0"), 3);
/// let text: Vec<String> = frames.iter().map(|v| na.to_string(v)).collect();
/// assert_eq!(text, ["10", "5", "0"]);
/// ```
#[must_use]
pub fn sample(
    na: &dyn NumberAdapter,
    from: &NumericValue,
    to: &NumericValue,
    count: usize,
) -> Vec<NumericValue> {
    let count = if na.eq(from, to) { 1 } else { count.max(1) };
    let round = na.is_integer(from) && na.is_integer(to);
    let lo = na.min(from, to);
    let hi = na.max(from, to);

    let one = na.from_f64(1.0);
    let denominator = na.from_f64(count.saturating_sub(1).max(1) as f64);

    (0..count)
        .map(|i| {
            let t = na.div(&na.from_f64(i as f64), &denominator);
            let value = na.add(&na.mul(from, &na.sub(&one, &t)), &na.mul(to, &t));
            let value = if round { na.round(&value) } else { value };
            na.min(&na.max(&value, &lo), &hi)
        })
        .collect()
}
