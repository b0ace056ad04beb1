//! Native `f64` adapter.

use std::cmp::Ordering;

use super::{NumberAdapter, NumericValue};

/// Adapter over IEEE-754 doubles, registered as `"number"`.
///
/// Precision is limited to what an `f64` holds: integers round-trip up to
/// 2^53 and text output is the shortest representation that parses back to
/// the same double.
#[derive(Clone, Copy, Debug, Default)]
pub struct FloatAdapter;

impl FloatAdapter {
    fn float(value: &NumericValue) -> f64 {
        match value {
            NumericValue::Float(v) => *v,
            NumericValue::Decimal(d) => d.to_f64(),
        }
    }

    fn lift(value: f64) -> NumericValue {
        NumericValue::Float(value)
    }
}

/// Round half toward positive infinity.
fn round_half_up(value: f64) -> f64 {
    if !value.is_finite() {
        return value;
    }
    let floor = value.floor();
    if value - floor >= 0.5 { floor + 1.0 } else { floor }
}

impl NumberAdapter for FloatAdapter {
    fn name(&self) -> &'static str {
        "number"
    }

    fn create(&self, raw: &str) -> NumericValue {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Self::lift(0.0);
        }
        match trimmed.parse::<f64>() {
            Ok(v) if v.is_finite() => Self::lift(v),
            _ => Self::lift(0.0),
        }
    }

    fn from_f64(&self, value: f64) -> NumericValue {
        Self::lift(if value.is_finite() { value } else { 0.0 })
    }

    fn add(&self, a: &NumericValue, b: &NumericValue) -> NumericValue {
        Self::lift(Self::float(a) + Self::float(b))
    }

    fn sub(&self, a: &NumericValue, b: &NumericValue) -> NumericValue {
        Self::lift(Self::float(a) - Self::float(b))
    }

    fn mul(&self, a: &NumericValue, b: &NumericValue) -> NumericValue {
        Self::lift(Self::float(a) * Self::float(b))
    }

    fn div(&self, a: &NumericValue, b: &NumericValue) -> NumericValue {
        Self::lift(Self::float(a) / Self::float(b))
    }

    fn compare(&self, a: &NumericValue, b: &NumericValue) -> Ordering {
        Self::float(a)
            .partial_cmp(&Self::float(b))
            .unwrap_or(Ordering::Equal)
    }

    fn is_integer(&self, a: &NumericValue) -> bool {
        let v = Self::float(a);
        v.is_finite() && v.fract() == 0.0
    }

    fn is_nan(&self, a: &NumericValue) -> bool {
        Self::float(a).is_nan()
    }

    fn is_finite(&self, a: &NumericValue) -> bool {
        Self::float(a).is_finite()
    }

    fn abs(&self, a: &NumericValue) -> NumericValue {
        Self::lift(Self::float(a).abs())
    }

    fn ceil(&self, a: &NumericValue) -> NumericValue {
        Self::lift(Self::float(a).ceil())
    }

    fn floor(&self, a: &NumericValue) -> NumericValue {
        Self::lift(Self::float(a).floor())
    }

    fn round(&self, a: &NumericValue) -> NumericValue {
        Self::lift(round_half_up(Self::float(a)))
    }

    fn to_number(&self, a: &NumericValue) -> f64 {
        Self::float(a)
    }

    fn to_string(&self, a: &NumericValue) -> String {
        let v = Self::float(a);
        if v.is_nan() {
            "NaN".to_string()
        } else if v.is_infinite() {
            if v > 0.0 { "Infinity" } else { "-Infinity" }.to_string()
        } else if v == 0.0 {
            // Covers -0.0 as well.
            "0".to_string()
        } else {
            v.to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_coerces_bad_input() {
        let na = FloatAdapter;
        assert_eq!(na.create("12.5"), NumericValue::Float(12.5));
        assert_eq!(na.create("  3 "), NumericValue::Float(3.0));
        assert_eq!(na.create("inf"), NumericValue::Float(0.0));
        assert_eq!(na.create("NaN"), NumericValue::Float(0.0));
        assert_eq!(na.create("1e400"), NumericValue::Float(0.0));
    }

    #[test]
    fn test_to_string_shapes() {
        let na = FloatAdapter;
        assert_eq!(na.to_string(&NumericValue::Float(10.0)), "10");
        assert_eq!(na.to_string(&NumericValue::Float(-0.0)), "0");
        assert_eq!(na.to_string(&NumericValue::Float(0.25)), "0.25");
        assert_eq!(na.to_string(&NumericValue::Float(f64::NAN)), "NaN");
        assert_eq!(na.to_string(&NumericValue::Float(1e21)), "1000000000000000000000");
    }

    #[test]
    fn test_round_half_up() {
        let na = FloatAdapter;
        assert_eq!(na.round(&NumericValue::Float(2.5)), NumericValue::Float(3.0));
        assert_eq!(na.round(&NumericValue::Float(-2.5)), NumericValue::Float(-2.0));
        assert_eq!(na.round(&NumericValue::Float(9.4999)), NumericValue::Float(9.0));
    }

    #[test]
    fn test_is_integer() {
        let na = FloatAdapter;
        assert!(na.is_integer(&NumericValue::Float(4.0)));
        assert!(!na.is_integer(&NumericValue::Float(4.1)));
        assert!(!na.is_integer(&NumericValue::Float(f64::INFINITY)));
    }

    #[test]
    fn test_nan_compares_equal() {
        let na = FloatAdapter;
        let nan = NumericValue::Float(f64::NAN);
        assert_eq!(na.compare(&nan, &NumericValue::Float(1.0)), Ordering::Equal);
        assert!(na.is_nan(&nan));
        assert!(!na.is_finite(&nan));
    }
}
