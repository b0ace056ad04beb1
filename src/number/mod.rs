//! Numeric adapters: pluggable arithmetic over an opaque magnitude.
//!
//! The pipeline never inspects a [`NumericValue`] directly. Every operation
//! goes through a [`NumberAdapter`], so the same sampler and builder run over
//! native floats or arbitrary-precision decimals.
//!
//! # Examples
//!
//! ```
//! use rolling_counter::number::{FloatAdapter, NumberAdapter};
//!
//! let na = FloatAdapter;
//! let a = na.create("1.5");
//! let b = na.create("not a number");
//! assert!(na.is_zero(&b));
//! assert_eq!(na.to_string(&na.add(&a, &a)), "3");
//! ```

mod decimal;
mod float;

use std::cmp::Ordering;
use std::fmt;

pub use decimal::{Decimal, DecimalAdapter, DecimalConfig, register_decimal};
pub use float::FloatAdapter;

/// An opaque magnitude produced and consumed by a [`NumberAdapter`].
#[derive(Clone, Debug, PartialEq)]
pub enum NumericValue {
    /// IEEE-754 double.
    Float(f64),
    /// Arbitrary-precision decimal.
    Decimal(Decimal),
}

impl Default for NumericValue {
    fn default() -> Self {
        Self::Float(0.0)
    }
}

impl From<f64> for NumericValue {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<Decimal> for NumericValue {
    fn from(value: Decimal) -> Self {
        Self::Decimal(value)
    }
}

/// Arithmetic and comparison over [`NumericValue`].
///
/// Implementations are pure: no operation mutates its inputs and `create`
/// never fails. Unparseable, empty or non-finite input becomes zero.
/// `to_string` and `create` round-trip for integers and for decimals the
/// adapter can represent exactly.
pub trait NumberAdapter: fmt::Debug + Send + Sync {
    /// Keyword the adapter is usually registered under.
    fn name(&self) -> &'static str;

    /// Parse raw text into a value, falling back to zero.
    fn create(&self, raw: &str) -> NumericValue;

    /// Convert a native number into this adapter's representation.
    fn from_f64(&self, value: f64) -> NumericValue;

    fn add(&self, a: &NumericValue, b: &NumericValue) -> NumericValue;
    fn sub(&self, a: &NumericValue, b: &NumericValue) -> NumericValue;
    fn mul(&self, a: &NumericValue, b: &NumericValue) -> NumericValue;
    fn div(&self, a: &NumericValue, b: &NumericValue) -> NumericValue;

    /// Total order; incomparable values (NaN) compare equal.
    fn compare(&self, a: &NumericValue, b: &NumericValue) -> Ordering;

    fn is_integer(&self, a: &NumericValue) -> bool;
    fn is_nan(&self, a: &NumericValue) -> bool;
    fn is_finite(&self, a: &NumericValue) -> bool;

    fn abs(&self, a: &NumericValue) -> NumericValue;
    fn ceil(&self, a: &NumericValue) -> NumericValue;
    fn floor(&self, a: &NumericValue) -> NumericValue;
    fn round(&self, a: &NumericValue) -> NumericValue;

    /// Lossy conversion to a native number.
    fn to_number(&self, a: &NumericValue) -> f64;

    /// Canonical text form, the inverse of [`NumberAdapter::create`].
    fn to_string(&self, a: &NumericValue) -> String;

    fn eq(&self, a: &NumericValue, b: &NumericValue) -> bool {
        self.compare(a, b) == Ordering::Equal
    }

    fn gt(&self, a: &NumericValue, b: &NumericValue) -> bool {
        self.compare(a, b) == Ordering::Greater
    }

    fn gte(&self, a: &NumericValue, b: &NumericValue) -> bool {
        self.compare(a, b) != Ordering::Less
    }

    fn lt(&self, a: &NumericValue, b: &NumericValue) -> bool {
        self.compare(a, b) == Ordering::Less
    }

    fn lte(&self, a: &NumericValue, b: &NumericValue) -> bool {
        self.compare(a, b) != Ordering::Greater
    }

    fn is_negative(&self, a: &NumericValue) -> bool {
        self.lt(a, &self.from_f64(0.0))
    }

    fn is_positive(&self, a: &NumericValue) -> bool {
        self.gt(a, &self.from_f64(0.0))
    }

    fn is_zero(&self, a: &NumericValue) -> bool {
        self.eq(a, &self.from_f64(0.0))
    }

    fn max(&self, a: &NumericValue, b: &NumericValue) -> NumericValue {
        if self.lt(a, b) { b.clone() } else { a.clone() }
    }

    fn min(&self, a: &NumericValue, b: &NumericValue) -> NumericValue {
        if self.gt(a, b) { b.clone() } else { a.clone() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn adapters() -> Vec<Box<dyn NumberAdapter>> {
        vec![
            Box::new(FloatAdapter),
            Box::new(DecimalAdapter::new(DecimalConfig::default())),
        ]
    }

    #[test]
    fn test_create_never_fails() {
        for na in adapters() {
            for raw in ["", "abc", "1.2.3", "--1", " "] {
                assert!(na.is_zero(&na.create(raw)), "{} on {raw:?}", na.name());
            }
        }
    }

    #[test]
    fn test_integer_round_trip() {
        for na in adapters() {
            for raw in ["0", "7", "-42", "123456789"] {
                assert_eq!(na.to_string(&na.create(raw)), raw, "{}", na.name());
            }
        }
    }

    #[test]
    fn test_default_comparisons() {
        for na in adapters() {
            let one = na.create("1");
            let two = na.create("2");
            assert!(na.lt(&one, &two));
            assert!(na.lte(&one, &one));
            assert!(na.gte(&two, &one));
            assert!(na.eq(&na.max(&one, &two), &two));
            assert!(na.eq(&na.min(&one, &two), &one));
            assert!(na.is_negative(&na.create("-3")));
            assert!(na.is_positive(&two));
        }
    }
}
