//! Arbitrary-precision decimal adapter.
//!
//! [`Decimal`] stores a `BigInt` mantissa and a non-negative base-10 scale.
//! Values are kept normalised (no trailing fractional zeros) so structural
//! equality is numeric equality.

use std::borrow::Cow;
use std::cmp::Ordering;
use std::fmt;
use std::sync::Arc;

use num_bigint::BigInt;
use num_traits::{Signed, Zero};
use serde::Deserialize;

use super::{NumberAdapter, NumericValue};
use crate::registry::AdapterRegistry;

/// Keywords the decimal plugin registers under.
pub const DECIMAL_KEYWORDS: [&str; 4] = ["decimal.js", "decimal-js", "decimaljs", "decimal"];

fn pow10(exp: u32) -> BigInt {
    BigInt::from(10u8).pow(exp)
}

fn digit_count(value: &BigInt) -> u32 {
    value.magnitude().to_string().len() as u32
}

/// Exact decimal number `mantissa * 10^-scale`.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Default)]
pub struct Decimal {
    mantissa: BigInt,
    scale: u32,
}

impl Decimal {
    /// Zero.
    #[must_use]
    pub fn zero() -> Self {
        Self::default()
    }

    /// Build from raw parts and normalise.
    #[must_use]
    pub fn new(mantissa: BigInt, scale: u32) -> Self {
        Self { mantissa, scale }.normalized()
    }

    /// Parse plain decimal notation (`-?\d+(\.\d+)?`).
    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        let (negative, body) = match raw.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, raw),
        };
        let (int_part, frac_part) = match body.split_once('.') {
            Some((i, f)) => (i, Some(f)),
            None => (body, None),
        };
        let all_digits = |s: &str| !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit());
        if !all_digits(int_part) || frac_part.is_some_and(|f| !all_digits(f)) {
            return None;
        }

        let frac = frac_part.unwrap_or("");
        let digits = format!("{int_part}{frac}");
        let mut mantissa = BigInt::parse_bytes(digits.as_bytes(), 10)?;
        if negative {
            mantissa = -mantissa;
        }
        Some(Self::new(mantissa, frac.len() as u32))
    }

    /// Convert a finite double through its shortest text form.
    #[must_use]
    pub fn from_f64(value: f64) -> Self {
        if !value.is_finite() {
            return Self::zero();
        }
        Self::parse(&value.to_string()).unwrap_or_default()
    }

    /// Lossy conversion to a double.
    #[must_use]
    pub fn to_f64(&self) -> f64 {
        self.to_string().parse().unwrap_or(0.0)
    }

    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.mantissa.is_zero()
    }

    #[must_use]
    pub fn is_integer(&self) -> bool {
        self.scale == 0
    }

    #[must_use]
    pub fn is_negative(&self) -> bool {
        self.mantissa.is_negative()
    }

    /// Number of significant digits in the mantissa.
    #[must_use]
    pub fn precision(&self) -> u32 {
        digit_count(&self.mantissa)
    }

    fn normalized(mut self) -> Self {
        if self.mantissa.is_zero() {
            self.scale = 0;
            return self;
        }
        let ten = BigInt::from(10u8);
        while self.scale > 0 && (&self.mantissa % &ten).is_zero() {
            self.mantissa /= &ten;
            self.scale -= 1;
        }
        self
    }

    fn rescaled(&self, scale: u32) -> BigInt {
        &self.mantissa * pow10(scale - self.scale)
    }

    /// Drop digits beyond `precision` significant ones, rounding half away
    /// from zero.
    #[must_use]
    pub fn round_to_precision(self, precision: u32) -> Self {
        let digits = self.precision();
        if digits <= precision.max(1) {
            return self;
        }
        let drop = digits - precision.max(1);
        let divisor = pow10(drop);
        let magnitude = self.mantissa.abs();
        let mut quotient = &magnitude / &divisor;
        let remainder = &magnitude % &divisor;
        if remainder * 2u8 >= divisor {
            quotient += 1u8;
        }
        if self.mantissa.is_negative() {
            quotient = -quotient;
        }

        let scale = i64::from(self.scale) - i64::from(drop);
        if scale < 0 {
            Self::new(quotient * pow10(scale.unsigned_abs() as u32), 0)
        } else {
            Self::new(quotient, scale as u32)
        }
    }

    /// Integer part (toward zero) and whether a fractional remainder exists.
    fn split_integer(&self) -> (BigInt, bool) {
        let divisor = pow10(self.scale);
        let quotient = &self.mantissa / &divisor;
        let inexact = !(&self.mantissa % &divisor).is_zero();
        (quotient, inexact)
    }

    #[must_use]
    pub fn floor(&self) -> Self {
        let (quotient, inexact) = self.split_integer();
        let adjust = i8::from(inexact && self.is_negative());
        Self::new(quotient - adjust, 0)
    }

    #[must_use]
    pub fn ceil(&self) -> Self {
        let (quotient, inexact) = self.split_integer();
        let adjust = i8::from(inexact && !self.is_negative());
        Self::new(quotient + adjust, 0)
    }

    /// Round to an integer, half away from zero.
    #[must_use]
    pub fn round(&self) -> Self {
        if self.scale == 0 {
            return self.clone();
        }
        let divisor = pow10(self.scale);
        let magnitude = self.mantissa.abs();
        let mut quotient = &magnitude / &divisor;
        if (&magnitude % &divisor) * 2u8 >= divisor {
            quotient += 1u8;
        }
        if self.is_negative() {
            quotient = -quotient;
        }
        Self::new(quotient, 0)
    }

    #[must_use]
    pub fn abs(&self) -> Self {
        Self {
            mantissa: self.mantissa.abs(),
            scale: self.scale,
        }
    }

    #[must_use]
    pub fn add(&self, other: &Self) -> Self {
        let scale = self.scale.max(other.scale);
        Self::new(self.rescaled(scale) + other.rescaled(scale), scale)
    }

    #[must_use]
    pub fn sub(&self, other: &Self) -> Self {
        let scale = self.scale.max(other.scale);
        Self::new(self.rescaled(scale) - other.rescaled(scale), scale)
    }

    #[must_use]
    pub fn mul(&self, other: &Self) -> Self {
        Self::new(&self.mantissa * &other.mantissa, self.scale + other.scale)
    }

    /// Divide to `precision` significant digits. `None` on division by zero.
    #[must_use]
    pub fn checked_div(&self, other: &Self, precision: u32) -> Option<Self> {
        if other.is_zero() {
            return None;
        }
        if self.is_zero() {
            return Some(Self::zero());
        }

        // Widen the dividend so the quotient carries two guard digits.
        let wanted = i64::from(precision.max(1)) + 2;
        let shift = (wanted + i64::from(other.precision()) - i64::from(self.precision())).max(0);
        let shift = shift as u32;
        let quotient = (&self.mantissa * pow10(shift)) / &other.mantissa;

        let scale = i64::from(shift) + i64::from(self.scale) - i64::from(other.scale);
        let raw = if scale < 0 {
            Self::new(quotient * pow10(scale.unsigned_abs() as u32), 0)
        } else {
            Self::new(quotient, scale as u32)
        };
        Some(raw.round_to_precision(precision))
    }
}

impl Ord for Decimal {
    fn cmp(&self, other: &Self) -> Ordering {
        let scale = self.scale.max(other.scale);
        self.rescaled(scale).cmp(&other.rescaled(scale))
    }
}

impl PartialOrd for Decimal {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for Decimal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let digits = self.mantissa.magnitude().to_string();
        if self.is_negative() {
            f.write_str("-")?;
        }
        let scale = self.scale as usize;
        if scale == 0 {
            return f.write_str(&digits);
        }
        let padded = if digits.len() <= scale {
            format!("{}{digits}", "0".repeat(scale + 1 - digits.len()))
        } else {
            digits
        };
        let (int_part, frac_part) = padded.split_at(padded.len() - scale);
        write!(f, "{int_part}.{frac_part}")
    }
}

/// Configuration for [`DecimalAdapter`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct DecimalConfig {
    /// Significant digits kept by arithmetic results.
    pub precision: u32,
}

impl Default for DecimalConfig {
    fn default() -> Self {
        Self { precision: 1000 }
    }
}

/// Adapter over [`Decimal`], opt-in via [`register_decimal`].
#[derive(Clone, Copy, Debug, Default)]
pub struct DecimalAdapter {
    config: DecimalConfig,
}

impl DecimalAdapter {
    #[must_use]
    pub fn new(config: DecimalConfig) -> Self {
        Self { config }
    }

    #[must_use]
    pub fn config(&self) -> DecimalConfig {
        self.config
    }

    fn dec(value: &NumericValue) -> Cow<'_, Decimal> {
        match value {
            NumericValue::Decimal(d) => Cow::Borrowed(d),
            NumericValue::Float(v) => Cow::Owned(Decimal::from_f64(*v)),
        }
    }

    fn lift(&self, value: Decimal) -> NumericValue {
        NumericValue::Decimal(value.round_to_precision(self.config.precision))
    }
}

impl NumberAdapter for DecimalAdapter {
    fn name(&self) -> &'static str {
        "decimal.js"
    }

    fn create(&self, raw: &str) -> NumericValue {
        self.lift(Decimal::parse(raw).unwrap_or_default())
    }

    fn from_f64(&self, value: f64) -> NumericValue {
        self.lift(Decimal::from_f64(value))
    }

    fn add(&self, a: &NumericValue, b: &NumericValue) -> NumericValue {
        self.lift(Self::dec(a).add(&Self::dec(b)))
    }

    fn sub(&self, a: &NumericValue, b: &NumericValue) -> NumericValue {
        self.lift(Self::dec(a).sub(&Self::dec(b)))
    }

    fn mul(&self, a: &NumericValue, b: &NumericValue) -> NumericValue {
        self.lift(Self::dec(a).mul(&Self::dec(b)))
    }

    fn div(&self, a: &NumericValue, b: &NumericValue) -> NumericValue {
        if let Some(q) = Self::dec(a).checked_div(&Self::dec(b), self.config.precision) {
            NumericValue::Decimal(q)
        } else {
            tracing::warn!("decimal division by zero, using zero");
            NumericValue::Decimal(Decimal::zero())
        }
    }

    fn compare(&self, a: &NumericValue, b: &NumericValue) -> Ordering {
        Self::dec(a).cmp(&Self::dec(b))
    }

    fn is_integer(&self, a: &NumericValue) -> bool {
        Self::dec(a).is_integer()
    }

    fn is_nan(&self, _a: &NumericValue) -> bool {
        false
    }

    fn is_finite(&self, _a: &NumericValue) -> bool {
        true
    }

    fn abs(&self, a: &NumericValue) -> NumericValue {
        NumericValue::Decimal(Self::dec(a).abs())
    }

    fn ceil(&self, a: &NumericValue) -> NumericValue {
        NumericValue::Decimal(Self::dec(a).ceil())
    }

    fn floor(&self, a: &NumericValue) -> NumericValue {
        NumericValue::Decimal(Self::dec(a).floor())
    }

    fn round(&self, a: &NumericValue) -> NumericValue {
        NumericValue::Decimal(Self::dec(a).round())
    }

    fn to_number(&self, a: &NumericValue) -> f64 {
        Self::dec(a).to_f64()
    }

    fn to_string(&self, a: &NumericValue) -> String {
        Self::dec(a).to_string()
    }

    fn is_zero(&self, a: &NumericValue) -> bool {
        Self::dec(a).is_zero()
    }
}

/// Register the decimal adapter under [`DECIMAL_KEYWORDS`].
pub fn register_decimal(registry: &mut AdapterRegistry, config: DecimalConfig) {
    registry.register_number_adapter(&DECIMAL_KEYWORDS, move || {
        Arc::new(DecimalAdapter::new(config)) as Arc<dyn NumberAdapter>
    });
}
