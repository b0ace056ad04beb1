//! Cubic-Bézier easing curves and their `linear(...)` expansion.
//!
//! Animation drivers understand CSS keywords such as `ease-out` but not the
//! Penner names (`easeOutBack`, ...). Named curves are therefore sampled
//! into a CSS `linear()` easing before being handed to the driver.

const SUBDIVISION_PRECISION: f64 = 0.000_000_1;
const SUBDIVISION_MAX_ITERATIONS: usize = 12;

/// Points in a `linear(...)` expansion.
pub const LINEAR_SAMPLES: usize = 64;

/// A CSS-style cubic Bézier timing curve through (0,0) and (1,1).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CubicBezier {
    pub x1: f64,
    pub y1: f64,
    pub x2: f64,
    pub y2: f64,
}

/// x(t) or y(t) of the curve for control coordinates `a1` and `a2`.
fn calc_bezier(t: f64, a1: f64, a2: f64) -> f64 {
    (((1.0 - 3.0 * a2 + 3.0 * a1) * t + (3.0 * a2 - 6.0 * a1)) * t + 3.0 * a1) * t
}

impl CubicBezier {
    #[must_use]
    pub const fn new(x1: f64, y1: f64, x2: f64, y2: f64) -> Self {
        Self { x1, y1, x2, y2 }
    }

    #[must_use]
    pub fn is_linear(&self) -> bool {
        self.x1 == self.y1 && self.x2 == self.y2
    }

    fn t_for_x(&self, x: f64) -> f64 {
        let mut lower = 0.0;
        let mut upper = 1.0;
        let mut t;
        let mut i = 0;
        loop {
            t = lower + (upper - lower) / 2.0;
            let current = calc_bezier(t, self.x1, self.x2) - x;
            if current > 0.0 {
                upper = t;
            } else {
                lower = t;
            }
            i += 1;
            if current.abs() <= SUBDIVISION_PRECISION || i >= SUBDIVISION_MAX_ITERATIONS {
                break;
            }
        }
        t
    }

    /// Eased progress for linear progress `x` in `[0, 1]`.
    #[must_use]
    pub fn ease(&self, x: f64) -> f64 {
        if self.is_linear() || x == 0.0 || x == 1.0 {
            return x;
        }
        calc_bezier(self.t_for_x(x), self.y1, self.y2)
    }

    /// Sample the curve into a CSS `linear(...)` easing.
    #[must_use]
    pub fn to_linear(&self) -> String {
        let last = (LINEAR_SAMPLES - 1) as f64;
        let points: Vec<String> = (0..LINEAR_SAMPLES)
            .map(|i| self.ease(i as f64 / last).to_string())
            .collect();
        format!("linear({})", points.join(","))
    }
}

/// Penner easing curves as cubic Béziers, keyed by their camelCase names.
pub const NAMED_EASINGS: [(&str, CubicBezier); 24] = [
    ("easeInSine", CubicBezier::new(0.12, 0.0, 0.39, 0.0)),
    ("easeOutSine", CubicBezier::new(0.61, 1.0, 0.88, 1.0)),
    ("easeInOutSine", CubicBezier::new(0.37, 0.0, 0.63, 1.0)),
    ("easeInQuad", CubicBezier::new(0.11, 0.0, 0.5, 0.0)),
    ("easeOutQuad", CubicBezier::new(0.5, 1.0, 0.89, 1.0)),
    ("easeInOutQuad", CubicBezier::new(0.45, 0.0, 0.55, 1.0)),
    ("easeInCubic", CubicBezier::new(0.32, 0.0, 0.67, 0.0)),
    ("easeOutCubic", CubicBezier::new(0.33, 1.0, 0.68, 1.0)),
    ("easeInOutCubic", CubicBezier::new(0.65, 0.0, 0.35, 1.0)),
    ("easeInQuart", CubicBezier::new(0.5, 0.0, 0.75, 0.0)),
    ("easeOutQuart", CubicBezier::new(0.25, 1.0, 0.5, 1.0)),
    ("easeInOutQuart", CubicBezier::new(0.76, 0.0, 0.24, 1.0)),
    ("easeInQuint", CubicBezier::new(0.64, 0.0, 0.78, 0.0)),
    ("easeOutQuint", CubicBezier::new(0.22, 1.0, 0.36, 1.0)),
    ("easeInOutQuint", CubicBezier::new(0.83, 0.0, 0.17, 1.0)),
    ("easeInExpo", CubicBezier::new(0.7, 0.0, 0.84, 0.0)),
    ("easeOutExpo", CubicBezier::new(0.16, 1.0, 0.3, 1.0)),
    ("easeInOutExpo", CubicBezier::new(0.87, 0.0, 0.13, 1.0)),
    ("easeInCirc", CubicBezier::new(0.55, 0.0, 1.0, 0.45)),
    ("easeOutCirc", CubicBezier::new(0.0, 0.55, 0.45, 1.0)),
    ("easeInOutCirc", CubicBezier::new(0.85, 0.0, 0.15, 1.0)),
    ("easeInBack", CubicBezier::new(0.36, 0.0, 0.66, -0.56)),
    ("easeOutBack", CubicBezier::new(0.34, 1.56, 0.64, 1.0)),
    ("easeInOutBack", CubicBezier::new(0.68, -0.6, 0.32, 1.6)),
];

/// Look up a named curve.
#[must_use]
pub fn named_easing(name: &str) -> Option<CubicBezier> {
    NAMED_EASINGS
        .iter()
        .find(|(n, _)| *n == name)
        .map(|(_, curve)| *curve)
}

/// Replace a named curve with its `linear(...)` expansion. Other easing
/// strings (CSS keywords, `cubic-bezier(...)`, `steps(...)`) pass through.
#[must_use]
pub fn expand_easing(easing: &str) -> String {
    named_easing(easing).map_or_else(|| easing.to_string(), |curve| curve.to_linear())
}
