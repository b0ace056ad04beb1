//! Animation options and keyframes handed to the animation driver.

mod easing;
mod roller;

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::transition::Direction;

pub use easing::{CubicBezier, LINEAR_SAMPLES, NAMED_EASINGS, expand_easing, named_easing};
pub use roller::{
    AnimationDriver, AnimationHandle, ColumnId, CompletionTicket, Roller, RollerDigit,
};

/// How an animation applies styles outside its active interval.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FillMode {
    None,
    #[default]
    Forwards,
    Backwards,
    Both,
    Auto,
}

/// Timing options for one column's roll.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnimationOptions {
    /// Milliseconds.
    pub duration: f64,
    /// Milliseconds before the roll starts.
    pub delay: f64,
    pub iterations: f64,
    /// CSS easing; named Penner curves are already expanded to `linear()`.
    pub easing: String,
    pub fill: FillMode,
}

impl Default for AnimationOptions {
    fn default() -> Self {
        Self {
            duration: 1000.0,
            delay: 0.0,
            iterations: 1.0,
            easing: "ease-out".to_string(),
            fill: FillMode::Forwards,
        }
    }
}

/// Caller overrides merged over [`AnimationOptions::default`].
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AnimationOptionsPatch {
    pub duration: Option<f64>,
    pub delay: Option<f64>,
    pub iterations: Option<f64>,
    pub easing: Option<String>,
    pub fill: Option<FillMode>,
}

impl AnimationOptionsPatch {
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Merge over the defaults and expand a named easing.
    #[must_use]
    pub fn resolve(&self) -> AnimationOptions {
        let defaults = AnimationOptions::default();
        let easing = self.easing.as_deref().unwrap_or(&defaults.easing);
        AnimationOptions {
            duration: self.duration.unwrap_or(defaults.duration),
            delay: self.delay.unwrap_or(defaults.delay),
            iterations: self.iterations.unwrap_or(defaults.iterations),
            easing: expand_easing(easing),
            fill: self.fill.unwrap_or(defaults.fill),
        }
    }
}

/// Property-indexed keyframes, e.g. `{"transform": ["translateY(0)", ...]}`.
pub type Keyframes = BTreeMap<String, Vec<String>>;

/// The roll used when no keyframes are configured.
#[must_use]
pub fn default_keyframes(direction: Direction) -> Keyframes {
    let end = match direction {
        Direction::Up => "translateY(-100%)",
        Direction::Down => "translateY(100%)",
    };
    let mut keyframes = Keyframes::new();
    keyframes.insert(
        "transform".to_string(),
        vec!["translateY(0)".to_string(), end.to_string()],
    );
    keyframes
}

/// Configured keyframes, or the default roll when empty.
#[must_use]
pub fn keyframes_or_default(keyframes: &Keyframes, direction: Direction) -> Keyframes {
    if keyframes.is_empty() {
        default_keyframes(direction)
    } else {
        keyframes.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let options = AnimationOptionsPatch::default().resolve();
        assert_eq!(options, AnimationOptions::default());
        assert_eq!(options.duration, 1000.0);
        assert_eq!(options.easing, "ease-out");
        assert_eq!(options.fill, FillMode::Forwards);
    }

    #[test]
    fn test_patch_merges_and_expands() {
        let patch = AnimationOptionsPatch::from_json(r#"{"duration": 300, "easing": "easeOutBack"}"#)
            .unwrap();
        let options = patch.resolve();
        assert_eq!(options.duration, 300.0);
        assert_eq!(options.iterations, 1.0);
        assert!(options.easing.starts_with("linear("));
    }

    #[test]
    fn test_default_keyframes_follow_direction() {
        let up = default_keyframes(Direction::Up);
        assert_eq!(up["transform"], ["translateY(0)", "translateY(-100%)"]);
        let down = default_keyframes(Direction::Down);
        assert_eq!(down["transform"][1], "translateY(100%)");
    }

    #[test]
    fn test_custom_keyframes_win() {
        let mut custom = Keyframes::new();
        custom.insert("opacity".into(), vec!["0".into(), "1".into()]);
        assert_eq!(keyframes_or_default(&custom, Direction::Up), custom);
        assert!(keyframes_or_default(&Keyframes::new(), Direction::Up).contains_key("transform"));
    }
}
