//! `rolling_counter` - per-digit rolling transitions for counters
//!
//! Turns an old and a new value into aligned digit columns to roll through,
//! and decides per column whether a roll must start, be cancelled or be
//! skipped. The same pipeline runs over native floats, arbitrary-precision
//! decimals, grapheme-aware text and calendar durations.
//!
//! ```
//! use rolling_counter::{Counter, NumberCounter};
//!
//! let mut counter = Counter::new(NumberCounter::default());
//! counter.set_initial_value(9.0)?;
//! counter.set_value(10.0)?;
//! counter.connect()?;
//!
//! let places: Vec<usize> = counter.parts()[0].digits.iter().map(|d| d.place).collect();
//! assert_eq!(places, [2, 1]);
//! # Ok::<(), rolling_counter::Error>(())
//! ```

// Crate-level lint configuration
#![forbid(unsafe_code)]
#![allow(clippy::cast_possible_truncation)] // Millisecond and sample-count casts
#![allow(clippy::cast_sign_loss)] // Millisecond and sample-count casts
#![allow(clippy::cast_precision_loss)] // Sample indices as f64
#![allow(clippy::cast_possible_wrap)] // Place ids as i64
#![allow(clippy::module_name_repetitions)] // Allow PartsOptions etc
#![allow(clippy::missing_errors_doc)] // Docs WIP
#![allow(clippy::missing_panics_doc)] // Docs WIP
#![allow(clippy::missing_const_for_fn)] // Many functions could be const, not critical
#![allow(clippy::doc_markdown)] // Allow technical names without backticks
#![allow(clippy::use_self)] // Allow explicit type names in impl blocks
#![allow(clippy::format_push_string)] // format! with push_str is fine
#![allow(clippy::needless_pass_by_value)] // Allow pass by value for small Copy types
#![allow(clippy::suboptimal_flops)] // Standard math notation is clearer than mul_add
#![allow(clippy::inherent_to_string)] // to_string methods are convenient
#![allow(clippy::should_implement_trait)] // from_str naming is intentional
#![allow(clippy::collapsible_if)] // Sometimes nested ifs are clearer
#![allow(clippy::cast_lossless)] // as casts are fine for primitive widening
#![allow(clippy::items_after_statements)] // Common pattern in tests
#![allow(clippy::float_cmp)] // Exact comparisons of parsed option values

pub mod animation;
pub mod anybase;
pub mod color;
pub mod counter;
pub mod duration;
pub mod error;
pub mod event;
pub mod locale;
pub mod number;
pub mod parts;
pub mod registry;
pub mod resolve;
pub mod sampler;
pub mod style;
pub mod transition;
pub mod unicode;

// Re-export core types at crate root
pub use error::{Error, Result};
pub use event::{
    LogLevel, clear_event_callback, emit_event, emit_log, set_event_callback, set_log_callback,
};
pub use number::{NumberAdapter, NumericValue};
pub use parts::{DigitColumn, PartData, PartsOptions, PartsOptionsPatch};
pub use registry::AdapterRegistry;
pub use transition::{Direction, TransitionDirective};
pub use unicode::StringAdapter;

// Re-export counter types
pub use counter::{Counter, DurationCounter, NumberCounter, StringCounter};

// Re-export animation types
pub use animation::{AnimationDriver, AnimationHandle, AnimationOptions, Roller};
