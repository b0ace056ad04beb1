//! Fuzz target for counter attribute parsing.
//!
//! Arbitrary attribute text may be rejected but must never panic.

#![no_main]

use libfuzzer_sys::fuzz_target;
use rolling_counter::{Counter, DurationCounter, NumberCounter};

fuzz_target!(|data: &str| {
    let mut number = Counter::new(NumberCounter::default());
    let _ = number.set_parts_options_json(data);
    let _ = number.set_value(data);
    let _ = number.connect();

    let mut duration = Counter::new(DurationCounter::default());
    let _ = duration.set_precision_json(data);
    let _ = duration.connect();
    let _ = duration.set_value(data);
});
