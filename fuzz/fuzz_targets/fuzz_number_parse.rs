//! Fuzz target for number adapters.
//!
//! `create` must never panic and must accept its own `to_string` output.

#![no_main]

use libfuzzer_sys::fuzz_target;
use rolling_counter::number::{DecimalAdapter, DecimalConfig, FloatAdapter, NumberAdapter};
use rolling_counter::sampler::sample;

fuzz_target!(|data: &str| {
    let adapters: [&dyn NumberAdapter; 2] = [&FloatAdapter, &DecimalAdapter::new(DecimalConfig::default())];
    for na in adapters {
        let value = na.create(data);
        let text = na.to_string(&value);
        let again = na.create(&text);
        assert!(na.eq(&value, &again), "{text} did not round-trip");

        let zero = na.from_f64(0.0);
        let _ = sample(na, &value, &zero, 4);
    }
});
