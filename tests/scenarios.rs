//! End-to-end counter scenarios.
//!
//! Each test drives a counter through its public surface only: seed,
//! connect, change the value and inspect the frame, transitions and aria
//! label that come out.

#![allow(clippy::float_cmp)] // Exact float comparison is intentional in tests

use chrono::{DateTime, TimeDelta, Utc};
use rolling_counter::anybase::Alphabet;
use rolling_counter::duration::{DurationPart, DurationPrecision};
use rolling_counter::locale::{Locale, LocaleNumber};
use rolling_counter::number::{DecimalConfig, register_decimal};
use rolling_counter::transition::EarlyReturn;
use rolling_counter::unicode::CharAdapter;
use rolling_counter::{
    AdapterRegistry, Counter, Direction, DurationCounter, NumberCounter, StringAdapter, StringCounter,
};
use std::sync::Arc;
use tracing::Level;

fn init_logging() {
    let _ = tracing_subscriber::fmt()
        .with_max_level(Level::DEBUG)
        .with_test_writer()
        .try_init();
}

fn number_counter(initial: f64, value: f64) -> Counter<NumberCounter> {
    let mut counter = Counter::new(NumberCounter::default());
    counter.set_initial_value(initial).unwrap();
    counter.set_value(value).unwrap();
    counter.connect().unwrap();
    counter
}

fn column_data(counter: &Counter<NumberCounter>, part: usize) -> Vec<Vec<String>> {
    counter.parts()[part]
        .digits
        .iter()
        .map(|d| d.data.clone())
        .collect()
}

// ============================================================================
// Numbers
// ============================================================================

#[test]
fn test_nine_to_ten_grows_a_place() {
    init_logging();
    let counter = number_counter(9.0, 10.0);

    assert_eq!(counter.direction(), Direction::Down);
    let part = &counter.parts()[0];
    let places: Vec<usize> = part.digits.iter().map(|d| d.place).collect();
    assert_eq!(places, [2, 1]);
    assert_eq!(column_data(&counter, 0), [vec!["1", "0"], vec!["0", "9"]]);
    assert_eq!(counter.settled_text(), "10");
    assert_eq!(counter.aria_label(), "10");

    let animated: Vec<bool> = counter.transitions()[0].iter().map(|d| d.animate).collect();
    assert_eq!(animated, [true, true]);
}

#[test]
fn test_repeated_direction_skips_unchanged_columns() {
    init_logging();
    let mut counter = number_counter(100.0, 101.0);
    counter.set_value(102.0).unwrap();

    assert_eq!(counter.direction(), Direction::Down);
    let directives = &counter.transitions()[0];
    assert_eq!(directives.len(), 3);
    assert_eq!(directives[0].early_return, Some(EarlyReturn::OnlyOneDigit));
    assert_eq!(directives[1].early_return, Some(EarlyReturn::OnlyOneDigit));
    assert!(directives[2].animate);
    assert_eq!(directives[2].global_index, 2);
}

#[test]
fn test_reversal_restarts_every_rolling_column() {
    init_logging();
    let mut counter = number_counter(10.0, 20.0);
    counter.set_value(15.0).unwrap();

    assert_eq!(counter.direction(), Direction::Up);
    assert_eq!(counter.derived().old_direction, Some(Direction::Down));
    let directives = &counter.transitions()[0];
    assert!(directives[1].animate);
    assert!(!directives[1].cancel_prev_animation);
    assert_eq!(counter.settled_text(), "15");
}

#[test]
fn test_fraction_columns_follow_separator() {
    init_logging();
    let mut counter = Counter::new(NumberCounter::default());
    counter.set_parts_options_json(r#"{"sampleCount": 2}"#).unwrap();
    counter.set_initial_value(1.5).unwrap();
    counter.set_value(2.25).unwrap();
    counter.connect().unwrap();

    let part = &counter.parts()[0];
    let places: Vec<usize> = part.digits.iter().map(|d| d.place).collect();
    assert_eq!(places, [4, 3, 2, 1]);
    assert_eq!(part.digits[1].data, ["."]);
    // the shorter fraction is padded on the right
    assert_eq!(part.digits[3].data, ["5", "0"]);
    assert_eq!(counter.settled_text(), "2.25");
}

#[test]
fn test_locale_formatting_changes_separator() {
    init_logging();
    let mut counter = Counter::new(NumberCounter::default());
    counter.set_locale(Locale::parse("de-DE")).unwrap();
    counter
        .set_locale_number(LocaleNumber::from_attribute(Some("true")))
        .unwrap();
    counter.set_value(1234.5).unwrap();
    counter.connect().unwrap();

    assert_eq!(counter.parts_options().decimal_separator, ",");
    assert_eq!(counter.settled_text(), "1.234,5");
}

#[test]
fn test_big_decimals_keep_every_digit() {
    init_logging();
    let mut registry = AdapterRegistry::new();
    register_decimal(&mut registry, DecimalConfig::default());
    registry.set_number_adapter("decimal");

    let mut counter = Counter::with_registry(NumberCounter::default(), &registry);
    counter.set_initial_value("99999999999999999999").unwrap();
    counter.set_value("100000000000000000000").unwrap();
    counter.connect().unwrap();

    assert_eq!(counter.parts()[0].digits.len(), 21);
    assert_eq!(counter.settled_text(), "100000000000000000000");
}

// ============================================================================
// Connect and seeding
// ============================================================================

#[test]
fn test_connect_without_initial_value_does_not_roll() {
    init_logging();
    let mut counter = Counter::new(NumberCounter::default());
    counter.set_value(5.0).unwrap();
    assert!(counter.parts().is_empty());
    counter.connect().unwrap();

    assert_eq!(counter.adapters().number.to_number(counter.old_value()), 5.0);
    assert!(counter.transitions().iter().flatten().all(|d| !d.animate));

    counter.set_value(7.0).unwrap();
    assert_eq!(counter.adapters().number.to_number(counter.old_value()), 5.0);
    assert!(counter.transitions().iter().flatten().any(|d| d.animate));
}

#[test]
fn test_options_change_rebuilds_without_rolling() {
    init_logging();
    let mut counter = number_counter(1.0, 2.0);
    counter
        .set_parts_options_json(r#"{"minPlaces": [3, 0]}"#)
        .unwrap();
    assert_eq!(counter.parts()[0].digits.len(), 3);
    assert_eq!(counter.settled_text(), "002");
}

// ============================================================================
// Text
// ============================================================================

#[test]
fn test_alphabet_maps_both_ways() {
    init_logging();
    let strings: Arc<dyn StringAdapter> = Arc::new(CharAdapter);
    let alphabet = Alphabet::from_values(strings, "abc", "ab");
    assert_eq!(alphabet.units(), ["\0", "a", "b", "c"]);

    for text in ["ab", "abc", "cab", "a"] {
        let decimal = alphabet.to_decimal(text).unwrap();
        assert_eq!(alphabet.from_decimal(&decimal).unwrap(), text);
    }
    assert!(alphabet.to_decimal("abd").is_err());
}

#[test]
fn test_text_counter_rolls_from_initial_text() {
    init_logging();
    let mut counter = Counter::new(StringCounter::new());
    counter.set_initial_value("ab").unwrap();
    counter.set_value("abc").unwrap();
    counter.connect().unwrap();

    assert_eq!(counter.direction(), Direction::Down);
    assert_eq!(counter.settled_text(), "abc");
    assert_eq!(counter.aria_label(), "abc");
    assert!(counter.transitions()[0].iter().any(|d| d.animate));
}

// ============================================================================
// Durations
// ============================================================================

fn start() -> DateTime<Utc> {
    DateTime::from_timestamp_millis(1_704_067_200_000).unwrap()
}

#[test]
fn test_duration_splits_into_units() {
    init_logging();
    let mut counter = Counter::new(DurationCounter::default());
    counter
        .set_value((start(), start() + TimeDelta::milliseconds(90_061_000)))
        .unwrap();
    counter.connect().unwrap();

    let settled: Vec<String> = counter.parts().iter().map(|p| p.tail_text()).collect();
    assert_eq!(settled, ["1", "1", "1", "1"]);
    assert_eq!(counter.aria_label(), "P1DT1H1M1S");
    assert_eq!(counter.role(), Some("timer"));
}

#[test]
fn test_duration_precision_and_labels() {
    init_logging();
    let precision = DurationPrecision {
        min: DurationPart::Minute,
        max: DurationPart::Hour,
    };
    let mut counter = Counter::new(DurationCounter::new(precision));
    counter.set_locale(Locale::parse("fr-FR")).unwrap();
    counter
        .set_value(r#"["2024-01-01T00:00:00Z", "2024-01-01T02:30:20Z"]"#)
        .unwrap();
    counter.connect().unwrap();

    let settled: Vec<String> = counter.parts().iter().map(|p| p.tail_text()).collect();
    // leftover seconds round the distance up to the next minute
    assert_eq!(settled, ["2", "31"]);
    assert_eq!(counter.part_labels(), ["heure", "minute"]);
    assert_eq!(counter.aria_label(), "PT2H31M");
}
