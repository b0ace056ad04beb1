//! Snapshot tests for frames produced by the counter pipeline.
//!
//! Frames and transition directives are serialized to JSON and compared
//! against inline insta snapshots, so any change in column layout or roll
//! decisions shows up as a reviewable diff.

use rolling_counter::{Counter, NumberCounter, StringCounter};
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

#[test]
fn snapshot_nine_to_ten_frame() {
    init_logging();
    let counter = number_counter(9.0, 10.0);
    insta::assert_json_snapshot!(counter.parts(), @r#"
    [
      {
        "digits": [
          {
            "data": [
              "1",
              "0"
            ],
            "place": 2
          },
          {
            "data": [
              "0",
              "9"
            ],
            "place": 1
          }
        ]
      }
    ]
    "#);
}

#[test]
fn snapshot_same_direction_directives() {
    init_logging();
    let mut counter = number_counter(100.0, 101.0);
    counter.set_value(102.0).unwrap();
    insta::assert_json_snapshot!(counter.transitions(), @r#"
    [
      [
        {
          "animate": false,
          "cancelPrevAnimation": true,
          "earlyReturn": "only-one-digit",
          "globalIndex": 0,
          "partIndex": 0,
          "digitIndex": 0
        },
        {
          "animate": false,
          "cancelPrevAnimation": true,
          "earlyReturn": "only-one-digit",
          "globalIndex": 1,
          "partIndex": 0,
          "digitIndex": 1
        },
        {
          "animate": true,
          "cancelPrevAnimation": false,
          "earlyReturn": null,
          "globalIndex": 2,
          "partIndex": 0,
          "digitIndex": 2
        }
      ]
    ]
    "#);
}

#[test]
fn snapshot_text_frame() {
    init_logging();
    let mut counter = Counter::new(StringCounter::new());
    counter.set_parts_options_json(r#"{"sampleCount": 2}"#).unwrap();
    counter.set_initial_value("ab").unwrap();
    counter.set_value("ba").unwrap();
    counter.connect().unwrap();
    insta::assert_json_snapshot!(counter.parts(), @r#"
    [
      {
        "digits": [
          {
            "data": [
              "b",
              "a"
            ],
            "place": 2
          },
          {
            "data": [
              "a",
              "b"
            ],
            "place": 1
          }
        ]
      }
    ]
    "#);
}
