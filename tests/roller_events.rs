//! Roller lifecycle against a scripted animation driver.
//!
//! The event callback is process-wide, so everything that observes events
//! lives in a single test.

use std::sync::{Arc, Mutex};

use rolling_counter::animation::{
    AnimationDriver, AnimationHandle, AnimationOptions, ColumnId, CompletionTicket, Keyframes, Roller,
};
use rolling_counter::event::{
    COUNTER_ANIMATION_END, COUNTER_ANIMATION_START, DIGIT_ANIMATION_END, DIGIT_ANIMATION_START,
};
use rolling_counter::{Counter, NumberCounter, clear_event_callback, set_event_callback};
use tracing::Level;

fn init_logging() {
    let _ = tracing_subscriber::fmt()
        .with_max_level(Level::DEBUG)
        .with_test_writer()
        .try_init();
}

#[derive(Default)]
struct Scripted {
    tickets: Vec<CompletionTicket>,
    cancelled: Arc<Mutex<usize>>,
    cleared: Vec<ColumnId>,
}

struct Handle(Arc<Mutex<usize>>);

impl AnimationHandle for Handle {
    fn cancel(&mut self) {
        if let Ok(mut count) = self.0.lock() {
            *count += 1;
        }
    }
}

impl AnimationDriver for Scripted {
    type Handle = Handle;

    fn animate(
        &mut self,
        _column: ColumnId,
        keyframes: &Keyframes,
        _options: &AnimationOptions,
        ticket: CompletionTicket,
    ) -> Handle {
        assert!(!keyframes.is_empty());
        self.tickets.push(ticket);
        Handle(Arc::clone(&self.cancelled))
    }

    fn clear_inline_style(&mut self, column: ColumnId) {
        self.cleared.push(column);
    }
}

fn counter(initial: f64, value: f64) -> Counter<NumberCounter> {
    let mut counter = Counter::new(NumberCounter::default());
    counter.set_initial_value(initial).unwrap();
    counter.set_value(value).unwrap();
    counter.connect().unwrap();
    counter
}

#[test]
fn test_roller_lifecycle_and_events() {
    init_logging();
    let events: Arc<Mutex<Vec<String>>> = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&events);
    set_event_callback(move |name, _data| {
        if let Ok(mut log) = sink.lock() {
            log.push(name.to_string());
        }
    });

    let mut counter = counter(9.0, 10.0);
    let mut roller = Roller::new(Scripted::default());
    assert_eq!(counter.drive(&mut roller), 2);
    let first: Vec<CompletionTicket> = roller.driver_mut().tickets.drain(..).collect();
    assert_eq!(first.len(), 2);

    // finishing one column leaves the update open
    assert!(!roller.on_finished(first[0]));
    assert_eq!(roller.pending(), 1);

    // a new value supersedes the outstanding column
    counter.set_value(8.0).unwrap();
    assert!(counter.drive(&mut roller) > 0);
    assert!(!roller.on_finished(first[1]), "stale ticket must be ignored");

    let second: Vec<CompletionTicket> = roller.driver_mut().tickets.drain(..).collect();
    let mut done = false;
    for ticket in &second {
        done = roller.on_finished(*ticket);
    }
    assert!(done);
    assert_eq!(roller.pending(), 0);
    // repeating a ticket does not count twice
    assert!(!roller.on_finished(second[0]));

    clear_event_callback();
    let log = events.lock().unwrap();
    let count = |name: &str| log.iter().filter(|e| e.as_str() == name).count();
    assert_eq!(count(COUNTER_ANIMATION_START), 2);
    assert_eq!(count(COUNTER_ANIMATION_END), 1);
    assert_eq!(count(DIGIT_ANIMATION_START), 2 + second.len());
    assert_eq!(count(DIGIT_ANIMATION_END), 1 + second.len());
}
