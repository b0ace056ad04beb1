//! Per-column roll control and completion aggregation.
//!
//! The [`Roller`] owns one [`RollerDigit`] per rendered column. Each update
//! applies the column's [`TransitionDirective`] through an
//! [`AnimationDriver`] and arms a completion tracker; the driver reports
//! finished animations back with the [`CompletionTicket`] it was given.
//! Tickets from an older update are ignored, so the latest update always
//! wins.

use std::collections::{HashMap, HashSet};

use serde::Serialize;

use super::{AnimationOptions, Keyframes, keyframes_or_default};
use crate::event::{
    COUNTER_ANIMATION_END, COUNTER_ANIMATION_START, DIGIT_ANIMATION_END, DIGIT_ANIMATION_START,
    emit_event,
};
use crate::parts::PartData;
use crate::transition::{Direction, TransitionDirective};

/// Stable identity of a rendered column: its part and its place.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ColumnId {
    pub part_index: usize,
    pub place: usize,
}

/// Handed to the driver with every started animation and returned to
/// [`Roller::on_finished`] when it completes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CompletionTicket {
    generation: u64,
    column: ColumnId,
}

impl CompletionTicket {
    #[must_use]
    pub fn column(&self) -> ColumnId {
        self.column
    }

    #[must_use]
    pub fn generation(&self) -> u64 {
        self.generation
    }
}

/// A running animation.
pub trait AnimationHandle {
    /// Stop the animation immediately. Must be idempotent.
    fn cancel(&mut self);
}

/// The rendering layer's animation primitive.
pub trait AnimationDriver {
    type Handle: AnimationHandle;

    /// Start rolling `column`. The driver reports completion by passing
    /// `ticket` to [`Roller::on_finished`].
    fn animate(
        &mut self,
        column: ColumnId,
        keyframes: &Keyframes,
        options: &AnimationOptions,
        ticket: CompletionTicket,
    ) -> Self::Handle;

    /// Remove residual inline styling left by a cancelled animation.
    fn clear_inline_style(&mut self, column: ColumnId);
}

fn event_data(column: ColumnId) -> String {
    serde_json::to_string(&column).unwrap_or_default()
}

/// One rendered column and its in-flight animation.
#[derive(Debug)]
pub struct RollerDigit<H> {
    column: ColumnId,
    animation: Option<H>,
    /// Update that started `animation`.
    started_in: u64,
}

impl<H: AnimationHandle> RollerDigit<H> {
    #[must_use]
    pub fn new(column: ColumnId) -> Self {
        Self {
            column,
            animation: None,
            started_in: 0,
        }
    }

    #[must_use]
    pub fn column(&self) -> ColumnId {
        self.column
    }

    /// Whether a roll started for this column has not reported completion.
    #[must_use]
    pub fn is_animating(&self) -> bool {
        self.animation.is_some()
    }

    fn cancel(&mut self) {
        if let Some(mut animation) = self.animation.take() {
            animation.cancel();
        }
    }

    /// Apply a directive. Returns whether a new animation started.
    pub fn apply<D>(
        &mut self,
        driver: &mut D,
        directive: &TransitionDirective,
        keyframes: &Keyframes,
        options: &AnimationOptions,
        ticket: CompletionTicket,
    ) -> bool
    where
        D: AnimationDriver<Handle = H>,
    {
        if directive.cancel_prev_animation {
            self.cancel();
            driver.clear_inline_style(self.column);
        }
        if !directive.animate {
            return false;
        }

        emit_event(DIGIT_ANIMATION_START, &event_data(self.column));
        if self.animation.is_some() {
            self.cancel();
            driver.clear_inline_style(self.column);
        }
        self.started_in = ticket.generation;
        self.animation = Some(driver.animate(self.column, keyframes, options, ticket));
        true
    }
}

/// Drives every column of a counter and aggregates their completion.
pub struct Roller<D: AnimationDriver> {
    driver: D,
    digits: Vec<Vec<RollerDigit<D::Handle>>>,
    generation: u64,
    expected: usize,
    finished: usize,
    pending: HashSet<ColumnId>,
}

impl<D: AnimationDriver> Roller<D> {
    #[must_use]
    pub fn new(driver: D) -> Self {
        Self {
            driver,
            digits: Vec::new(),
            generation: 0,
            expected: 0,
            finished: 0,
            pending: HashSet::new(),
        }
    }

    #[must_use]
    pub fn driver(&self) -> &D {
        &self.driver
    }

    pub fn driver_mut(&mut self) -> &mut D {
        &mut self.driver
    }

    #[must_use]
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Columns of the current update still rolling.
    #[must_use]
    pub fn pending(&self) -> usize {
        self.expected - self.finished
    }

    #[must_use]
    pub fn digits(&self) -> &[Vec<RollerDigit<D::Handle>>] {
        &self.digits
    }

    /// Reconcile columns with a new frame and start the rolls it asks for.
    ///
    /// Columns keep their animation across frames as long as their part and
    /// place survive. `keyframes` and `options` are per-digit matrices; a
    /// missing or empty keyframe entry uses the default roll for
    /// `direction`. Returns the number of columns started.
    pub fn update(
        &mut self,
        parts: &[PartData],
        directives: &[Vec<TransitionDirective>],
        direction: Direction,
        keyframes: &[Vec<Keyframes>],
        options: &[Vec<AnimationOptions>],
    ) -> usize {
        self.generation += 1;
        self.finished = 0;
        self.expected = 0;
        self.pending.clear();

        let mut previous: HashMap<ColumnId, RollerDigit<D::Handle>> = self
            .digits
            .drain(..)
            .flatten()
            .map(|digit| (digit.column, digit))
            .collect();

        let empty = Keyframes::new();
        let default_options = AnimationOptions::default();
        let mut started = 0;
        let mut digits = Vec::with_capacity(parts.len());

        for (part_index, part) in parts.iter().enumerate() {
            let mut row = Vec::with_capacity(part.digits.len());
            for (digit_index, column) in part.digits.iter().enumerate() {
                let id = ColumnId {
                    part_index,
                    place: column.place,
                };
                let mut digit = previous.remove(&id).unwrap_or_else(|| RollerDigit::new(id));

                if let Some(directive) = directives.get(part_index).and_then(|p| p.get(digit_index)) {
                    let frames = keyframes
                        .get(part_index)
                        .and_then(|p| p.get(digit_index))
                        .unwrap_or(&empty);
                    let frames = keyframes_or_default(frames, direction);
                    let opts = options
                        .get(part_index)
                        .and_then(|p| p.get(digit_index))
                        .unwrap_or(&default_options);
                    let ticket = CompletionTicket {
                        generation: self.generation,
                        column: id,
                    };
                    if digit.apply(&mut self.driver, directive, &frames, opts, ticket) {
                        started += 1;
                        self.pending.insert(id);
                    }
                }
                row.push(digit);
            }
            digits.push(row);
        }

        // Columns that left the frame stop immediately.
        for (_, mut digit) in previous {
            digit.cancel();
        }

        self.digits = digits;
        self.expected = started;
        if started > 0 {
            emit_event(COUNTER_ANIMATION_START, &self.generation.to_string());
        }
        tracing::debug!(generation = self.generation, started, "roller updated");
        started
    }

    /// A column left running by a later update still finishes its roll; it
    /// just no longer counts towards the current aggregate.
    fn settle_kept_column(&mut self, ticket: CompletionTicket) {
        let Some(digit) = self
            .digits
            .get_mut(ticket.column.part_index)
            .and_then(|row| row.iter_mut().find(|d| d.column == ticket.column))
        else {
            return;
        };
        if digit.animation.is_some() && digit.started_in == ticket.generation {
            digit.animation = None;
            emit_event(DIGIT_ANIMATION_END, &event_data(ticket.column));
        }
    }

    /// Record a finished animation. Returns `true` when this completion
    /// finishes the whole update.
    pub fn on_finished(&mut self, ticket: CompletionTicket) -> bool {
        if ticket.generation != self.generation || !self.pending.remove(&ticket.column) {
            self.settle_kept_column(ticket);
            tracing::debug!(
                generation = ticket.generation,
                current = self.generation,
                "ignoring stale completion"
            );
            return false;
        }

        if let Some(digit) = self
            .digits
            .get_mut(ticket.column.part_index)
            .and_then(|row| row.iter_mut().find(|d| d.column == ticket.column))
        {
            digit.animation = None;
        }

        emit_event(DIGIT_ANIMATION_END, &event_data(ticket.column));
        self.finished += 1;
        if self.finished == self.expected {
            emit_event(COUNTER_ANIMATION_END, &self.generation.to_string());
            return true;
        }
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parts::DigitColumn;
    use crate::transition::preprocess;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[derive(Default)]
    struct Log {
        started: Vec<CompletionTicket>,
        cancelled: usize,
        cleared: Vec<ColumnId>,
        calls: Vec<&'static str>,
    }

    struct Handle(Rc<RefCell<Log>>, bool);

    impl AnimationHandle for Handle {
        fn cancel(&mut self) {
            if !self.1 {
                self.1 = true;
                let mut log = self.0.borrow_mut();
                log.cancelled += 1;
                log.calls.push("cancel");
            }
        }
    }

    #[derive(Default)]
    struct Driver(Rc<RefCell<Log>>);

    impl AnimationDriver for Driver {
        type Handle = Handle;

        fn animate(
            &mut self,
            _column: ColumnId,
            keyframes: &Keyframes,
            _options: &AnimationOptions,
            ticket: CompletionTicket,
        ) -> Handle {
            assert!(keyframes.contains_key("transform"));
            let mut log = self.0.borrow_mut();
            log.started.push(ticket);
            log.calls.push("animate");
            drop(log);
            Handle(Rc::clone(&self.0), false)
        }

        fn clear_inline_style(&mut self, column: ColumnId) {
            let mut log = self.0.borrow_mut();
            log.cleared.push(column);
            log.calls.push("clear");
        }
    }

    fn frame(columns: &[&[&str]]) -> Vec<PartData> {
        let n = columns.len();
        vec![PartData::new(
            columns
                .iter()
                .enumerate()
                .map(|(i, data)| {
                    DigitColumn::new(data.iter().map(|s| (*s).to_string()).collect(), n - i)
                })
                .collect(),
        )]
    }

    fn update(roller: &mut Roller<Driver>, parts: &[PartData], old: &[PartData]) -> usize {
        let directives = preprocess(Direction::Down, parts, None, old);
        roller.update(parts, &directives, Direction::Down, &[], &[])
    }

    #[test]
    fn test_aggregate_fires_once() {
        let log = Rc::new(RefCell::new(Log::default()));
        let mut roller = Roller::new(Driver(Rc::clone(&log)));
        let parts = frame(&[&["1", "0"], &["0", "9"]]);
        assert_eq!(update(&mut roller, &parts, &[]), 2);
        assert_eq!(roller.pending(), 2);

        let tickets = log.borrow().started.clone();
        assert!(!roller.on_finished(tickets[0]));
        assert!(!roller.on_finished(tickets[0]), "duplicate ignored");
        assert!(roller.on_finished(tickets[1]));
        assert_eq!(roller.pending(), 0);
    }

    #[test]
    fn test_stale_tickets_ignored() {
        let log = Rc::new(RefCell::new(Log::default()));
        let mut roller = Roller::new(Driver(Rc::clone(&log)));
        let first = frame(&[&["1", "2"]]);
        update(&mut roller, &first, &[]);
        let stale = log.borrow().started[0];

        let second = frame(&[&["2", "3"]]);
        update(&mut roller, &second, &first);
        assert_eq!(log.borrow().cancelled, 1, "previous roll cancelled");
        assert!(!roller.on_finished(stale));
        assert_eq!(roller.pending(), 1);

        let fresh = log.borrow().started[1];
        assert!(roller.on_finished(fresh));
    }

    #[test]
    fn test_replacing_roll_clears_style_first() {
        let log = Rc::new(RefCell::new(Log::default()));
        let mut roller = Roller::new(Driver(Rc::clone(&log)));
        let first = frame(&[&["1", "2"]]);
        update(&mut roller, &first, &[]);
        log.borrow_mut().calls.clear();

        let second = frame(&[&["2", "3"]]);
        let directives = preprocess(Direction::Down, &second, Some(Direction::Down), &first);
        assert!(directives[0][0].animate);
        assert!(!directives[0][0].cancel_prev_animation);
        roller.update(&second, &directives, Direction::Down, &[], &[]);
        assert_eq!(log.borrow().calls, ["cancel", "clear", "animate"]);
    }

    #[test]
    fn test_fresh_roll_skips_clear() {
        let log = Rc::new(RefCell::new(Log::default()));
        let mut roller = Roller::new(Driver(Rc::clone(&log)));
        update(&mut roller, &frame(&[&["1", "2"]]), &[]);
        assert_eq!(log.borrow().calls, ["animate"]);
    }

    #[test]
    fn test_kept_column_settles_on_earlier_ticket() {
        let log = Rc::new(RefCell::new(Log::default()));
        let mut roller = Roller::new(Driver(Rc::clone(&log)));
        let parts = frame(&[&["1", "2"]]);
        update(&mut roller, &parts, &[]);
        let ticket = log.borrow().started[0];

        // same digits in the same direction: the roll keeps running
        let directives = preprocess(Direction::Down, &parts, Some(Direction::Down), &parts);
        assert_eq!(roller.update(&parts, &directives, Direction::Down, &[], &[]), 0);
        assert!(roller.digits()[0][0].is_animating());

        assert!(!roller.on_finished(ticket));
        assert!(!roller.digits()[0][0].is_animating());
        assert_eq!(log.borrow().cancelled, 0);
    }

    #[test]
    fn test_single_glyph_clears_style() {
        let log = Rc::new(RefCell::new(Log::default()));
        let mut roller = Roller::new(Driver(Rc::clone(&log)));
        let parts = frame(&[&["7"]]);
        assert_eq!(update(&mut roller, &parts, &[]), 0);
        assert_eq!(log.borrow().cleared, [ColumnId { part_index: 0, place: 1 }]);
        assert!(log.borrow().started.is_empty());
    }

    #[test]
    fn test_removed_columns_are_cancelled() {
        let log = Rc::new(RefCell::new(Log::default()));
        let mut roller = Roller::new(Driver(Rc::clone(&log)));
        let wide = frame(&[&["1", "0"], &["0", "9"]]);
        update(&mut roller, &wide, &[]);
        let narrow = frame(&[&["9"]]);
        update(&mut roller, &narrow, &wide);
        // place 2 removed, place 1 cancelled for its single glyph
        assert_eq!(log.borrow().cancelled, 2);
        assert_eq!(roller.digits()[0].len(), 1);
        assert!(!roller.digits()[0][0].is_animating());
    }
}
