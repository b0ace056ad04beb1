//! Per-column animation decisions between consecutive frames.
//!
//! Every column of the new frame is compared with the column that held the
//! same place in the previous frame. Matching by place keeps the decision
//! stable when leading places appear or vanish.

use std::fmt;

use serde::Serialize;

use crate::parts::{DigitColumn, PartData};

/// Which way the roll list travels.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// The value decreased.
    #[default]
    Up,
    /// The value increased.
    Down,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Up => f.write_str("up"),
            Self::Down => f.write_str("down"),
        }
    }
}

/// Why a column skipped its roll.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum EarlyReturn {
    OnlyOneDigit,
    SameHeadAndTail,
    SameDigits,
}

impl EarlyReturn {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::OnlyOneDigit => "only one digit",
            Self::SameHeadAndTail => "same head and tail",
            Self::SameDigits => "same digits",
        }
    }
}

impl fmt::Display for EarlyReturn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What the roller should do with one column.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransitionDirective {
    pub animate: bool,
    /// Cancel the in-flight animation and clear its residual style.
    pub cancel_prev_animation: bool,
    pub early_return: Option<EarlyReturn>,
    /// Index across the whole frame.
    pub global_index: usize,
    pub part_index: usize,
    pub digit_index: usize,
}

fn decide(
    new_direction: Direction,
    column: &DigitColumn,
    old_direction: Option<Direction>,
    old_column: Option<&DigitColumn>,
) -> (bool, bool, Option<EarlyReturn>) {
    if column.len() <= 1 {
        return (false, true, Some(EarlyReturn::OnlyOneDigit));
    }
    if old_direction != Some(new_direction) {
        return (true, false, None);
    }
    if column.head() == column.tail() {
        return (false, true, Some(EarlyReturn::SameHeadAndTail));
    }
    if old_column == Some(column) {
        return (false, false, Some(EarlyReturn::SameDigits));
    }
    (true, false, None)
}

/// Decide, for every column of `new_parts`, whether it rolls.
///
/// `old_direction` is `None` before the first frame, which counts as a
/// direction change.
#[must_use]
pub fn preprocess(
    new_direction: Direction,
    new_parts: &[PartData],
    old_direction: Option<Direction>,
    old_parts: &[PartData],
) -> Vec<Vec<TransitionDirective>> {
    let mut global_index = 0;
    new_parts
        .iter()
        .enumerate()
        .map(|(part_index, part)| {
            let old_part = old_parts.get(part_index);
            part.digits
                .iter()
                .enumerate()
                .map(|(digit_index, column)| {
                    let old_column = old_part.and_then(|p| p.column_at_place(column.place));
                    let (animate, cancel_prev_animation, early_return) =
                        decide(new_direction, column, old_direction, old_column);
                    if let Some(reason) = early_return {
                        tracing::trace!(part_index, digit_index, %reason, "column skips roll");
                    }
                    let directive = TransitionDirective {
                        animate,
                        cancel_prev_animation,
                        early_return,
                        global_index,
                        part_index,
                        digit_index,
                    };
                    global_index += 1;
                    directive
                })
                .collect()
        })
        .collect()
}

/// Number of columns that will roll.
#[must_use]
pub fn animated_count(directives: &[Vec<TransitionDirective>]) -> usize {
    directives.iter().flatten().filter(|d| d.animate).count()
}
