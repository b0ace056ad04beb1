//! Per-part, per-digit and per-cell option resolution.
//!
//! Styles, animation options and keyframes can be given as one value for
//! everything, a list indexed by part, nested lists indexed by part then
//! digit (then cell), or a getter computing any of those from the current
//! frame. [`Resolvable`] captures that shape once and flattens it to a
//! matrix matching the frame.

use std::borrow::Cow;
use std::fmt;
use std::sync::Arc;

use serde::de::DeserializeOwned;

use crate::error::Result;
use crate::number::NumericValue;
use crate::parts::PartData;
use crate::transition::{Direction, TransitionDirective};

/// Everything a getter may inspect.
#[derive(Clone, Copy, Debug)]
pub struct ResolveContext<'a> {
    pub parts: &'a [PartData],
    pub direction: Direction,
    /// `(new, old)` value that produced this frame.
    pub value: (&'a NumericValue, &'a NumericValue),
    pub transitions: &'a [Vec<TransitionDirective>],
}

/// Computes an option from the current frame.
pub type Getter<T> = Arc<dyn Fn(&ResolveContext<'_>) -> Resolvable<T> + Send + Sync>;

/// An option given for the whole counter, per part, per digit or per cell.
pub enum Resolvable<T> {
    Value(T),
    List(Vec<Resolvable<T>>),
    Dynamic(Getter<T>),
}

impl<T: Clone> Clone for Resolvable<T> {
    fn clone(&self) -> Self {
        match self {
            Self::Value(v) => Self::Value(v.clone()),
            Self::List(items) => Self::List(items.clone()),
            Self::Dynamic(getter) => Self::Dynamic(Arc::clone(getter)),
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for Resolvable<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Value(v) => f.debug_tuple("Value").field(v).finish(),
            Self::List(items) => f.debug_tuple("List").field(items).finish(),
            Self::Dynamic(_) => f.write_str("Dynamic(..)"),
        }
    }
}

impl<T: Default> Default for Resolvable<T> {
    fn default() -> Self {
        Self::Value(T::default())
    }
}

impl<T> From<T> for Resolvable<T> {
    fn from(value: T) -> Self {
        Self::Value(value)
    }
}

impl<T> Resolvable<T> {
    /// Wrap a getter.
    pub fn dynamic<F>(getter: F) -> Self
    where
        F: Fn(&ResolveContext<'_>) -> Resolvable<T> + Send + Sync + 'static,
    {
        Self::Dynamic(Arc::new(getter))
    }
}

impl<T: DeserializeOwned> Resolvable<T> {
    /// Interpret JSON: arrays become lists, anything else a single value.
    pub fn from_json_value(value: serde_json::Value) -> Result<Self> {
        match value {
            serde_json::Value::Array(items) => Ok(Self::List(
                items
                    .into_iter()
                    .map(Self::from_json_value)
                    .collect::<Result<_>>()?,
            )),
            other => Ok(Self::Value(serde_json::from_value(other)?)),
        }
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Self::from_json_value(serde_json::from_str(json)?)
    }
}

impl<T: Clone + Default> Resolvable<T> {
    fn settle(&self, ctx: &ResolveContext<'_>) -> Cow<'_, Self> {
        let mut current = Cow::Borrowed(self);
        while let Self::Dynamic(getter) = current.as_ref() {
            current = Cow::Owned(getter(ctx));
        }
        current
    }

    /// Entry `index` of a list; a plain value applies to every index.
    fn select(&self, ctx: &ResolveContext<'_>, index: usize) -> Option<Self> {
        match self.settle(ctx).into_owned() {
            Self::List(mut items) => {
                if index < items.len() {
                    Some(items.swap_remove(index))
                } else {
                    None
                }
            }
            other => Some(other),
        }
    }

    fn leaf(&self, ctx: &ResolveContext<'_>) -> T {
        match self.settle(ctx).as_ref() {
            Self::Value(v) => v.clone(),
            _ => T::default(),
        }
    }

    /// One entry per part.
    #[must_use]
    pub fn resolve_parts(&self, ctx: &ResolveContext<'_>) -> Vec<T> {
        let root = self.settle(ctx);
        (0..ctx.parts.len())
            .map(|i| root.select(ctx, i).map(|r| r.leaf(ctx)).unwrap_or_default())
            .collect()
    }

    /// One entry per digit column, grouped by part.
    #[must_use]
    pub fn resolve_digits(&self, ctx: &ResolveContext<'_>) -> Vec<Vec<T>> {
        let root = self.settle(ctx);
        ctx.parts
            .iter()
            .enumerate()
            .map(|(i, part)| {
                let part_option = root.select(ctx, i);
                (0..part.digits.len())
                    .map(|j| {
                        part_option
                            .as_ref()
                            .and_then(|p| p.select(ctx, j))
                            .map(|r| r.leaf(ctx))
                            .unwrap_or_default()
                    })
                    .collect()
            })
            .collect()
    }

    /// One entry per glyph of every column.
    #[must_use]
    pub fn resolve_cells(&self, ctx: &ResolveContext<'_>) -> Vec<Vec<Vec<T>>> {
        let root = self.settle(ctx);
        ctx.parts
            .iter()
            .enumerate()
            .map(|(i, part)| {
                let part_option = root.select(ctx, i);
                part.digits
                    .iter()
                    .enumerate()
                    .map(|(j, column)| {
                        let digit_option = part_option.as_ref().and_then(|p| p.select(ctx, j));
                        (0..column.data.len())
                            .map(|k| {
                                digit_option
                                    .as_ref()
                                    .and_then(|d| d.select(ctx, k))
                                    .map(|r| r.leaf(ctx))
                                    .unwrap_or_default()
                            })
                            .collect()
                    })
                    .collect()
            })
            .collect()
    }
}

/// Overlay `overlay` onto `base` entry by entry; entries missing from either
/// side are left alone.
pub fn merge_digit_matrix<T, F>(base: &mut [Vec<T>], overlay: &[Vec<T>], mut merge: F)
where
    F: FnMut(&mut T, &T),
{
    for (base_part, overlay_part) in base.iter_mut().zip(overlay) {
        for (b, o) in base_part.iter_mut().zip(overlay_part) {
            merge(b, o);
        }
    }
}
