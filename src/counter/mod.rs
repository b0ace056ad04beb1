//! The counter orchestrator.
//!
//! A [`Counter`] owns the user-facing state of one widget and the frame
//! derived from it. Every mutation records which properties changed and runs
//! one explicit recompute, which always derives in the same order:
//!
//! 1. old value
//! 2. direction
//! 3. parts
//! 4. transitions
//! 5. aria label
//!
//! What differs between a number, a text and a duration counter lives in a
//! [`CounterFlavor`].
//!
//! # Examples
//!
//! ```
//! use rolling_counter::counter::{Counter, NumberCounter};
//!
//! let mut counter = Counter::new(NumberCounter::default());
//! counter.set_value(9.0).unwrap();
//! counter.connect().unwrap();
//! counter.set_value(10.0).unwrap();
//!
//! let part = &counter.parts()[0];
//! assert_eq!(part.digits.len(), 2);
//! assert_eq!(counter.aria_label(), "10");
//! ```

mod attribute;
mod duration;
mod number;
mod presentation;
mod string;

use std::fmt;
use std::mem;
use std::sync::Arc;

use bitflags::bitflags;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::locale::Locale;
use crate::number::{NumberAdapter, NumericValue};
use crate::parts::{PartData, PartsOptions, PartsOptionsPatch, build_parts};
use crate::registry::{AdapterRegistry, default_registry};
use crate::resolve::ResolveContext;
use crate::sampler::sample;
use crate::transition::{Direction, TransitionDirective, animated_count, preprocess};
use crate::unicode::StringAdapter;

pub use attribute::{from_attribute, parse_json_string, to_attribute};
pub use duration::{DurationCounter, DurationInput};
pub use number::{NumberCounter, NumberInput};
pub use presentation::{Presentation, ResolvedPresentation};
pub use string::StringCounter;

bitflags! {
    /// Properties touched since the last recompute.
    #[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Hash)]
    pub struct ChangedProperties: u16 {
        const VALUE         = 0x01;
        const INITIAL_VALUE = 0x02;
        const PARTS_OPTIONS = 0x04;
        const LOCALE        = 0x08;
        /// Number or string adapter replaced.
        const ADAPTERS      = 0x10;
        /// A flavour-specific option (locale number format, precision).
        const FLAVOR        = 0x20;
        const ARIA          = 0x40;
    }
}

impl ChangedProperties {
    /// Whether the frame must be rebuilt.
    #[must_use]
    pub fn rebuilds_parts(self) -> bool {
        self.intersects(Self::VALUE | Self::PARTS_OPTIONS | Self::LOCALE | Self::ADAPTERS | Self::FLAVOR)
    }

    /// Whether the flavour must refresh its locale-dependent caches.
    #[must_use]
    pub fn refreshes_flavor(self) -> bool {
        self.intersects(Self::LOCALE | Self::ADAPTERS | Self::FLAVOR)
    }
}

/// Politeness of screen reader announcements.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AriaLive {
    Off,
    #[default]
    Polite,
    Assertive,
}

impl AriaLive {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Off => "off",
            Self::Polite => "polite",
            Self::Assertive => "assertive",
        }
    }
}

/// The adapters one counter computes with.
#[derive(Clone, Debug)]
pub struct Adapters {
    pub number: Arc<dyn NumberAdapter>,
    pub strings: Arc<dyn StringAdapter>,
}

impl Adapters {
    #[must_use]
    pub fn from_registry(registry: &AdapterRegistry) -> Self {
        Self {
            number: registry.number_adapter(),
            strings: registry.string_adapter(),
        }
    }
}

impl Default for Adapters {
    fn default() -> Self {
        Self::from_registry(&default_registry())
    }
}

/// What a flavour hook may read.
#[derive(Clone, Copy, Debug)]
pub struct FlavorContext<'a> {
    pub adapters: &'a Adapters,
    pub locale: &'a Locale,
}

/// A converted value, optionally with the old value the flavour wants to
/// roll from.
#[derive(Clone, Debug, PartialEq)]
pub struct ValueChange {
    pub value: NumericValue,
    pub old_value: Option<NumericValue>,
}

/// Values a flavour produces when the counter connects.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Seed {
    pub initial_value: Option<NumericValue>,
    pub value: NumericValue,
}

/// Behaviour that differs between counter kinds.
pub trait CounterFlavor: fmt::Debug {
    /// What callers pass to [`Counter::set_value`].
    type Input: Clone + fmt::Debug;

    /// ARIA role reported by the widget.
    fn role(&self) -> Option<&'static str> {
        None
    }

    /// Refresh caches that depend on the locale or flavour options.
    fn prepare(&mut self, _ctx: &FlavorContext<'_>) {}

    /// Effective parts options: flavour defaults with the user patch on top.
    fn parts_options(&self, _ctx: &FlavorContext<'_>, patch: &PartsOptionsPatch) -> PartsOptions {
        PartsOptions::default().with_patch(patch)
    }

    fn convert_initial(&mut self, ctx: &FlavorContext<'_>, input: Self::Input) -> Result<NumericValue>;

    fn convert_value(&mut self, ctx: &FlavorContext<'_>, input: Self::Input) -> Result<ValueChange>;

    /// Convert the inputs received before connecting. A missing value is
    /// zero.
    fn connect(
        &mut self,
        ctx: &FlavorContext<'_>,
        initial: Option<Self::Input>,
        value: Option<Self::Input>,
    ) -> Result<Seed> {
        let initial_value = initial.map(|input| self.convert_initial(ctx, input)).transpose()?;
        let value = match value {
            Some(input) => self.convert_value(ctx, input)?.value,
            None => ctx.adapters.number.from_f64(0.0),
        };
        Ok(Seed { initial_value, value })
    }

    /// Split samples into parts that roll independently.
    fn sample_split(&self, _ctx: &FlavorContext<'_>, samples: Vec<NumericValue>) -> Vec<Vec<NumericValue>> {
        vec![samples]
    }

    fn sample_to_string(&self, ctx: &FlavorContext<'_>, value: &NumericValue) -> Result<String> {
        Ok(ctx.adapters.number.to_string(value))
    }

    fn aria_label(&self, ctx: &FlavorContext<'_>, value: &NumericValue) -> String {
        ctx.adapters.number.to_string(value)
    }

    /// Text shown after each part, e.g. duration units.
    fn part_labels(&self, _ctx: &FlavorContext<'_>) -> Vec<String> {
        Vec::new()
    }
}

/// User-facing state.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct CounterState {
    pub value: NumericValue,
    pub old_value: NumericValue,
    pub initial_value: Option<NumericValue>,
    pub parts_options: PartsOptionsPatch,
    pub locale: Locale,
    pub aria_live: AriaLive,
}

/// Everything derived from [`CounterState`] on recompute.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct DerivedState {
    pub direction: Direction,
    /// Direction of the previous frame; `None` before the first one.
    pub old_direction: Option<Direction>,
    pub parts: Vec<PartData>,
    pub old_parts: Vec<PartData>,
    pub transitions: Vec<Vec<TransitionDirective>>,
    pub parts_options: PartsOptions,
    pub aria_label: String,
    /// Value frames produced so far.
    pub frame: u64,
}

/// One rolling counter widget.
pub struct Counter<F: CounterFlavor> {
    adapters: Adapters,
    flavor: F,
    state: CounterState,
    derived: DerivedState,
    presentation: Presentation,
    connected: bool,
    first_update: bool,
    pending: ChangedProperties,
    initial_input: Option<F::Input>,
    value_input: Option<F::Input>,
}

impl<F: CounterFlavor> fmt::Debug for Counter<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Counter")
            .field("flavor", &self.flavor)
            .field("state", &self.state)
            .field("connected", &self.connected)
            .field("frame", &self.derived.frame)
            .finish_non_exhaustive()
    }
}

impl<F: CounterFlavor> Counter<F> {
    /// Counter using the process-wide default adapters.
    #[must_use]
    pub fn new(flavor: F) -> Self {
        Self::with_adapters(flavor, Adapters::default())
    }

    #[must_use]
    pub fn with_registry(flavor: F, registry: &AdapterRegistry) -> Self {
        Self::with_adapters(flavor, Adapters::from_registry(registry))
    }

    #[must_use]
    pub fn with_adapters(flavor: F, adapters: Adapters) -> Self {
        let zero = adapters.number.from_f64(0.0);
        Self {
            adapters,
            flavor,
            state: CounterState {
                value: zero.clone(),
                old_value: zero,
                ..CounterState::default()
            },
            derived: DerivedState::default(),
            presentation: Presentation::default(),
            connected: false,
            first_update: true,
            pending: ChangedProperties::empty(),
            initial_input: None,
            value_input: None,
        }
    }

    fn context(&self) -> FlavorContext<'_> {
        FlavorContext {
            adapters: &self.adapters,
            locale: &self.state.locale,
        }
    }

    /// Seed the old value and derive the first frame.
    ///
    /// The old value comes from the initial value when one is set, else
    /// from the value itself, so connecting with only a value shows it
    /// without rolling. Calling it again is a no-op.
    pub fn connect(&mut self) -> Result<()> {
        if self.connected {
            return Ok(());
        }
        self.flavor.prepare(&FlavorContext {
            adapters: &self.adapters,
            locale: &self.state.locale,
        });
        let initial = self.initial_input.take();
        let value = self.value_input.take();
        let seed = self.flavor.connect(
            &FlavorContext {
                adapters: &self.adapters,
                locale: &self.state.locale,
            },
            initial,
            value,
        )?;

        self.state.old_value = seed.initial_value.clone().unwrap_or_else(|| seed.value.clone());
        self.state.initial_value = seed.initial_value;
        self.state.value = seed.value;
        self.connected = true;
        self.first_update = true;

        let changed = mem::take(&mut self.pending)
            | ChangedProperties::VALUE
            | ChangedProperties::PARTS_OPTIONS
            | ChangedProperties::LOCALE;
        tracing::debug!(flavor = ?self.flavor, "counter connected");
        self.recompute(changed, None, None)
    }

    #[must_use]
    pub fn is_connected(&self) -> bool {
        self.connected
    }

    /// Set the value. Before [`Counter::connect`] the input is only stored.
    pub fn set_value(&mut self, input: impl Into<F::Input>) -> Result<()> {
        let input = input.into();
        if !self.connected {
            self.value_input = Some(input);
            self.pending |= ChangedProperties::VALUE;
            return Ok(());
        }
        let ctx = FlavorContext {
            adapters: &self.adapters,
            locale: &self.state.locale,
        };
        let change = self.flavor.convert_value(&ctx, input)?;
        let previous = mem::replace(&mut self.state.value, change.value);
        self.recompute(ChangedProperties::VALUE, Some(previous), change.old_value)
    }

    /// Set the value the first frame rolls from.
    pub fn set_initial_value(&mut self, input: impl Into<F::Input>) -> Result<()> {
        let input = input.into();
        if !self.connected {
            self.initial_input = Some(input);
            self.pending |= ChangedProperties::INITIAL_VALUE;
            return Ok(());
        }
        let ctx = FlavorContext {
            adapters: &self.adapters,
            locale: &self.state.locale,
        };
        self.state.initial_value = Some(self.flavor.convert_initial(&ctx, input)?);
        self.recompute(ChangedProperties::INITIAL_VALUE, None, None)
    }

    pub fn set_parts_options(&mut self, patch: PartsOptionsPatch) -> Result<()> {
        self.state.parts_options = patch;
        self.mark(ChangedProperties::PARTS_OPTIONS)
    }

    /// Set parts options from the `parts-options` attribute JSON.
    pub fn set_parts_options_json(&mut self, json: &str) -> Result<()> {
        self.set_parts_options(PartsOptionsPatch::from_json(json)?)
    }

    pub fn set_locale(&mut self, locale: Locale) -> Result<()> {
        self.state.locale = locale;
        self.mark(ChangedProperties::LOCALE)
    }

    pub fn set_aria_live(&mut self, aria_live: AriaLive) {
        self.state.aria_live = aria_live;
    }

    /// Swap adapters. Stored values keep their representation; adapters
    /// coerce them on use.
    pub fn set_adapters(&mut self, adapters: Adapters) -> Result<()> {
        self.adapters = adapters;
        self.mark(ChangedProperties::ADAPTERS)
    }

    /// Change flavour options and rebuild the frame.
    pub fn configure(&mut self, update: impl FnOnce(&mut F)) -> Result<()> {
        update(&mut self.flavor);
        self.mark(ChangedProperties::FLAVOR)
    }

    pub fn presentation_mut(&mut self) -> &mut Presentation {
        &mut self.presentation
    }

    fn mark(&mut self, changed: ChangedProperties) -> Result<()> {
        if self.connected {
            self.recompute(changed, None, None)
        } else {
            self.pending |= changed;
            Ok(())
        }
    }

    /// Derive the frame from the current state.
    ///
    /// `previous` is the value replaced by this update; `explicit_old` is an
    /// old value chosen by the flavour and wins over `previous`.
    fn recompute(
        &mut self,
        changed: ChangedProperties,
        previous: Option<NumericValue>,
        explicit_old: Option<NumericValue>,
    ) -> Result<()> {
        if changed.refreshes_flavor() {
            let ctx = FlavorContext {
                adapters: &self.adapters,
                locale: &self.state.locale,
            };
            self.flavor.prepare(&ctx);
        }
        let value_changed = changed.contains(ChangedProperties::VALUE);

        if value_changed {
            match explicit_old {
                Some(old) => self.state.old_value = old,
                None if self.first_update => {}
                None => {
                    if let Some(previous) = previous {
                        self.state.old_value = previous;
                    }
                }
            }
            self.first_update = false;
        }

        if value_changed {
            let na = &self.adapters.number;
            self.derived.old_direction = (self.derived.frame > 0).then_some(self.derived.direction);
            self.derived.direction = if na.gt(&self.state.value, &self.state.old_value) {
                Direction::Down
            } else {
                Direction::Up
            };
        }

        if value_changed {
            self.derived.old_parts = mem::take(&mut self.derived.parts);
        }
        if changed.rebuilds_parts() {
            let options = self.flavor.parts_options(&self.context(), &self.state.parts_options);
            self.derived.parts = self.build_frame(&options)?;
            self.derived.parts_options = options;
        }

        if value_changed {
            self.derived.transitions = preprocess(
                self.derived.direction,
                &self.derived.parts,
                self.derived.old_direction,
                &self.derived.old_parts,
            );
            self.derived.frame += 1;
        } else if changed.rebuilds_parts() {
            // Same value, new layout: nothing rolls.
            self.derived.transitions = preprocess(
                self.derived.direction,
                &self.derived.parts,
                Some(self.derived.direction),
                &self.derived.parts,
            );
        }

        if value_changed || changed.refreshes_flavor() {
            self.derived.aria_label = self.flavor.aria_label(&self.context(), &self.state.value);
        }

        tracing::debug!(
            changed = ?changed,
            direction = %self.derived.direction,
            animated = animated_count(&self.derived.transitions),
            "counter recomputed"
        );
        Ok(())
    }

    fn build_frame(&self, options: &PartsOptions) -> Result<Vec<PartData>> {
        let ctx = self.context();
        let na = &*self.adapters.number;
        let samples = sample(
            na,
            &na.max(&self.state.value, &self.state.old_value),
            &na.min(&self.state.value, &self.state.old_value),
            options.sample_count,
        );
        let texts = self
            .flavor
            .sample_split(&ctx, samples)
            .iter()
            .map(|part| {
                part.iter()
                    .map(|v| self.flavor.sample_to_string(&ctx, v))
                    .collect::<Result<Vec<_>>>()
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(build_parts(&texts, &*self.adapters.strings, options))
    }

    #[must_use]
    pub fn flavor(&self) -> &F {
        &self.flavor
    }

    #[must_use]
    pub fn adapters(&self) -> &Adapters {
        &self.adapters
    }

    #[must_use]
    pub fn state(&self) -> &CounterState {
        &self.state
    }

    #[must_use]
    pub fn derived(&self) -> &DerivedState {
        &self.derived
    }

    #[must_use]
    pub fn value(&self) -> &NumericValue {
        &self.state.value
    }

    #[must_use]
    pub fn old_value(&self) -> &NumericValue {
        &self.state.old_value
    }

    #[must_use]
    pub fn initial_value(&self) -> Option<&NumericValue> {
        self.state.initial_value.as_ref()
    }

    /// Value as attribute text.
    #[must_use]
    pub fn value_attribute(&self) -> String {
        to_attribute(&*self.adapters.number, &self.state.value)
    }

    #[must_use]
    pub fn direction(&self) -> Direction {
        self.derived.direction
    }

    #[must_use]
    pub fn parts(&self) -> &[PartData] {
        &self.derived.parts
    }

    /// Text shown once every column has settled. Columns list samples from
    /// the larger value to the smaller one, so an increase ends on the first
    /// glyph and a decrease on the last.
    #[must_use]
    pub fn settled_text(&self) -> String {
        self.derived
            .parts
            .iter()
            .map(|part| match self.derived.direction {
                Direction::Down => part.head_text(),
                Direction::Up => part.tail_text(),
            })
            .collect()
    }

    #[must_use]
    pub fn old_parts(&self) -> &[PartData] {
        &self.derived.old_parts
    }

    #[must_use]
    pub fn transitions(&self) -> &[Vec<TransitionDirective>] {
        &self.derived.transitions
    }

    /// Effective parts options of the current frame.
    #[must_use]
    pub fn parts_options(&self) -> &PartsOptions {
        &self.derived.parts_options
    }

    #[must_use]
    pub fn locale(&self) -> &Locale {
        &self.state.locale
    }

    #[must_use]
    pub fn aria_label(&self) -> &str {
        &self.derived.aria_label
    }

    #[must_use]
    pub fn aria_live(&self) -> AriaLive {
        self.state.aria_live
    }

    #[must_use]
    pub fn role(&self) -> Option<&'static str> {
        self.flavor.role()
    }

    #[must_use]
    pub fn part_labels(&self) -> Vec<String> {
        self.flavor.part_labels(&self.context())
    }

    #[must_use]
    pub fn presentation(&self) -> &Presentation {
        &self.presentation
    }

    /// Context for resolving per-part and per-digit options.
    #[must_use]
    pub fn resolve_context(&self) -> ResolveContext<'_> {
        ResolveContext {
            parts: &self.derived.parts,
            direction: self.derived.direction,
            value: (&self.state.value, &self.state.old_value),
            transitions: &self.derived.transitions,
        }
    }
}
