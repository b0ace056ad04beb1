//! Styles, animation options and keyframes resolved against a frame.

use crate::animation::{
    AnimationDriver, AnimationOptions, AnimationOptionsPatch, Keyframes, Roller,
};
use crate::error::Result;
use crate::resolve::{Resolvable, ResolveContext, merge_digit_matrix};
use crate::style::{ColorStyles, ContainerRect, ElementBox, Style, color_overlay};

use super::{Counter, CounterFlavor};

/// Presentation options of a counter. Every option may be one value, a
/// per-part list, nested per-digit lists or a getter.
#[derive(Clone, Debug)]
pub struct Presentation {
    pub cell_styles: Resolvable<Style>,
    pub digit_styles: Resolvable<Style>,
    pub part_styles: Resolvable<Style>,
    pub animation_options: Resolvable<AnimationOptionsPatch>,
    pub keyframes: Resolvable<Keyframes>,
    /// Text colour: a CSS colour or a CSS image such as a gradient.
    pub color: String,
}

impl Default for Presentation {
    fn default() -> Self {
        Self {
            cell_styles: Resolvable::default(),
            digit_styles: Resolvable::default(),
            part_styles: Resolvable::default(),
            animation_options: Resolvable::default(),
            keyframes: Resolvable::default(),
            color: "inherit".to_string(),
        }
    }
}

/// Presentation options flattened to the shape of one frame.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ResolvedPresentation {
    pub cell_styles: Vec<Vec<Vec<Style>>>,
    pub digit_styles: Vec<Vec<Style>>,
    pub part_styles: Vec<Style>,
    pub animation_options: Vec<Vec<AnimationOptions>>,
    pub keyframes: Vec<Vec<Keyframes>>,
}

impl Presentation {
    /// Resolve every option for `ctx`, layering colour styles over the digit
    /// styles when given.
    #[must_use]
    pub fn resolve(&self, ctx: &ResolveContext<'_>, color: Option<&ColorStyles>) -> ResolvedPresentation {
        let mut digit_styles = self.digit_styles.resolve_digits(ctx);
        if let Some(color) = color {
            merge_digit_matrix(&mut digit_styles, &color.digit_matrix(ctx.parts), Style::extend_from);
        }
        ResolvedPresentation {
            cell_styles: self.cell_styles.resolve_cells(ctx),
            digit_styles,
            part_styles: self.part_styles.resolve_parts(ctx),
            animation_options: self
                .animation_options
                .resolve_digits(ctx)
                .into_iter()
                .map(|part| part.iter().map(AnimationOptionsPatch::resolve).collect())
                .collect(),
            keyframes: self.keyframes.resolve_digits(ctx),
        }
    }
}

impl<F: CounterFlavor> Counter<F> {
    /// Resolve presentation options against the current frame.
    #[must_use]
    pub fn resolve_presentation(&self, color: Option<&ColorStyles>) -> ResolvedPresentation {
        self.presentation.resolve(&self.resolve_context(), color)
    }

    /// Colour styles for the rendered elements. `None` until the container
    /// has been measured.
    pub fn color_styles(
        &self,
        container: Option<ContainerRect>,
        elements: &[ElementBox],
    ) -> Result<Option<ColorStyles>> {
        color_overlay(&self.presentation.color, container, elements)
    }

    /// Hand the current frame to `roller`. Returns the number of columns
    /// that started rolling.
    pub fn drive<D: AnimationDriver>(&self, roller: &mut Roller<D>) -> usize {
        let resolved = self.resolve_presentation(None);
        roller.update(
            self.parts(),
            self.transitions(),
            self.direction(),
            &resolved.keyframes,
            &resolved.animation_options,
        )
    }
}
