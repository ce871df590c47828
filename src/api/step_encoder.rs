use serde::{Deserialize, Serialize};
use smallvec::{SmallVec, smallvec};

use crate::animation::Timing;
use crate::data::{PointCategory, PointFeature};
use crate::render::{Color, LayerSelector};

use super::{Palette, StepDurations, StoryConfig};

/// Number of steps with a defined encoding.
pub const ENCODED_STEP_COUNT: usize = 4;

/// Layer transform value of an encoding entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TransformTarget {
    Identity,
    /// Frame the configured area-of-interest regions.
    AreaOfInterest,
}

/// Marker opacity, either uniform or keyed on the owning authority.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum OpacityRule {
    Constant(f64),
    OwnedBy {
        authority: String,
        inside: f64,
        outside: f64,
    },
}

impl OpacityRule {
    #[must_use]
    pub fn resolve(&self, point: &PointFeature) -> f64 {
        match self {
            Self::Constant(value) => *value,
            Self::OwnedBy {
                authority,
                inside,
                outside,
            } => {
                if point.is_owned_by(authority) {
                    *inside
                } else {
                    *outside
                }
            }
        }
    }
}

/// Fill colors keyed by point category.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CategoryColors {
    pub c: Color,
    pub d: Color,
    pub other: Color,
}

impl CategoryColors {
    #[must_use]
    pub fn from_palette(palette: &Palette) -> Self {
        Self {
            c: palette.highlight_primary,
            d: palette.highlight_secondary,
            other: palette.neutral,
        }
    }

    #[must_use]
    pub fn color_for(self, category: PointCategory) -> Color {
        match category {
            PointCategory::C => self.c,
            PointCategory::D => self.d,
            PointCategory::Other => self.other,
        }
    }
}

/// Marker fill, either uniform or keyed on the category attribute.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum ColorRule {
    Fixed(Color),
    ByCategory(CategoryColors),
}

impl ColorRule {
    #[must_use]
    pub fn resolve(self, point: &PointFeature) -> Color {
        match self {
            Self::Fixed(color) => color,
            Self::ByCategory(colors) => colors.color_for(point.category()),
        }
    }
}

/// Visual property written by one encoding entry, with its value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum VisualProperty {
    Transform(TransformTarget),
    Opacity(OpacityRule),
    Fill(ColorRule),
    /// Zoomed marker styling; the mode profile decides radius and stroke.
    Emphasis(bool),
}

/// One `(target, property, value, timing)` row of a step encoding.
///
/// `timing` is the continuous-mode timing; discrete surfaces apply every
/// row instantly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VisualUpdate {
    pub target: LayerSelector,
    pub property: VisualProperty,
    pub timing: Timing,
}

impl VisualUpdate {
    fn new(target: LayerSelector, property: VisualProperty, timing: Timing) -> Self {
        Self {
            target,
            property,
            timing,
        }
    }
}

pub type StepEncoding = SmallVec<[VisualUpdate; 4]>;

/// Table mapping a step index to its declarative visual update.
///
/// The table is the same for every viewport mode. Indices past the table
/// encode to an empty update.
#[derive(Debug, Clone, PartialEq)]
pub struct StepEncoder {
    durations: StepDurations,
    focus_authority: String,
    intro: Color,
    categories: CategoryColors,
}

impl StepEncoder {
    #[must_use]
    pub fn new(config: &StoryConfig) -> Self {
        Self {
            durations: config.durations,
            focus_authority: config.focus_authority.clone(),
            intro: config.palette.intro,
            categories: CategoryColors::from_palette(&config.palette),
        }
    }

    #[must_use]
    pub fn step_count(&self) -> usize {
        ENCODED_STEP_COUNT
    }

    #[must_use]
    pub fn encode(&self, step: usize) -> StepEncoding {
        let d = self.durations;
        let by_category = VisualProperty::Fill(ColorRule::ByCategory(self.categories));
        match step {
            0 => smallvec![
                transform(TransformTarget::Identity, d.reset_ms),
                points(VisualProperty::Opacity(OpacityRule::Constant(0.2)), d.points_ms),
                points(VisualProperty::Fill(ColorRule::Fixed(self.intro)), d.points_ms),
                points(VisualProperty::Emphasis(false), d.points_ms),
            ],
            1 => smallvec![
                transform(TransformTarget::Identity, d.reset_ms),
                points(VisualProperty::Opacity(OpacityRule::Constant(0.6)), d.points_ms),
                points(by_category, d.points_ms),
                points(VisualProperty::Emphasis(false), d.points_ms),
            ],
            2 => smallvec![
                transform(TransformTarget::AreaOfInterest, d.zoom_ms),
                points(VisualProperty::Opacity(OpacityRule::Constant(0.6)), d.zoom_ms),
                points(by_category, d.zoom_ms),
                points(VisualProperty::Emphasis(true), d.zoom_ms),
            ],
            3 => smallvec![
                transform(TransformTarget::AreaOfInterest, d.zoom_ms),
                points(
                    VisualProperty::Opacity(OpacityRule::OwnedBy {
                        authority: self.focus_authority.clone(),
                        inside: 0.6,
                        outside: 0.0,
                    }),
                    d.focus_ms,
                ),
                points(by_category, d.focus_ms),
                points(VisualProperty::Emphasis(true), d.focus_ms),
            ],
            _ => SmallVec::new(),
        }
    }
}

fn transform(target: TransformTarget, duration_ms: f64) -> VisualUpdate {
    VisualUpdate::new(
        LayerSelector::Both,
        VisualProperty::Transform(target),
        Timing::animated(duration_ms),
    )
}

fn points(property: VisualProperty, duration_ms: f64) -> VisualUpdate {
    VisualUpdate::new(LayerSelector::Points, property, Timing::animated(duration_ms))
}

#[cfg(test)]
mod tests {
    use super::{StepEncoder, TransformTarget, VisualProperty};
    use crate::api::StoryConfig;
    use crate::render::LayerSelector;

    #[test]
    fn every_encoded_step_sets_transform_on_both_layers() {
        let encoder = StepEncoder::new(&StoryConfig::default());
        for step in 0..encoder.step_count() {
            let encoding = encoder.encode(step);
            let transform = encoding
                .iter()
                .find(|update| matches!(update.property, VisualProperty::Transform(_)))
                .expect("transform row");
            assert_eq!(transform.target, LayerSelector::Both);
        }
    }

    #[test]
    fn zoom_steps_target_area_of_interest() {
        let encoder = StepEncoder::new(&StoryConfig::default());
        for (step, expected) in [
            (0, TransformTarget::Identity),
            (1, TransformTarget::Identity),
            (2, TransformTarget::AreaOfInterest),
            (3, TransformTarget::AreaOfInterest),
        ] {
            assert!(
                encoder
                    .encode(step)
                    .iter()
                    .any(|update| update.property == VisualProperty::Transform(expected))
            );
        }
    }

    #[test]
    fn steps_past_the_table_are_empty() {
        let encoder = StepEncoder::new(&StoryConfig::default());
        assert!(encoder.encode(4).is_empty());
        assert!(encoder.encode(usize::MAX).is_empty());
    }
}
