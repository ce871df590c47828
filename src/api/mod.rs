mod json_contract;
mod narrative;
mod responsive;
mod scroll_triggers;
mod step_encoder;
mod story_config;
mod story_map;
mod surface;

pub use json_contract::{STORY_CONFIG_JSON_SCHEMA_V1, StoryConfigJsonContractV1};
pub use narrative::{NarrativeController, PageLayout};
pub use responsive::{ModeTransition, ResponsiveCoordinator, ViewportMode};
pub use scroll_triggers::{ScrollTriggerLayout, StepAnchor};
pub use step_encoder::{
    CategoryColors, ColorRule, ENCODED_STEP_COUNT, OpacityRule, StepEncoder, StepEncoding,
    TransformTarget, VisualProperty, VisualUpdate,
};
pub use story_config::{ModeProfile, Palette, StepDurations, StoryConfig};
pub use story_map::{ResizeOutcome, StoryMap};
pub use surface::RenderingSurface;
