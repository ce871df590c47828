//! storymap: scroll-driven narrative map engine.
//!
//! A [`StoryMap`] owns the loaded region and point datasets, tracks the
//! active narrative step, and produces backend-neutral render frames that a
//! [`render::Renderer`] draws. Desktop widths drive one shared surface with
//! animated transitions; narrow widths render one static snapshot per step.

pub mod animation;
pub mod api;
pub mod core;
pub mod data;
pub mod error;
pub mod render;
pub mod telemetry;

pub use api::{PageLayout, StoryConfig, StoryMap, ViewportMode};
pub use error::{MapError, MapResult};
