mod frame;
mod layer_stack;
mod null_renderer;
mod primitives;
mod svg_backend;

pub use frame::{BoundaryLayerFrame, PointLayerFrame, RenderFrame};
pub use layer_stack::{LayerKind, LayerSelector};
pub use null_renderer::NullRenderer;
pub use primitives::{CirclePrimitive, Color, PathPrimitive};
pub use svg_backend::{SvgRenderStats, SvgRenderer};

use crate::error::MapResult;

/// Contract implemented by any rendering backend.
///
/// Backends receive a fully materialized, deterministic `RenderFrame` so
/// drawing code stays isolated from narrative state and transition timing.
pub trait Renderer {
    fn render(&mut self, frame: &RenderFrame) -> MapResult<()>;
}

#[cfg(feature = "cairo-backend")]
mod cairo_backend;
#[cfg(feature = "cairo-backend")]
pub use cairo_backend::{CairoContextRenderer, CairoRenderStats, CairoRenderer};
