use crate::error::MapResult;
use crate::render::{RenderFrame, Renderer};

/// No-op renderer used by tests and headless usage.
///
/// It still validates frame content so tests catch non-finite geometry or
/// transforms before a real backend sees them.
#[derive(Debug, Default)]
pub struct NullRenderer {
    pub frames_rendered: usize,
    pub last_shape_count: usize,
    pub last_marker_count: usize,
}

impl Renderer for NullRenderer {
    fn render(&mut self, frame: &RenderFrame) -> MapResult<()> {
        frame.validate()?;
        self.frames_rendered += 1;
        self.last_shape_count = frame.boundaries.shapes.len();
        self.last_marker_count = frame.points.markers.len();
        Ok(())
    }
}
