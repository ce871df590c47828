use std::fmt::Write as _;

use crate::core::path::fmt_coord;
use crate::error::{MapError, MapResult};
use crate::render::{LayerKind, RenderFrame, Renderer};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SvgRenderStats {
    pub paths_written: usize,
    pub circles_written: usize,
}

/// Serializes frames into standalone SVG documents.
///
/// The markup mirrors the layer structure of the map: one `<g>` per layer
/// carrying the layer transform, paths for boundaries and circles for point
/// markers.
#[derive(Debug, Default)]
pub struct SvgRenderer {
    document: String,
    last_stats: SvgRenderStats,
}

impl SvgRenderer {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Markup produced by the last successful render.
    #[must_use]
    pub fn document(&self) -> &str {
        &self.document
    }

    #[must_use]
    pub fn into_document(self) -> String {
        self.document
    }

    #[must_use]
    pub fn last_stats(&self) -> SvgRenderStats {
        self.last_stats
    }

    fn write_frame(out: &mut String, frame: &RenderFrame) -> std::fmt::Result {
        writeln!(
            out,
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{}" height="{}">"#,
            frame.viewport.width, frame.viewport.height
        )?;

        writeln!(
            out,
            r#"<g class="{}" transform="{}">"#,
            LayerKind::Boundaries.class_name(),
            frame.boundaries.transform.to_svg()
        )?;
        for shape in &frame.boundaries.shapes {
            writeln!(
                out,
                r#"<path d="{}" fill="{}" stroke="{}" stroke-width="{}"/>"#,
                shape.shape.svg_path_data(),
                shape.fill,
                shape.stroke,
                fmt_coord(shape.stroke_width)
            )?;
        }
        writeln!(out, "</g>")?;

        writeln!(
            out,
            r#"<g class="{}" transform="{}">"#,
            LayerKind::Points.class_name(),
            frame.points.transform.to_svg()
        )?;
        for marker in &frame.points.markers {
            write!(
                out,
                r#"<circle cx="{}" cy="{}" r="{}" fill="{}" opacity="{}""#,
                fmt_coord(marker.cx),
                fmt_coord(marker.cy),
                fmt_coord(marker.radius),
                marker.fill,
                fmt_coord(marker.opacity)
            )?;
            if marker.stroke_width > 0.0 {
                write!(out, r#" stroke-width="{}""#, fmt_coord(marker.stroke_width))?;
            }
            writeln!(out, "/>")?;
        }
        writeln!(out, "</g>")?;
        writeln!(out, "</svg>")?;

        Ok(())
    }
}

impl Renderer for SvgRenderer {
    fn render(&mut self, frame: &RenderFrame) -> MapResult<()> {
        frame.validate()?;
        let mut out = String::new();
        Self::write_frame(&mut out, frame)
            .map_err(|err| MapError::InvalidData(format!("failed to write svg: {err}")))?;
        self.document = out;
        self.last_stats = SvgRenderStats {
            paths_written: frame.boundaries.shapes.len(),
            circles_written: frame.points.markers.len(),
        };
        Ok(())
    }
}
