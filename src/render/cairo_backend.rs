use cairo::{Context, Format, ImageSurface};
use std::f64::consts::TAU;

use crate::core::Transform;
use crate::error::{MapError, MapResult};
use crate::render::{Color, RenderFrame, Renderer};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CairoRenderStats {
    pub paths_drawn: usize,
    pub circles_drawn: usize,
}

/// Optional extension trait for renderers that can draw into an external Cairo
/// context (for example a toolkit draw callback).
pub trait CairoContextRenderer {
    fn render_on_cairo_context(&mut self, context: &Context, frame: &RenderFrame)
    -> MapResult<()>;
}

/// Cairo raster renderer backend.
///
/// Supports offscreen image-surface rendering through `Renderer::render` and
/// in-place rendering on an external context through `CairoContextRenderer`.
#[derive(Debug)]
pub struct CairoRenderer {
    surface: ImageSurface,
    clear_color: Color,
    last_stats: CairoRenderStats,
}

impl CairoRenderer {
    pub fn new(width: i32, height: i32) -> MapResult<Self> {
        if width <= 0 || height <= 0 {
            return Err(MapError::InvalidData(
                "cairo surface size must be > 0".to_owned(),
            ));
        }

        let surface = ImageSurface::create(Format::ARgb32, width, height)
            .map_err(|err| map_backend_error("failed to create cairo surface", err))?;
        Ok(Self {
            surface,
            clear_color: Color::rgb(1.0, 1.0, 1.0),
            last_stats: CairoRenderStats::default(),
        })
    }

    #[must_use]
    pub fn surface(&self) -> &ImageSurface {
        &self.surface
    }

    pub fn set_clear_color(&mut self, color: Color) -> MapResult<()> {
        color.validate()?;
        self.clear_color = color;
        Ok(())
    }

    #[must_use]
    pub fn last_stats(&self) -> CairoRenderStats {
        self.last_stats
    }

    /// Writes the current surface as PNG.
    pub fn write_png(&self, out: &mut impl std::io::Write) -> MapResult<()> {
        self.surface
            .write_to_png(out)
            .map_err(|err| MapError::InvalidData(format!("failed to encode png: {err}")))
    }

    fn render_with_context(&mut self, context: &Context, frame: &RenderFrame) -> MapResult<()> {
        frame.validate()?;

        apply_color(context, self.clear_color, 1.0);
        context
            .paint()
            .map_err(|err| map_backend_error("failed to clear surface", err))?;

        let mut stats = CairoRenderStats::default();

        with_layer_transform(context, frame.boundaries.transform, |context| {
            for shape in &frame.boundaries.shapes {
                context.new_path();
                for ring in &shape.shape.rings {
                    let mut vertices = ring.iter();
                    let Some(first) = vertices.next() else {
                        continue;
                    };
                    context.move_to(first.x, first.y);
                    for point in vertices {
                        context.line_to(point.x, point.y);
                    }
                    context.close_path();
                }
                apply_color(context, shape.fill, 1.0);
                context
                    .fill_preserve()
                    .map_err(|err| map_backend_error("failed to fill boundary", err))?;
                apply_color(context, shape.stroke, 1.0);
                context.set_line_width(shape.stroke_width);
                context
                    .stroke()
                    .map_err(|err| map_backend_error("failed to stroke boundary", err))?;
                stats.paths_drawn += 1;
            }
            Ok(())
        })?;

        with_layer_transform(context, frame.points.transform, |context| {
            for marker in &frame.points.markers {
                context.new_path();
                context.arc(marker.cx, marker.cy, marker.radius, 0.0, TAU);
                apply_color(context, marker.fill, marker.opacity);
                context
                    .fill()
                    .map_err(|err| map_backend_error("failed to fill marker", err))?;
                stats.circles_drawn += 1;
            }
            Ok(())
        })?;

        self.last_stats = stats;
        Ok(())
    }
}

impl Renderer for CairoRenderer {
    fn render(&mut self, frame: &RenderFrame) -> MapResult<()> {
        let context = Context::new(&self.surface)
            .map_err(|err| map_backend_error("failed to create cairo context", err))?;
        self.render_with_context(&context, frame)
    }
}

impl CairoContextRenderer for CairoRenderer {
    fn render_on_cairo_context(
        &mut self,
        context: &Context,
        frame: &RenderFrame,
    ) -> MapResult<()> {
        self.render_with_context(context, frame)
    }
}

fn with_layer_transform(
    context: &Context,
    transform: Transform,
    draw: impl FnOnce(&Context) -> MapResult<()>,
) -> MapResult<()> {
    context
        .save()
        .map_err(|err| map_backend_error("failed to save context", err))?;
    context.translate(transform.translate[0], transform.translate[1]);
    context.scale(transform.scale, transform.scale);
    let result = draw(context);
    context
        .restore()
        .map_err(|err| map_backend_error("failed to restore context", err))?;
    result
}

fn apply_color(context: &Context, color: Color, opacity: f64) {
    context.set_source_rgba(color.red, color.green, color.blue, color.alpha * opacity);
}

fn map_backend_error(prefix: &str, err: cairo::Error) -> MapError {
    MapError::InvalidData(format!("{prefix}: {err}"))
}
