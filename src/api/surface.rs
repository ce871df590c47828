use std::sync::Arc;

use indexmap::IndexSet;
use tracing::{debug, trace};

#[cfg(feature = "parallel-projection")]
use rayon::prelude::*;

use crate::animation::{Animated, Timing};
use crate::core::{
    GeoCoord, MercatorProjection, PathGenerator, ProjectedShape, ScreenPoint, Transform, Viewport,
    fit_regions,
};
use crate::data::{PointFeature, Region};
use crate::error::MapResult;
use crate::render::{
    CirclePrimitive, Color, LayerKind, LayerSelector, PathPrimitive, RenderFrame, Renderer,
};

use super::{
    ColorRule, ModeProfile, OpacityRule, Palette, TransformTarget, VisualProperty, VisualUpdate,
};

#[derive(Debug, Clone)]
struct Marker {
    feature: PointFeature,
    coord: GeoCoord,
    screen: ScreenPoint,
    opacity: Animated<f64>,
    fill: Animated<Color>,
    radius: Animated<f64>,
    stroke_width: Animated<f64>,
}

/// Drawing state of one map: projection, boundary shapes, point markers and
/// the per-layer transforms.
///
/// Screen positions of shapes and markers are always rebuilt together from
/// the current projection, so both layers agree after every resize.
#[derive(Debug, Clone)]
pub struct RenderingSurface {
    viewport: Viewport,
    profile: ModeProfile,
    palette: Palette,
    regions: Arc<[Region]>,
    projection: MercatorProjection,
    shapes: Vec<ProjectedShape>,
    markers: Vec<Marker>,
    boundary_transform: Animated<Transform>,
    point_transform: Animated<Transform>,
}

impl RenderingSurface {
    /// Fits the projection to the full region set and draws every boundary
    /// and every point with valid coordinates, markers at zero opacity.
    pub fn initialize(
        regions: Arc<[Region]>,
        points: &[PointFeature],
        viewport: Viewport,
        profile: ModeProfile,
        palette: Palette,
    ) -> MapResult<Self> {
        viewport.ensure_valid()?;
        let projection = fit_projection(&regions, viewport, profile)?;

        let markers: Vec<Marker> = points
            .iter()
            .filter_map(|feature| {
                let coord = feature.valid_coordinates()?;
                Some(Marker {
                    feature: feature.clone(),
                    coord,
                    screen: projection.project(coord),
                    opacity: Animated::new(0.0),
                    fill: Animated::new(palette.marker_initial),
                    radius: Animated::new(profile.marker_radius),
                    stroke_width: Animated::new(0.0),
                })
            })
            .collect();

        let mut surface = Self {
            viewport,
            profile,
            palette,
            regions,
            projection,
            shapes: Vec::new(),
            markers,
            boundary_transform: Animated::new(Transform::IDENTITY),
            point_transform: Animated::new(Transform::IDENTITY),
        };
        surface.reproject();
        debug!(
            width = viewport.width,
            height = viewport.height,
            regions = surface.regions.len(),
            markers = surface.markers.len(),
            skipped_points = points.len() - surface.markers.len(),
            "surface initialized"
        );
        Ok(surface)
    }

    #[must_use]
    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    #[must_use]
    pub fn profile(&self) -> ModeProfile {
        self.profile
    }

    #[must_use]
    pub fn projection(&self) -> MercatorProjection {
        self.projection
    }

    #[must_use]
    pub fn path(&self) -> PathGenerator {
        PathGenerator::new(self.projection)
    }

    #[must_use]
    pub fn regions(&self) -> &[Region] {
        &self.regions
    }

    #[must_use]
    pub fn marker_count(&self) -> usize {
        self.markers.len()
    }

    /// Source features of the drawn markers, in marker order.
    pub fn marker_features(&self) -> impl Iterator<Item = &PointFeature> {
        self.markers.iter().map(|marker| &marker.feature)
    }

    /// Untransformed screen positions of the markers, in marker order.
    pub fn marker_positions(&self) -> impl Iterator<Item = ScreenPoint> + '_ {
        self.markers.iter().map(|marker| marker.screen)
    }

    /// Final transform of the most recent write to `layer`.
    #[must_use]
    pub fn layer_transform(&self, layer: LayerKind) -> Transform {
        self.transform_slot(layer).target()
    }

    #[must_use]
    pub fn layer_transform_at(&self, layer: LayerKind, now_ms: f64) -> Transform {
        self.transform_slot(layer).value_at(now_ms)
    }

    #[must_use]
    pub fn is_animating(&self, now_ms: f64) -> bool {
        self.boundary_transform.is_animating(now_ms)
            || self.point_transform.is_animating(now_ms)
            || self.markers.iter().any(|marker| {
                marker.opacity.is_animating(now_ms)
                    || marker.fill.is_animating(now_ms)
                    || marker.radius.is_animating(now_ms)
                    || marker.stroke_width.is_animating(now_ms)
            })
    }

    /// Writes `transform` to the selected layers.
    ///
    /// An animated write interpolates from the layer's current value,
    /// including a mid-flight one, which it replaces.
    pub fn apply_layer_transform(
        &mut self,
        selector: LayerSelector,
        transform: Transform,
        timing: Timing,
        now_ms: f64,
    ) {
        let transform = transform.finite_or_identity();
        for layer in LayerKind::ALL {
            if selector.includes(layer) {
                self.transform_slot_mut(layer)
                    .transition_to(transform, now_ms, timing);
            }
        }
        trace!(?selector, scale = transform.scale, "layer transform written");
    }

    /// Writes marker opacity and fill, each resolved per point.
    pub fn apply_point_encoding(
        &mut self,
        opacity: Option<&OpacityRule>,
        fill: Option<ColorRule>,
        timing: Timing,
        now_ms: f64,
    ) {
        for marker in &mut self.markers {
            if let Some(rule) = opacity {
                let value = rule.resolve(&marker.feature).clamp(0.0, 1.0);
                marker.opacity.transition_to(value, now_ms, timing);
            }
            if let Some(rule) = fill {
                marker
                    .fill
                    .transition_to(rule.resolve(&marker.feature), now_ms, timing);
            }
        }
    }

    /// Switches markers between their base and zoomed styling.
    pub fn apply_marker_emphasis(&mut self, emphasized: bool, timing: Timing, now_ms: f64) {
        let profile = self.profile;
        let radius = if emphasized {
            profile.emphasis_radius
        } else {
            profile.marker_radius
        };
        let stroke_width = if emphasized {
            profile.emphasis_stroke_width
        } else {
            Some(0.0)
        };
        for marker in &mut self.markers {
            marker.radius.transition_to(radius, now_ms, timing);
            if let Some(width) = stroke_width {
                marker.stroke_width.transition_to(width, now_ms, timing);
            }
        }
    }

    /// Resolves and applies one encoding row.
    ///
    /// Rows apply instantly when the surface's mode profile is not animated.
    pub fn apply_update(
        &mut self,
        update: &VisualUpdate,
        area_of_interest: &IndexSet<String>,
        now_ms: f64,
    ) {
        let timing = if self.profile.animated {
            update.timing
        } else {
            Timing::Instant
        };
        match &update.property {
            VisualProperty::Transform(target) => {
                let transform = self.resolve_transform(*target, area_of_interest);
                self.apply_layer_transform(update.target, transform, timing, now_ms);
            }
            VisualProperty::Opacity(rule) => {
                self.apply_point_encoding(Some(rule), None, timing, now_ms);
            }
            VisualProperty::Fill(rule) => {
                self.apply_point_encoding(None, Some(*rule), timing, now_ms);
            }
            VisualProperty::Emphasis(emphasized) => {
                self.apply_marker_emphasis(*emphasized, timing, now_ms);
            }
        }
    }

    #[must_use]
    pub fn resolve_transform(
        &self,
        target: TransformTarget,
        area_of_interest: &IndexSet<String>,
    ) -> Transform {
        match target {
            TransformTarget::Identity => Transform::IDENTITY,
            TransformTarget::AreaOfInterest => fit_regions(
                &self.regions,
                area_of_interest,
                self.path(),
                self.viewport.width_px(),
                self.viewport.height_px(),
                self.profile.fit_offset_x,
            ),
        }
    }

    /// Refits the projection to the full region set at the new size and
    /// re-projects every shape and marker. Layer transforms are kept.
    ///
    /// On error the surface is left unchanged.
    pub fn resize(&mut self, viewport: Viewport) -> MapResult<()> {
        viewport.ensure_valid()?;
        let projection = fit_projection(&self.regions, viewport, self.profile)?;
        self.viewport = viewport;
        self.projection = projection;
        self.reproject();
        debug!(
            width = viewport.width,
            height = viewport.height,
            "surface resized"
        );
        Ok(())
    }

    /// Samples every attribute at `now_ms` into a backend-neutral frame.
    #[must_use]
    pub fn frame(&self, now_ms: f64) -> RenderFrame {
        let mut frame = RenderFrame::new(self.viewport);
        frame.boundaries.transform = self.boundary_transform.value_at(now_ms);
        frame.boundaries.shapes = self
            .regions
            .iter()
            .zip(&self.shapes)
            .map(|(region, shape)| PathPrimitive {
                name: region.name().to_owned(),
                shape: shape.clone(),
                fill: self.palette.boundary_fill,
                stroke: self.palette.boundary_stroke,
                stroke_width: self.palette.boundary_stroke_width,
            })
            .collect();
        frame.points.transform = self.point_transform.value_at(now_ms);
        frame.points.markers = self
            .markers
            .iter()
            .map(|marker| CirclePrimitive {
                cx: marker.screen.x,
                cy: marker.screen.y,
                radius: marker.radius.value_at(now_ms),
                fill: marker.fill.value_at(now_ms),
                opacity: marker.opacity.value_at(now_ms),
                stroke_width: marker.stroke_width.value_at(now_ms),
            })
            .collect();
        frame
    }

    pub fn render<R: Renderer + ?Sized>(&self, renderer: &mut R, now_ms: f64) -> MapResult<()> {
        renderer.render(&self.frame(now_ms))
    }

    fn reproject(&mut self) {
        let path = self.path();
        self.shapes = self.regions.iter().map(|region| path.shape(region)).collect();

        let projection = self.projection;
        #[cfg(feature = "parallel-projection")]
        self.markers
            .par_iter_mut()
            .for_each(|marker| marker.screen = projection.project(marker.coord));

        #[cfg(not(feature = "parallel-projection"))]
        for marker in &mut self.markers {
            marker.screen = projection.project(marker.coord);
        }
    }

    fn transform_slot(&self, layer: LayerKind) -> &Animated<Transform> {
        match layer {
            LayerKind::Boundaries => &self.boundary_transform,
            LayerKind::Points => &self.point_transform,
        }
    }

    fn transform_slot_mut(&mut self, layer: LayerKind) -> &mut Animated<Transform> {
        match layer {
            LayerKind::Boundaries => &mut self.boundary_transform,
            LayerKind::Points => &mut self.point_transform,
        }
    }
}

fn fit_projection(
    regions: &[Region],
    viewport: Viewport,
    profile: ModeProfile,
) -> MapResult<MercatorProjection> {
    MercatorProjection::fitted(
        regions,
        viewport.width_px(),
        viewport.height_px() - profile.projection_bottom_inset,
    )
}
