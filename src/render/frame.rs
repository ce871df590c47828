use crate::core::{Transform, Viewport};
use crate::error::{MapError, MapResult};
use crate::render::{CirclePrimitive, PathPrimitive};

#[derive(Debug, Clone, PartialEq)]
pub struct BoundaryLayerFrame {
    pub transform: Transform,
    pub shapes: Vec<PathPrimitive>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PointLayerFrame {
    pub transform: Transform,
    pub markers: Vec<CirclePrimitive>,
}

/// Backend-agnostic scene for one map draw pass.
///
/// Primitives are in projected screen space; each layer's transform is
/// applied on top by the backend.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderFrame {
    pub viewport: Viewport,
    pub boundaries: BoundaryLayerFrame,
    pub points: PointLayerFrame,
}

impl RenderFrame {
    #[must_use]
    pub fn new(viewport: Viewport) -> Self {
        Self {
            viewport,
            boundaries: BoundaryLayerFrame {
                transform: Transform::IDENTITY,
                shapes: Vec::new(),
            },
            points: PointLayerFrame {
                transform: Transform::IDENTITY,
                markers: Vec::new(),
            },
        }
    }

    pub fn validate(&self) -> MapResult<()> {
        self.viewport.ensure_valid()?;

        for transform in [self.boundaries.transform, self.points.transform] {
            if !transform.is_finite() {
                return Err(MapError::InvalidData(
                    "layer transform must be finite".to_owned(),
                ));
            }
        }
        for shape in &self.boundaries.shapes {
            shape.validate()?;
        }
        for marker in &self.points.markers {
            marker.validate()?;
        }

        Ok(())
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.boundaries.shapes.is_empty() && self.points.markers.is_empty()
    }
}
