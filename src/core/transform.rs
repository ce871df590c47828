use serde::{Deserialize, Serialize};

use crate::core::ScreenPoint;
use crate::core::path::fmt_coord;

/// Zoom/pan applied to a whole layer on top of the projection.
///
/// A screen point `p` is drawn at `translate + p * scale`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Transform {
    pub scale: f64,
    pub translate: [f64; 2],
}

impl Default for Transform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Transform {
    pub const IDENTITY: Self = Self {
        scale: 1.0,
        translate: [0.0, 0.0],
    };

    #[must_use]
    pub const fn new(scale: f64, translate: [f64; 2]) -> Self {
        Self { scale, translate }
    }

    #[must_use]
    pub fn is_finite(self) -> bool {
        self.scale.is_finite() && self.translate[0].is_finite() && self.translate[1].is_finite()
    }

    #[must_use]
    pub fn is_identity(self) -> bool {
        self == Self::IDENTITY
    }

    /// Returns `self`, or the identity when any component is not finite.
    #[must_use]
    pub fn finite_or_identity(self) -> Self {
        if self.is_finite() { self } else { Self::IDENTITY }
    }

    #[must_use]
    pub fn apply(self, point: ScreenPoint) -> ScreenPoint {
        ScreenPoint::new(
            self.translate[0] + point.x * self.scale,
            self.translate[1] + point.y * self.scale,
        )
    }

    /// Linear blend of translate and scale, `t` in `[0, 1]`.
    #[must_use]
    pub fn lerp(self, target: Self, t: f64) -> Self {
        Self {
            scale: self.scale + (target.scale - self.scale) * t,
            translate: [
                self.translate[0] + (target.translate[0] - self.translate[0]) * t,
                self.translate[1] + (target.translate[1] - self.translate[1]) * t,
            ],
        }
    }

    /// SVG `transform` attribute value.
    #[must_use]
    pub fn to_svg(self) -> String {
        format!(
            "translate({},{}) scale({})",
            fmt_coord(self.translate[0]),
            fmt_coord(self.translate[1]),
            fmt_coord(self.scale)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::Transform;
    use crate::core::ScreenPoint;

    #[test]
    fn identity_leaves_points_unchanged() {
        let p = ScreenPoint::new(12.5, -3.0);
        assert_eq!(Transform::IDENTITY.apply(p), p);
    }

    #[test]
    fn non_finite_transform_collapses_to_identity() {
        let t = Transform::new(f64::INFINITY, [1.0, 2.0]);
        assert_eq!(t.finite_or_identity(), Transform::IDENTITY);
        let t = Transform::new(2.0, [f64::NAN, 2.0]);
        assert_eq!(t.finite_or_identity(), Transform::IDENTITY);
    }

    #[test]
    fn lerp_hits_endpoints() {
        let a = Transform::IDENTITY;
        let b = Transform::new(3.0, [100.0, -40.0]);
        assert_eq!(a.lerp(b, 0.0), a);
        assert_eq!(a.lerp(b, 1.0), b);
        let mid = a.lerp(b, 0.5);
        assert_eq!(mid.scale, 2.0);
        assert_eq!(mid.translate, [50.0, -20.0]);
    }

    #[test]
    fn svg_attribute_format() {
        assert_eq!(Transform::IDENTITY.to_svg(), "translate(0,0) scale(1)");
        assert_eq!(
            Transform::new(2.5, [10.0, 20.25]).to_svg(),
            "translate(10,20.25) scale(2.5)"
        );
    }
}
