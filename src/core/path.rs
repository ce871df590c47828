use serde::{Deserialize, Serialize};

use crate::core::{MercatorProjection, ScreenBounds, ScreenPoint};
use crate::data::Region;

/// Region outline in screen pixels, one entry per ring.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectedShape {
    pub rings: Vec<Vec<ScreenPoint>>,
}

impl ProjectedShape {
    #[must_use]
    pub fn bounds(&self) -> ScreenBounds {
        let mut bounds = ScreenBounds::empty();
        for point in self.rings.iter().flatten() {
            bounds.include(*point);
        }
        bounds
    }

    /// SVG path data (`M x,y L x,y ... Z` per ring).
    #[must_use]
    pub fn svg_path_data(&self) -> String {
        let mut out = String::new();
        for ring in &self.rings {
            let mut vertices = ring.iter();
            let Some(first) = vertices.next() else {
                continue;
            };
            out.push_str(&format!("M{},{}", fmt_coord(first.x), fmt_coord(first.y)));
            for point in vertices {
                out.push_str(&format!("L{},{}", fmt_coord(point.x), fmt_coord(point.y)));
            }
            out.push('Z');
        }
        out
    }
}

/// Turns regions into screen-space outlines through one projection.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PathGenerator {
    projection: MercatorProjection,
}

impl PathGenerator {
    #[must_use]
    pub fn new(projection: MercatorProjection) -> Self {
        Self { projection }
    }

    #[must_use]
    pub fn projection(self) -> MercatorProjection {
        self.projection
    }

    #[must_use]
    pub fn shape(self, region: &Region) -> ProjectedShape {
        let rings = region
            .geometry()
            .rings()
            .map(|ring| {
                ring.iter()
                    .map(|coord| self.projection.project(*coord))
                    .collect()
            })
            .collect();
        ProjectedShape { rings }
    }

    #[must_use]
    pub fn bounds(self, region: &Region) -> ScreenBounds {
        let mut bounds = ScreenBounds::empty();
        for coord in region.geometry().coords() {
            bounds.include(self.projection.project(coord));
        }
        bounds
    }
}

pub(crate) fn fmt_coord(value: f64) -> String {
    let rounded = (value * 1000.0).round() / 1000.0;
    if rounded == 0.0 {
        return "0".to_owned();
    }
    format!("{rounded}")
}

#[cfg(test)]
mod tests {
    use super::{PathGenerator, ProjectedShape, fmt_coord};
    use crate::core::{GeoCoord, MercatorProjection, ScreenPoint};
    use crate::data::Region;

    #[test]
    fn svg_path_data_closes_each_ring() {
        let shape = ProjectedShape {
            rings: vec![
                vec![
                    ScreenPoint::new(0.0, 0.0),
                    ScreenPoint::new(10.0, 0.0),
                    ScreenPoint::new(10.0, 5.5),
                ],
                Vec::new(),
            ],
        };
        assert_eq!(shape.svg_path_data(), "M0,0L10,0L10,5.5Z");
    }

    #[test]
    fn generator_bounds_match_shape_bounds() {
        let region = Region::polygon(
            "r",
            vec![
                GeoCoord::new(-3.0, 51.0),
                GeoCoord::new(-2.0, 51.0),
                GeoCoord::new(-2.0, 52.0),
            ],
        )
        .expect("region");
        let generator = PathGenerator::new(MercatorProjection::default());
        assert_eq!(generator.bounds(&region), generator.shape(&region).bounds());
    }

    #[test]
    fn coordinates_are_rounded_for_output() {
        assert_eq!(fmt_coord(1.234_56), "1.235");
        assert_eq!(fmt_coord(-0.000_1), "0");
    }
}
