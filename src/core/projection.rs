use std::f64::consts::FRAC_PI_4;

use serde::{Deserialize, Serialize};

use crate::core::{GeoCoord, ScreenBounds, ScreenPoint};
use crate::data::Region;
use crate::error::{MapError, MapResult};

/// Latitude limit of the square Web Mercator world.
pub const MAX_MERCATOR_LATITUDE: f64 = 85.051_128_779_806_6;

const REFERENCE_SCALE: f64 = 150.0;

/// Spherical Mercator projection with a y-down screen mapping.
///
/// `scale` is in pixels per radian and `translate` is the screen position of
/// the `(0, 0)` geographic origin.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MercatorProjection {
    scale: f64,
    translate: [f64; 2],
}

impl Default for MercatorProjection {
    fn default() -> Self {
        Self {
            scale: 961.0 / std::f64::consts::TAU,
            translate: [480.0, 250.0],
        }
    }
}

impl MercatorProjection {
    pub fn new(scale: f64, translate: [f64; 2]) -> MapResult<Self> {
        if !scale.is_finite() || scale <= 0.0 {
            return Err(MapError::InvalidData(
                "projection scale must be finite and > 0".to_owned(),
            ));
        }
        if !translate[0].is_finite() || !translate[1].is_finite() {
            return Err(MapError::InvalidData(
                "projection translate must be finite".to_owned(),
            ));
        }
        Ok(Self { scale, translate })
    }

    /// Builds a projection that fits every region into `[width, height]`.
    pub fn fitted(regions: &[Region], width: f64, height: f64) -> MapResult<Self> {
        let mut projection = Self::default();
        projection.fit_size(regions, width, height)?;
        Ok(projection)
    }

    #[must_use]
    pub fn scale(self) -> f64 {
        self.scale
    }

    #[must_use]
    pub fn translate(self) -> [f64; 2] {
        self.translate
    }

    #[must_use]
    pub fn project(self, coord: GeoCoord) -> ScreenPoint {
        let (x, y) = raw_mercator(coord);
        ScreenPoint::new(
            self.translate[0] + self.scale * x,
            self.translate[1] - self.scale * y,
        )
    }

    /// Refits scale and translate so the union of `regions` is centered in
    /// `[width, height]` and touches at least one pair of edges.
    ///
    /// Fitting happens against the full region set; the fitted state is left
    /// untouched when the input cannot produce a finite fit.
    pub fn fit_size(&mut self, regions: &[Region], width: f64, height: f64) -> MapResult<()> {
        if !width.is_finite() || !height.is_finite() || width <= 0.0 || height <= 0.0 {
            return Err(MapError::InvalidData(format!(
                "fit extent must be finite and > 0, got {width}x{height}"
            )));
        }

        let reference = Self {
            scale: REFERENCE_SCALE,
            translate: [0.0, 0.0],
        };
        let mut bounds = ScreenBounds::empty();
        for region in regions {
            for coord in region.geometry().coords() {
                bounds.include(reference.project(coord));
            }
        }
        if bounds.is_empty() {
            return Err(MapError::InvalidData(
                "cannot fit projection to an empty region set".to_owned(),
            ));
        }

        let k = (width / bounds.width()).min(height / bounds.height());
        let x = (width - k * (bounds.x1 + bounds.x0)) / 2.0;
        let y = (height - k * (bounds.y1 + bounds.y0)) / 2.0;
        let fitted = Self::new(REFERENCE_SCALE * k, [x, y]).map_err(|_| {
            MapError::InvalidData("region set has zero projected extent".to_owned())
        })?;

        *self = fitted;
        Ok(())
    }
}

fn raw_mercator(coord: GeoCoord) -> (f64, f64) {
    let lambda = coord.lon.to_radians();
    let phi = coord
        .lat
        .clamp(-MAX_MERCATOR_LATITUDE, MAX_MERCATOR_LATITUDE)
        .to_radians();
    (lambda, (FRAC_PI_4 + phi / 2.0).tan().ln())
}
