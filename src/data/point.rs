use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::core::GeoCoord;

/// Closed category set carried by point features.
///
/// Matching is case-insensitive on the raw attribute; anything that is not
/// `c` or `d` (including a missing attribute) is `Other`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PointCategory {
    C,
    D,
    Other,
}

impl PointCategory {
    #[must_use]
    pub fn from_attribute(raw: Option<&str>) -> Self {
        match raw {
            Some(value) if value.eq_ignore_ascii_case("c") => Self::C,
            Some(value) if value.eq_ignore_ascii_case("d") => Self::D,
            _ => Self::Other,
        }
    }
}

/// Geo-located marker with a category and an owning authority name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PointFeature {
    #[serde(default)]
    pub coordinates: Option<GeoCoord>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub authority: Option<String>,
    #[serde(default)]
    pub properties: IndexMap<String, Value>,
}

impl PointFeature {
    #[must_use]
    pub fn new(coordinates: Option<GeoCoord>) -> Self {
        Self {
            coordinates,
            category: None,
            authority: None,
            properties: IndexMap::new(),
        }
    }

    #[must_use]
    pub fn at(lon: f64, lat: f64) -> Self {
        Self::new(Some(GeoCoord::new(lon, lat)))
    }

    #[must_use]
    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    #[must_use]
    pub fn with_authority(mut self, authority: impl Into<String>) -> Self {
        self.authority = Some(authority.into());
        self
    }

    #[must_use]
    pub fn category(&self) -> PointCategory {
        PointCategory::from_attribute(self.category.as_deref())
    }

    /// Coordinates usable for rendering, if present and finite.
    #[must_use]
    pub fn valid_coordinates(&self) -> Option<GeoCoord> {
        self.coordinates.filter(|coord| coord.is_finite())
    }

    #[must_use]
    pub fn is_owned_by(&self, authority: &str) -> bool {
        self.authority.as_deref() == Some(authority)
    }
}
