use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::core::GeoCoord;
use crate::error::{MapError, MapResult};

/// Closed ring of geographic coordinates. The closing vertex may or may not
/// repeat the first one.
pub type Ring = Vec<GeoCoord>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum RegionGeometry {
    /// Exterior ring followed by optional holes.
    Polygon(Vec<Ring>),
    MultiPolygon(Vec<Vec<Ring>>),
}

impl RegionGeometry {
    /// Iterates every ring, holes included, across all polygons.
    pub fn rings(&self) -> Box<dyn Iterator<Item = &Ring> + '_> {
        match self {
            Self::Polygon(rings) => Box::new(rings.iter()),
            Self::MultiPolygon(polygons) => Box::new(polygons.iter().flatten()),
        }
    }

    pub fn coords(&self) -> impl Iterator<Item = GeoCoord> + '_ {
        self.rings().flat_map(|ring| ring.iter().copied())
    }

    fn validate(&self) -> MapResult<()> {
        let mut vertex_count = 0usize;
        for coord in self.coords() {
            if !coord.is_finite() {
                return Err(MapError::InvalidData(
                    "region coordinates must be finite".to_owned(),
                ));
            }
            vertex_count += 1;
        }
        if vertex_count == 0 {
            return Err(MapError::InvalidData(
                "region geometry must contain at least one vertex".to_owned(),
            ));
        }
        Ok(())
    }
}

/// Named boundary polygon. Immutable once built.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Region {
    name: String,
    geometry: RegionGeometry,
    #[serde(default)]
    properties: IndexMap<String, Value>,
}

impl Region {
    pub fn new(name: impl Into<String>, geometry: RegionGeometry) -> MapResult<Self> {
        let name = name.into();
        if name.is_empty() {
            return Err(MapError::InvalidData(
                "region name must not be empty".to_owned(),
            ));
        }
        geometry.validate()?;
        Ok(Self {
            name,
            geometry,
            properties: IndexMap::new(),
        })
    }

    /// Convenience constructor for a single-ring polygon.
    pub fn polygon(name: impl Into<String>, ring: Ring) -> MapResult<Self> {
        Self::new(name, RegionGeometry::Polygon(vec![ring]))
    }

    #[must_use]
    pub fn with_properties(mut self, properties: IndexMap<String, Value>) -> Self {
        self.properties = properties;
        self
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn geometry(&self) -> &RegionGeometry {
        &self.geometry
    }

    #[must_use]
    pub fn properties(&self) -> &IndexMap<String, Value> {
        &self.properties
    }

    #[must_use]
    pub fn property(&self, key: &str) -> Option<&Value> {
        self.properties.get(key)
    }
}
