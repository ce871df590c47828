use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::core::GeoCoord;
use crate::data::{PointFeature, Region, RegionGeometry, Ring};
use crate::error::{MapError, MapResult};

/// Property keys read from GeoJSON features.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeatureFields {
    #[serde(default = "default_region_name")]
    pub region_name: String,
    #[serde(default = "default_point_category")]
    pub point_category: String,
    #[serde(default = "default_point_authority")]
    pub point_authority: String,
}

impl Default for FeatureFields {
    fn default() -> Self {
        Self {
            region_name: default_region_name(),
            point_category: default_point_category(),
            point_authority: default_point_authority(),
        }
    }
}

fn default_region_name() -> String {
    "LAD25NMW".to_owned()
}

fn default_point_category() -> String {
    "cat".to_owned()
}

fn default_point_authority() -> String {
    "authority_english".to_owned()
}

/// Decodes a GeoJSON `FeatureCollection` of Polygon/MultiPolygon features.
pub fn regions_from_geojson_str(input: &str, fields: &FeatureFields) -> MapResult<Vec<Region>> {
    let features = parse_features(input)?;
    let mut regions = Vec::with_capacity(features.len());
    for (index, feature) in features.iter().enumerate() {
        let properties = feature_properties(feature);
        let name = properties
            .get(&fields.region_name)
            .and_then(Value::as_str)
            .ok_or_else(|| {
                MapError::Parse(format!(
                    "region feature {index} has no string `{}` property",
                    fields.region_name
                ))
            })?
            .to_owned();
        let geometry = feature
            .get("geometry")
            .ok_or_else(|| MapError::Parse(format!("region `{name}` has no geometry")))?;
        let geometry = parse_region_geometry(geometry)
            .map_err(|err| MapError::Parse(format!("region `{name}`: {err}")))?;
        regions.push(Region::new(name, geometry)?.with_properties(properties));
    }
    debug!(count = regions.len(), "decoded region features");
    Ok(regions)
}

/// Decodes a GeoJSON `FeatureCollection` of Point features.
///
/// Features with a null geometry or missing coordinates are kept with
/// `coordinates: None` and are dropped at render time.
pub fn points_from_geojson_str(
    input: &str,
    fields: &FeatureFields,
) -> MapResult<Vec<PointFeature>> {
    let features = parse_features(input)?;
    let points: Vec<PointFeature> = features
        .iter()
        .map(|feature| {
            let properties = feature_properties(feature);
            let coordinates = feature
                .get("geometry")
                .and_then(|geometry| geometry.get("coordinates"))
                .and_then(parse_position);
            PointFeature {
                coordinates,
                category: string_property(&properties, &fields.point_category),
                authority: string_property(&properties, &fields.point_authority),
                properties,
            }
        })
        .collect();
    debug!(count = points.len(), "decoded point features");
    Ok(points)
}

fn parse_features(input: &str) -> MapResult<Vec<Value>> {
    let mut document: Value = serde_json::from_str(input)
        .map_err(|e| MapError::Parse(format!("invalid geojson: {e}")))?;
    match document.get("type").and_then(Value::as_str) {
        Some("FeatureCollection") => {}
        other => {
            return Err(MapError::Parse(format!(
                "expected a FeatureCollection, got {other:?}"
            )));
        }
    }
    match document.get_mut("features").map(Value::take) {
        Some(Value::Array(features)) => Ok(features),
        _ => Err(MapError::Parse(
            "feature collection has no `features` array".to_owned(),
        )),
    }
}

fn feature_properties(feature: &Value) -> IndexMap<String, Value> {
    match feature.get("properties") {
        Some(Value::Object(map)) => map
            .iter()
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect(),
        _ => IndexMap::new(),
    }
}

fn string_property(properties: &IndexMap<String, Value>, key: &str) -> Option<String> {
    properties.get(key).and_then(Value::as_str).map(str::to_owned)
}

fn parse_region_geometry(geometry: &Value) -> Result<RegionGeometry, String> {
    let coordinates = geometry
        .get("coordinates")
        .ok_or_else(|| "geometry has no coordinates".to_owned())?;
    match geometry.get("type").and_then(Value::as_str) {
        Some("Polygon") => parse_polygon(coordinates).map(RegionGeometry::Polygon),
        Some("MultiPolygon") => coordinates
            .as_array()
            .ok_or_else(|| "multipolygon coordinates must be an array".to_owned())?
            .iter()
            .map(parse_polygon)
            .collect::<Result<Vec<_>, _>>()
            .map(RegionGeometry::MultiPolygon),
        other => Err(format!("unsupported region geometry type {other:?}")),
    }
}

fn parse_polygon(value: &Value) -> Result<Vec<Ring>, String> {
    value
        .as_array()
        .ok_or_else(|| "polygon coordinates must be an array of rings".to_owned())?
        .iter()
        .map(|ring| {
            ring.as_array()
                .ok_or_else(|| "ring must be an array of positions".to_owned())?
                .iter()
                .map(|position| {
                    parse_position(position).ok_or_else(|| "invalid position".to_owned())
                })
                .collect()
        })
        .collect()
}

fn parse_position(value: &Value) -> Option<GeoCoord> {
    let position = value.as_array()?;
    let lon = position.first()?.as_f64()?;
    let lat = position.get(1)?.as_f64()?;
    Some(GeoCoord::new(lon, lat))
}
