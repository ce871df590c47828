use indexmap::IndexMap;
use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

use crate::core::GeoCoord;
use crate::data::{FeatureFields, Region, RegionGeometry, Ring};
use crate::error::{MapError, MapResult};

#[derive(Debug, Deserialize)]
struct Topology {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    transform: Option<Quantization>,
    #[serde(default)]
    arcs: Vec<Vec<Vec<f64>>>,
    #[serde(default)]
    objects: IndexMap<String, TopoGeometry>,
}

/// Delta-encoded integer positions are mapped back with
/// `value * scale + translate`.
#[derive(Debug, Clone, Copy, Deserialize)]
struct Quantization {
    scale: [f64; 2],
    translate: [f64; 2],
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type")]
enum TopoGeometry {
    GeometryCollection {
        geometries: Vec<TopoGeometry>,
    },
    Polygon {
        arcs: Vec<Vec<i64>>,
        #[serde(default)]
        properties: IndexMap<String, Value>,
    },
    MultiPolygon {
        arcs: Vec<Vec<Vec<i64>>>,
        #[serde(default)]
        properties: IndexMap<String, Value>,
    },
}

#[derive(Debug, Deserialize)]
struct DocumentKind {
    #[serde(rename = "type")]
    kind: Option<String>,
}

/// Whether `input` is a TopoJSON `Topology` document.
#[must_use]
pub fn is_topology(input: &str) -> bool {
    serde_json::from_str::<DocumentKind>(input)
        .ok()
        .and_then(|document| document.kind)
        .is_some_and(|kind| kind == "Topology")
}

/// Decodes the Polygon/MultiPolygon geometries of one TopoJSON object.
///
/// `object` names the entry under `objects`; `None` selects the only object
/// and fails when the topology carries several. Arcs are stitched into
/// rings with shared endpoints collapsed, and quantized topologies are
/// delta-decoded through their `transform`.
pub fn regions_from_topojson_str(
    input: &str,
    object: Option<&str>,
    fields: &FeatureFields,
) -> MapResult<Vec<Region>> {
    let topology: Topology = serde_json::from_str(input)
        .map_err(|e| MapError::Parse(format!("invalid topojson: {e}")))?;
    if topology.kind != "Topology" {
        return Err(MapError::Parse(format!(
            "expected a Topology, got {:?}",
            topology.kind
        )));
    }
    let arcs = decode_arcs(&topology.arcs, topology.transform)?;

    let (object_name, root) = match object {
        Some(name) => topology
            .objects
            .get_key_value(name)
            .ok_or_else(|| MapError::Parse(format!("topology has no object `{name}`")))?,
        None if topology.objects.len() == 1 => topology
            .objects
            .first()
            .ok_or_else(|| MapError::Parse("topology has no objects".to_owned()))?,
        None => {
            return Err(MapError::Parse(format!(
                "topology has {} objects; name the one to decode",
                topology.objects.len()
            )));
        }
    };

    let mut leaves = Vec::new();
    flatten(root, &mut leaves);
    let mut regions = Vec::with_capacity(leaves.len());
    for (index, geometry) in leaves.into_iter().enumerate() {
        let (properties, shape) = match geometry {
            TopoGeometry::Polygon { arcs: rings, properties } => {
                (properties, stitch_polygon(rings, &arcs).map(RegionGeometry::Polygon))
            }
            TopoGeometry::MultiPolygon {
                arcs: polygons,
                properties,
            } => (
                properties,
                polygons
                    .iter()
                    .map(|rings| stitch_polygon(rings, &arcs))
                    .collect::<Result<Vec<_>, _>>()
                    .map(RegionGeometry::MultiPolygon),
            ),
            TopoGeometry::GeometryCollection { .. } => continue,
        };
        let name = properties
            .get(&fields.region_name)
            .and_then(Value::as_str)
            .ok_or_else(|| {
                MapError::Parse(format!(
                    "region geometry {index} of `{object_name}` has no string `{}` property",
                    fields.region_name
                ))
            })?
            .to_owned();
        let shape = shape.map_err(|err| MapError::Parse(format!("region `{name}`: {err}")))?;
        regions.push(Region::new(name, shape)?.with_properties(properties.clone()));
    }
    debug!(
        object = object_name.as_str(),
        count = regions.len(),
        "decoded topology regions"
    );
    Ok(regions)
}

fn flatten<'a>(geometry: &'a TopoGeometry, out: &mut Vec<&'a TopoGeometry>) {
    match geometry {
        TopoGeometry::GeometryCollection { geometries } => {
            for child in geometries {
                flatten(child, out);
            }
        }
        leaf => out.push(leaf),
    }
}

fn decode_arcs(
    arcs: &[Vec<Vec<f64>>],
    transform: Option<Quantization>,
) -> MapResult<Vec<Vec<GeoCoord>>> {
    arcs.iter()
        .enumerate()
        .map(|(index, arc)| {
            let (mut x, mut y) = (0.0_f64, 0.0_f64);
            arc.iter()
                .map(|position| {
                    let [px, py, ..] = position.as_slice() else {
                        return Err(MapError::Parse(format!("arc {index} has a short position")));
                    };
                    Ok(match transform {
                        Some(q) => {
                            x += *px;
                            y += *py;
                            GeoCoord::new(
                                x * q.scale[0] + q.translate[0],
                                y * q.scale[1] + q.translate[1],
                            )
                        }
                        None => GeoCoord::new(*px, *py),
                    })
                })
                .collect::<MapResult<Vec<_>>>()
        })
        .collect()
}

fn stitch_polygon(rings: &[Vec<i64>], arcs: &[Vec<GeoCoord>]) -> Result<Vec<Ring>, String> {
    rings.iter().map(|ring| stitch_ring(ring, arcs)).collect()
}

/// Concatenates arcs into one ring. Negative indices address arc `!index`
/// traversed backwards; consecutive arcs share their joining vertex.
fn stitch_ring(indices: &[i64], arcs: &[Vec<GeoCoord>]) -> Result<Ring, String> {
    let mut ring = Ring::new();
    for &index in indices {
        let (arc_index, reversed) = if index < 0 {
            (!index, true)
        } else {
            (index, false)
        };
        let arc = usize::try_from(arc_index)
            .ok()
            .and_then(|i| arcs.get(i))
            .ok_or_else(|| format!("arc index {index} out of range"))?;
        ring.pop();
        if reversed {
            ring.extend(arc.iter().rev().copied());
        } else {
            ring.extend(arc.iter().copied());
        }
    }
    Ok(ring)
}
