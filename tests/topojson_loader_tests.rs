use std::fs;

use storymap::MapError;
use storymap::core::GeoCoord;
use storymap::data::{
    FeatureFields, GeoJsonFiles, RegionGeometry, is_topology, load_datasets,
    regions_from_topojson_str,
};

/// Two unit squares on a quantized grid sharing the arc `(2,0)-(2,2)`.
const TOPOLOGY: &str = r#"{
  "type": "Topology",
  "transform": { "scale": [0.5, 0.5], "translate": [-4.0, 51.0] },
  "arcs": [
    [[2, 0], [0, 2]],
    [[2, 2], [-2, 0], [0, -2], [2, 0]],
    [[2, 0], [2, 0], [0, 2], [-2, 0]]
  ],
  "objects": {
    "wales_local_authorities": {
      "type": "GeometryCollection",
      "geometries": [
        {
          "type": "Polygon",
          "arcs": [[0, 1]],
          "properties": { "LAD25NMW": "Cardiff", "LAD25CD": "W06000015" }
        },
        {
          "type": "MultiPolygon",
          "arcs": [[[2, -1]]],
          "properties": { "LAD25NMW": "Newport" }
        }
      ]
    }
  }
}"#;

const POINTS: &str = r#"{
  "type": "FeatureCollection",
  "features": [
    {
      "type": "Feature",
      "properties": { "cat": "C", "authority_english": "Cardiff" },
      "geometry": { "type": "Point", "coordinates": [-3.5, 51.5] }
    }
  ]
}"#;

#[test]
fn stitches_shared_arcs_into_closed_rings() {
    let regions =
        regions_from_topojson_str(TOPOLOGY, None, &FeatureFields::default()).expect("regions");
    assert_eq!(regions.len(), 2);
    assert_eq!(regions[0].name(), "Cardiff");
    assert_eq!(
        regions[0].property("LAD25CD").and_then(|v| v.as_str()),
        Some("W06000015")
    );

    let RegionGeometry::Polygon(rings) = regions[0].geometry() else {
        panic!("expected a polygon");
    };
    assert_eq!(
        rings[0],
        vec![
            GeoCoord::new(-3.0, 51.0),
            GeoCoord::new(-3.0, 52.0),
            GeoCoord::new(-4.0, 52.0),
            GeoCoord::new(-4.0, 51.0),
            GeoCoord::new(-3.0, 51.0),
        ]
    );

    let RegionGeometry::MultiPolygon(polygons) = regions[1].geometry() else {
        panic!("expected a multipolygon");
    };
    assert_eq!(
        polygons[0][0],
        vec![
            GeoCoord::new(-3.0, 51.0),
            GeoCoord::new(-2.0, 51.0),
            GeoCoord::new(-2.0, 52.0),
            GeoCoord::new(-3.0, 52.0),
            GeoCoord::new(-3.0, 51.0),
        ]
    );
}

#[test]
fn unquantized_arcs_are_read_verbatim() {
    let input = r#"{
      "type": "Topology",
      "arcs": [[[-3.3, 51.4], [-3.1, 51.4], [-3.1, 51.6], [-3.3, 51.4]]],
      "objects": {
        "la": { "type": "Polygon", "arcs": [[0]], "properties": { "LAD25NMW": "Cardiff" } }
      }
    }"#;
    let regions = regions_from_topojson_str(input, Some("la"), &FeatureFields::default())
        .expect("regions");
    assert_eq!(regions.len(), 1);
    assert_eq!(regions[0].geometry().coords().count(), 4);
}

#[test]
fn object_selection_and_bad_arcs_are_parse_errors() {
    let fields = FeatureFields::default();
    assert!(matches!(
        regions_from_topojson_str(TOPOLOGY, Some("missing"), &fields),
        Err(MapError::Parse(message)) if message.contains("missing")
    ));

    let two_objects = r#"{
      "type": "Topology",
      "arcs": [[[0, 0], [1, 0], [1, 1], [0, 0]]],
      "objects": {
        "a": { "type": "Polygon", "arcs": [[0]], "properties": { "LAD25NMW": "A" } },
        "b": { "type": "Polygon", "arcs": [[0]], "properties": { "LAD25NMW": "B" } }
      }
    }"#;
    assert!(matches!(
        regions_from_topojson_str(two_objects, None, &fields),
        Err(MapError::Parse(_))
    ));
    assert_eq!(
        regions_from_topojson_str(two_objects, Some("b"), &fields).expect("named")[0].name(),
        "B"
    );

    let dangling = r#"{
      "type": "Topology",
      "arcs": [],
      "objects": { "a": { "type": "Polygon", "arcs": [[3]], "properties": { "LAD25NMW": "A" } } }
    }"#;
    assert!(matches!(
        regions_from_topojson_str(dangling, None, &fields),
        Err(MapError::Parse(message)) if message.contains("out of range")
    ));
}

#[test]
fn recognizes_topology_documents() {
    assert!(is_topology(TOPOLOGY));
    assert!(!is_topology(POINTS));
    assert!(!is_topology("[]"));
}

#[test]
fn file_source_accepts_topology_for_regions() {
    let dir = std::env::temp_dir().join(format!("storymap-topology-{}", std::process::id()));
    fs::create_dir_all(&dir).expect("scratch dir");
    let regions_path = dir.join("regions.topojson");
    let points_path = dir.join("points.geojson");
    fs::write(&regions_path, TOPOLOGY).expect("write regions");
    fs::write(&points_path, POINTS).expect("write points");

    let source = GeoJsonFiles::new(&regions_path, &points_path)
        .with_topology_object("wales_local_authorities");
    let datasets = load_datasets(&source).expect("load");
    assert_eq!(datasets.regions.len(), 2);
    assert_eq!(datasets.points.len(), 1);

    fs::remove_dir_all(&dir).expect("cleanup");
}
