//! Region and point datasets plus the loading seam.
//!
//! Datasets are immutable once loaded. Fetching is delegated to a
//! [`DatasetSource`]; the file adapter reads GeoJSON, and TopoJSON for
//! the region layer.

pub mod geojson;
pub mod loader;
pub mod point;
pub mod region;
pub mod topojson;

pub use geojson::{FeatureFields, points_from_geojson_str, regions_from_geojson_str};
pub use loader::{DatasetSource, Datasets, GeoJsonFiles, load_datasets};
pub use point::{PointCategory, PointFeature};
pub use region::{Region, RegionGeometry, Ring};
pub use topojson::{is_topology, regions_from_topojson_str};
