use std::fs;
use std::path::PathBuf;
use std::thread;

use tracing::{debug, error};

use crate::data::{
    FeatureFields, PointFeature, Region, is_topology, points_from_geojson_str,
    regions_from_geojson_str, regions_from_topojson_str,
};
use crate::error::{MapError, MapResult};

/// External collaborator that fetches and decodes the two datasets.
///
/// Both loads run concurrently, so implementations must be shareable across
/// threads.
pub trait DatasetSource: Sync {
    fn load_regions(&self) -> MapResult<Vec<Region>>;
    fn load_points(&self) -> MapResult<Vec<PointFeature>>;
}

/// Region and point datasets loaded together.
#[derive(Debug, Clone, PartialEq)]
pub struct Datasets {
    pub regions: Vec<Region>,
    pub points: Vec<PointFeature>,
}

/// Runs both loads concurrently and joins them.
///
/// A failure in either load aborts the whole operation; no partial dataset
/// is returned and nothing is retried. Failures are reported through
/// `tracing::error!`.
pub fn load_datasets<S>(source: &S) -> MapResult<Datasets>
where
    S: DatasetSource + ?Sized,
{
    let (regions, points) = thread::scope(|scope| {
        let regions = scope.spawn(|| source.load_regions());
        let points = scope.spawn(|| source.load_points());
        (join_load(regions, "region"), join_load(points, "point"))
    });

    let regions = regions.inspect_err(log_load_failure)?;
    let points = points.inspect_err(log_load_failure)?;
    debug!(
        regions = regions.len(),
        points = points.len(),
        "datasets loaded"
    );
    Ok(Datasets { regions, points })
}

fn join_load<T>(
    handle: thread::ScopedJoinHandle<'_, MapResult<T>>,
    dataset: &'static str,
) -> MapResult<T> {
    match handle.join() {
        Ok(Ok(value)) => Ok(value),
        Ok(Err(err @ MapError::Load { .. })) => Err(err),
        Ok(Err(err)) => Err(MapError::Load {
            dataset,
            reason: err.to_string(),
        }),
        Err(_) => Err(MapError::Load {
            dataset,
            reason: "loader thread panicked".to_owned(),
        }),
    }
}

fn log_load_failure(err: &MapError) {
    error!(error = %err, "error loading data");
}

/// Reads both datasets from GeoJSON files on disk.
///
/// The region file may also be a TopoJSON topology; it is recognized by its
/// `"type": "Topology"` and decoded from `topology_object`.
#[derive(Debug, Clone)]
pub struct GeoJsonFiles {
    pub regions_path: PathBuf,
    pub points_path: PathBuf,
    pub fields: FeatureFields,
    /// Object decoded from a region topology; `None` takes the only one.
    pub topology_object: Option<String>,
}

impl GeoJsonFiles {
    #[must_use]
    pub fn new(regions_path: impl Into<PathBuf>, points_path: impl Into<PathBuf>) -> Self {
        Self {
            regions_path: regions_path.into(),
            points_path: points_path.into(),
            fields: FeatureFields::default(),
            topology_object: None,
        }
    }

    #[must_use]
    pub fn with_fields(mut self, fields: FeatureFields) -> Self {
        self.fields = fields;
        self
    }

    #[must_use]
    pub fn with_topology_object(mut self, object: impl Into<String>) -> Self {
        self.topology_object = Some(object.into());
        self
    }
}

impl DatasetSource for GeoJsonFiles {
    fn load_regions(&self) -> MapResult<Vec<Region>> {
        let raw = fs::read_to_string(&self.regions_path).map_err(|err| MapError::Load {
            dataset: "region",
            reason: format!("{}: {err}", self.regions_path.display()),
        })?;
        if is_topology(&raw) {
            regions_from_topojson_str(&raw, self.topology_object.as_deref(), &self.fields)
        } else {
            regions_from_geojson_str(&raw, &self.fields)
        }
    }

    fn load_points(&self) -> MapResult<Vec<PointFeature>> {
        let raw = fs::read_to_string(&self.points_path).map_err(|err| MapError::Load {
            dataset: "point",
            reason: format!("{}: {err}", self.points_path.display()),
        })?;
        points_from_geojson_str(&raw, &self.fields)
    }
}
