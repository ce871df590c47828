pub mod bounds;
pub mod fit;
pub mod path;
pub mod projection;
pub mod transform;
pub mod types;

pub use bounds::ScreenBounds;
pub use fit::{FIT_FILL_RATIO, fit_regions};
pub use path::{PathGenerator, ProjectedShape};
pub use projection::{MAX_MERCATOR_LATITUDE, MercatorProjection};
pub use transform::Transform;
pub use types::{GeoCoord, ScreenPoint, Viewport};
