pub mod bbox;
pub mod distance;
pub mod error;
pub mod location;
pub mod polygon;

pub use bbox::BoundingBox;
pub use distance::{haversine_km, haversine_m};
pub use error::GeoError;
pub use location::Location;
pub use polygon::{MultiPolygon, Polygon, Ring};
