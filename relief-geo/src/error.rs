use thiserror::Error;

#[derive(Error, Debug, PartialEq)]
pub enum GeoError {
    #[error("{field} {value} out of range [{min}, {max}]")]
    OutOfRange {
        field: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },

    #[error("invalid bounding box: west ({west}) must be <= east ({east}), south ({south}) must be <= north ({north})")]
    InvalidBoundingBox {
        west: f64,
        south: f64,
        east: f64,
        north: f64,
    },
}
