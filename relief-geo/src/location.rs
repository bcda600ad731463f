use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::error::GeoError;

/// A point on the earth's surface, with an optional human-readable address.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Location {
    pub lat: f64,
    pub lon: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
}

impl Location {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self {
            lat,
            lon,
            address: None,
        }
    }

    pub fn with_address(mut self, address: impl Into<String>) -> Self {
        self.address = Some(address.into());
        self
    }

    /// Checks `lat ∈ [-90, 90]` and `lon ∈ [-180, 180]`.
    pub fn validate(&self) -> Result<(), GeoError> {
        if !(-90.0..=90.0).contains(&self.lat) {
            return Err(GeoError::OutOfRange {
                field: "lat",
                value: self.lat,
                min: -90.0,
                max: 90.0,
            });
        }
        if !(-180.0..=180.0).contains(&self.lon) {
            return Err(GeoError::OutOfRange {
                field: "lon",
                value: self.lon,
                min: -180.0,
                max: 180.0,
            });
        }
        Ok(())
    }
}
