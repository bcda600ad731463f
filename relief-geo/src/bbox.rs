use serde::{Deserialize, Serialize};

use crate::error::GeoError;
use crate::location::Location;

/// A west/south/east/north bounding box. Containment is inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub west: f64,
    pub south: f64,
    pub east: f64,
    pub north: f64,
}

impl BoundingBox {
    pub fn new(west: f64, south: f64, east: f64, north: f64) -> Result<Self, GeoError> {
        if west > east || south > north {
            return Err(GeoError::InvalidBoundingBox {
                west,
                south,
                east,
                north,
            });
        }
        Ok(Self {
            west,
            south,
            east,
            north,
        })
    }

    pub fn contains(&self, location: &Location) -> bool {
        location.lon >= self.west
            && location.lon <= self.east
            && location.lat >= self.south
            && location.lat <= self.north
    }
}
