use serde::{Deserialize, Serialize};

use crate::location::Location;

const EARTH_RADIUS_M: f64 = 6_371_000.0;
const CIRCLE_SIDES: usize = 16;

/// A closed ring of `[lon, lat]` coordinate pairs, first == last, matching
/// GeoJSON's `Polygon` exterior-ring convention.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ring(pub Vec<(f64, f64)>);

impl Ring {
    /// Ray-casting point-in-polygon test. The boundary itself is treated as
    /// outside (consistent with the classic even-odd algorithm); the router
    /// never needs exact boundary membership since reports are projected by
    /// proximity, not by strict containment.
    pub fn contains_point(&self, location: &Location) -> bool {
        let (x, y) = (location.lon, location.lat);
        let pts = &self.0;
        if pts.len() < 4 {
            return false;
        }
        let mut inside = false;
        let mut j = pts.len() - 1;
        for i in 0..pts.len() {
            let (xi, yi) = pts[i];
            let (xj, yj) = pts[j];
            let intersects = ((yi > y) != (yj > y))
                && (x < (xj - xi) * (y - yi) / (yj - yi) + xi);
            if intersects {
                inside = !inside;
            }
            j = i;
        }
        inside
    }
}

/// A single polygon with no holes, matching the spec's "either supplied
/// explicitly or generated from a point" hazard-polygon contract.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Polygon {
    pub exterior: Ring,
}

impl Polygon {
    pub fn new(exterior: Ring) -> Self {
        Self { exterior }
    }

    pub fn contains_point(&self, location: &Location) -> bool {
        self.exterior.contains_point(location)
    }

    /// Approximate a circle of `radius_m` around `center` with a 16-gon.
    pub fn from_point(center: &Location, radius_m: f64) -> Self {
        let lat_r = center.lat.to_radians();
        let angular_radius = radius_m / EARTH_RADIUS_M;
        let mut coords = Vec::with_capacity(CIRCLE_SIDES + 1);
        for i in 0..CIRCLE_SIDES {
            let bearing = 2.0 * std::f64::consts::PI * (i as f64) / (CIRCLE_SIDES as f64);
            let lat2 = (lat_r.sin() * angular_radius.cos()
                + lat_r.cos() * angular_radius.sin() * bearing.cos())
            .asin();
            let lon2 = center.lon.to_radians()
                + (bearing.sin() * angular_radius.sin() * lat_r.cos())
                    .atan2(angular_radius.cos() - lat_r.sin() * lat2.sin());
            coords.push((lon2.to_degrees(), lat2.to_degrees()));
        }
        coords.push(coords[0]);
        Self::new(Ring(coords))
    }
}

/// One or more disjoint polygons to avoid, sent to the external router.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MultiPolygon(pub Vec<Polygon>);

impl MultiPolygon {
    pub fn contains_point(&self, location: &Location) -> bool {
        self.0.iter().any(|p| p.contains_point(location))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square() -> Ring {
        Ring(vec![
            (-82.6, 35.4),
            (-82.4, 35.4),
            (-82.4, 35.6),
            (-82.6, 35.6),
            (-82.6, 35.4),
        ])
    }

    #[test]
    fn point_inside_square_is_contained() {
        assert!(square().contains_point(&Location::new(35.5, -82.5)));
    }

    #[test]
    fn point_outside_square_is_not_contained() {
        assert!(!square().contains_point(&Location::new(35.5, -80.0)));
    }

    #[test]
    fn circle_from_point_contains_its_center() {
        let center = Location::new(35.5, -82.5);
        let poly = Polygon::from_point(&center, 500.0);
        assert!(poly.contains_point(&center));
    }

    #[test]
    fn circle_from_point_excludes_far_away_points() {
        let center = Location::new(35.5, -82.5);
        let poly = Polygon::from_point(&center, 100.0);
        assert!(!poly.contains_point(&Location::new(36.5, -81.5)));
    }

    #[test]
    fn multipolygon_contains_if_any_member_does() {
        let center = Location::new(35.5, -82.5);
        let multi = MultiPolygon(vec![
            Polygon::from_point(&Location::new(40.0, -80.0), 100.0),
            Polygon::from_point(&center, 500.0),
        ]);
        assert!(multi.contains_point(&center));
    }
}
