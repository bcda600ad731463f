use relief_geo::{Location, Polygon, Ring};
use serde::{Deserialize, Serialize};

use crate::event_kind::{default_radius_m, EventKind};

/// A polygon marking an area the router should avoid, either supplied
/// explicitly alongside a report or generated from a point detection using
/// the per-kind default radius.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HazardPolygon {
    pub kind: EventKind,
    pub polygon: Polygon,
    pub source_report_id: Option<String>,
}

impl HazardPolygon {
    pub fn from_explicit_ring(kind: EventKind, ring: Ring, source_report_id: Option<String>) -> Self {
        Self {
            kind,
            polygon: Polygon::new(ring),
            source_report_id,
        }
    }

    /// Generates a circular approximation around `center` sized by
    /// `kind`'s default radius. Returns `None` for kinds with no default
    /// radius (they never generate a hazard polygon from a bare point).
    pub fn from_point(
        kind: EventKind,
        center: &Location,
        source_report_id: Option<String>,
    ) -> Option<Self> {
        let radius_m = default_radius_m(kind)?;
        Some(Self {
            kind,
            polygon: Polygon::from_point(center, radius_m),
            source_report_id,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn point_generation_uses_per_kind_default_radius() {
        let center = Location::new(35.5, -82.5);
        let hazard = HazardPolygon::from_point(EventKind::Flooding, &center, None).unwrap();
        assert!(hazard.polygon.contains_point(&center));
    }

    #[test]
    fn kinds_without_default_radius_generate_nothing() {
        let center = Location::new(35.5, -82.5);
        assert!(HazardPolygon::from_point(EventKind::RoadClear, &center, None).is_none());
        assert!(HazardPolygon::from_point(EventKind::ShelterOpening, &center, None).is_none());
    }

    #[test]
    fn explicit_ring_is_preserved() {
        let ring = Ring(vec![
            (-82.6, 35.4),
            (-82.4, 35.4),
            (-82.4, 35.6),
            (-82.6, 35.6),
            (-82.6, 35.4),
        ]);
        let hazard =
            HazardPolygon::from_explicit_ring(EventKind::BridgeCollapse, ring, Some("r1".into()));
        assert!(hazard.polygon.contains_point(&Location::new(35.5, -82.5)));
    }
}
