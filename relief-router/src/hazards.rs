use relief_geo::{MultiPolygon, Polygon};
use relief_model::{EventKind, HazardPolygon, Report};
use relief_network::{EdgeId, EdgeStatusKind, RoadNetwork};

/// Event kinds that generate an avoidance polygon for the external router.
const ROUTING_HAZARD_KINDS: &[EventKind] = &[
    EventKind::RoadClosure,
    EventKind::BridgeCollapse,
    EventKind::Flooding,
    EventKind::RoadDamage,
];

/// Either a single polygon or a disjoint set, matching the "emit a single
/// Polygon if only one remains, else a MultiPolygon" rule.
#[derive(Debug, Clone)]
pub enum AvoidPolygons {
    Single(Polygon),
    Multi(MultiPolygon),
}

/// Builds the avoidance geometry sent to the external router: hazard
/// polygons from reports of a blocking kind, minus any that would swallow
/// the origin or destination (the external router could never route
/// to/from a point inside its own avoidance zone).
pub fn build_avoid_polygons(
    reports: &[Report],
    origin: &relief_geo::Location,
    destination: &relief_geo::Location,
) -> Option<AvoidPolygons> {
    let mut polygons = Vec::new();
    for report in reports {
        if !ROUTING_HAZARD_KINDS.contains(&report.kind) {
            continue;
        }
        let Some(hazard) = HazardPolygon::from_point(report.kind, &report.location, Some(report.id.clone())) else {
            continue;
        };
        if hazard.polygon.contains_point(origin) || hazard.polygon.contains_point(destination) {
            continue;
        }
        polygons.push(hazard.polygon);
    }

    match polygons.len() {
        0 => None,
        1 => Some(AvoidPolygons::Single(polygons.into_iter().next().unwrap())),
        _ => Some(AvoidPolygons::Multi(MultiPolygon(polygons))),
    }
}

#[derive(Debug, Clone, serde::Serialize)]
pub struct AvoidedHazard {
    pub edge_id: EdgeId,
    pub midpoint: (f64, f64),
    pub name: Option<String>,
    pub confidence: f64,
}

/// Closed edges not on the traversed path, capped at 5, for the route's
/// "what did we avoid" report.
pub fn avoided_hazards(network: &RoadNetwork, path_edges: &[EdgeId]) -> Vec<AvoidedHazard> {
    let mut avoided = Vec::new();
    for edge in &network.edges {
        if edge.edge_status.status() != EdgeStatusKind::Closed {
            continue;
        }
        if path_edges.contains(&edge.id) {
            continue;
        }
        avoided.push(AvoidedHazard {
            edge_id: edge.id,
            midpoint: edge.midpoint(),
            name: edge.name.clone(),
            confidence: edge.edge_status.confidence,
        });
        if avoided.len() == 5 {
            break;
        }
    }
    avoided
}
