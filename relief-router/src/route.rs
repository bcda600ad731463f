use chrono::{DateTime, Utc};
use relief_geo::{haversine_m, Location};
use relief_model::Report;
use relief_network::{EdgeStatusKind, RoadNetwork};
use serde::Serialize;

use crate::dijkstra::{dijkstra, PathResult};
use crate::external::{ExternalRoute, ExternalRouter};
use crate::hazards::{avoided_hazards, build_avoid_polygons, AvoidedHazard};

const SPEED_NORMAL_KMH: f64 = 50.0;
const SPEED_URBAN_KMH: f64 = 30.0;
const EXTERNAL_ROUTE_CONFIDENCE: f64 = 0.7;
const HAVERSINE_ROUTE_CONFIDENCE: f64 = 0.5;
const DAMAGE_CONFIDENCE_FACTOR: f64 = 0.9;

#[derive(Debug, Clone, Serialize)]
pub struct Route {
    pub id: String,
    pub origin: Location,
    pub destination: Location,
    pub waypoints: Vec<Location>,
    #[serde(serialize_with = "relief_common::json::finite_f64")]
    pub distance_m: f64,
    #[serde(serialize_with = "relief_common::json::finite_f64")]
    pub estimated_duration_min: f64,
    pub hazards_avoided: Vec<AvoidedHazard>,
    #[serde(serialize_with = "relief_common::json::finite_f64")]
    pub confidence: f64,
    pub reasoning: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub directions: Option<Vec<crate::external::ExternalStep>>,
    pub created_at: DateTime<Utc>,
}

fn damaged_edge_count(network: &RoadNetwork, path: &PathResult) -> usize {
    path.edges
        .iter()
        .filter(|&&id| network.edges[id].edge_status.status() == EdgeStatusKind::Damaged)
        .count()
}

fn has_closed_edge(network: &RoadNetwork, path: &PathResult) -> bool {
    path.edges
        .iter()
        .any(|&id| network.edges[id].edge_status.status() == EdgeStatusKind::Closed)
}

fn graph_route_confidence(network: &RoadNetwork, path: &PathResult) -> f64 {
    if has_closed_edge(network, path) {
        return 0.0;
    }
    let damaged = damaged_edge_count(network, path);
    DAMAGE_CONFIDENCE_FACTOR.powi(damaged as i32).clamp(0.0, 1.0)
}

fn graph_route_duration_min(network: &RoadNetwork, path: &PathResult) -> f64 {
    let path_edges = path.edges.len().max(1);
    let damaged = damaged_edge_count(network, path);
    let damage_ratio = damaged as f64 / path_edges as f64;
    let speed_kmh = SPEED_NORMAL_KMH * (1.0 - 0.5 * damage_ratio);
    if speed_kmh <= 0.0 {
        return f64::INFINITY;
    }
    let speed_m_per_min = speed_kmh * 1000.0 / 60.0;
    path.distance_m / speed_m_per_min
}

fn graph_route_reasoning(hazards: &[AvoidedHazard], damaged: usize) -> String {
    let mut parts = Vec::new();
    if !hazards.is_empty() {
        let names: Vec<&str> = hazards
            .iter()
            .take(3)
            .map(|h| h.name.as_deref().unwrap_or("hazard"))
            .collect();
        parts.push(format!(
            "Avoiding {} hazard(s) including: {}",
            hazards.len(),
            names.join(", ")
        ));
    }
    if damaged > 0 {
        parts.push(format!(
            "Route includes {damaged} damaged but passable road segment(s)"
        ));
    } else {
        parts.push("All segments on route are clear".to_string());
    }
    parts.join(". ") + "."
}

/// Three-tier routing hierarchy: internal Dijkstra over the dynamic graph,
/// then the external router collaborator, then a straight-line haversine
/// estimate. Each tier is tried only after the previous one fails to
/// produce a path.
pub async fn route_with_fallback(
    id: String,
    network: &RoadNetwork,
    origin: Location,
    destination: Location,
    context_reports: &[Report],
    external: &dyn ExternalRouter,
    now: DateTime<Utc>,
) -> Route {
    let src = network.nearest_node(&origin);
    let dst = network.nearest_node(&destination);

    if let (Some(src), Some(dst)) = (src, dst) {
        if let Some(path) = dijkstra(network, src, dst) {
            let hazards = avoided_hazards(network, &path.edges);
            let damaged = damaged_edge_count(network, &path);
            return Route {
                id,
                origin,
                destination,
                waypoints: path.geometry.clone(),
                distance_m: path.distance_m,
                estimated_duration_min: graph_route_duration_min(network, &path),
                confidence: graph_route_confidence(network, &path),
                reasoning: graph_route_reasoning(&hazards, damaged),
                hazards_avoided: hazards,
                directions: None,
                created_at: now,
            };
        }
    }

    tracing::debug!(%id, "no internal graph path, trying external router");
    let avoid = build_avoid_polygons(context_reports, &origin, &destination);
    if let Ok(ExternalRoute {
        geometry,
        distance_m,
        duration_s,
        steps,
    }) = external.route(origin.clone(), destination.clone(), avoid).await
    {
        return Route {
            id,
            origin,
            destination,
            waypoints: geometry,
            distance_m,
            estimated_duration_min: duration_s / 60.0,
            hazards_avoided: Vec::new(),
            confidence: EXTERNAL_ROUTE_CONFIDENCE,
            reasoning: "Route via external router (road conditions not verified against the hazard graph). Use caution.".to_string(),
            directions: Some(steps),
            created_at: now,
        };
    }

    tracing::debug!(%id, "external router unavailable, falling back to straight-line estimate");
    let distance_m = haversine_m(origin.lat, origin.lon, destination.lat, destination.lon);
    let duration_min = (distance_m / 1000.0) / SPEED_URBAN_KMH * 60.0;
    Route {
        id,
        origin: origin.clone(),
        destination: destination.clone(),
        waypoints: vec![origin, destination],
        distance_m,
        estimated_duration_min: duration_min,
        hazards_avoided: Vec::new(),
        confidence: HAVERSINE_ROUTE_CONFIDENCE,
        reasoning: "Direct-distance estimate (no road data available). Actual route may differ."
            .to_string(),
        directions: None,
        created_at: now,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::external::NullExternalRouter;
    use relief_network::{Edge, EdgeStatus};

    fn tiny_network() -> RoadNetwork {
        let mut network = RoadNetwork::empty();
        let edge = Edge {
            id: 0,
            from: (-82_541_800, 35_436_300),
            to: (-82_541_500, 35_437_000),
            length_m: 500.0,
            base_weight: 500.0,
            name: Some("Main St".into()),
            highway: None,
            geometry: vec![Location::new(35.4363, -82.5418), Location::new(35.4370, -82.5415)],
            edge_status: EdgeStatus::open(),
        };
        network.adjacency.entry(edge.from).or_default().push(edge.id);
        network.edges.push(edge);
        network
    }

    #[tokio::test]
    async fn graph_route_is_preferred_when_a_path_exists() {
        let network = tiny_network();
        let origin = Location::new(35.4363, -82.5418);
        let destination = Location::new(35.4370, -82.5415);
        let route = route_with_fallback(
            "r1".to_string(),
            &network,
            origin,
            destination,
            &[],
            &NullExternalRouter,
            Utc::now(),
        )
        .await;
        assert_eq!(route.confidence, 1.0);
        assert!(route.directions.is_none());
    }

    #[tokio::test]
    async fn disconnected_graph_falls_back_to_haversine() {
        let network = RoadNetwork::empty();
        let origin = Location::new(35.0, -83.0);
        let destination = Location::new(36.0, -81.0);
        let route = route_with_fallback(
            "r1".to_string(),
            &network,
            origin,
            destination,
            &[],
            &NullExternalRouter,
            Utc::now(),
        )
        .await;
        assert_eq!(route.confidence, HAVERSINE_ROUTE_CONFIDENCE);
        assert_eq!(route.waypoints.len(), 2);
    }

    #[tokio::test]
    async fn damaged_edges_reduce_confidence_and_speed() {
        let mut network = tiny_network();
        network.edges[0].edge_status.multiplier = 3.0;
        let origin = Location::new(35.4363, -82.5418);
        let destination = Location::new(35.4370, -82.5415);
        let route = route_with_fallback(
            "r1".to_string(),
            &network,
            origin,
            destination,
            &[],
            &NullExternalRouter,
            Utc::now(),
        )
        .await;
        assert!((route.confidence - 0.9).abs() < 1e-9);
    }

    #[tokio::test]
    async fn closed_edge_cannot_be_on_a_returned_graph_route() {
        let mut network = tiny_network();
        network.edges[0].edge_status.multiplier = f64::INFINITY;
        let origin = Location::new(35.4363, -82.5418);
        let destination = Location::new(35.4370, -82.5415);
        let route = route_with_fallback(
            "r1".to_string(),
            &network,
            origin,
            destination,
            &[],
            &NullExternalRouter,
            Utc::now(),
        )
        .await;
        // dijkstra excludes the closed edge entirely, so this degrades to
        // the haversine tier rather than ever returning confidence 0.0.
        assert_eq!(route.confidence, HAVERSINE_ROUTE_CONFIDENCE);
    }
}
