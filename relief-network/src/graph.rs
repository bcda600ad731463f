use std::collections::HashMap;
use std::fs::File;
use std::io::BufReader;

use relief_geo::Location;
use relief_model::{EventKind, Report};

use crate::edge::{Edge, EdgeId, EdgeStatus};
use crate::geojson::{self, FeatureCollection};
use crate::node_key::{round6, NodeKey};

/// Per-event-kind multiplier applied to an edge's base weight when a report
/// projects onto it. `f64::INFINITY` means the edge is impassable.
fn multiplier_for_kind(kind: EventKind) -> Option<f64> {
    match kind {
        EventKind::RoadClosure => Some(f64::INFINITY),
        EventKind::BridgeCollapse => Some(f64::INFINITY),
        EventKind::Flooding => Some(5.0),
        EventKind::RoadDamage => Some(3.0),
        EventKind::RoadClear => Some(1.0),
        _ => None,
    }
}

/// Directed weighted road graph. Base weights are immutable once loaded;
/// all dynamic state lives in each edge's `EdgeStatus` and is read lazily
/// through [`RoadNetwork::effective_weight`] rather than pre-multiplied, so
/// concurrent readers never observe a half-updated weight.
#[derive(Debug, Clone, Default)]
pub struct RoadNetwork {
    pub edges: Vec<Edge>,
    pub adjacency: HashMap<NodeKey, Vec<EdgeId>>,
}

impl RoadNetwork {
    pub fn empty() -> Self {
        Self::default()
    }

    fn add_edge(&mut self, edge: Edge) {
        let from = edge.from;
        let id = edge.id;
        self.edges.push(edge);
        self.adjacency.entry(from).or_default().push(id);
    }

    /// Loads a GeoJSON `FeatureCollection` of LineString features. One
    /// directed edge per feature, first/last coordinate are the endpoints,
    /// interior vertices are kept as geometry.
    pub fn load_geojson(path: &str) -> Option<Self> {
        let file = match File::open(path) {
            Ok(f) => f,
            Err(e) => {
                tracing::warn!(path, error = %e, "road network file unavailable");
                return None;
            }
        };
        let collection: FeatureCollection = match serde_json::from_reader(BufReader::new(file)) {
            Ok(c) => c,
            Err(e) => {
                tracing::warn!(path, error = %e, "road network file malformed");
                return None;
            }
        };
        Some(Self::from_feature_collection(collection))
    }

    fn from_feature_collection(collection: FeatureCollection) -> Self {
        let mut network = Self::empty();
        for (idx, feature) in collection.features.iter().enumerate() {
            if feature.geometry.kind != "LineString" || feature.geometry.coordinates.len() < 2 {
                continue;
            }
            let coords = &feature.geometry.coordinates;
            let first = coords[0];
            let last = *coords.last().unwrap();
            let length_m = feature
                .properties
                .length
                .unwrap_or_else(|| geojson::summed_length_m(coords));
            let geometry = coords.iter().map(|(lon, lat)| Location::new(*lat, *lon)).collect();

            network.add_edge(Edge {
                id: idx,
                from: round6(first.0, first.1),
                to: round6(last.0, last.1),
                length_m,
                base_weight: length_m,
                name: feature.properties.name.clone(),
                highway: feature.properties.highway.clone(),
                geometry,
                edge_status: EdgeStatus::open(),
            });
        }
        network
    }

    /// Computes the effective weight of an edge lazily from its immutable
    /// base weight and its current multiplier.
    pub fn effective_weight(&self, edge_id: EdgeId) -> f64 {
        let edge = &self.edges[edge_id];
        edge.base_weight * edge.edge_status.multiplier
    }

    pub fn reset_all_weights(&mut self) {
        for edge in &mut self.edges {
            edge.edge_status = EdgeStatus::open();
        }
    }

    /// A report touches an edge iff the edge's midpoint lies within
    /// `radius_deg` of the report location in both lon and lat (a square
    /// box test, not a true metric radius — see design notes).
    pub fn project_report(&mut self, report: &Report, radius_deg: f64) {
        let Some(multiplier) = multiplier_for_kind(report.kind) else {
            return;
        };
        self.project_status_at(
            &report.location,
            multiplier,
            report.raw_confidence,
            report.timestamp,
            std::slice::from_ref(&report.id),
            radius_deg,
        );
    }

    /// Same proximity test as [`RoadNetwork::project_report`], but takes an
    /// already-resolved multiplier instead of deriving one from a single
    /// report's event kind. Used to re-project a reconciled cluster status
    /// onto the edges its location touches, overriding whatever the
    /// individual per-report projections left behind.
    pub fn project_status_at(
        &mut self,
        location: &Location,
        multiplier: f64,
        confidence: f64,
        timestamp: chrono::DateTime<chrono::Utc>,
        contributing_report_ids: &[String],
        radius_deg: f64,
    ) {
        for edge in &mut self.edges {
            let (mid_lon, mid_lat) = edge.midpoint();
            let within = (mid_lon - location.lon).abs() <= radius_deg
                && (mid_lat - location.lat).abs() <= radius_deg;
            if !within {
                continue;
            }
            edge.edge_status.multiplier = multiplier;
            edge.edge_status.confidence = confidence;
            edge.edge_status.last_update = timestamp;
            edge.edge_status
                .contributing_report_ids
                .extend(contributing_report_ids.iter().cloned());
        }
    }

    /// Nearest node by planar L2 distance. Considers every edge endpoint,
    /// not just `adjacency` keys — a node with no outgoing edges (a dead
    /// end that is only ever a `to`) still has to be reachable as a
    /// destination.
    pub fn nearest_node(&self, location: &Location) -> Option<NodeKey> {
        let mut best: Option<(NodeKey, f64)> = None;
        let mut consider = |key: NodeKey| {
            let (lon, lat) = (key.0 as f64 / 1_000_000.0, key.1 as f64 / 1_000_000.0);
            let dx = lon - location.lon;
            let dy = lat - location.lat;
            let dist = dx * dx + dy * dy;
            if best.map(|(_, d)| dist < d).unwrap_or(true) {
                best = Some((key, dist));
            }
        };
        for edge in &self.edges {
            consider(edge.from);
            consider(edge.to);
        }
        best.map(|(k, _)| k)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use relief_model::SourceTag;
    use std::collections::HashMap as StdHashMap;

    fn sample_network() -> RoadNetwork {
        let collection = FeatureCollection {
            features: vec![geojson::Feature {
                geometry: geojson::Geometry {
                    kind: "LineString".to_string(),
                    coordinates: vec![(-82.5418, 35.4363), (-82.5415, 35.4370)],
                },
                properties: geojson::Properties {
                    osmid: None,
                    name: Some("Main St".to_string()),
                    highway: Some("primary".to_string()),
                    length: Some(100.0),
                },
            }],
        };
        RoadNetwork::from_feature_collection(collection)
    }

    fn report(kind: EventKind, lat: f64, lon: f64) -> Report {
        Report {
            id: "r1".to_string(),
            timestamp: Utc::now(),
            kind,
            location: Location::new(lat, lon),
            description: "test".to_string(),
            source: SourceTag::Satellite,
            raw_confidence: 0.9,
            raw_payload: serde_json::json!({}),
            agent: "test".to_string(),
            metadata: StdHashMap::new(),
        }
    }

    #[test]
    fn loading_creates_one_edge_per_linestring() {
        let net = sample_network();
        assert_eq!(net.edges.len(), 1);
        assert_eq!(net.edges[0].base_weight, 100.0);
    }

    #[test]
    fn projection_sets_infinite_multiplier_for_road_closure() {
        let mut net = sample_network();
        let (mid_lon, mid_lat) = net.edges[0].midpoint();
        net.project_report(&report(EventKind::RoadClosure, mid_lat, mid_lon), 0.01);
        assert!(net.effective_weight(0).is_infinite());
    }

    #[test]
    fn projection_outside_radius_does_not_touch_the_edge() {
        let mut net = sample_network();
        net.project_report(&report(EventKind::RoadClosure, 10.0, 10.0), 0.001);
        assert_eq!(net.effective_weight(0), net.edges[0].base_weight);
    }

    #[test]
    fn reset_restores_base_weight() {
        let mut net = sample_network();
        let (mid_lon, mid_lat) = net.edges[0].midpoint();
        net.project_report(&report(EventKind::Flooding, mid_lat, mid_lon), 0.01);
        assert_eq!(net.effective_weight(0), 500.0);
        net.reset_all_weights();
        assert_eq!(net.effective_weight(0), net.edges[0].base_weight);
    }

    #[test]
    fn unmapped_kind_does_not_project() {
        let mut net = sample_network();
        let (mid_lon, mid_lat) = net.edges[0].midpoint();
        net.project_report(&report(EventKind::ShelterOpening, mid_lat, mid_lon), 0.01);
        assert_eq!(net.effective_weight(0), net.edges[0].base_weight);
    }
}
