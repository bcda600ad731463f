use relief_extractor::Extractor;
use relief_fusion::{Cluster, RoadStatus};
use relief_geo::Location;
use relief_network::RoadNetwork;

use crate::types::ConflictResolved;

/// Maps a resolved status back to the edge multiplier it implies.
/// `Unknown` carries no actionable multiplier, so the individual
/// per-report projections already applied in step 3 are left untouched.
fn status_multiplier(status: RoadStatus) -> Option<f64> {
    match status {
        RoadStatus::Blocked => Some(f64::INFINITY),
        RoadStatus::Damaged => Some(3.0),
        RoadStatus::Clear => Some(1.0),
        RoadStatus::Unknown => None,
    }
}

/// Picks a human-facing identifier for a location: the first road edge
/// whose midpoint is within `radius_deg`, else its coordinates.
fn road_id_for(network: &RoadNetwork, location: &Location, radius_deg: f64) -> String {
    for edge in &network.edges {
        let (mid_lon, mid_lat) = edge.midpoint();
        let within =
            (mid_lon - location.lon).abs() <= radius_deg && (mid_lat - location.lat).abs() <= radius_deg;
        if within {
            return edge.name.clone().unwrap_or_else(|| format!("edge-{}", edge.id));
        }
    }
    format!("{:.4},{:.4}", location.lat, location.lon)
}

/// For each contradicting cluster, resolves it through the Extractor and
/// re-projects the resolved status onto the edges its location touches,
/// overriding whatever the individual per-report projections left behind
/// for that cluster.
pub async fn resolve_conflicts(
    clusters: &[Cluster],
    network: &mut RoadNetwork,
    extractor: &dyn Extractor,
    radius_deg: f64,
) -> Vec<ConflictResolved> {
    let mut resolved = Vec::new();
    for cluster in clusters {
        if !cluster.has_contradiction() {
            continue;
        }
        let label = road_id_for(network, &cluster.centroid, radius_deg);
        let reconciliation = extractor.reconcile_conflict(&cluster.reports, &label).await;

        if let Some(multiplier) = status_multiplier(reconciliation.status) {
            let timestamp = cluster
                .reports
                .iter()
                .map(|r| r.timestamp)
                .max()
                .unwrap_or_else(chrono::Utc::now);
            let report_ids: Vec<String> = cluster.reports.iter().map(|r| r.id.clone()).collect();
            network.project_status_at(
                &cluster.centroid,
                multiplier,
                reconciliation.confidence,
                timestamp,
                &report_ids,
                radius_deg,
            );
        }

        resolved.push(ConflictResolved {
            road_id: label,
            resolved_status: reconciliation.status,
            confidence: reconciliation.confidence,
            reasoning: reconciliation.reasoning,
            resolved_by: reconciliation.resolver_tag,
        });
    }
    resolved
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use relief_extractor::ParsedQuery;
    use relief_fusion::{Reconciliation, ResolverTag};
    use relief_model::{EventKind, Report, SourceTag};
    use std::collections::HashMap;

    struct StubExtractor;

    #[async_trait]
    impl Extractor for StubExtractor {
        async fn parse_query(&self, _text: &str) -> ParsedQuery {
            unreachable!("not exercised in this test")
        }

        async fn reconcile_conflict(&self, _reports: &[Report], location_label: &str) -> Reconciliation {
            Reconciliation {
                status: RoadStatus::Blocked,
                confidence: 0.9,
                reasoning: format!("resolved at {location_label}"),
                resolver_tag: ResolverTag::Fallback,
            }
        }
    }

    fn report(kind: EventKind, confidence: f64) -> Report {
        Report {
            id: "r1".to_string(),
            timestamp: chrono::Utc::now(),
            kind,
            location: Location::new(35.5, -82.5),
            description: "test".to_string(),
            source: SourceTag::Satellite,
            raw_confidence: confidence,
            raw_payload: serde_json::json!({}),
            agent: "test".to_string(),
            metadata: HashMap::new(),
        }
    }

    #[tokio::test]
    async fn non_contradicting_cluster_is_skipped() {
        let cluster = Cluster::from_reports(vec![report(EventKind::Flooding, 0.8)]);
        let mut network = RoadNetwork::empty();
        let resolved = resolve_conflicts(&[cluster], &mut network, &StubExtractor, 0.001).await;
        assert!(resolved.is_empty());
    }

    #[tokio::test]
    async fn contradicting_cluster_resolves_and_tags_blocked() {
        let cluster = Cluster::from_reports(vec![
            report(EventKind::RoadClosure, 0.9),
            report(EventKind::RoadClear, 0.5),
        ]);
        let mut network = RoadNetwork::empty();
        let resolved = resolve_conflicts(&[cluster], &mut network, &StubExtractor, 0.001).await;
        assert_eq!(resolved.len(), 1);
        assert_eq!(resolved[0].resolved_status, RoadStatus::Blocked);
        assert!((resolved[0].confidence - 0.9).abs() < 1e-9);
    }
}
