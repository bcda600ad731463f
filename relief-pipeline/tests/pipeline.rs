use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use relief_clock::ScenarioClock;
use relief_extractor::{FallbackExtractor, ParsedBy};
use relief_fusion::RoadStatus;
use relief_geo::{BoundingBox, Location};
use relief_model::{EventKind, Report, SourceTag};
use relief_network::{round6, Edge, EdgeStatus, RoadNetwork};
use relief_pipeline::{PipelineConfig, QueryPipeline};
use relief_router::NullExternalRouter;
use relief_sources::{dataset, SourceAdapter};

const SHELTERS_PATH: &str = "tests/fixtures/shelters.json";

/// A fixed list of reports, dropped through the same finalize contract every
/// real adapter applies.
struct FixedAdapter {
    name: &'static str,
    reports: Vec<Report>,
}

#[async_trait]
impl SourceAdapter for FixedAdapter {
    fn name(&self) -> &'static str {
        self.name
    }

    async fn gather(&self, now: DateTime<Utc>, bbox: &BoundingBox) -> Vec<Report> {
        dataset::finalize(self.reports.clone(), now, bbox)
    }
}

fn report(
    id: &str,
    kind: EventKind,
    lat: f64,
    lon: f64,
    confidence: f64,
    source: SourceTag,
    timestamp: DateTime<Utc>,
) -> Report {
    Report {
        id: id.to_string(),
        timestamp,
        kind,
        location: Location::new(lat, lon),
        description: "test report".to_string(),
        source,
        raw_confidence: confidence,
        raw_payload: serde_json::json!({}),
        agent: "test".to_string(),
        metadata: HashMap::new(),
    }
}

fn hour(h: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 9, 27, h, 0, 0).unwrap()
}

fn western_nc_config() -> PipelineConfig {
    PipelineConfig {
        bbox: BoundingBox::new(-83.5, 35.0, -81.5, 36.5).unwrap(),
        cluster_proximity_km: 0.5,
        edge_projection_radius_deg: 0.001,
        adapter_timeout: Duration::from_secs(5),
        router_timeout: Duration::from_secs(10),
        extractor_timeout: Duration::from_secs(15),
        query_timeout: Duration::from_secs(45),
        max_in_flight: 16,
    }
}

fn gazetteer() -> Vec<(String, Location)> {
    vec![(
        "Asheville Regional Airport".to_string(),
        Location::new(35.4363, -82.5418),
    )]
}

fn push_edge(network: &mut RoadNetwork, edge: Edge) {
    let from = edge.from;
    let id = edge.id;
    network.edges.push(edge);
    network.adjacency.entry(from).or_default().push(id);
}

/// Origin A, a direct edge to hazard node H (later closed) and a detour
/// A -> D -> S that stays clear, mirroring S1.
fn s1_network() -> RoadNetwork {
    let a = Location::new(35.4363, -82.5418);
    let h = Location::new(35.51, -82.54);
    let d = Location::new(35.55, -82.60);
    let s = Location::new(35.5951, -82.5515);

    let mut network = RoadNetwork::empty();
    push_edge(
        &mut network,
        Edge {
            id: 0,
            from: round6(a.lon, a.lat),
            to: round6(h.lon, h.lat),
            length_m: 8_000.0,
            base_weight: 8_000.0,
            name: Some("Direct Rd".to_string()),
            highway: None,
            geometry: vec![a.clone(), h.clone()],
            edge_status: EdgeStatus::open(),
        },
    );
    push_edge(
        &mut network,
        Edge {
            id: 1,
            from: round6(a.lon, a.lat),
            to: round6(d.lon, d.lat),
            length_m: 10_000.0,
            base_weight: 10_000.0,
            name: Some("Detour Rd North".to_string()),
            highway: None,
            geometry: vec![a.clone(), d.clone()],
            edge_status: EdgeStatus::open(),
        },
    );
    push_edge(
        &mut network,
        Edge {
            id: 2,
            from: round6(d.lon, d.lat),
            to: round6(s.lon, s.lat),
            length_m: 9_000.0,
            base_weight: 9_000.0,
            name: Some("Detour Rd South".to_string()),
            highway: None,
            geometry: vec![d, s],
            edge_status: EdgeStatus::open(),
        },
    );
    network
}

#[tokio::test]
async fn s1_shelter_reachable_with_one_hazard_to_avoid() {
    let now = Utc.with_ymd_and_hms(2024, 9, 27, 14, 0, 0).unwrap();
    let a = Location::new(35.4363, -82.5418);
    let h = Location::new(35.51, -82.54);
    let direct_rd_midpoint = ((a.lon + h.lon) / 2.0, (a.lat + h.lat) / 2.0);
    let adapter = FixedAdapter {
        name: "satellite",
        reports: vec![report(
            "haz-1",
            EventKind::RoadClosure,
            direct_rd_midpoint.1,
            direct_rd_midpoint.0,
            0.92,
            SourceTag::Satellite,
            hour(10),
        )],
    };
    let extractor = Box::new(FallbackExtractor::new(gazetteer()));
    let pipeline = QueryPipeline::new(
        vec![Box::new(adapter)],
        extractor,
        Box::new(NullExternalRouter),
        s1_network(),
        SHELTERS_PATH.to_string(),
        western_nc_config(),
    );

    let response = pipeline
        .run(
            "Need 200 cases of water delivered from Asheville Regional Airport, urgent.",
            now,
        )
        .await
        .unwrap();

    assert!(response.error.is_none());
    assert!(matches!(response.parsed_by, ParsedBy::Keyword));
    assert!(!response.delivery_plan.routes.is_empty());

    let top = &response.delivery_plan.routes[0];
    assert!(top.confidence > 0.7);
    assert!(top.hazards_avoided.iter().any(|haz| {
        (haz.midpoint.0 - direct_rd_midpoint.0).abs() < 1e-6
            && (haz.midpoint.1 - direct_rd_midpoint.1).abs() < 1e-6
    }));
}

#[tokio::test]
async fn s2_conflicting_reports_resolve_to_blocked_at_higher_confidence() {
    let now = Utc.with_ymd_and_hms(2024, 9, 27, 14, 0, 0).unwrap();
    let mid = Location::new(35.500, -82.500);
    let before = Location::new(35.49, -82.51);
    let after = Location::new(35.51, -82.49);

    let mut network = RoadNetwork::empty();
    push_edge(
        &mut network,
        Edge {
            id: 0,
            from: round6(before.lon, before.lat),
            to: round6(after.lon, after.lat),
            length_m: 4_000.0,
            base_weight: 4_000.0,
            name: Some("Contested Rd".to_string()),
            highway: None,
            geometry: vec![before, mid.clone(), after],
            edge_status: EdgeStatus::open(),
        },
    );

    let adapter = FixedAdapter {
        name: "mixed",
        reports: vec![
            report(
                "closure-1",
                EventKind::RoadClosure,
                mid.lat,
                mid.lon,
                0.9,
                SourceTag::Satellite,
                hour(10),
            ),
            report(
                "clear-1",
                EventKind::RoadClear,
                mid.lat,
                mid.lon,
                0.5,
                SourceTag::Twitter,
                hour(11),
            ),
        ],
    };
    let extractor = Box::new(FallbackExtractor::new(gazetteer()));
    let pipeline = QueryPipeline::new(
        vec![Box::new(adapter)],
        extractor,
        Box::new(NullExternalRouter),
        network,
        SHELTERS_PATH.to_string(),
        western_nc_config(),
    );

    let response = pipeline.run("what is the road status near downtown", now).await.unwrap();

    assert_eq!(response.conflicts_resolved.len(), 1);
    let resolved = &response.conflicts_resolved[0];
    assert_eq!(resolved.road_id, "Contested Rd");
    assert_eq!(resolved.resolved_status, RoadStatus::Blocked);
    assert!((resolved.confidence - 0.9).abs() < 1e-9);
}

#[tokio::test]
async fn s3_missing_origin_yields_error_and_empty_routes() {
    let now = Utc.with_ymd_and_hms(2024, 9, 27, 14, 0, 0).unwrap();
    let extractor = Box::new(FallbackExtractor::new(gazetteer()));
    let pipeline = QueryPipeline::new(
        Vec::new(),
        extractor,
        Box::new(NullExternalRouter),
        RoadNetwork::empty(),
        SHELTERS_PATH.to_string(),
        western_nc_config(),
    );

    let response = pipeline
        .run("need 200 cases of water for the shelter", now)
        .await
        .unwrap();

    assert!(response.error.is_some());
    assert!(response.delivery_plan.origin.is_none());
    assert!(response.delivery_plan.routes.is_empty());
}

#[tokio::test]
async fn s4_future_dated_reports_are_filtered_from_the_tick() {
    let now = Utc.with_ymd_and_hms(2024, 9, 27, 14, 0, 0).unwrap();
    let future = Utc.with_ymd_and_hms(2024, 9, 28, 0, 0, 0).unwrap();
    let adapter = FixedAdapter {
        name: "satellite",
        reports: vec![
            report("past", EventKind::Flooding, 35.5, -82.5, 0.8, SourceTag::Satellite, hour(10)),
            report("future", EventKind::Flooding, 35.5, -82.5, 0.8, SourceTag::Satellite, future),
        ],
    };
    let extractor = Box::new(FallbackExtractor::new(gazetteer()));
    let pipeline = QueryPipeline::new(
        vec![Box::new(adapter)],
        extractor,
        Box::new(NullExternalRouter),
        RoadNetwork::empty(),
        SHELTERS_PATH.to_string(),
        western_nc_config(),
    );

    let response = pipeline.run("any update?", now).await.unwrap();

    assert_eq!(response.situational_awareness.total_reports, 1);
}

#[tokio::test]
async fn s5_newer_higher_confidence_clear_report_reopens_the_road() {
    let now = Utc.with_ymd_and_hms(2024, 9, 27, 14, 0, 0).unwrap();
    let a = Location::new(35.4363, -82.5418);
    let s = Location::new(35.5951, -82.5515);
    let mid = Location::new((a.lat + s.lat) / 2.0, (a.lon + s.lon) / 2.0);

    let mut network = RoadNetwork::empty();
    push_edge(
        &mut network,
        Edge {
            id: 0,
            from: round6(a.lon, a.lat),
            to: round6(s.lon, s.lat),
            length_m: 15_000.0,
            base_weight: 15_000.0,
            name: Some("Reopened Rd".to_string()),
            highway: None,
            geometry: vec![a.clone(), mid.clone(), s.clone()],
            edge_status: EdgeStatus::open(),
        },
    );

    let adapter = FixedAdapter {
        name: "mixed",
        reports: vec![
            report(
                "closure-t0",
                EventKind::RoadClosure,
                mid.lat,
                mid.lon,
                0.6,
                SourceTag::Ncdot,
                hour(6),
            ),
            report(
                "clear-t1",
                EventKind::RoadClear,
                mid.lat,
                mid.lon,
                0.95,
                SourceTag::LocalEmergency,
                hour(9),
            ),
        ],
    };
    let extractor = Box::new(FallbackExtractor::new(gazetteer()));
    let pipeline = QueryPipeline::new(
        vec![Box::new(adapter)],
        extractor,
        Box::new(NullExternalRouter),
        network,
        SHELTERS_PATH.to_string(),
        western_nc_config(),
    );

    let response = pipeline
        .run(
            "Need 200 cases of water delivered from Asheville Regional Airport, urgent.",
            now,
        )
        .await
        .unwrap();

    let resolved = &response.conflicts_resolved[0];
    assert_eq!(resolved.resolved_status, RoadStatus::Clear);
    assert!((resolved.confidence - 0.95).abs() < 1e-9);
    assert_eq!(response.situational_awareness.blocked_roads, 0);

    let top = response
        .delivery_plan
        .routes
        .first()
        .expect("reopened road should yield a routable path");
    assert_eq!(top.confidence, 1.0);
}

#[tokio::test]
async fn s6_extractor_and_router_outage_still_returns_a_haversine_route() {
    let now = Utc.with_ymd_and_hms(2024, 9, 27, 14, 0, 0).unwrap();
    let extractor = Box::new(FallbackExtractor::new(gazetteer()));
    let pipeline = QueryPipeline::new(
        Vec::new(),
        extractor,
        Box::new(NullExternalRouter),
        RoadNetwork::empty(),
        SHELTERS_PATH.to_string(),
        western_nc_config(),
    );

    let response = pipeline
        .run(
            "Need 200 cases of water delivered from Asheville Regional Airport, urgent.",
            now,
        )
        .await
        .unwrap();

    assert!(matches!(response.parsed_by, ParsedBy::Keyword));
    assert!(!response.delivery_plan.routes.is_empty());
    assert_eq!(response.delivery_plan.routes[0].confidence, 0.5);
    assert!(!response.reasoning.is_empty());
}

#[tokio::test]
async fn gather_new_surfaces_only_reports_since_the_last_tick() {
    let adapter = FixedAdapter {
        name: "mixed",
        reports: vec![
            report("old", EventKind::Flooding, 35.5, -82.5, 0.8, SourceTag::Satellite, hour(4)),
            report("fresh", EventKind::RoadClosure, 35.5, -82.5, 0.9, SourceTag::Ncdot, hour(7)),
        ],
    };
    let extractor = Box::new(FallbackExtractor::new(gazetteer()));
    let pipeline = QueryPipeline::new(
        vec![Box::new(adapter)],
        extractor,
        Box::new(NullExternalRouter),
        RoadNetwork::empty(),
        SHELTERS_PATH.to_string(),
        western_nc_config(),
    );

    let mut clock = ScenarioClock::starting_at(hour(6));
    clock.set(hour(8));

    let new_reports = pipeline.gather_new(&clock).await;

    assert_eq!(new_reports.len(), 1);
    assert_eq!(new_reports[0].id, "fresh");
}

