use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use std::time::Instant;

use chrono::{DateTime, Utc};
use futures::future::join_all;
use relief_clock::ScenarioClock;
use relief_common::{ReliefError, Result};
use relief_fusion::cluster;
use relief_geo::Location;
use relief_model::Report;
use relief_network::{EdgeStatusKind, RoadNetwork};
use relief_sources::{load_shelters, SourceAdapter};
use tokio::sync::{RwLock, Semaphore};

use crate::config::PipelineConfig;
use crate::conflicts::resolve_conflicts;
use crate::reasoning::{build_reasoning, FlaggedRoad};
use crate::shelter_score::{candidate_shelters, rank_top_n, score_shelter};
use crate::types::{ConflictResolved, DeliveryPlan, QueryResponse, SituationalAwareness};
use relief_extractor::Extractor;
use relief_router::{route_with_fallback, ExternalRouter};

const TOP_SHELTERS: usize = 3;

/// Ties together every collaborator crate into the single end-to-end query
/// flow: gather intelligence, fuse it onto the road graph, reconcile
/// contradictions, score shelters, plan routes, and assemble the response.
/// One instance is shared across every concurrent query; its only mutable
/// shared state is the road graph, guarded by a single `RwLock`.
pub struct QueryPipeline {
    adapters: Vec<Box<dyn SourceAdapter>>,
    extractor: Box<dyn Extractor>,
    router: Box<dyn ExternalRouter>,
    graph: Arc<RwLock<RoadNetwork>>,
    shelters_path: String,
    semaphore: Arc<Semaphore>,
    config: PipelineConfig,
}

impl QueryPipeline {
    pub fn new(
        adapters: Vec<Box<dyn SourceAdapter>>,
        extractor: Box<dyn Extractor>,
        router: Box<dyn ExternalRouter>,
        graph: RoadNetwork,
        shelters_path: String,
        config: PipelineConfig,
    ) -> Self {
        let max_in_flight = config.max_in_flight;
        Self {
            adapters,
            extractor,
            router,
            graph: Arc::new(RwLock::new(graph)),
            shelters_path,
            semaphore: Arc::new(Semaphore::new(max_in_flight)),
            config,
        }
    }

    /// Runs one query to completion against the current scenario time.
    /// Never returns `Err` for anything the spec treats as a degraded path
    /// (no origin, adapter/extractor/router failure) — those are folded
    /// into the response's `error`/`partial` fields instead. The only hard
    /// failure is backpressure: too many in-flight queries.
    pub async fn run(&self, query_text: &str, now: DateTime<Utc>) -> Result<QueryResponse> {
        let _permit = self
            .semaphore
            .try_acquire()
            .map_err(|_| ReliefError::ResourceExhausted)?;

        let deadline = Instant::now() + self.config.query_timeout;
        let mut partial = false;

        let parsed = self.extractor.parse_query(query_text).await;

        let reports = self.gather_all(now).await;
        let mut reports_by_source: BTreeMap<String, usize> = BTreeMap::new();
        for report in &reports {
            *reports_by_source.entry(report.source.to_string()).or_insert(0) += 1;
        }

        if Instant::now() > deadline {
            partial = true;
        }

        let conflicts_resolved = self.project_and_reconcile(&reports).await;

        let (blocked_roads, damaged_roads, flagged) = self.flagged_roads().await;

        let situational_awareness = SituationalAwareness {
            total_reports: reports.len(),
            blocked_roads,
            damaged_roads,
            reports_by_source,
            partial: if partial { Some(true) } else { None },
        };

        let Some(origin) = parsed.origin.clone() else {
            let delivery_plan = DeliveryPlan {
                origin: None,
                supplies: parsed.supplies.clone(),
                urgency: parsed.urgency,
                routes: Vec::new(),
            };
            let reasoning = build_reasoning(&situational_awareness.reports_by_source, &flagged, &[]);
            return Ok(QueryResponse {
                query: query_text.to_string(),
                parsed_by: parsed.parsed_by,
                scenario_time: now,
                situational_awareness,
                delivery_plan,
                conflicts_resolved,
                reasoning,
                error: Some(ReliefError::NoOrigin.to_string()),
            });
        };

        let deliveries = if Instant::now() > deadline {
            Vec::new()
        } else {
            self.plan_deliveries(&origin, &parsed.supplies, &reports, now).await
        };

        let routes = deliveries.iter().map(|(_, route)| route.clone()).collect();
        let delivery_plan = DeliveryPlan {
            origin: Some(origin),
            supplies: parsed.supplies.clone(),
            urgency: parsed.urgency,
            routes,
        };

        let reasoning = build_reasoning(&situational_awareness.reports_by_source, &flagged, &deliveries);

        Ok(QueryResponse {
            query: query_text.to_string(),
            parsed_by: parsed.parsed_by,
            scenario_time: now,
            situational_awareness,
            delivery_plan,
            conflicts_resolved,
            reasoning,
            error: None,
        })
    }

    /// Gathers from every adapter at the clock's current time, then narrows
    /// the result to reports each adapter is surfacing for the first time:
    /// `previous < timestamp <= now`. This is the "what's new since the last
    /// tick" view the scenario clock exists to support, distinct from
    /// `run`'s full-gather-every-time behavior.
    pub async fn gather_new(&self, clock: &ScenarioClock) -> Vec<Report> {
        self.gather_all(clock.now())
            .await
            .into_iter()
            .filter(|report| clock.is_new(report.timestamp))
            .collect()
    }

    /// Fans out to every adapter concurrently, each bounded by the
    /// per-adapter timeout. A slow or erroring adapter degrades to an empty
    /// report set rather than failing the whole gather.
    async fn gather_all(&self, now: DateTime<Utc>) -> Vec<Report> {
        let bbox = self.config.bbox.clone();
        let futures = self.adapters.iter().map(|adapter| {
            let name = adapter.name();
            let timeout = self.config.adapter_timeout;
            async move {
                match tokio::time::timeout(timeout, adapter.gather(now, &bbox)).await {
                    Ok(reports) => reports,
                    Err(_) => {
                        tracing::warn!(adapter = name, "adapter timed out, degrading to empty");
                        Vec::new()
                    }
                }
            }
        });
        join_all(futures).await.into_iter().flatten().collect()
    }

    /// Step 3/4: reset the graph, project every report's per-event-kind
    /// weight, then cluster and reconcile any contradicting clusters,
    /// re-projecting their resolved status over the per-report projections.
    /// Held as one write-lock critical section so no reader observes a
    /// graph that has been reset but not yet fully re-projected.
    async fn project_and_reconcile(&self, reports: &[Report]) -> Vec<ConflictResolved> {
        let mut graph = self.graph.write().await;
        graph.reset_all_weights();
        for report in reports {
            graph.project_report(report, self.config.edge_projection_radius_deg);
        }
        let clusters = cluster(reports, self.config.cluster_proximity_km);
        resolve_conflicts(
            &clusters,
            &mut graph,
            self.extractor.as_ref(),
            self.config.edge_projection_radius_deg,
        )
        .await
    }

    /// Reads the graph's current edge statuses for the situational summary
    /// (counts plus up to the worst-confidence blocked/damaged edges).
    async fn flagged_roads(&self) -> (usize, usize, Vec<FlaggedRoad>) {
        let graph = self.graph.read().await;
        let mut blocked = 0;
        let mut damaged = 0;
        let mut flagged = Vec::new();
        for edge in &graph.edges {
            match edge.edge_status.status() {
                EdgeStatusKind::Closed => {
                    blocked += 1;
                    flagged.push(FlaggedRoad {
                        name: edge.name.clone().unwrap_or_else(|| format!("edge-{}", edge.id)),
                        confidence: edge.edge_status.confidence,
                    });
                }
                EdgeStatusKind::Damaged => {
                    damaged += 1;
                    flagged.push(FlaggedRoad {
                        name: edge.name.clone().unwrap_or_else(|| format!("edge-{}", edge.id)),
                        confidence: edge.edge_status.confidence,
                    });
                }
                EdgeStatusKind::Open => {}
            }
        }
        flagged.sort_by(|a, b| b.confidence.partial_cmp(&a.confidence).unwrap_or(std::cmp::Ordering::Equal));
        (blocked, damaged, flagged)
    }

    /// Steps 5-7: score and rank shelters against the resolved origin and
    /// requested supplies, then route to each of the top candidates.
    async fn plan_deliveries(
        &self,
        origin: &Location,
        supplies: &HashMap<String, u32>,
        reports: &[Report],
        now: DateTime<Utc>,
    ) -> Vec<(crate::shelter_score::ShelterCandidate, relief_router::Route)> {
        let shelters = load_shelters(&self.shelters_path);
        let active = candidate_shelters(&shelters, now);
        let scored: Vec<_> = active.iter().map(|s| score_shelter(s, origin, supplies)).collect();
        let top = rank_top_n(scored, TOP_SHELTERS);

        let graph = self.graph.read().await;
        let mut deliveries = Vec::new();
        for candidate in top {
            let route = route_with_fallback(
                format!("route-{}", candidate.shelter.id),
                &graph,
                origin.clone(),
                candidate.shelter.location.clone(),
                reports,
                self.router.as_ref(),
                now,
            )
            .await;
            deliveries.push((candidate, route));
        }
        deliveries
    }
}
