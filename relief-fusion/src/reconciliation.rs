use async_trait::async_trait;
use relief_model::EventKind;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::cluster::Cluster;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum RoadStatus {
    Blocked,
    Damaged,
    Clear,
    Unknown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum ResolverTag {
    Llm,
    Fallback,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct Reconciliation {
    pub status: RoadStatus,
    pub confidence: f64,
    pub reasoning: String,
    pub resolver_tag: ResolverTag,
}

/// Resolves what a contradicting cluster's status actually is. Modeled as a
/// trait so the LLM-assisted path and the deterministic fallback share one
/// call site; `relief-pipeline` never branches on which it's holding.
#[async_trait]
pub trait ReconciliationPolicy: Send + Sync {
    async fn reconcile(&self, cluster: &Cluster, location_label: &str) -> Reconciliation;
}

fn status_for_kind(kind: EventKind) -> RoadStatus {
    match kind {
        EventKind::RoadClosure | EventKind::BridgeCollapse | EventKind::Flooding => {
            RoadStatus::Blocked
        }
        EventKind::RoadDamage => RoadStatus::Damaged,
        EventKind::RoadClear => RoadStatus::Clear,
        _ => RoadStatus::Unknown,
    }
}

/// Deterministic reference implementation: argmax confidence across the
/// cluster, status from that report's event kind.
pub struct ConfidenceWinsPolicy;

#[async_trait]
impl ReconciliationPolicy for ConfidenceWinsPolicy {
    async fn reconcile(&self, cluster: &Cluster, location_label: &str) -> Reconciliation {
        let Some(winner) = cluster
            .reports
            .iter()
            .max_by(|a, b| a.raw_confidence.partial_cmp(&b.raw_confidence).unwrap())
        else {
            return Reconciliation {
                status: RoadStatus::Unknown,
                confidence: 0.0,
                reasoning: format!("no reports to reconcile at {location_label}"),
                resolver_tag: ResolverTag::Fallback,
            };
        };
        Reconciliation {
            status: status_for_kind(winner.kind),
            confidence: winner.raw_confidence,
            reasoning: format!(
                "highest-confidence report at {location_label} is {} ({:.2}) from {}",
                winner.kind, winner.raw_confidence, winner.agent
            ),
            resolver_tag: ResolverTag::Fallback,
        }
    }
}

/// Second deterministic policy: prefers the most recent report unless an
/// older `road_clear` has strictly higher confidence than every more-recent
/// contradicting report. Never wired as default — kept to make the
/// "two divergent policies" design note concrete and testable.
pub struct TimePriorityWithClearOverride;

#[async_trait]
impl ReconciliationPolicy for TimePriorityWithClearOverride {
    async fn reconcile(&self, cluster: &Cluster, location_label: &str) -> Reconciliation {
        if cluster.reports.is_empty() {
            return Reconciliation {
                status: RoadStatus::Unknown,
                confidence: 0.0,
                reasoning: format!("no reports to reconcile at {location_label}"),
                resolver_tag: ResolverTag::Fallback,
            };
        }

        let latest = cluster
            .reports
            .iter()
            .max_by_key(|r| r.timestamp)
            .expect("non-empty cluster");

        let clear_override = cluster.reports.iter().find(|r| {
            r.kind == EventKind::RoadClear
                && r.timestamp < latest.timestamp
                && cluster
                    .reports
                    .iter()
                    .filter(|other| other.timestamp > r.timestamp && other.kind != r.kind)
                    .all(|other| r.raw_confidence > other.raw_confidence)
        });

        let winner = clear_override.unwrap_or(latest);

        Reconciliation {
            status: status_for_kind(winner.kind),
            confidence: winner.raw_confidence,
            reasoning: format!(
                "time-priority report at {location_label} is {} ({:.2}) from {}{}",
                winner.kind,
                winner.raw_confidence,
                winner.agent,
                if clear_override.is_some() {
                    " (clear override)"
                } else {
                    ""
                }
            ),
            resolver_tag: ResolverTag::Fallback,
        }
    }
}
