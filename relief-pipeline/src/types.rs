use std::collections::{BTreeMap, HashMap};

use chrono::{DateTime, Utc};
use relief_extractor::{ParsedBy, Urgency};
use relief_fusion::{ResolverTag, RoadStatus};
use relief_geo::Location;
use relief_router::Route;
use serde::Serialize;

/// §4.6 step 8's `situational_awareness` block: a summary of what the
/// adapters saw this tick, independent of whether a route could be planned.
#[derive(Debug, Clone, Serialize)]
pub struct SituationalAwareness {
    pub total_reports: usize,
    pub blocked_roads: usize,
    pub damaged_roads: usize,
    pub reports_by_source: BTreeMap<String, usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub partial: Option<bool>,
}

/// The origin/supplies/urgency the query resolved to, plus the routes
/// planned against it (empty when origin resolution failed).
#[derive(Debug, Clone, Serialize)]
pub struct DeliveryPlan {
    pub origin: Option<Location>,
    pub supplies: HashMap<String, u32>,
    pub urgency: Urgency,
    pub routes: Vec<Route>,
}

/// One resolved contradiction, carried for audit alongside the response.
#[derive(Debug, Clone, Serialize)]
pub struct ConflictResolved {
    pub road_id: String,
    pub resolved_status: RoadStatus,
    #[serde(serialize_with = "relief_common::json::finite_f64")]
    pub confidence: f64,
    pub reasoning: String,
    pub resolved_by: ResolverTag,
}

/// The full query response, matching the external JSON contract exactly.
#[derive(Debug, Clone, Serialize)]
pub struct QueryResponse {
    pub query: String,
    pub parsed_by: ParsedBy,
    pub scenario_time: DateTime<Utc>,
    pub situational_awareness: SituationalAwareness,
    pub delivery_plan: DeliveryPlan,
    pub conflicts_resolved: Vec<ConflictResolved>,
    pub reasoning: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}
