use std::collections::HashMap;
use std::sync::Arc;

use ai_client::Claude;
use async_trait::async_trait;
use relief_fusion::{Cluster, Reconciliation, ReconciliationPolicy, ResolverTag, RoadStatus};
use relief_geo::Location;
use relief_model::Report;
use schemars::JsonSchema;
use serde::Deserialize;

use crate::fallback::FallbackExtractor;
use crate::trait_def::Extractor;
use crate::types::{Intent, ParsedBy, ParsedQuery, Urgency};

/// Schema Claude is forced to fill via tool-use. Deliberately omits
/// `parsed_by` — that tag is ours to stamp, not the model's to invent.
#[derive(Debug, Deserialize, JsonSchema)]
struct LlmParsedQuery {
    intent: Intent,
    supplies: HashMap<String, u32>,
    origin: Option<Location>,
    urgency: Urgency,
    constraints: Vec<String>,
}

#[derive(Debug, Deserialize, JsonSchema)]
struct LlmReconcileResponse {
    status: RoadStatus,
    confidence: f64,
    reasoning: String,
}

const PARSE_QUERY_SYSTEM_PROMPT: &str = "You are parsing a disaster-relief supply request. \
Extract the intent, requested supplies with quantities, the origin location if one is named, \
the urgency level, and any routing constraints. Never invent an origin the text does not name.";

const RECONCILE_SYSTEM_PROMPT: &str = "You are resolving a contradiction between multiple \
disaster-relief reports about the same location. Decide whether the road is blocked, damaged, \
clear, or unknown, and explain your reasoning briefly.";

/// Wraps the Claude client as the Extractor's LLM path. On any error —
/// timeout, network failure, malformed response — falls through to the
/// deterministic fallback and tags the result accordingly.
pub struct LlmExtractor {
    claude: Claude,
    fallback: FallbackExtractor,
}

impl LlmExtractor {
    pub fn new(claude: Claude, gazetteer: Vec<(String, Location)>) -> Self {
        Self {
            claude,
            fallback: FallbackExtractor::new(gazetteer),
        }
    }
}

#[async_trait]
impl Extractor for LlmExtractor {
    async fn parse_query(&self, text: &str) -> ParsedQuery {
        match self
            .claude
            .extract::<LlmParsedQuery>(PARSE_QUERY_SYSTEM_PROMPT, text)
            .await
        {
            Ok(parsed) => ParsedQuery {
                intent: parsed.intent,
                supplies: parsed.supplies,
                origin: parsed.origin,
                urgency: parsed.urgency,
                constraints: parsed.constraints,
                parsed_by: ParsedBy::Llm,
            },
            Err(e) => {
                tracing::warn!(error = %e, "extractor LLM path failed, falling back to keyword parser");
                self.fallback.parse_query(text).await
            }
        }
    }

    async fn reconcile_conflict(&self, reports: &[Report], location_label: &str) -> Reconciliation {
        let prompt = format_cluster_prompt(reports, location_label);
        match self
            .claude
            .extract::<LlmReconcileResponse>(RECONCILE_SYSTEM_PROMPT, &prompt)
            .await
        {
            Ok(r) => Reconciliation {
                status: r.status,
                confidence: r.confidence.clamp(0.0, 1.0),
                reasoning: r.reasoning,
                resolver_tag: ResolverTag::Llm,
            },
            Err(e) => {
                tracing::warn!(error = %e, "extractor LLM reconciliation failed, falling back to confidence-wins policy");
                self.fallback.reconcile_conflict(reports, location_label).await
            }
        }
    }
}

/// Adapts any [`Extractor`] to the fusion layer's [`ReconciliationPolicy`]
/// contract, so a cluster can be resolved through the LLM path (with its
/// own deterministic fallback already built in) from call sites that only
/// know about policies, not extractors.
pub struct LlmBackedPolicy {
    extractor: Arc<dyn Extractor>,
}

impl LlmBackedPolicy {
    pub fn new(extractor: Arc<dyn Extractor>) -> Self {
        Self { extractor }
    }
}

#[async_trait]
impl ReconciliationPolicy for LlmBackedPolicy {
    async fn reconcile(&self, cluster: &Cluster, location_label: &str) -> Reconciliation {
        self.extractor
            .reconcile_conflict(&cluster.reports, location_label)
            .await
    }
}

fn format_cluster_prompt(reports: &[Report], location_label: &str) -> String {
    let mut lines = vec![format!("Location: {location_label}")];
    for r in reports {
        lines.push(format!(
            "- {} (confidence {:.2}, source {}): {}",
            r.kind, r.raw_confidence, r.source, r.description
        ));
    }
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prompt_includes_every_report_and_the_label() {
        use chrono::Utc;
        use relief_model::{EventKind, SourceTag};
        let reports = vec![Report {
            id: "r1".to_string(),
            timestamp: Utc::now(),
            kind: EventKind::RoadClosure,
            location: Location::new(35.5, -82.5),
            description: "closed near bridge".to_string(),
            source: SourceTag::Satellite,
            raw_confidence: 0.9,
            raw_payload: serde_json::json!({}),
            agent: "satellite".to_string(),
            metadata: HashMap::new(),
        }];
        let prompt = format_cluster_prompt(&reports, "Main St");
        assert!(prompt.contains("Main St"));
        assert!(prompt.contains("closed near bridge"));
    }
}
