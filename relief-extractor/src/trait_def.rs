use async_trait::async_trait;
use relief_fusion::Reconciliation;
use relief_model::Report;

use crate::types::ParsedQuery;

/// Two pure contracts, both with deterministic fallbacks. The preferred
/// implementation may call an external LLM but must degrade gracefully on
/// any error and stamp which path was taken.
#[async_trait]
pub trait Extractor: Send + Sync {
    async fn parse_query(&self, text: &str) -> ParsedQuery;
    async fn reconcile_conflict(&self, reports: &[Report], location_label: &str) -> Reconciliation;
}
