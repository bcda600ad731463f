use std::sync::Arc;
use std::time::Duration;

use anyhow::anyhow;
use async_trait::async_trait;
use relief_extractor::{Extractor, FallbackExtractor, ParsedQuery};
use relief_fusion::Reconciliation;
use relief_geo::Location;
use relief_model::Report;
use relief_router::{AvoidPolygons, ExternalRoute, ExternalRouter};

/// Wraps the configured Extractor with a hard deadline. A primary
/// implementation (LLM-backed or not) is trusted to degrade gracefully on
/// its own errors, but nothing stops its collaborator from simply hanging;
/// this is the pipeline's own backstop, independent of whatever timeout the
/// collaborator's HTTP client enforces internally. On timeout, falls
/// through to a plain deterministic extractor rather than propagating.
pub struct TimeoutExtractor {
    inner: Arc<dyn Extractor>,
    fallback: FallbackExtractor,
    timeout: Duration,
}

impl TimeoutExtractor {
    pub fn new(inner: Arc<dyn Extractor>, gazetteer: Vec<(String, Location)>, timeout: Duration) -> Self {
        Self {
            inner,
            fallback: FallbackExtractor::new(gazetteer),
            timeout,
        }
    }
}

#[async_trait]
impl Extractor for TimeoutExtractor {
    async fn parse_query(&self, text: &str) -> ParsedQuery {
        match tokio::time::timeout(self.timeout, self.inner.parse_query(text)).await {
            Ok(parsed) => parsed,
            Err(_) => {
                tracing::warn!(timeout_secs = self.timeout.as_secs(), "extractor parse_query timed out");
                self.fallback.parse_query(text).await
            }
        }
    }

    async fn reconcile_conflict(&self, reports: &[Report], location_label: &str) -> Reconciliation {
        match tokio::time::timeout(
            self.timeout,
            self.inner.reconcile_conflict(reports, location_label),
        )
        .await
        {
            Ok(r) => r,
            Err(_) => {
                tracing::warn!(
                    timeout_secs = self.timeout.as_secs(),
                    "extractor reconcile_conflict timed out"
                );
                self.fallback.reconcile_conflict(reports, location_label).await
            }
        }
    }
}

/// Wraps the external routing collaborator with a hard deadline;
/// `route_with_fallback` already treats any `Err` as "this tier failed, try
/// the next", so a timeout here degrades straight to the haversine tier.
pub struct TimeoutRouter {
    inner: Arc<dyn ExternalRouter>,
    timeout: Duration,
}

impl TimeoutRouter {
    pub fn new(inner: Arc<dyn ExternalRouter>, timeout: Duration) -> Self {
        Self { inner, timeout }
    }
}

#[async_trait]
impl ExternalRouter for TimeoutRouter {
    async fn route(
        &self,
        origin: Location,
        destination: Location,
        avoid: Option<AvoidPolygons>,
    ) -> anyhow::Result<ExternalRoute> {
        tokio::time::timeout(self.timeout, self.inner.route(origin, destination, avoid))
            .await
            .map_err(|_| anyhow!("external router timed out after {:?}", self.timeout))?
    }
}
