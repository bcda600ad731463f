use async_trait::async_trait;
use chrono::{DateTime, Utc};
use relief_geo::BoundingBox;
use relief_model::{EventKind, Report, Shelter, SourceTag};

use crate::adapter::SourceAdapter;
use crate::shelters::load_shelters;

/// Synthesizes one `shelter_opening` report per shelter active at `now`, so
/// shelter-state changes flow through the same clustering/reconciliation
/// path as road reports and pick up a provenance tag of their own.
pub struct ShelterReportAdapter {
    path: String,
}

impl ShelterReportAdapter {
    pub fn new(path: impl Into<String>) -> Self {
        Self { path: path.into() }
    }

    fn build_report(&self, shelter: &Shelter) -> Report {
        let needs = shelter.needs.join(", ");
        Report {
            id: format!("shelter-report-{}", shelter.id),
            timestamp: shelter.opened_at,
            kind: EventKind::ShelterOpening,
            location: shelter.location.clone(),
            description: format!(
                "{} open, capacity {}, needs: {}",
                shelter.name, shelter.capacity, needs
            ),
            source: SourceTag::LocalEmergency,
            raw_confidence: 0.95,
            raw_payload: serde_json::json!({ "shelter_id": shelter.id }),
            agent: self.name().to_string(),
            metadata: Default::default(),
        }
    }
}

#[async_trait]
impl SourceAdapter for ShelterReportAdapter {
    fn name(&self) -> &'static str {
        "shelter_report"
    }

    async fn gather(&self, now: DateTime<Utc>, bbox: &BoundingBox) -> Vec<Report> {
        let shelters = load_shelters(&self.path);
        shelters
            .iter()
            .filter(|s| s.is_active_at(now))
            .map(|s| self.build_report(s))
            .filter(|r| bbox.contains(&r.location))
            .collect()
    }
}
