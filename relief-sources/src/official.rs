use async_trait::async_trait;
use chrono::{DateTime, Utc};
use relief_geo::{BoundingBox, Location};
use relief_model::{EventKind, Report, SourceTag};

use crate::adapter::SourceAdapter;
use crate::dataset;
use crate::schema::{self, BulletinEvent};

/// Backs the bulletin feed: FEMA/NCDOT/USGS/local-emergency/news records,
/// each already carrying a canonical event kind and a source tag.
pub struct OfficialAdapter {
    path: String,
}

impl OfficialAdapter {
    pub fn new(path: impl Into<String>) -> Self {
        Self { path: path.into() }
    }

    fn build_report(&self, event: &BulletinEvent) -> Option<Report> {
        let kind: EventKind = event.kind.parse().ok()?;
        let source: SourceTag = event.source.parse().unwrap_or(SourceTag::CitizenReport);
        let timestamp = schema::parse_timestamp(&event.timestamp)?;

        let mut metadata = std::collections::HashMap::new();
        metadata.insert("verified".to_string(), "true".to_string());
        metadata.insert("official".to_string(), "true".to_string());
        if let Some(agency) = &event.agency {
            metadata.insert("agency".to_string(), agency.clone());
        }

        Some(Report {
            id: event.report_id.clone().unwrap_or_else(|| event.id.clone()),
            timestamp,
            kind,
            location: Location::new(event.location.lat, event.location.lon),
            description: event.description.clone(),
            source,
            raw_confidence: source.reliability_prior(),
            raw_payload: serde_json::to_value(event).unwrap_or(serde_json::Value::Null),
            agent: self.name().to_string(),
            metadata,
        })
    }
}

#[async_trait]
impl SourceAdapter for OfficialAdapter {
    fn name(&self) -> &'static str {
        "official"
    }

    async fn gather(&self, now: DateTime<Utc>, bbox: &BoundingBox) -> Vec<Report> {
        let Some(file) = dataset::load::<schema::BulletinFile>(&self.path) else {
            return Vec::new();
        };
        let reports: Vec<Report> = file
            .events
            .iter()
            .filter_map(|e| self.build_report(e))
            .collect();
        dataset::finalize(reports, now, bbox)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn event(kind: &str, source: &str) -> BulletinEvent {
        BulletinEvent {
            id: "ev1".to_string(),
            timestamp: "2024-09-27T12:00:00Z".to_string(),
            kind: kind.to_string(),
            location: schema::LatLon {
                lat: 35.5,
                lon: -82.5,
            },
            description: "test bulletin".to_string(),
            source: source.to_string(),
            agency: None,
            report_id: None,
            affected_polygon: None,
        }
    }

    #[test]
    fn unknown_event_kind_fails_to_map() {
        let adapter = OfficialAdapter::new("unused.json");
        assert!(adapter.build_report(&event("meteor_strike", "fema")).is_none());
    }

    #[test]
    fn unknown_source_tag_defaults_to_citizen_report() {
        let adapter = OfficialAdapter::new("unused.json");
        let report = adapter
            .build_report(&event("road_closure", "weather_channel"))
            .unwrap();
        assert_eq!(report.source, SourceTag::CitizenReport);
        assert!((report.raw_confidence - SourceTag::CitizenReport.reliability_prior()).abs() < 1e-9);
    }

    #[test]
    fn confidence_follows_reliability_prior() {
        let adapter = OfficialAdapter::new("unused.json");
        let report = adapter.build_report(&event("road_closure", "fema")).unwrap();
        assert!((report.raw_confidence - 0.98).abs() < 1e-9);
        assert_eq!(report.metadata.get("verified").map(String::as_str), Some("true"));
    }
}
