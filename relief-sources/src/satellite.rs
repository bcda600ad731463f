use async_trait::async_trait;
use chrono::{DateTime, Utc};
use relief_geo::{BoundingBox, Location};
use relief_model::{EventKind, Report, SourceTag};

use crate::adapter::SourceAdapter;
use crate::dataset;
use crate::schema::{self, SatelliteDetection};

/// Per-detection-kind confidence prior. Detection kinds are the imagery
/// pipeline's own vocabulary, not the canonical `EventKind` set, so they're
/// translated via [`map_kind`] before a `Report` is produced.
fn prior(kind: &str) -> Option<f64> {
    match kind {
        "flooding" => Some(0.90),
        "road_damage" => Some(0.85),
        "bridge_damage" => Some(0.88),
        "landslide" => Some(0.80),
        "building_damage" => Some(0.75),
        "debris" => Some(0.70),
        _ => None,
    }
}

/// Translates a satellite detection type to the canonical event kind. Types
/// with no road/shelter-relevant analogue (and any detection type absent
/// from [`prior`]) fail to map and the record is discarded upstream.
fn map_kind(kind: &str) -> Option<EventKind> {
    match kind {
        "flooding" => Some(EventKind::Flooding),
        "road_damage" => Some(EventKind::RoadDamage),
        "bridge_damage" => Some(EventKind::BridgeCollapse),
        "debris" => Some(EventKind::RoadDamage),
        "landslide" => Some(EventKind::RoadClosure),
        "building_damage" => Some(EventKind::InfrastructureDamage),
        _ => None,
    }
}

fn area_scale(area_sqm: Option<f64>) -> f64 {
    match area_sqm {
        Some(a) if a < 100.0 => 0.8,
        Some(a) if a < 500.0 => 0.9,
        _ => 1.0,
    }
}

pub struct SatelliteAdapter {
    path: String,
    agent_weight: f64,
}

impl SatelliteAdapter {
    pub fn new(path: impl Into<String>, agent_weight: f64) -> Self {
        Self {
            path: path.into(),
            agent_weight,
        }
    }

    fn build_report(&self, d: &SatelliteDetection) -> Option<Report> {
        let kind = map_kind(&d.kind)?;
        let timestamp = schema::parse_timestamp(&d.timestamp)?;
        let base = d.confidence.or_else(|| prior(&d.kind))?;
        let confidence = (base * area_scale(d.area_sqm) * self.agent_weight).clamp(0.0, 1.0);

        Some(Report {
            id: d.id.clone(),
            timestamp,
            kind,
            location: Location::new(d.location.lat, d.location.lon),
            description: d
                .description
                .clone()
                .unwrap_or_else(|| format!("satellite detection: {}", d.kind)),
            source: SourceTag::Satellite,
            raw_confidence: confidence,
            raw_payload: serde_json::to_value(d).unwrap_or(serde_json::Value::Null),
            agent: self.name().to_string(),
            metadata: Default::default(),
        })
    }
}

#[async_trait]
impl SourceAdapter for SatelliteAdapter {
    fn name(&self) -> &'static str {
        "satellite"
    }

    async fn gather(&self, now: DateTime<Utc>, bbox: &BoundingBox) -> Vec<Report> {
        let Some(file) = dataset::load::<schema::SatelliteFile>(&self.path) else {
            return Vec::new();
        };
        let reports: Vec<Report> = file
            .detections
            .iter()
            .filter_map(|d| self.build_report(d))
            .collect();
        dataset::finalize(reports, now, bbox)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn detection(kind: &str, area_sqm: Option<f64>) -> SatelliteDetection {
        SatelliteDetection {
            id: "sat1".to_string(),
            timestamp: "2024-09-27T12:00:00Z".to_string(),
            kind: kind.to_string(),
            location: schema::LatLon {
                lat: 35.5,
                lon: -82.5,
            },
            confidence: None,
            area_sqm,
            imagery_source: None,
            tile_id: None,
            pre_image_date: None,
            post_image_date: None,
            description: None,
        }
    }

    #[test]
    fn unknown_detection_kind_fails_to_map() {
        let adapter = SatelliteAdapter::new("unused.json", 0.9);
        let d = detection("meteor", None);
        assert!(adapter.build_report(&d).is_none());
    }

    #[test]
    fn confidence_applies_prior_area_scale_and_agent_weight() {
        let adapter = SatelliteAdapter::new("unused.json", 0.9);
        let d = detection("flooding", Some(50.0));
        let report = adapter.build_report(&d).unwrap();
        // 0.90 * 0.8 (area<100) * 0.9 (agent weight)
        assert!((report.raw_confidence - 0.648).abs() < 1e-9);
        assert_eq!(report.kind, EventKind::Flooding);
    }

    #[test]
    fn full_area_detection_uses_full_scale() {
        let adapter = SatelliteAdapter::new("unused.json", 1.0);
        let d = detection("road_damage", Some(10_000.0));
        let report = adapter.build_report(&d).unwrap();
        assert!((report.raw_confidence - 0.85).abs() < 1e-9);
    }

    #[test]
    fn landslide_maps_to_road_closure() {
        let adapter = SatelliteAdapter::new("unused.json", 1.0);
        let d = detection("landslide", None);
        let report = adapter.build_report(&d).unwrap();
        assert_eq!(report.kind, EventKind::RoadClosure);
    }

    #[test]
    fn explicit_confidence_overrides_prior() {
        let adapter = SatelliteAdapter::new("unused.json", 1.0);
        let mut d = detection("flooding", None);
        d.confidence = Some(0.5);
        let report = adapter.build_report(&d).unwrap();
        assert!((report.raw_confidence - 0.5).abs() < 1e-9);
    }
}
