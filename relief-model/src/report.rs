use std::collections::HashMap;

use chrono::{DateTime, Utc};
use relief_geo::Location;
use serde::{Deserialize, Serialize};

use crate::event_kind::EventKind;
use crate::source_tag::SourceTag;

/// A single canonical observation, the unit every source adapter produces
/// and every later stage (clustering, projection, reconciliation) consumes.
/// Immutable once created — adapters own their pools, nothing downstream
/// mutates a `Report` in place.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Report {
    pub id: String,
    pub timestamp: DateTime<Utc>,
    pub kind: EventKind,
    pub location: Location,
    pub description: String,
    pub source: SourceTag,
    pub raw_confidence: f64,
    pub raw_payload: serde_json::Value,
    /// Provenance tag: the adapter (or resolver) that produced this value.
    pub agent: String,
    pub metadata: HashMap<String, String>,
}

/// Two reports are duplicates iff they share an id; no other field
/// participates in equality.
impl PartialEq for Report {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Report {}

#[cfg(test)]
mod tests {
    use super::*;

    fn report(id: &str, kind: EventKind) -> Report {
        Report {
            id: id.to_string(),
            timestamp: Utc::now(),
            kind,
            location: Location::new(35.5, -82.5),
            description: "test".to_string(),
            source: SourceTag::Satellite,
            raw_confidence: 0.8,
            raw_payload: serde_json::json!({}),
            agent: "satellite".to_string(),
            metadata: HashMap::new(),
        }
    }

    #[test]
    fn equality_is_by_id_only() {
        let a = report("r1", EventKind::RoadClosure);
        let mut b = report("r1", EventKind::Flooding);
        b.raw_confidence = 0.1;
        assert_eq!(a, b);
    }

    #[test]
    fn distinct_ids_are_not_equal() {
        let a = report("r1", EventKind::RoadClosure);
        let b = report("r2", EventKind::RoadClosure);
        assert_ne!(a, b);
    }
}
