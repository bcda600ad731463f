use chrono::{DateTime, Utc};
use relief_geo::Location;
use serde::{Deserialize, Serialize};

use crate::node_key::NodeKey;

pub type EdgeId = usize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EdgeStatusKind {
    Open,
    Damaged,
    Closed,
}

/// The mutable part of an edge. `multiplier` is the single source of
/// truth; `status` is derived from it by construction so the two can never
/// drift apart (§3's invariant: `status = closed ⇔ multiplier = ∞`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EdgeStatus {
    pub multiplier: f64,
    pub confidence: f64,
    pub last_update: DateTime<Utc>,
    pub contributing_report_ids: Vec<String>,
}

impl EdgeStatus {
    pub fn open() -> Self {
        Self {
            multiplier: 1.0,
            confidence: 1.0,
            last_update: DateTime::<Utc>::from_timestamp(0, 0).unwrap(),
            contributing_report_ids: Vec::new(),
        }
    }

    pub fn status(&self) -> EdgeStatusKind {
        if self.multiplier.is_infinite() {
            EdgeStatusKind::Closed
        } else if self.multiplier > 1.0 {
            EdgeStatusKind::Damaged
        } else {
            EdgeStatusKind::Open
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Edge {
    pub id: EdgeId,
    pub from: NodeKey,
    pub to: NodeKey,
    pub length_m: f64,
    pub base_weight: f64,
    pub name: Option<String>,
    pub highway: Option<String>,
    pub geometry: Vec<Location>,
    pub edge_status: EdgeStatus,
}

impl Edge {
    /// Average of the endpoint coordinates, not a point sampled from the
    /// geometry — most geometries are a 2-point LineString, where indexing
    /// by `len / 2` would just return the `to` endpoint.
    pub fn midpoint(&self) -> (f64, f64) {
        let (Some(first), Some(last)) = (self.geometry.first(), self.geometry.last()) else {
            return (0.0, 0.0);
        };
        ((first.lon + last.lon) / 2.0, (first.lat + last.lat) / 2.0)
    }
}
