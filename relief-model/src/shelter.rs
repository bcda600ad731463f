use chrono::{DateTime, Utc};
use relief_geo::Location;
use serde::{Deserialize, Serialize};

/// A shelter destination, including its current demand and amenities.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Shelter {
    pub id: String,
    pub name: String,
    pub location: Location,
    pub capacity: u32,
    pub current_occupancy: u32,
    pub opened_at: DateTime<Utc>,
    pub closed_at: Option<DateTime<Utc>>,
    pub needs: Vec<String>,
    pub accepts_pets: bool,
    pub has_generator: bool,
    pub has_medical: bool,
    pub wheelchair_accessible: bool,
    pub contact: Option<String>,
}

impl Shelter {
    /// Active at `t` iff `opened_at <= t` and (`closed_at` absent or `closed_at > t`).
    pub fn is_active_at(&self, t: DateTime<Utc>) -> bool {
        self.opened_at <= t && self.closed_at.map(|c| c > t).unwrap_or(true)
    }
}
