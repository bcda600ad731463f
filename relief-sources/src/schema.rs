use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LatLon {
    pub lat: f64,
    pub lon: f64,
}

// --- social_media_posts.json ---

#[derive(Debug, Clone, Deserialize)]
pub struct SocialPostsFile {
    pub posts: Vec<SocialPost>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SocialPost {
    pub timestamp: String,
    pub location: LatLon,
    pub content: String,
    pub platform: String,
    #[serde(default)]
    pub verified: bool,
    #[serde(default)]
    pub is_local: bool,
    #[serde(default)]
    pub has_photo: bool,
    #[serde(default)]
    pub has_video: bool,
    #[serde(default)]
    pub retweets: u32,
    #[serde(default)]
    pub replies: u32,
    #[serde(default)]
    pub is_news: bool,
    #[serde(default)]
    pub is_emergency_services: bool,
    #[serde(default)]
    pub username: Option<String>,
}

// --- helene_timeline.json ---

#[derive(Debug, Clone, Deserialize)]
pub struct BulletinFile {
    pub events: Vec<BulletinEvent>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct GeoJsonPolygon {
    #[serde(rename = "type")]
    pub kind: String,
    pub coordinates: Vec<Vec<(f64, f64)>>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct BulletinEvent {
    pub id: String,
    pub timestamp: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub location: LatLon,
    pub description: String,
    pub source: String,
    #[serde(default)]
    pub agency: Option<String>,
    #[serde(default)]
    pub report_id: Option<String>,
    #[serde(default)]
    pub affected_polygon: Option<GeoJsonPolygon>,
}

// --- shelters.json ---

#[derive(Debug, Clone, Deserialize)]
pub struct SheltersFile {
    pub shelters: Vec<ShelterRecord>,
    #[serde(default)]
    pub supply_depots: Vec<SupplyDepot>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ShelterRecord {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub address: Option<String>,
    pub location: LatLon,
    pub capacity: u32,
    pub current_occupancy: u32,
    pub opened_at: String,
    #[serde(default)]
    pub closed_at: Option<String>,
    #[serde(default)]
    pub needs: Vec<String>,
    #[serde(default)]
    pub accepts_pets: bool,
    #[serde(default)]
    pub has_generator: bool,
    #[serde(default)]
    pub has_medical: bool,
    #[serde(default)]
    pub wheelchair_accessible: bool,
    #[serde(default)]
    pub contact: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SupplyDepot {
    pub name: String,
    pub location: LatLon,
}

// --- satellite detections ---

#[derive(Debug, Clone, Deserialize)]
pub struct SatelliteFile {
    pub detections: Vec<SatelliteDetection>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SatelliteDetection {
    pub id: String,
    pub timestamp: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub location: LatLon,
    #[serde(default)]
    pub confidence: Option<f64>,
    #[serde(default)]
    pub area_sqm: Option<f64>,
    #[serde(default)]
    pub imagery_source: Option<String>,
    #[serde(default)]
    pub tile_id: Option<String>,
    #[serde(default)]
    pub pre_image_date: Option<String>,
    #[serde(default)]
    pub post_image_date: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

/// Parses an RFC3339 timestamp, tolerating a trailing bare `Z` the way the
/// bulletin feed's distillation does.
pub fn parse_timestamp(raw: &str) -> Option<chrono::DateTime<chrono::Utc>> {
    chrono::DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&chrono::Utc))
        .ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_trailing_z_timestamp() {
        let ts = parse_timestamp("2024-09-27T14:00:00Z").unwrap();
        assert_eq!(ts.to_rfc3339(), "2024-09-27T14:00:00+00:00");
    }

    #[test]
    fn rejects_malformed_timestamp() {
        assert!(parse_timestamp("not-a-date").is_none());
    }
}
