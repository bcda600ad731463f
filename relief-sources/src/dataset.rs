use std::fs::File;
use std::io::BufReader;

use serde::de::DeserializeOwned;

/// Load and parse a JSON dataset file. A missing or malformed file yields
/// `None` and a `tracing::warn!` — callers turn that into an empty report
/// list rather than failing the adapter.
pub fn load<T: DeserializeOwned>(path: &str) -> Option<T> {
    let file = match File::open(path) {
        Ok(f) => f,
        Err(e) => {
            tracing::warn!(path, error = %e, "dataset file unavailable, adapter will return no reports");
            return None;
        }
    };
    match serde_json::from_reader(BufReader::new(file)) {
        Ok(value) => Some(value),
        Err(e) => {
            tracing::warn!(path, error = %e, "dataset file malformed, adapter will return no reports");
            None
        }
    }
}

/// Applies the shared adapter contract every source must satisfy: drop
/// future-dated records, drop out-of-bbox records, and dedup by report id.
pub fn finalize(
    reports: Vec<relief_model::Report>,
    now: chrono::DateTime<chrono::Utc>,
    bbox: &relief_geo::BoundingBox,
) -> Vec<relief_model::Report> {
    let mut seen = std::collections::HashSet::new();
    reports
        .into_iter()
        .filter(|r| r.timestamp <= now)
        .filter(|r| bbox.contains(&r.location))
        .filter(|r| seen.insert(r.id.clone()))
        .collect()
}
