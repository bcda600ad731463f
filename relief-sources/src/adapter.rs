use async_trait::async_trait;
use chrono::{DateTime, Utc};
use relief_geo::BoundingBox;
use relief_model::Report;

/// A source adapter turns one dataset into canonical reports for the given
/// scenario time and bounding box. Implementations are pure functions over
/// their dataset: same inputs, same (unordered) output set.
#[async_trait]
pub trait SourceAdapter: Send + Sync {
    fn name(&self) -> &'static str;
    async fn gather(&self, now: DateTime<Utc>, bbox: &BoundingBox) -> Vec<Report>;
}
