use std::time::Duration;

use relief_common::Config;
use relief_geo::BoundingBox;

/// Pipeline-level tuning, layered on top of [`relief_common::Config`]. The
/// two constants here are algorithm parameters rather than deployment
/// knobs, so they're not environment-overridable — they come straight from
/// the fusion/road-network design.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    pub bbox: BoundingBox,
    pub cluster_proximity_km: f64,
    pub edge_projection_radius_deg: f64,
    pub adapter_timeout: Duration,
    pub router_timeout: Duration,
    pub extractor_timeout: Duration,
    pub query_timeout: Duration,
    pub max_in_flight: usize,
}

impl PipelineConfig {
    /// Derives pipeline tuning from the shared environment config, falling
    /// back to the default Western-NC bbox if the configured bounds are
    /// somehow malformed (west > east or south > north never happens from
    /// `Config::from_env`'s own defaults, but a hand-edited environment
    /// could produce one).
    pub fn from_common(config: &Config) -> Self {
        let bbox = BoundingBox::new(
            config.bbox_west,
            config.bbox_south,
            config.bbox_east,
            config.bbox_north,
        )
        .unwrap_or_else(|e| {
            tracing::warn!(error = %e, "configured bbox invalid, falling back to Western NC");
            BoundingBox::new(-83.5, 35.0, -81.5, 36.5).expect("default bbox is well-formed")
        });

        Self {
            bbox,
            cluster_proximity_km: 0.5,
            edge_projection_radius_deg: 0.001,
            adapter_timeout: config.adapter_timeout,
            router_timeout: config.router_timeout,
            extractor_timeout: config.extractor_timeout,
            query_timeout: config.query_timeout,
            max_in_flight: config.max_in_flight,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_carry_the_documented_algorithm_constants() {
        let cfg = PipelineConfig::from_common(&Config::from_env());
        assert_eq!(cfg.cluster_proximity_km, 0.5);
        assert_eq!(cfg.edge_projection_radius_deg, 0.001);
        assert_eq!(cfg.bbox.west, -83.5);
    }
}
