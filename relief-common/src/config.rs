use std::env;
use std::time::Duration;

/// Application configuration loaded from environment variables.
///
/// All keys are optional; missing keys fall back to the documented defaults
/// below. `ANTHROPIC_API_KEY` is the one value that matters for whether the
/// Extractor can reach the LLM path at all — its absence is not a panic, it
/// just means the LLM-backed extractor can't be constructed and callers fall
/// back to the deterministic one.
#[derive(Debug, Clone)]
pub struct Config {
    // Dataset paths
    pub social_path: String,
    pub bulletin_path: String,
    pub satellite_path: String,
    pub shelters_path: String,
    pub roads_path: String,

    // External router
    pub router_url: Option<String>,
    pub router_api_key: Option<String>,

    // Extractor
    pub anthropic_api_key: Option<String>,

    // Bounding box override (defaults to Western NC)
    pub bbox_west: f64,
    pub bbox_south: f64,
    pub bbox_east: f64,
    pub bbox_north: f64,

    // Adapter tuning
    pub satellite_agent_weight: f64,

    // Timeouts
    pub adapter_timeout: Duration,
    pub router_timeout: Duration,
    pub extractor_timeout: Duration,
    pub query_timeout: Duration,

    // Backpressure
    pub max_in_flight: usize,
}

impl Config {
    /// Load configuration from environment variables, applying defaults for
    /// anything unset.
    pub fn from_env() -> Self {
        Self {
            social_path: env::var("RELIEF_SOCIAL_PATH")
                .unwrap_or_else(|_| "demos/social_media_posts.json".to_string()),
            bulletin_path: env::var("RELIEF_BULLETIN_PATH")
                .unwrap_or_else(|_| "demos/helene_timeline.json".to_string()),
            satellite_path: env::var("RELIEF_SATELLITE_PATH")
                .unwrap_or_else(|_| "demos/satellite_detections.json".to_string()),
            shelters_path: env::var("RELIEF_SHELTERS_PATH")
                .unwrap_or_else(|_| "demos/shelters.json".to_string()),
            roads_path: env::var("RELIEF_ROADS_PATH")
                .unwrap_or_else(|_| "demos/road_network.geojson".to_string()),

            router_url: env::var("RELIEF_ROUTER_URL").ok(),
            router_api_key: env::var("RELIEF_ROUTER_API_KEY").ok(),

            anthropic_api_key: env::var("ANTHROPIC_API_KEY").ok(),

            bbox_west: parse_env_or("RELIEF_BBOX_WEST", -83.5),
            bbox_south: parse_env_or("RELIEF_BBOX_SOUTH", 35.0),
            bbox_east: parse_env_or("RELIEF_BBOX_EAST", -81.5),
            bbox_north: parse_env_or("RELIEF_BBOX_NORTH", 36.5),

            satellite_agent_weight: parse_env_or("RELIEF_SATELLITE_AGENT_WEIGHT", 0.90),

            adapter_timeout: Duration::from_secs(parse_env_or("RELIEF_ADAPTER_TIMEOUT_SECS", 5)),
            router_timeout: Duration::from_secs(parse_env_or("RELIEF_ROUTER_TIMEOUT_SECS", 10)),
            extractor_timeout: Duration::from_secs(parse_env_or(
                "RELIEF_EXTRACTOR_TIMEOUT_SECS",
                15,
            )),
            query_timeout: Duration::from_secs(parse_env_or("RELIEF_QUERY_TIMEOUT_SECS", 45)),

            max_in_flight: parse_env_or("RELIEF_MAX_IN_FLIGHT", 16),
        }
    }

    /// Log the presence/length of sensitive values, never the values
    /// themselves.
    pub fn log_redacted(&self) {
        let secrets = [
            ("RELIEF_ROUTER_API_KEY", self.router_api_key.as_deref()),
            ("ANTHROPIC_API_KEY", self.anthropic_api_key.as_deref()),
        ];
        for (name, value) in secrets {
            match value {
                None => tracing::info!("{name} = (unset)"),
                Some(v) if v.is_empty() => tracing::info!("{name} = (empty)"),
                Some(v) => tracing::info!("{name} = ({} chars)", v.len()),
            }
        }
        tracing::info!(
            bbox = ?(self.bbox_west, self.bbox_south, self.bbox_east, self.bbox_north),
            max_in_flight = self.max_in_flight,
            "configuration loaded"
        );
    }
}

fn parse_env_or<T: std::str::FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_when_unset() {
        let cfg = Config::from_env();
        assert_eq!(cfg.bbox_west, -83.5);
        assert_eq!(cfg.bbox_north, 36.5);
        assert_eq!(cfg.max_in_flight, 16);
    }
}
