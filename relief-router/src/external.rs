use anyhow::{anyhow, Result};
use async_trait::async_trait;
use relief_geo::{Location, Polygon};
use serde::{Deserialize, Serialize};

use crate::hazards::AvoidPolygons;

/// A single turn-by-turn step, per spec.md §6's `directions` schema.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExternalStep {
    pub instruction: String,
    pub name: String,
    pub distance_m: f64,
    pub duration_s: f64,
    pub maneuver_type: String,
    pub maneuver_modifier: String,
}

/// What the external router collaborator hands back on success.
#[derive(Debug, Clone)]
pub struct ExternalRoute {
    pub geometry: Vec<Location>,
    pub distance_m: f64,
    pub duration_s: f64,
    pub steps: Vec<ExternalStep>,
}

/// The out-of-scope HTTP routing collaborator. Any implementation that
/// accepts origin/destination and an optional avoidance geometry and
/// returns real road geometry satisfies this; the pipeline never knows
/// which one it's holding.
#[async_trait]
pub trait ExternalRouter: Send + Sync {
    async fn route(
        &self,
        origin: Location,
        destination: Location,
        avoid: Option<AvoidPolygons>,
    ) -> Result<ExternalRoute>;
}

// ---------------------------------------------------------------------------
// Wire schema, per spec.md §6 "External router protocol".
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
struct AvoidOptions {
    avoid_polygons: serde_json::Value,
}

#[derive(Debug, Serialize)]
struct RouteRequest {
    coordinates: Vec<[f64; 2]>,
    #[serde(skip_serializing_if = "Option::is_none")]
    options: Option<AvoidOptions>,
}

fn ring_to_json(ring: &relief_geo::Ring) -> serde_json::Value {
    let coords: Vec<[f64; 2]> = ring.0.iter().map(|&(lon, lat)| [lon, lat]).collect();
    serde_json::json!([coords])
}

fn polygon_to_json(polygon: &Polygon) -> serde_json::Value {
    serde_json::json!({
        "type": "Polygon",
        "coordinates": ring_to_json(&polygon.exterior),
    })
}

fn avoid_to_json(avoid: &AvoidPolygons) -> serde_json::Value {
    match avoid {
        AvoidPolygons::Single(p) => polygon_to_json(p),
        AvoidPolygons::Multi(multi) => serde_json::json!({
            "type": "MultiPolygon",
            "coordinates": multi.0.iter().map(|p| ring_to_json(&p.exterior)).collect::<Vec<_>>(),
        }),
    }
}

#[derive(Debug, Deserialize)]
struct WireFeatureCollection {
    features: Vec<WireFeature>,
}

#[derive(Debug, Deserialize)]
struct WireFeature {
    geometry: WireGeometry,
    properties: WireProperties,
}

#[derive(Debug, Deserialize)]
struct WireGeometry {
    coordinates: Vec<[f64; 2]>,
}

#[derive(Debug, Deserialize)]
struct WireProperties {
    summary: WireSummary,
    #[serde(default)]
    segments: Vec<WireSegment>,
}

#[derive(Debug, Deserialize)]
struct WireSummary {
    distance: f64,
    duration: f64,
}

#[derive(Debug, Deserialize)]
struct WireSegment {
    #[serde(default)]
    steps: Vec<WireStep>,
}

#[derive(Debug, Deserialize)]
struct WireStep {
    #[serde(default)]
    instruction: String,
    #[serde(default)]
    name: String,
    #[serde(default)]
    distance: f64,
    #[serde(default)]
    duration: f64,
    #[serde(default, rename = "type")]
    maneuver_type: serde_json::Value,
}

/// Calls an HTTP routing service per spec.md §6: POST
/// `{coordinates, options?:{avoid_polygons}}`, expect a GeoJSON
/// `FeatureCollection` whose first feature carries the road geometry and
/// turn-by-turn summary. Any non-200 status or malformed body is an error,
/// which `route_with_fallback` treats as "this tier failed, try the next".
pub struct HttpExternalRouter {
    client: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
}

impl HttpExternalRouter {
    pub fn new(base_url: impl Into<String>, api_key: Option<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into(),
            api_key,
        }
    }
}

#[async_trait]
impl ExternalRouter for HttpExternalRouter {
    async fn route(
        &self,
        origin: Location,
        destination: Location,
        avoid: Option<AvoidPolygons>,
    ) -> Result<ExternalRoute> {
        let request = RouteRequest {
            coordinates: vec![[origin.lon, origin.lat], [destination.lon, destination.lat]],
            options: avoid.as_ref().map(|a| AvoidOptions {
                avoid_polygons: avoid_to_json(a),
            }),
        };

        let mut builder = self.client.post(&self.base_url).json(&request);
        if let Some(key) = &self.api_key {
            builder = builder.header("Authorization", key);
        }

        let response = builder.send().await?;
        if !response.status().is_success() {
            return Err(anyhow!("external router returned status {}", response.status()));
        }

        let body: WireFeatureCollection = response.json().await?;
        let feature = body
            .features
            .into_iter()
            .next()
            .ok_or_else(|| anyhow!("external router response had no features"))?;

        let geometry = feature
            .geometry
            .coordinates
            .into_iter()
            .map(|[lon, lat]| Location::new(lat, lon))
            .collect();

        let steps = feature
            .properties
            .segments
            .into_iter()
            .flat_map(|segment| segment.steps)
            .map(|step| ExternalStep {
                instruction: step.instruction,
                name: step.name,
                distance_m: step.distance,
                duration_s: step.duration,
                maneuver_type: match &step.maneuver_type {
                    serde_json::Value::String(s) => s.clone(),
                    serde_json::Value::Null => String::new(),
                    other => other.to_string(),
                },
                maneuver_modifier: String::new(),
            })
            .collect();

        Ok(ExternalRoute {
            geometry,
            distance_m: feature.properties.summary.distance,
            duration_s: feature.properties.summary.duration,
            steps,
        })
    }
}

/// Always errors. Used in tests and offline mode so
/// `route_with_fallback` degrades straight to the haversine tier.
pub struct NullExternalRouter;

#[async_trait]
impl ExternalRouter for NullExternalRouter {
    async fn route(
        &self,
        _origin: Location,
        _destination: Location,
        _avoid: Option<AvoidPolygons>,
    ) -> Result<ExternalRoute> {
        Err(anyhow!("no external router configured"))
    }
}
