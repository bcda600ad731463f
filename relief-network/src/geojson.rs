use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct FeatureCollection {
    pub features: Vec<Feature>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Feature {
    pub geometry: Geometry,
    #[serde(default)]
    pub properties: Properties,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Geometry {
    #[serde(rename = "type")]
    pub kind: String,
    pub coordinates: Vec<(f64, f64)>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Properties {
    #[serde(default)]
    pub osmid: Option<serde_json::Value>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub highway: Option<String>,
    #[serde(default)]
    pub length: Option<f64>,
}

const METERS_PER_DEGREE_LAT: f64 = 111_320.0;

/// Planar local-metric distance between two lon/lat points, valid over the
/// short segment lengths found in a single road edge.
fn planar_segment_length_m(a: (f64, f64), b: (f64, f64)) -> f64 {
    let avg_lat_rad = ((a.1 + b.1) / 2.0).to_radians();
    let dx = (b.0 - a.0) * METERS_PER_DEGREE_LAT * avg_lat_rad.cos();
    let dy = (b.1 - a.1) * METERS_PER_DEGREE_LAT;
    (dx * dx + dy * dy).sqrt()
}

pub fn summed_length_m(coords: &[(f64, f64)]) -> f64 {
    coords.windows(2).map(|w| planar_segment_length_m(w[0], w[1])).sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn summed_length_of_two_points_matches_single_segment() {
        let coords = vec![(-82.5418, 35.4363), (-82.5415, 35.4363)];
        let len = summed_length_m(&coords);
        assert!(len > 0.0 && len < 100.0);
    }

    #[test]
    fn summed_length_accumulates_across_vertices() {
        let two_point = summed_length_m(&[(-82.54, 35.43), (-82.53, 35.43)]);
        let three_point =
            summed_length_m(&[(-82.54, 35.43), (-82.535, 35.43), (-82.53, 35.43)]);
        assert!((two_point - three_point).abs() < 1e-6);
    }
}
