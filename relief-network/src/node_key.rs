/// Node identity is `(lon, lat)` rounded to 6 decimal places (~0.11m),
/// packed as integer micro-degrees so it can be used as a hash map key
/// without float-equality pitfalls.
pub type NodeKey = (i64, i64);

pub fn round6(lon: f64, lat: f64) -> NodeKey {
    ((lon * 1_000_000.0).round() as i64, (lat * 1_000_000.0).round() as i64)
}
