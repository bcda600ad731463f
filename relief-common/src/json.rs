use serde::Serializer;

/// Serialize an `f64`, mapping non-finite values (`NaN`, `±Infinity`) to JSON
/// `null` instead of letting `serde_json` error out. Use with
/// `#[serde(serialize_with = "relief_common::json::finite_f64")]` on any
/// score/weight/confidence field that crosses a response boundary.
pub fn finite_f64<S>(value: &f64, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    if value.is_finite() {
        serializer.serialize_f64(*value)
    } else {
        serializer.serialize_none()
    }
}

/// Same as [`finite_f64`] for `Option<f64>` fields.
pub fn finite_f64_opt<S>(value: &Option<f64>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    match value {
        Some(v) if v.is_finite() => serializer.serialize_some(v),
        _ => serializer.serialize_none(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(serde::Serialize)]
    struct Wrapper {
        #[serde(serialize_with = "finite_f64")]
        v: f64,
    }

    #[test]
    fn finite_value_passes_through() {
        let w = Wrapper { v: 1.5 };
        assert_eq!(serde_json::to_string(&w).unwrap(), r#"{"v":1.5}"#);
    }

    #[test]
    fn infinite_value_becomes_null() {
        let w = Wrapper { v: f64::INFINITY };
        assert_eq!(serde_json::to_string(&w).unwrap(), r#"{"v":null}"#);
    }

    #[test]
    fn nan_value_becomes_null() {
        let w = Wrapper { v: f64::NAN };
        assert_eq!(serde_json::to_string(&w).unwrap(), r#"{"v":null}"#);
    }
}
