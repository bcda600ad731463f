use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// The closed set of origin tags a report can carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum SourceTag {
    Satellite,
    Twitter,
    Reddit,
    Fema,
    Ncdot,
    Usgs,
    LocalEmergency,
    News,
    CitizenReport,
}

impl SourceTag {
    /// Official-source reliability prior, used by C3's official adapter and
    /// by C4's argmax fallback. Satellite and social priors are computed
    /// per-detection rather than per-tag, so they live in `relief-sources`.
    pub fn reliability_prior(&self) -> f64 {
        match self {
            SourceTag::Fema => 0.98,
            SourceTag::Ncdot => 0.95,
            SourceTag::Usgs => 0.97,
            SourceTag::LocalEmergency => 0.90,
            SourceTag::News => 0.80,
            _ => 0.85,
        }
    }
}

impl std::fmt::Display for SourceTag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            SourceTag::Satellite => "satellite",
            SourceTag::Twitter => "twitter",
            SourceTag::Reddit => "reddit",
            SourceTag::Fema => "fema",
            SourceTag::Ncdot => "ncdot",
            SourceTag::Usgs => "usgs",
            SourceTag::LocalEmergency => "local_emergency",
            SourceTag::News => "news",
            SourceTag::CitizenReport => "citizen_report",
        };
        write!(f, "{s}")
    }
}

impl std::str::FromStr for SourceTag {
    type Err = String;
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "satellite" => Ok(Self::Satellite),
            "twitter" => Ok(Self::Twitter),
            "reddit" => Ok(Self::Reddit),
            "fema" => Ok(Self::Fema),
            "ncdot" => Ok(Self::Ncdot),
            "usgs" => Ok(Self::Usgs),
            "local_emergency" => Ok(Self::LocalEmergency),
            "news" => Ok(Self::News),
            "citizen_report" => Ok(Self::CitizenReport),
            other => Err(format!("unknown SourceTag: {other}")),
        }
    }
}
