use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// The closed set of observation kinds the system understands. Adding a
/// kind here is a deliberate, compile-breaking change — every exhaustive
/// match over this enum (multipliers, contradictions, default radii) must be
/// updated in lockstep.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    RoadClosure,
    RoadDamage,
    RoadClear,
    Flooding,
    BridgeCollapse,
    ShelterOpening,
    ShelterClosing,
    ShelterNeed,
    PowerOutage,
    InfrastructureDamage,
    RescueNeeded,
    SuppliesNeeded,
}

impl EventKind {
    /// The subset of kinds that touch the road graph.
    pub fn is_road_affecting(&self) -> bool {
        matches!(
            self,
            EventKind::RoadClosure
                | EventKind::RoadDamage
                | EventKind::BridgeCollapse
                | EventKind::Flooding
                | EventKind::RoadClear
        )
    }
}

impl std::fmt::Display for EventKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            EventKind::RoadClosure => "road_closure",
            EventKind::RoadDamage => "road_damage",
            EventKind::RoadClear => "road_clear",
            EventKind::Flooding => "flooding",
            EventKind::BridgeCollapse => "bridge_collapse",
            EventKind::ShelterOpening => "shelter_opening",
            EventKind::ShelterClosing => "shelter_closing",
            EventKind::ShelterNeed => "shelter_need",
            EventKind::PowerOutage => "power_outage",
            EventKind::InfrastructureDamage => "infrastructure_damage",
            EventKind::RescueNeeded => "rescue_needed",
            EventKind::SuppliesNeeded => "supplies_needed",
        };
        write!(f, "{s}")
    }
}

impl std::str::FromStr for EventKind {
    type Err = String;
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "road_closure" => Ok(Self::RoadClosure),
            "road_damage" => Ok(Self::RoadDamage),
            "road_clear" => Ok(Self::RoadClear),
            "flooding" => Ok(Self::Flooding),
            "bridge_collapse" => Ok(Self::BridgeCollapse),
            "shelter_opening" => Ok(Self::ShelterOpening),
            "shelter_closing" => Ok(Self::ShelterClosing),
            "shelter_need" => Ok(Self::ShelterNeed),
            "power_outage" => Ok(Self::PowerOutage),
            "infrastructure_damage" => Ok(Self::InfrastructureDamage),
            "rescue_needed" => Ok(Self::RescueNeeded),
            "supplies_needed" => Ok(Self::SuppliesNeeded),
            other => Err(format!("unknown EventKind: {other}")),
        }
    }
}

/// Per-kind default hazard-polygon radius in meters, used when a report
/// arrives as a point detection rather than an explicit ring.
pub fn default_radius_m(kind: EventKind) -> Option<f64> {
    match kind {
        EventKind::Flooding => Some(500.0),
        EventKind::RoadClosure => Some(200.0),
        EventKind::BridgeCollapse => Some(150.0),
        EventKind::RoadDamage => Some(100.0),
        _ => None,
    }
}
