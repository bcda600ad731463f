/// Maps a supply-kind key (as produced by the Extractor) to the shelter
/// need tag it satisfies. Returns `None` for unrecognized supply kinds.
pub fn supply_to_need(supply_kind: &str) -> Option<&'static str> {
    match supply_kind {
        "water_cases" => Some("water"),
        "blankets" => Some("blankets"),
        "medical_kits" => Some("medical_supplies"),
        "food_cases" => Some("food"),
        "generators" => Some("generators"),
        "fuel" => Some("fuel"),
        "diapers" => Some("diapers"),
        "baby_formula" => Some("baby_formula"),
        "pet_supplies" => Some("pet_supplies"),
        "hygiene_kits" => Some("hygiene_kits"),
        "cots" => Some("cots"),
        "medications" => Some("medications"),
        "charging_stations" => Some("charging_stations"),
        _ => None,
    }
}
