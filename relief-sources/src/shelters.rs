use relief_geo::Location;
use relief_model::Shelter;

use crate::dataset;
use crate::schema::{self, SheltersFile};

/// Parses `shelters.json` into the canonical `Shelter` model. Timestamps
/// that fail to parse cause that shelter to be dropped (it can never be
/// judged active) rather than panicking the whole load.
pub fn load_shelters(path: &str) -> Vec<Shelter> {
    let Some(file) = dataset::load::<SheltersFile>(path) else {
        return Vec::new();
    };
    file.shelters
        .iter()
        .filter_map(|s| {
            let opened_at = schema::parse_timestamp(&s.opened_at)?;
            let closed_at = match &s.closed_at {
                Some(raw) => Some(schema::parse_timestamp(raw)?),
                None => None,
            };
            Some(Shelter {
                id: s.id.clone(),
                name: s.name.clone(),
                location: Location::new(s.location.lat, s.location.lon),
                capacity: s.capacity,
                current_occupancy: s.current_occupancy,
                opened_at,
                closed_at,
                needs: s.needs.clone(),
                accepts_pets: s.accepts_pets,
                has_generator: s.has_generator,
                has_medical: s.has_medical,
                wheelchair_accessible: s.wheelchair_accessible,
                contact: s.contact.clone(),
            })
        })
        .collect()
}

/// Loads the named supply depots (destinations are shelters only — depots
/// are never routed to, they're gazetteer entries for the fallback parser).
pub fn load_supply_depots(path: &str) -> Vec<(String, Location)> {
    let Some(file) = dataset::load::<SheltersFile>(path) else {
        return Vec::new();
    };
    file.supply_depots
        .iter()
        .map(|d| (d.name.clone(), Location::new(d.location.lat, d.location.lon)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_yields_empty_lists() {
        assert!(load_shelters("does-not-exist.json").is_empty());
        assert!(load_supply_depots("does-not-exist.json").is_empty());
    }
}
