use std::collections::HashMap;

use chrono::{DateTime, Utc};
use relief_geo::Location;
use relief_model::{supply_to_need, Shelter};

const NEED_MATCH_WEIGHT: f64 = 0.40;
const PROXIMITY_WEIGHT: f64 = 0.35;
const OCCUPANCY_WEIGHT: f64 = 0.25;
const PROXIMITY_SPAN_DEG: f64 = 2.0;

/// A shelter scored against one query's supplies and origin, carrying the
/// subset of requested needs it actually matches (used both for ranking
/// and for the per-route reasoning built in step 7/8).
#[derive(Debug, Clone)]
pub struct ShelterCandidate {
    pub shelter: Shelter,
    pub score: f64,
    pub matched_needs: Vec<String>,
}

/// Active shelters with at least one outstanding need — the universe the
/// scorer ranks over.
pub fn candidate_shelters(shelters: &[Shelter], now: DateTime<Utc>) -> Vec<Shelter> {
    shelters
        .iter()
        .filter(|s| s.is_active_at(now) && !s.needs.is_empty())
        .cloned()
        .collect()
}

fn matched_needs(shelter: &Shelter, supplies: &HashMap<String, u32>) -> Vec<String> {
    let mut matched = Vec::new();
    for supply_kind in supplies.keys() {
        let Some(need) = supply_to_need(supply_kind) else {
            continue;
        };
        if shelter.needs.iter().any(|n| n == need) && !matched.iter().any(|m| m == need) {
            matched.push(need.to_string());
        }
    }
    matched
}

/// `score = 0.40 * need_match + 0.35 * proximity + 0.25 * occupancy_ratio`.
pub fn score_shelter(
    shelter: &Shelter,
    origin: &Location,
    supplies: &HashMap<String, u32>,
) -> ShelterCandidate {
    let matched = matched_needs(shelter, supplies);
    let need_match = if supplies.is_empty() {
        1.0
    } else {
        matched.len() as f64 / supplies.len() as f64
    };

    let dlat = shelter.location.lat - origin.lat;
    let dlon = shelter.location.lon - origin.lon;
    let dist_deg = (dlat * dlat + dlon * dlon).sqrt();
    let proximity = (1.0 - dist_deg / PROXIMITY_SPAN_DEG).max(0.0);

    let occupancy_ratio = shelter.current_occupancy as f64 / (shelter.capacity.max(1) as f64);

    let score = NEED_MATCH_WEIGHT * need_match
        + PROXIMITY_WEIGHT * proximity
        + OCCUPANCY_WEIGHT * occupancy_ratio;

    ShelterCandidate {
        shelter: shelter.clone(),
        score,
        matched_needs: matched,
    }
}

/// Top `n` by score, ties broken by ascending shelter id (invariant 7).
pub fn rank_top_n(mut candidates: Vec<ShelterCandidate>, n: usize) -> Vec<ShelterCandidate> {
    candidates.sort_by(|a, b| {
        b.score
            .partial_cmp(&a.score)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| a.shelter.id.cmp(&b.shelter.id))
    });
    candidates.truncate(n);
    candidates
}
