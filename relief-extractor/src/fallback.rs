use std::collections::HashMap;
use std::sync::OnceLock;

use async_trait::async_trait;
use regex::Regex;
use relief_fusion::{Cluster, ConfidenceWinsPolicy, Reconciliation, ReconciliationPolicy};
use relief_geo::Location;
use relief_model::Report;

use crate::trait_def::Extractor;
use crate::types::{Intent, ParsedBy, ParsedQuery, Urgency};

/// `(pattern, supply key)`. Patterns allow an optional leading quantity;
/// when absent, quantity defaults to 1.
const SUPPLY_PATTERNS: &[(&str, &str)] = &[
    (r"(?i)(\d+)?\s*(?:cases?\s+of\s+)?water(?:\s+cases?)?", "water_cases"),
    (r"(?i)(\d+)?\s*blankets?", "blankets"),
    (r"(?i)(\d+)?\s*(?:medical\s+)?(?:kits?|meds?)\b", "medical_kits"),
    (r"(?i)(\d+)?\s*(?:cases?\s+of\s+)?food(?:\s+cases?)?", "food_cases"),
    (r"(?i)(\d+)?\s*generators?", "generators"),
    (r"(?i)(\d+)?\s*cots?", "cots"),
    (r"(?i)(\d+)?\s*(?:packs?\s+of\s+)?diapers?", "diapers"),
    (r"(?i)(\d+)?\s*(?:medications?|medicines?)", "medications"),
];

fn supply_regexes() -> &'static Vec<(Regex, &'static str)> {
    static CELL: OnceLock<Vec<(Regex, &'static str)>> = OnceLock::new();
    CELL.get_or_init(|| {
        SUPPLY_PATTERNS
            .iter()
            .map(|(pattern, key)| (Regex::new(pattern).expect("static regex is valid"), *key))
            .collect()
    })
}

fn parse_supplies(text: &str) -> HashMap<String, u32> {
    let mut supplies = HashMap::new();
    for (re, key) in supply_regexes() {
        if let Some(caps) = re.captures(text) {
            let qty = caps
                .get(1)
                .and_then(|m| m.as_str().parse::<u32>().ok())
                .unwrap_or(1);
            supplies.insert(key.to_string(), qty);
        }
    }
    supplies
}

fn infer_urgency(text: &str) -> Urgency {
    let lowered = text.to_lowercase();
    if lowered.contains("critical") || lowered.contains("immediately") || lowered.contains("emergency") {
        Urgency::Critical
    } else if lowered.contains("urgent") || lowered.contains("asap") {
        Urgency::High
    } else if lowered.contains("whenever") || lowered.contains("no rush") {
        Urgency::Low
    } else {
        Urgency::Medium
    }
}

fn infer_intent(text: &str, has_supplies: bool) -> Intent {
    let lowered = text.to_lowercase();
    if lowered.contains("status") || lowered.contains("is the road") || lowered.contains("is it open") {
        Intent::CheckStatus
    } else if !has_supplies && lowered.contains("shelter") {
        Intent::FindShelter
    } else {
        Intent::RouteSupplies
    }
}

fn infer_constraints(text: &str) -> Vec<String> {
    let lowered = text.to_lowercase();
    let mut constraints = Vec::new();
    if lowered.contains("avoid highway") || lowered.contains("no highway") {
        constraints.push("avoid_highways".to_string());
    }
    if lowered.contains("avoid flood") {
        constraints.push("avoid_flooding".to_string());
    }
    constraints
}

/// Matches a fixed gazetteer of depot/landmark names against the query
/// text (case-insensitive substring). Shelters are never part of this
/// gazetteer — they are destinations, never an origin.
fn match_gazetteer(text: &str, gazetteer: &[(String, Location)]) -> Option<Location> {
    let lowered = text.to_lowercase();
    gazetteer
        .iter()
        .find(|(name, _)| lowered.contains(&name.to_lowercase()))
        .map(|(_, loc)| loc.clone())
}

/// Deterministic reference implementation of both Extractor contracts.
/// `parse_query` never guesses an origin it can't find in the gazetteer;
/// `reconcile_conflict` delegates to [`ConfidenceWinsPolicy`].
pub struct FallbackExtractor {
    gazetteer: Vec<(String, Location)>,
}

impl FallbackExtractor {
    pub fn new(gazetteer: Vec<(String, Location)>) -> Self {
        Self { gazetteer }
    }
}

#[async_trait]
impl Extractor for FallbackExtractor {
    async fn parse_query(&self, text: &str) -> ParsedQuery {
        let supplies = parse_supplies(text);
        let origin = match_gazetteer(text, &self.gazetteer);
        ParsedQuery {
            intent: infer_intent(text, !supplies.is_empty()),
            urgency: infer_urgency(text),
            constraints: infer_constraints(text),
            supplies,
            origin,
            parsed_by: ParsedBy::Keyword,
        }
    }

    async fn reconcile_conflict(&self, reports: &[Report], location_label: &str) -> Reconciliation {
        let cluster = Cluster::from_reports(reports.to_vec());
        ConfidenceWinsPolicy.reconcile(&cluster, location_label).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn depot(name: &str, lat: f64, lon: f64) -> (String, Location) {
        (name.to_string(), Location::new(lat, lon))
    }

    #[test]
    fn supply_regex_extracts_quantity() {
        let supplies = parse_supplies("need 200 cases of water and 50 blankets");
        assert_eq!(supplies.get("water_cases"), Some(&200));
        assert_eq!(supplies.get("blankets"), Some(&50));
    }

    #[test]
    fn bare_supply_keyword_defaults_to_one() {
        let supplies = parse_supplies("we need water urgently");
        assert_eq!(supplies.get("water_cases"), Some(&1));
    }

    #[test]
    fn gazetteer_matches_known_depot_case_insensitively() {
        let gazetteer = vec![depot("Asheville Regional Airport", 35.4363, -82.5418)];
        let loc = match_gazetteer("deliver from asheville regional airport please", &gazetteer);
        assert_eq!(loc, Some(Location::new(35.4363, -82.5418)));
    }

    #[test]
    fn unresolved_origin_is_left_none() {
        let gazetteer = vec![depot("Main Depot", 35.5, -82.5)];
        assert!(match_gazetteer("deliver from somewhere unknown", &gazetteer).is_none());
    }

    #[tokio::test]
    async fn parse_query_never_guesses_an_origin() {
        let extractor = FallbackExtractor::new(vec![]);
        let parsed = extractor
            .parse_query("need 200 cases of water for the shelter")
            .await;
        assert!(parsed.origin.is_none());
    }

    #[test]
    fn urgency_keywords_are_detected() {
        assert_eq!(infer_urgency("this is a critical emergency"), Urgency::Critical);
        assert_eq!(infer_urgency("urgent request"), Urgency::High);
        assert_eq!(infer_urgency("whenever you can"), Urgency::Low);
        assert_eq!(infer_urgency("please deliver supplies"), Urgency::Medium);
    }
}
