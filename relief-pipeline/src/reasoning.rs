use std::collections::BTreeMap;
use std::fmt::Write as _;

use relief_router::Route;

use crate::shelter_score::ShelterCandidate;

/// One blocked or damaged edge surfaced in the situational-awareness
/// section, carrying enough to render "name (confidence%)".
pub struct FlaggedRoad {
    pub name: String,
    pub confidence: f64,
}

/// Builds the markdown narrative that accompanies a query response:
/// a situational-awareness summary, the top blocked roads, and either the
/// planned deliveries or a no-routes notice.
pub fn build_reasoning(
    reports_by_source: &BTreeMap<String, usize>,
    blocked: &[FlaggedRoad],
    deliveries: &[(ShelterCandidate, Route)],
) -> String {
    let mut out = String::new();

    out.push_str("## Situational Awareness\n");
    if reports_by_source.is_empty() {
        out.push_str("- No reports received this tick\n");
    } else {
        for (source, count) in reports_by_source {
            let _ = writeln!(out, "- {source}: {count}");
        }
    }

    if !blocked.is_empty() {
        let _ = writeln!(out, "\n### Blocked Roads ({})", blocked.len());
        for road in blocked.iter().take(5) {
            let _ = writeln!(out, "- {} ({:.0}%)", road.name, road.confidence * 100.0);
        }
    }

    if deliveries.is_empty() {
        out.push_str("\n## No viable routes found\n");
    } else {
        out.push_str("\n## Recommended Deliveries\n");
        for (candidate, route) in deliveries {
            let needs = if candidate.matched_needs.is_empty() {
                "none matched".to_string()
            } else {
                candidate.matched_needs.join(", ")
            };
            let _ = writeln!(
                out,
                "- **{}** — needs: {}. Occupancy: {}/{}.",
                candidate.shelter.name, needs, candidate.shelter.current_occupancy, candidate.shelter.capacity
            );
            let _ = writeln!(out, "  - Distance: {:.0} m", route.distance_m);
            let _ = writeln!(out, "  - Estimated time: {:.1} min", route.estimated_duration_min);
            let _ = writeln!(out, "  - {}", route.reasoning);
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use relief_geo::Location;
    use relief_model::Shelter;

    fn shelter() -> Shelter {
        Shelter {
            id: "s1".to_string(),
            name: "First Baptist".to_string(),
            location: Location::new(35.5, -82.5),
            capacity: 100,
            current_occupancy: 40,
            opened_at: Utc::now(),
            closed_at: None,
            needs: vec!["water".to_string()],
            accepts_pets: false,
            has_generator: false,
            has_medical: false,
            wheelchair_accessible: false,
            contact: None,
        }
    }

    #[test]
    fn empty_inputs_produce_no_routes_section() {
        let reasoning = build_reasoning(&BTreeMap::new(), &[], &[]);
        assert!(reasoning.contains("No reports received"));
        assert!(reasoning.contains("No viable routes found"));
    }

    #[test]
    fn blocked_roads_are_capped_at_five_in_the_listing() {
        let blocked: Vec<FlaggedRoad> = (0..8)
            .map(|i| FlaggedRoad {
                name: format!("Road {i}"),
                confidence: 0.8,
            })
            .collect();
        let reasoning = build_reasoning(&BTreeMap::new(), &blocked, &[]);
        assert!(reasoning.contains("Blocked Roads (8)"));
        assert_eq!(reasoning.matches("Road ").count(), 5);
    }

    #[test]
    fn deliveries_render_shelter_name_and_route_metrics() {
        let candidate = ShelterCandidate {
            shelter: shelter(),
            score: 0.8,
            matched_needs: vec!["water".to_string()],
        };
        let route = Route {
            id: "r1".to_string(),
            origin: Location::new(35.4, -82.4),
            destination: Location::new(35.5, -82.5),
            waypoints: vec![],
            distance_m: 1200.0,
            estimated_duration_min: 15.0,
            hazards_avoided: vec![],
            confidence: 0.9,
            reasoning: "Route avoids 1 flagged segment.".to_string(),
            directions: None,
            created_at: Utc::now(),
        };
        let reasoning = build_reasoning(&BTreeMap::new(), &[], &[(candidate, route)]);
        assert!(reasoning.contains("First Baptist"));
        assert!(reasoning.contains("40/100"));
        assert!(reasoning.contains("1200 m"));
    }
}
