use relief_geo::{haversine_km, Location};
use relief_model::{EventKind, Report};

const CONTRADICTIONS: &[(EventKind, &[EventKind])] = &[
    (EventKind::RoadClosure, &[EventKind::RoadClear]),
    (
        EventKind::RoadClear,
        &[EventKind::RoadClosure, EventKind::RoadDamage],
    ),
    (EventKind::RoadDamage, &[EventKind::RoadClear]),
    (EventKind::Flooding, &[EventKind::RoadClear]),
];

/// A spatial group of reports believed to describe the same ground truth.
#[derive(Debug, Clone)]
pub struct Cluster {
    pub reports: Vec<Report>,
    pub centroid: Location,
}

impl Cluster {
    /// Builds a cluster directly from an existing report slice (e.g. a
    /// contradicting set already identified elsewhere), computing the
    /// centroid as a simple average rather than a running mean.
    pub fn from_reports(reports: Vec<Report>) -> Self {
        if reports.is_empty() {
            return Self {
                reports,
                centroid: Location::new(0.0, 0.0),
            };
        }
        let n = reports.len() as f64;
        let lat = reports.iter().map(|r| r.location.lat).sum::<f64>() / n;
        let lon = reports.iter().map(|r| r.location.lon).sum::<f64>() / n;
        Self {
            reports,
            centroid: Location::new(lat, lon),
        }
    }

    fn new(report: Report) -> Self {
        let centroid = report.location.clone();
        Self {
            reports: vec![report],
            centroid,
        }
    }

    fn push(&mut self, report: Report) {
        let n = self.reports.len() as f64;
        let next_n = n + 1.0;
        self.centroid = Location::new(
            (self.centroid.lat * n + report.location.lat) / next_n,
            (self.centroid.lon * n + report.location.lon) / next_n,
        );
        self.reports.push(report);
    }

    pub fn event_kinds(&self) -> Vec<EventKind> {
        let mut kinds: Vec<EventKind> = self.reports.iter().map(|r| r.kind).collect();
        kinds.dedup_by_key(|k| k.to_string());
        kinds
    }

    /// True iff this cluster's event kinds intersect a contradicting pair.
    pub fn has_contradiction(&self) -> bool {
        let kinds = self.event_kinds();
        kinds.iter().any(|k| {
            CONTRADICTIONS
                .iter()
                .find(|(kind, _)| kind == k)
                .map(|(_, contradicts)| kinds.iter().any(|other| contradicts.contains(other)))
                .unwrap_or(false)
        })
    }
}

/// Greedy single-pass clustering: each report joins the first existing
/// cluster whose running centroid is within `proximity_km`, else starts a
/// new one. Order-sensitive by design — the first-fit rule depends on
/// input order, which is a documented trade-off, not a bug.
pub fn cluster(reports: &[Report], proximity_km: f64) -> Vec<Cluster> {
    let mut clusters: Vec<Cluster> = Vec::new();
    for report in reports {
        let joined = clusters.iter_mut().find(|c| {
            haversine_km(
                c.centroid.lat,
                c.centroid.lon,
                report.location.lat,
                report.location.lon,
            ) <= proximity_km
        });
        match joined {
            Some(c) => c.push(report.clone()),
            None => clusters.push(Cluster::new(report.clone())),
        }
    }
    clusters
}

/// For clusters with no contradiction: combines agreement into a higher
/// confidence than any single report. Single-report clusters return the
/// report's own confidence unchanged.
pub fn consensus_confidence(cluster: &Cluster) -> f64 {
    if cluster.reports.len() == 1 {
        return cluster.reports[0].raw_confidence;
    }
    let n = cluster.reports.len() as f64;
    let avg_confidence: f64 =
        cluster.reports.iter().map(|r| r.raw_confidence).sum::<f64>() / n;
    let unique_sources: std::collections::HashSet<_> =
        cluster.reports.iter().map(|r| r.source.to_string()).collect();

    let source_bonus = (0.05 * unique_sources.len() as f64).min(0.15);
    let count_bonus = (0.03 * (n - 1.0)).min(0.10);

    (avg_confidence + source_bonus + count_bonus).clamp(0.0, 1.0)
}
