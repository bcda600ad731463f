use async_trait::async_trait;
use chrono::{DateTime, Utc};
use relief_geo::{BoundingBox, Location};
use relief_model::{EventKind, Report, SourceTag};

use crate::adapter::SourceAdapter;
use crate::dataset;
use crate::schema::{self, SocialPost};

const CAP_BEFORE_CORROBORATION: f64 = 0.95;

/// Lowercase substring keyword buckets, one per event kind that social
/// content can plausibly describe. The first bucket whose keyword appears
/// in the post content wins; posts matching none are discarded.
const BUCKETS: &[(EventKind, &[&str])] = &[
    (
        EventKind::RoadClosure,
        &[
            "road closed",
            "road blocked",
            "can't get through",
            "impassable",
            "no access",
            "shut down",
            "closed off",
        ],
    ),
    (
        EventKind::BridgeCollapse,
        &[
            "bridge out",
            "bridge collapsed",
            "bridge gone",
            "bridge washed away",
            "bridge destroyed",
        ],
    ),
    (
        EventKind::Flooding,
        &[
            "flooded",
            "underwater",
            "water rising",
            "flash flood",
            "river overflowing",
            "submerged",
        ],
    ),
    (
        EventKind::RescueNeeded,
        &[
            "trapped",
            "stranded",
            "need rescue",
            "help needed",
            "people stuck",
            "evacuate",
        ],
    ),
    (
        EventKind::SuppliesNeeded,
        &[
            "need water",
            "need food",
            "need medicine",
            "running out",
            "no supplies",
            "desperate for",
        ],
    ),
    (
        EventKind::PowerOutage,
        &[
            "power out",
            "no electricity",
            "blackout",
            "no power",
            "lights out",
        ],
    ),
];

fn infer_kind(content: &str) -> Option<EventKind> {
    let lowered = content.to_lowercase();
    BUCKETS
        .iter()
        .find(|(_, keywords)| keywords.iter().any(|k| lowered.contains(k)))
        .map(|(kind, _)| *kind)
}

fn confidence(post: &SocialPost) -> f64 {
    let mut score = 0.4;
    if post.verified {
        score += 0.15;
    }
    if post.is_local {
        score += 0.10;
    }
    if post.has_photo {
        score += 0.20;
    }
    if post.has_video {
        score += 0.25;
    }
    if post.retweets > 10 {
        score += 0.10;
    }
    if post.is_news {
        score += 0.15;
    }
    if post.is_emergency_services {
        score += 0.25;
    }
    score.min(CAP_BEFORE_CORROBORATION)
}

pub struct SocialAdapter {
    path: String,
}

impl SocialAdapter {
    pub fn new(path: impl Into<String>) -> Self {
        Self { path: path.into() }
    }

    fn build_report(&self, idx: usize, p: &SocialPost) -> Option<Report> {
        let kind = infer_kind(&p.content)?;
        let timestamp = schema::parse_timestamp(&p.timestamp)?;
        let source = match p.platform.as_str() {
            "twitter" => SourceTag::Twitter,
            "reddit" => SourceTag::Reddit,
            _ => SourceTag::CitizenReport,
        };

        let mut metadata = std::collections::HashMap::new();
        metadata.insert(
            "corroboration".to_string(),
            (p.retweets + p.replies).to_string(),
        );

        Some(Report {
            id: format!("social-{idx}"),
            timestamp,
            kind,
            location: Location::new(p.location.lat, p.location.lon),
            description: p.content.clone(),
            source,
            raw_confidence: confidence(p),
            raw_payload: serde_json::to_value(p).unwrap_or(serde_json::Value::Null),
            agent: self.name().to_string(),
            metadata,
        })
    }
}

#[async_trait]
impl SourceAdapter for SocialAdapter {
    fn name(&self) -> &'static str {
        "social_media"
    }

    async fn gather(&self, now: DateTime<Utc>, bbox: &BoundingBox) -> Vec<Report> {
        let Some(file) = dataset::load::<schema::SocialPostsFile>(&self.path) else {
            return Vec::new();
        };
        let reports: Vec<Report> = file
            .posts
            .iter()
            .enumerate()
            .filter_map(|(i, p)| self.build_report(i, p))
            .collect();
        dataset::finalize(reports, now, bbox)
    }
}
