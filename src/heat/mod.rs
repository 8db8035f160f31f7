//! Post and entity heat scoring.
//!
//! Two deliberately separate pipelines live here:
//!
//! - The single-post pipeline ([`HeatScorer`]): log-normalized engagement
//!   counters combined with a multiplicative time-decay factor into a
//!   bounded [0, 1] score. Downstream alert thresholds are calibrated
//!   against this exact formula.
//! - The multi-day windowed pipeline ([`windowed::WindowedHeatScorer`]):
//!   coarse counter weights over a short rolling window with exponential
//!   smoothing, on an unbounded raw scale.
//!
//! They answer different questions (is this post viral right now vs. how is
//! this entity trending this week) and must not be conflated.

pub mod windowed;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::config::HeatConfig;
use crate::domain::{HeatRecord, PostActivity, TrendBucket};
use crate::trend;

/// Alert classification of a heat value against the configured thresholds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlertLevel {
    Normal,
    Low,
    Medium,
    High,
}

/// Heat of one post within an entity analysis.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostHeat {
    /// Post identifier
    pub post_id: String,

    /// Heat in [0, 1]
    pub heat: f64,

    /// When the post was published
    pub created_at: DateTime<Utc>,
}

/// Counts of posts per alert band.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HeatDistribution {
    /// heat >= high threshold
    pub high: usize,

    /// medium threshold <= heat < high threshold
    pub medium: usize,

    /// heat < medium threshold
    pub low: usize,
}

/// Aggregated heat picture for one entity over the analysis window.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntityHeatReport {
    /// Entity analyzed
    pub entity_id: String,

    /// Sum of per-post heat over the window
    pub total_heat: f64,

    /// Mean per-post heat over the window
    pub average_heat: f64,

    /// Posts per alert band
    pub distribution: HeatDistribution,

    /// Dense daily mean-heat series across the window
    pub trend: Vec<TrendBucket>,

    /// Hottest posts, descending
    pub top_posts: Vec<PostHeat>,
}

impl EntityHeatReport {
    /// Flatten the daily trend into persistence-ready records, each day
    /// carrying its change vs the previous day.
    pub fn daily_records(&self) -> Vec<HeatRecord> {
        let mut previous: Option<f64> = None;
        self.trend
            .iter()
            .map(|bucket| {
                let record = HeatRecord {
                    subject_id: self.entity_id.clone(),
                    date: bucket.date,
                    heat: bucket.value.clamp(0.0, 1.0),
                    delta: previous.map(|p| bucket.value - p),
                };
                previous = Some(bucket.value);
                record
            })
            .collect()
    }
}

/// Entity analysis outcome. No posts in the window is reported as such, not
/// as a confident zero.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum EntityHeatOutcome {
    Scored(EntityHeatReport),
    InsufficientData { entity_id: String, reason: String },
}

/// Number of top posts included in an entity report.
const TOP_POSTS: usize = 5;

/// Single-post normalized-and-decayed heat scorer.
#[derive(Debug, Clone, Default)]
pub struct HeatScorer {
    config: HeatConfig,
}

impl HeatScorer {
    pub fn new(config: HeatConfig) -> Self {
        Self { config }
    }

    /// Log-compress one engagement counter into [0, 1].
    ///
    /// Zero or negative engagement contributes nothing; log compression keeps
    /// viral outliers from dominating while still rewarding any nonzero
    /// count.
    pub fn normalize(&self, value: u64) -> f64 {
        if value == 0 {
            return 0.0;
        }
        ((1.0 + value as f64).ln() / self.config.log_scale).min(1.0)
    }

    /// Exponential time decay: 1.0 at age zero, ~0.37 after `decay_hours`.
    pub fn decay(&self, hours: f64) -> f64 {
        (-hours / self.config.decay_hours).exp().clamp(0.0, 1.0)
    }

    /// Heat of a single post in [0, 1].
    ///
    /// The decay factor is multiplicative: it shrinks the engagement-derived
    /// score rather than contributing on its own, so a post with zero
    /// engagement scores 0 at any age.
    pub fn score_post(
        &self,
        engagement: &crate::domain::EngagementSnapshot,
        created_at: DateTime<Utc>,
        now: DateTime<Utc>,
    ) -> f64 {
        let c = &self.config;
        let engagement_score = c.like_weight * self.normalize(engagement.likes)
            + c.repost_weight * self.normalize(engagement.reposts)
            + c.comment_weight * self.normalize(engagement.comments)
            + c.view_weight * self.normalize(engagement.views);

        let hours = (now - created_at).num_seconds() as f64 / 3600.0;
        let decay = self.decay(hours.max(0.0));
        let heat = engagement_score * (1.0 - c.decay_weight * (1.0 - decay));

        heat.clamp(0.0, 1.0)
    }

    /// Classify a heat value against the alert thresholds.
    pub fn alert_level(&self, heat: f64) -> AlertLevel {
        let c = &self.config;
        if heat >= c.alert_high {
            AlertLevel::High
        } else if heat >= c.alert_medium {
            AlertLevel::Medium
        } else if heat >= c.alert_low {
            AlertLevel::Low
        } else {
            AlertLevel::Normal
        }
    }

    /// Score every post of an entity over the configured window and
    /// aggregate: totals, alert-band distribution, dense daily trend, top
    /// posts.
    pub fn analyze_entity(
        &self,
        entity_id: &str,
        posts: &[PostActivity],
        now: DateTime<Utc>,
    ) -> EntityHeatOutcome {
        let window_start = now - chrono::Duration::days(self.config.window_days);
        let in_window: Vec<&PostActivity> = posts
            .iter()
            .filter(|p| p.created_at >= window_start && p.created_at <= now)
            .collect();

        if in_window.is_empty() {
            return EntityHeatOutcome::InsufficientData {
                entity_id: entity_id.to_string(),
                reason: format!("no posts in the last {} days", self.config.window_days),
            };
        }

        let post_heats: Vec<PostHeat> = in_window
            .iter()
            .map(|p| PostHeat {
                post_id: p.post_id.clone(),
                heat: self.score_post(&p.engagement, p.created_at, now),
                created_at: p.created_at,
            })
            .collect();

        let total_heat: f64 = post_heats.iter().map(|p| p.heat).sum();
        let average_heat = total_heat / post_heats.len() as f64;

        let mut distribution = HeatDistribution::default();
        for post in &post_heats {
            if post.heat >= self.config.alert_high {
                distribution.high += 1;
            } else if post.heat >= self.config.alert_medium {
                distribution.medium += 1;
            } else {
                distribution.low += 1;
            }
        }

        let start = window_start.date_naive();
        let end = now.date_naive();
        let trend = trend::bucket_by_day(
            entity_id,
            &post_heats,
            start,
            end,
            |p| p.created_at,
            |p| p.heat,
        );

        let top_posts = trend::top_k(&post_heats, TOP_POSTS, |p| p.heat, |p| p.created_at)
            .into_iter()
            .cloned()
            .collect();

        EntityHeatOutcome::Scored(EntityHeatReport {
            entity_id: entity_id.to_string(),
            total_heat,
            average_heat,
            distribution,
            trend,
            top_posts,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::EngagementSnapshot;
    use chrono::TimeZone;

    fn scorer() -> HeatScorer {
        HeatScorer::default()
    }

    fn snapshot(likes: u64, reposts: u64, comments: u64, views: u64) -> EngagementSnapshot {
        EngagementSnapshot {
            post_id: "p1".to_string(),
            likes,
            reposts,
            comments,
            views,
            captured_at: Utc::now(),
        }
    }

    #[test]
    fn test_normalize_bounds_and_monotonicity() {
        let s = scorer();
        assert_eq!(s.normalize(0), 0.0);

        let mut prev = 0.0;
        for v in [1, 10, 100, 10_000, 1_000_000, u64::MAX / 2] {
            let n = s.normalize(v);
            assert!((0.0..=1.0).contains(&n));
            assert!(n >= prev);
            prev = n;
        }
    }

    #[test]
    fn test_decay_reference_points() {
        let s = scorer();
        assert!((s.decay(0.0) - 1.0).abs() < 1e-12);
        assert!((s.decay(24.0) - (-1.0f64).exp()).abs() < 1e-12);
        for h in [0.5, 12.0, 48.0, 240.0] {
            let d = s.decay(h);
            assert!(d > 0.0 && d <= 1.0);
        }
    }

    #[test]
    fn test_zero_engagement_scores_zero_at_any_age() {
        let s = scorer();
        let now = Utc::now();
        for hours in [0, 2, 24, 24 * 30] {
            let created = now - chrono::Duration::hours(hours);
            assert_eq!(s.score_post(&snapshot(0, 0, 0, 0), created, now), 0.0);
        }
    }

    #[test]
    fn test_reference_post_heat() {
        // likes=1000, reposts=500, comments=200, views=10000, age 2h.
        let s = scorer();
        let now = Utc.with_ymd_and_hms(2024, 5, 10, 12, 0, 0).unwrap();
        let created = now - chrono::Duration::hours(2);

        let heat = s.score_post(&snapshot(1000, 500, 200, 10_000), created, now);

        let expected = (0.3 * (1001.0f64.ln() / 10.0)
            + 0.3 * (501.0f64.ln() / 10.0)
            + 0.2 * (201.0f64.ln() / 10.0)
            + 0.1 * (10_001.0f64.ln() / 10.0))
            * (1.0 - 0.1 * (1.0 - (-2.0f64 / 24.0).exp()));
        assert!((heat - expected).abs() < 1e-9);
        assert!((0.0..=1.0).contains(&heat));
    }

    #[test]
    fn test_heat_always_clamped() {
        let s = scorer();
        let now = Utc::now();
        let heat = s.score_post(&snapshot(u64::MAX / 2, u64::MAX / 2, u64::MAX / 2, u64::MAX / 2), now, now);
        assert!(heat <= 1.0);
    }

    #[test]
    fn test_alert_levels() {
        let s = scorer();
        assert_eq!(s.alert_level(0.85), AlertLevel::High);
        assert_eq!(s.alert_level(0.6), AlertLevel::Medium);
        assert_eq!(s.alert_level(0.35), AlertLevel::Low);
        assert_eq!(s.alert_level(0.1), AlertLevel::Normal);
    }

    fn activity(post_id: &str, days_ago: i64, likes: u64) -> PostActivity {
        let created = Utc::now() - chrono::Duration::days(days_ago);
        PostActivity {
            post_id: post_id.to_string(),
            created_at: created,
            engagement: EngagementSnapshot {
                post_id: post_id.to_string(),
                likes,
                reposts: likes / 2,
                comments: likes / 5,
                views: likes * 10,
                captured_at: created,
            },
        }
    }

    #[test]
    fn test_entity_report() {
        let s = scorer();
        let posts = vec![
            activity("p1", 1, 1000),
            activity("p2", 2, 10),
            activity("p3", 3, 100_000),
        ];

        match s.analyze_entity("star-1", &posts, Utc::now()) {
            EntityHeatOutcome::Scored(report) => {
                assert_eq!(report.entity_id, "star-1");
                assert_eq!(report.top_posts.len(), 3);
                assert!(report.top_posts[0].heat >= report.top_posts[1].heat);
                assert!(report.average_heat > 0.0);
                assert_eq!(report.trend.len(), 8); // 7-day window, end inclusive
                let banded =
                    report.distribution.high + report.distribution.medium + report.distribution.low;
                assert_eq!(banded, 3);
            }
            EntityHeatOutcome::InsufficientData { .. } => panic!("expected a report"),
        }
    }

    #[test]
    fn test_entity_without_posts_is_insufficient_data() {
        let s = scorer();
        let outcome = s.analyze_entity("star-1", &[], Utc::now());
        assert!(matches!(outcome, EntityHeatOutcome::InsufficientData { .. }));

        // Posts outside the window count as no data too.
        let stale = vec![activity("p1", 30, 1000)];
        let outcome = s.analyze_entity("star-1", &stale, Utc::now());
        assert!(matches!(outcome, EntityHeatOutcome::InsufficientData { .. }));
    }
}
