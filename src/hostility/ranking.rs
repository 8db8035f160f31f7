//! Aggregate profiling of hostile-author populations.
//!
//! Takes the per-author records produced by the detector and rolls them up
//! into the views a monitoring report needs: score statistics and bands,
//! activity levels, a ranked worst-offenders list, a daily trend of hostile
//! authors, demographic breakdowns where author metadata is available, and
//! a recency-weighted risk summary.

use std::collections::HashMap;

use chrono::{DateTime, Datelike, NaiveDate, Timelike, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::{AuthorMeta, HostilityRecord};

/// How many authors the ranked list carries.
const TOP_AUTHORS: usize = 20;

/// Histogram bin upper bounds for comment counts; the last bin is open.
const ACTIVITY_BINS: [usize; 4] = [10, 20, 50, 100];

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoreStats {
    pub mean: f64,
    pub median: f64,
    pub max: f64,
    pub min: f64,
}

/// Counts of authors per score band.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoreDistribution {
    /// score >= 0.8
    pub high: usize,
    /// 0.5 <= score < 0.8
    pub medium: usize,
    /// score < 0.5
    pub low: usize,
}

/// Counts of authors per activity level, bucketed on comment count.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActivityLevels {
    /// 50 or more comments
    pub very_active: usize,
    /// 20 to 49 comments
    pub active: usize,
    /// fewer than 20 comments
    pub inactive: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActivitySummary {
    pub levels: ActivityLevels,
    pub total_comments: usize,
    pub average_comments: f64,
    pub max_comments: usize,
    /// Author counts per comment-count bin: [0,10), [10,20), [20,50),
    /// [50,100), [100,∞)
    pub histogram: [usize; 5],
}

/// Hostile authors last active on a given day.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DailyHostileCount {
    pub date: NaiveDate,
    pub count: usize,
}

/// Breakdowns keyed on whatever metadata is present; authors without a
/// field fall under "unknown".
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DemographicBreakdown {
    pub gender: HashMap<String, usize>,
    pub location: HashMap<String, usize>,
    /// Last-active counts by hour of day (UTC)
    pub hours: [usize; 24],
    /// Last-active counts by weekday, Monday first
    pub weekdays: [usize; 7],
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RiskSummary {
    /// risk >= 0.8
    pub high: usize,
    /// 0.5 <= risk < 0.8
    pub medium: usize,
    /// risk < 0.5
    pub low: usize,
    pub average_risk: f64,
}

/// The full population report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HostilityProfile {
    pub author_count: usize,
    pub hostile_count: usize,
    pub scores: ScoreStats,
    pub score_distribution: ScoreDistribution,
    pub activity: ActivitySummary,
    /// Worst offenders, highest score first
    pub top_authors: Vec<HostilityRecord>,
    /// Hostile authors per last-active day, ascending
    pub trend: Vec<DailyHostileCount>,
    pub demographics: DemographicBreakdown,
    pub risk: RiskSummary,
}

/// Composite risk for one author: the score itself (0.4), how much they
/// comment (0.3, saturating at 100 comments), and how recently they were
/// active (0.3, decaying as the inverse of days since last activity).
pub fn risk_score(record: &HostilityRecord, now: DateTime<Utc>) -> f64 {
    let volume_term = (record.comment_count as f64 / 100.0).min(1.0);
    let days_inactive = (now - record.last_active).num_days().max(1) as f64;
    let recency_term = (1.0 / days_inactive).min(1.0);
    0.4 * record.score + 0.3 * volume_term + 0.3 * recency_term
}

/// Build the population profile. Returns `None` for an empty record set.
///
/// `meta` maps author id to known metadata; it may be sparse or empty.
pub fn profile(
    records: &[HostilityRecord],
    meta: &HashMap<String, AuthorMeta>,
    now: DateTime<Utc>,
) -> Option<HostilityProfile> {
    if records.is_empty() {
        return None;
    }

    let mut sorted_scores: Vec<f64> = records.iter().map(|r| r.score).collect();
    sorted_scores.sort_by(|a, b| a.total_cmp(b));
    let scores = ScoreStats {
        mean: sorted_scores.iter().sum::<f64>() / sorted_scores.len() as f64,
        median: sorted_scores[sorted_scores.len() / 2],
        max: *sorted_scores.last().unwrap(),
        min: sorted_scores[0],
    };

    let mut score_distribution = ScoreDistribution {
        high: 0,
        medium: 0,
        low: 0,
    };
    for r in records {
        if r.score >= 0.8 {
            score_distribution.high += 1;
        } else if r.score >= 0.5 {
            score_distribution.medium += 1;
        } else {
            score_distribution.low += 1;
        }
    }

    let mut levels = ActivityLevels {
        very_active: 0,
        active: 0,
        inactive: 0,
    };
    let mut histogram = [0usize; 5];
    let mut total_comments = 0usize;
    let mut max_comments = 0usize;
    for r in records {
        total_comments += r.comment_count;
        max_comments = max_comments.max(r.comment_count);
        if r.comment_count >= 50 {
            levels.very_active += 1;
        } else if r.comment_count >= 20 {
            levels.active += 1;
        } else {
            levels.inactive += 1;
        }
        let bin = ACTIVITY_BINS
            .iter()
            .position(|&upper| r.comment_count < upper)
            .unwrap_or(ACTIVITY_BINS.len());
        histogram[bin] += 1;
    }
    let activity = ActivitySummary {
        levels,
        total_comments,
        average_comments: total_comments as f64 / records.len() as f64,
        max_comments,
        histogram,
    };

    let mut top_authors: Vec<HostilityRecord> = records.to_vec();
    top_authors.sort_by(|a, b| {
        b.score
            .total_cmp(&a.score)
            .then(b.comment_count.cmp(&a.comment_count))
    });
    top_authors.truncate(TOP_AUTHORS);

    let mut by_day: HashMap<NaiveDate, usize> = HashMap::new();
    let hostile_count = records.iter().filter(|r| r.is_hostile).count();
    for r in records.iter().filter(|r| r.is_hostile) {
        *by_day.entry(r.last_active.date_naive()).or_default() += 1;
    }
    let mut trend: Vec<DailyHostileCount> = by_day
        .into_iter()
        .map(|(date, count)| DailyHostileCount { date, count })
        .collect();
    trend.sort_by_key(|d| d.date);

    let mut demographics = DemographicBreakdown::default();
    for r in records {
        let author = meta.get(&r.author_id);
        let gender = author
            .and_then(|m| m.gender.clone())
            .unwrap_or_else(|| "unknown".to_string());
        *demographics.gender.entry(gender).or_default() += 1;
        let location = author
            .and_then(|m| m.location.clone())
            .unwrap_or_else(|| "unknown".to_string());
        *demographics.location.entry(location).or_default() += 1;
        demographics.hours[r.last_active.hour() as usize] += 1;
        demographics.weekdays[r.last_active.weekday().num_days_from_monday() as usize] += 1;
    }

    let mut risk = RiskSummary {
        high: 0,
        medium: 0,
        low: 0,
        average_risk: 0.0,
    };
    let mut risk_total = 0.0;
    for r in records {
        let value = risk_score(r, now);
        risk_total += value;
        if value >= 0.8 {
            risk.high += 1;
        } else if value >= 0.5 {
            risk.medium += 1;
        } else {
            risk.low += 1;
        }
    }
    risk.average_risk = risk_total / records.len() as f64;

    Some(HostilityProfile {
        author_count: records.len(),
        hostile_count,
        scores,
        score_distribution,
        activity,
        top_authors,
        trend,
        demographics,
        risk,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::HostilityMetrics;
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 10, 12, 0, 0).unwrap()
    }

    fn record(author: &str, score: f64, comments: usize, days_ago: i64) -> HostilityRecord {
        HostilityRecord {
            author_id: author.to_string(),
            entity_id: "e1".to_string(),
            score,
            metrics: HostilityMetrics {
                negative_ratio: score,
                avg_strength: -0.5,
                comment_frequency: 1.0,
            },
            is_hostile: score >= 0.7,
            last_active: now() - chrono::Duration::days(days_ago),
            comment_count: comments,
        }
    }

    #[test]
    fn test_empty_population_yields_no_profile() {
        assert!(profile(&[], &HashMap::new(), now()).is_none());
    }

    #[test]
    fn test_score_bands_and_stats() {
        let records = vec![
            record("u1", 0.9, 5, 1),
            record("u2", 0.6, 5, 1),
            record("u3", 0.2, 5, 1),
        ];
        let p = profile(&records, &HashMap::new(), now()).unwrap();

        assert_eq!(p.author_count, 3);
        assert_eq!(p.score_distribution.high, 1);
        assert_eq!(p.score_distribution.medium, 1);
        assert_eq!(p.score_distribution.low, 1);
        assert!((p.scores.max - 0.9).abs() < 1e-12);
        assert!((p.scores.min - 0.2).abs() < 1e-12);
        assert!((p.scores.median - 0.6).abs() < 1e-12);
    }

    #[test]
    fn test_activity_levels_and_histogram() {
        let records = vec![
            record("u1", 0.5, 5, 1),
            record("u2", 0.5, 25, 1),
            record("u3", 0.5, 120, 1),
        ];
        let p = profile(&records, &HashMap::new(), now()).unwrap();

        assert_eq!(p.activity.levels.inactive, 1);
        assert_eq!(p.activity.levels.active, 1);
        assert_eq!(p.activity.levels.very_active, 1);
        assert_eq!(p.activity.histogram, [1, 0, 1, 0, 1]);
        assert_eq!(p.activity.total_comments, 150);
        assert_eq!(p.activity.max_comments, 120);
    }

    #[test]
    fn test_top_authors_ranked_by_score_then_volume() {
        let records = vec![
            record("u1", 0.6, 10, 1),
            record("u2", 0.9, 3, 1),
            record("u3", 0.6, 40, 1),
        ];
        let p = profile(&records, &HashMap::new(), now()).unwrap();

        let ids: Vec<&str> = p.top_authors.iter().map(|r| r.author_id.as_str()).collect();
        assert_eq!(ids, vec!["u2", "u3", "u1"]);
    }

    #[test]
    fn test_trend_counts_hostile_authors_per_day() {
        let records = vec![
            record("u1", 0.9, 5, 2),
            record("u2", 0.8, 5, 2),
            record("u3", 0.9, 5, 0),
            record("u4", 0.1, 5, 2),
        ];
        let p = profile(&records, &HashMap::new(), now()).unwrap();

        assert_eq!(p.hostile_count, 3);
        assert_eq!(p.trend.len(), 2);
        assert_eq!(p.trend[0].date, (now() - chrono::Duration::days(2)).date_naive());
        assert_eq!(p.trend[0].count, 2);
        assert_eq!(p.trend[1].count, 1);
    }

    #[test]
    fn test_demographics_fall_back_to_unknown() {
        let mut meta = HashMap::new();
        meta.insert(
            "u1".to_string(),
            AuthorMeta {
                author_id: "u1".to_string(),
                nickname: Some("a".to_string()),
                gender: Some("f".to_string()),
                location: None,
            },
        );
        let records = vec![record("u1", 0.9, 5, 1), record("u2", 0.8, 5, 1)];
        let p = profile(&records, &meta, now()).unwrap();

        assert_eq!(p.demographics.gender.get("f"), Some(&1));
        assert_eq!(p.demographics.gender.get("unknown"), Some(&1));
        assert_eq!(p.demographics.location.get("unknown"), Some(&2));
    }

    #[test]
    fn test_risk_rewards_recent_high_volume_authors() {
        let fresh = record("u1", 0.9, 200, 0);
        let stale = record("u2", 0.9, 200, 30);

        let fresh_risk = risk_score(&fresh, now());
        let stale_risk = risk_score(&stale, now());

        // 0.4*0.9 + 0.3*1.0 + 0.3*1.0
        assert!((fresh_risk - 0.96).abs() < 1e-9);
        assert!(fresh_risk > stale_risk);
    }
}
