//! Public-opinion summarization over a classified comment set.
//!
//! Reduces the comments aimed at one entity to a report: how sentiment is
//! distributed, how strongly it leans, how it moves day by day, which
//! comments anchor each pole, and what share of active commenters the
//! hostility detector flags.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::{SentimentLabel, TrendBucket};
use crate::hostility::{CommentSentiment, HostilityDetector};
use crate::trend;

/// How many comments each pole of the report keeps.
const TOP_COMMENTS: usize = 5;

/// A classified comment with enough context to attribute and display it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OpinionComment {
    pub comment_id: String,
    pub author_id: String,
    pub text: String,
    pub label: SentimentLabel,
    /// Signed polarity strength in [-1, 1]
    pub strength: f64,
    pub created_at: DateTime<Utc>,
}

/// Fractions of the comment set per label. `unknown` absorbs degraded
/// records so the named fractions stay honest.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SentimentDistribution {
    pub positive: f64,
    pub neutral: f64,
    pub negative: f64,
    pub unknown: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OpinionSummary {
    pub entity_id: String,
    pub comment_count: usize,
    pub distribution: SentimentDistribution,
    /// Mean signed strength across all comments
    pub mean_strength: f64,
    /// Mean strength per calendar day over the comment span, dense
    pub strength_trend: Vec<TrendBucket>,
    pub top_positive: Vec<OpinionComment>,
    pub top_negative: Vec<OpinionComment>,
    /// Authors with enough comments to evaluate
    pub evaluated_authors: usize,
    /// Evaluated authors the detector flagged
    pub hostile_authors: usize,
    /// hostile_authors / evaluated_authors, 0 when none could be evaluated
    pub hostile_author_ratio: f64,
}

/// Summarize the comments aimed at `entity_id`. Returns `None` for an empty
/// comment set.
pub fn summarize(
    entity_id: &str,
    comments: &[OpinionComment],
    detector: &HostilityDetector,
    now: DateTime<Utc>,
) -> Option<OpinionSummary> {
    if comments.is_empty() {
        return None;
    }

    let count = comments.len() as f64;
    let fraction = |label: SentimentLabel| {
        comments.iter().filter(|c| c.label == label).count() as f64 / count
    };
    let distribution = SentimentDistribution {
        positive: fraction(SentimentLabel::Positive),
        neutral: fraction(SentimentLabel::Neutral),
        negative: fraction(SentimentLabel::Negative),
        unknown: fraction(SentimentLabel::Unknown),
    };

    let mean_strength = comments.iter().map(|c| c.strength).sum::<f64>() / count;

    let start = comments
        .iter()
        .map(|c| c.created_at.date_naive())
        .min()
        .unwrap();
    let end = comments
        .iter()
        .map(|c| c.created_at.date_naive())
        .max()
        .unwrap();
    let strength_trend = trend::bucket_by_day(
        entity_id,
        comments,
        start,
        end,
        |c| c.created_at,
        |c| c.strength,
    );

    let top_positive: Vec<OpinionComment> =
        trend::top_k(comments, TOP_COMMENTS, |c| c.strength, |c| c.created_at)
            .into_iter()
            .filter(|c| c.strength > 0.0)
            .cloned()
            .collect();
    let top_negative: Vec<OpinionComment> =
        trend::top_k(comments, TOP_COMMENTS, |c| -c.strength, |c| c.created_at)
            .into_iter()
            .filter(|c| c.strength < 0.0)
            .cloned()
            .collect();

    let mut by_author: HashMap<&str, Vec<CommentSentiment>> = HashMap::new();
    for c in comments {
        by_author
            .entry(c.author_id.as_str())
            .or_default()
            .push(CommentSentiment {
                comment_id: c.comment_id.clone(),
                label: c.label,
                strength: c.strength,
                created_at: c.created_at,
            });
    }
    let mut evaluated_authors = 0usize;
    let mut hostile_authors = 0usize;
    for (author_id, author_comments) in &by_author {
        if let Some(record) = detector
            .evaluate(author_id, entity_id, author_comments, now)
            .record()
        {
            evaluated_authors += 1;
            if record.is_hostile {
                hostile_authors += 1;
            }
        }
    }
    let hostile_author_ratio = if evaluated_authors > 0 {
        hostile_authors as f64 / evaluated_authors as f64
    } else {
        0.0
    };

    Some(OpinionSummary {
        entity_id: entity_id.to_string(),
        comment_count: comments.len(),
        distribution,
        mean_strength,
        strength_trend,
        top_positive,
        top_negative,
        evaluated_authors,
        hostile_authors,
        hostile_author_ratio,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 10, 12, 0, 0).unwrap()
    }

    fn comment(
        id: &str,
        author: &str,
        label: SentimentLabel,
        strength: f64,
        hours_ago: i64,
    ) -> OpinionComment {
        OpinionComment {
            comment_id: id.to_string(),
            author_id: author.to_string(),
            text: format!("comment {id}"),
            label,
            strength,
            created_at: now() - chrono::Duration::hours(hours_ago),
        }
    }

    #[test]
    fn test_empty_comment_set_yields_no_summary() {
        let detector = HostilityDetector::default();
        assert!(summarize("e1", &[], &detector, now()).is_none());
    }

    #[test]
    fn test_distribution_and_mean_strength() {
        let comments = vec![
            comment("c1", "u1", SentimentLabel::Positive, 0.8, 1),
            comment("c2", "u2", SentimentLabel::Negative, -0.6, 2),
            comment("c3", "u3", SentimentLabel::Neutral, 0.0, 3),
            comment("c4", "u4", SentimentLabel::Positive, 0.4, 4),
        ];
        let summary = summarize("e1", &comments, &HostilityDetector::default(), now()).unwrap();

        assert_eq!(summary.comment_count, 4);
        assert!((summary.distribution.positive - 0.5).abs() < 1e-12);
        assert!((summary.distribution.negative - 0.25).abs() < 1e-12);
        assert!((summary.distribution.neutral - 0.25).abs() < 1e-12);
        assert!((summary.mean_strength - 0.15).abs() < 1e-12);
    }

    #[test]
    fn test_top_comments_exclude_wrong_pole() {
        // Every comment is negative; the positive pole must come back empty
        // rather than carrying the least-negative comments.
        let comments = vec![
            comment("c1", "u1", SentimentLabel::Negative, -0.9, 1),
            comment("c2", "u2", SentimentLabel::Negative, -0.3, 2),
        ];
        let summary = summarize("e1", &comments, &HostilityDetector::default(), now()).unwrap();

        assert!(summary.top_positive.is_empty());
        assert_eq!(summary.top_negative.len(), 2);
        assert_eq!(summary.top_negative[0].comment_id, "c1");
    }

    #[test]
    fn test_hostile_author_ratio() {
        // u1: three intensely negative comments inside an hour, flagged.
        // u2: three positive comments, evaluated but not flagged.
        // u3: one comment, below the evaluation floor.
        let mut comments = vec![comment("c7", "u3", SentimentLabel::Neutral, 0.0, 1)];
        for i in 0..3 {
            comments.push(OpinionComment {
                comment_id: format!("n{i}"),
                author_id: "u1".to_string(),
                text: "bad".to_string(),
                label: SentimentLabel::Negative,
                strength: -0.9,
                created_at: now() - chrono::Duration::minutes(i * 10),
            });
            comments.push(comment(&format!("p{i}"), "u2", SentimentLabel::Positive, 0.8, i * 5));
        }
        let summary = summarize("e1", &comments, &HostilityDetector::default(), now()).unwrap();

        assert_eq!(summary.evaluated_authors, 2);
        assert_eq!(summary.hostile_authors, 1);
        assert!((summary.hostile_author_ratio - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_strength_trend_spans_comment_dates() {
        let comments = vec![
            comment("c1", "u1", SentimentLabel::Positive, 0.5, 0),
            comment("c2", "u2", SentimentLabel::Negative, -0.5, 48),
        ];
        let summary = summarize("e1", &comments, &HostilityDetector::default(), now()).unwrap();

        assert_eq!(summary.strength_trend.len(), 3);
        assert!((summary.strength_trend[0].value + 0.5).abs() < 1e-12);
        assert_eq!(summary.strength_trend[1].count, 0);
        assert!((summary.strength_trend[2].value - 0.5).abs() < 1e-12);
    }
}
