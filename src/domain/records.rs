//! Derived output records.
//!
//! Each record is flat (numbers + strings) so the external storage and
//! reporting collaborators can persist or render it without further mapping.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Three-way sentiment label plus the degraded sentinel.
///
/// `Unknown` marks a record produced while the model was unavailable; it is
/// deliberately distinct from `Neutral` so reporting can tell a degraded
/// result from a confident one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SentimentLabel {
    Negative,
    Neutral,
    Positive,
    Unknown,
}

/// Per-label probabilities from one softmax pass. Sum to 1 (±ε) for any
/// non-degraded record.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SentimentScores {
    pub negative: f64,
    pub neutral: f64,
    pub positive: f64,
}

impl SentimentScores {
    /// Signed polarity in [-1, 1], positive mass against negative mass.
    pub fn strength(&self) -> f64 {
        (self.positive - self.negative) / (self.positive + self.negative + 1e-6)
    }
}

/// Sentiment classification of one fragment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SentimentRecord {
    /// Fragment this record classifies
    pub fragment_id: String,

    /// Arg-max label
    pub label: SentimentLabel,

    /// Arg-max probability in [0, 1]
    pub confidence: f64,

    /// Signed polarity strength in [-1, 1]
    pub strength: f64,

    /// Full per-label distribution
    pub scores: SentimentScores,
}

impl SentimentRecord {
    /// Sentinel record returned when the model cannot produce a prediction.
    pub fn unknown(fragment_id: impl Into<String>) -> Self {
        Self {
            fragment_id: fragment_id.into(),
            label: SentimentLabel::Unknown,
            confidence: 0.0,
            strength: 0.0,
            scores: SentimentScores {
                negative: 0.0,
                neutral: 0.0,
                positive: 0.0,
            },
        }
    }

    /// True if this record is the degraded sentinel rather than a real
    /// prediction.
    pub fn is_degraded(&self) -> bool {
        self.label == SentimentLabel::Unknown
    }
}

/// Bounded [0, 1] virality score for a post or entity on one day.
///
/// Derived data, recomputed on demand.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HeatRecord {
    /// Post or entity identifier
    pub subject_id: String,

    /// Calendar day the value belongs to
    pub date: NaiveDate,

    /// Heat value, always clamped to [0, 1]
    pub heat: f64,

    /// Change vs the previous period, if one exists
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delta: Option<f64>,
}

/// Supporting metrics behind a hostility score.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct HostilityMetrics {
    /// Fraction of comments labeled negative, in [0, 1]
    pub negative_ratio: f64,

    /// Mean signed strength across all comments in the window
    pub avg_strength: f64,

    /// Comments per hour over the first-to-last span in the window
    pub comment_frequency: f64,
}

/// Composite hostility evaluation for one author against one entity.
///
/// Superseded, not appended, on re-evaluation of the same author+entity pair.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HostilityRecord {
    /// Commenter being evaluated
    pub author_id: String,

    /// Entity the comments target
    pub entity_id: String,

    /// Composite score in [0, 1+]
    pub score: f64,

    /// Metrics the score was computed from
    pub metrics: HostilityMetrics,

    /// True iff score >= the configured threshold
    pub is_hostile: bool,

    /// Timestamp of the author's most recent comment in the window
    pub last_active: DateTime<Utc>,

    /// Number of comments evaluated
    pub comment_count: usize,
}

/// Daily aggregate for trend charts. Days with no contributing records are
/// emitted with value 0 and count 0, never omitted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendBucket {
    /// Entity the series belongs to
    pub entity_id: String,

    /// Calendar day
    pub date: NaiveDate,

    /// Mean of the contributing values (heat or sentiment strength)
    pub value: f64,

    /// Number of records that contributed
    pub count: usize,
}
