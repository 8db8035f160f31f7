//! Hostile-commenter ("black fan") detection.
//!
//! Evaluates one author's sentiment-classified comment history against one
//! entity inside a time window and reduces it to a composite score plus a
//! verdict. Below the minimum-comment floor the outcome is explicitly
//! "insufficient data" — a distinct thing from "evaluated and found
//! non-hostile", and reporting must be able to tell them apart.
//!
//! Two composite formulations exist in the analyzed behavior; they are kept
//! as named variants of [`HostilityFormula`] rather than silently merged.
//! `Nested` is the authoritative one for conformance.

pub mod ranking;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::config::HostilityConfig;
use crate::domain::{HostilityMetrics, HostilityRecord, SentimentLabel, SentimentRecord};

/// One already-classified comment, the detector's input unit.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommentSentiment {
    /// Comment identifier
    pub comment_id: String,

    /// Sentiment label from classification
    pub label: SentimentLabel,

    /// Signed polarity strength in [-1, 1]
    pub strength: f64,

    /// When the comment was posted
    pub created_at: DateTime<Utc>,
}

impl CommentSentiment {
    /// Pair a sentiment record with its comment timestamp.
    pub fn from_record(record: &SentimentRecord, created_at: DateTime<Utc>) -> Self {
        Self {
            comment_id: record.fragment_id.clone(),
            label: record.label,
            strength: record.strength,
            created_at,
        }
    }
}

/// Composite score formulation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HostilityFormula {
    /// `negative_ratio × (0.4 + 0.3·strength_term + 0.3·frequency_term)`.
    /// The ratio gates everything: an author with no negative comments
    /// scores 0 no matter how frequent or intense.
    #[default]
    Nested,

    /// `0.4·negative_ratio + 0.3·strength_term + 0.3·frequency_term`.
    /// Earlier flat weighting where intensity and frequency contribute even
    /// at zero negative ratio.
    FlatWeighted,
}

/// Evaluation outcome. `InsufficientData` carries an explicit reason so it
/// can never be mistaken for a confident low score.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum HostilityOutcome {
    Scored(HostilityRecord),
    InsufficientData {
        author_id: String,
        entity_id: String,
        reason: String,
    },
}

impl HostilityOutcome {
    /// The record, if this outcome produced one.
    pub fn record(&self) -> Option<&HostilityRecord> {
        match self {
            Self::Scored(record) => Some(record),
            Self::InsufficientData { .. } => None,
        }
    }
}

/// Per-author, per-entity hostility evaluator.
#[derive(Debug, Clone, Default)]
pub struct HostilityDetector {
    config: HostilityConfig,
}

impl HostilityDetector {
    pub fn new(config: HostilityConfig) -> Self {
        Self { config }
    }

    /// Evaluate one author's comments against one entity.
    ///
    /// The caller supplies only that author's comments toward that entity;
    /// time filtering to the window and chronological ordering happen here,
    /// so callers may pass comments in any order.
    pub fn evaluate(
        &self,
        author_id: &str,
        entity_id: &str,
        comments: &[CommentSentiment],
        now: DateTime<Utc>,
    ) -> HostilityOutcome {
        let window_start = now - chrono::Duration::days(self.config.window_days);
        let mut recent: Vec<&CommentSentiment> = comments
            .iter()
            .filter(|c| c.created_at >= window_start && c.created_at <= now)
            .collect();

        if recent.is_empty() {
            return HostilityOutcome::InsufficientData {
                author_id: author_id.to_string(),
                entity_id: entity_id.to_string(),
                reason: format!("no comments in the last {} days", self.config.window_days),
            };
        }
        if recent.len() < self.config.min_comments {
            return HostilityOutcome::InsufficientData {
                author_id: author_id.to_string(),
                entity_id: entity_id.to_string(),
                reason: format!(
                    "fewer than {} comments in window ({} found)",
                    self.config.min_comments,
                    recent.len()
                ),
            };
        }

        // Chronological order before any first/last span math.
        recent.sort_by_key(|c| c.created_at);

        let count = recent.len();
        let negative = recent
            .iter()
            .filter(|c| c.label == SentimentLabel::Negative)
            .count();
        let negative_ratio = negative as f64 / count as f64;
        let avg_strength = recent.iter().map(|c| c.strength).sum::<f64>() / count as f64;

        let span_hours = (recent[count - 1].created_at - recent[0].created_at).num_seconds()
            as f64
            / 3600.0;
        let comment_frequency = if span_hours > 0.0 {
            count as f64 / span_hours
        } else {
            // All comments in the same instant: treat the count itself as
            // the frequency rather than dividing by zero.
            count as f64
        };

        let metrics = HostilityMetrics {
            negative_ratio,
            avg_strength,
            comment_frequency,
        };
        let score = self.composite_score(&metrics);

        HostilityOutcome::Scored(HostilityRecord {
            author_id: author_id.to_string(),
            entity_id: entity_id.to_string(),
            score,
            metrics,
            is_hostile: score >= self.config.threshold,
            last_active: recent[count - 1].created_at,
            comment_count: count,
        })
    }

    /// Apply the configured formula to the metrics.
    pub fn composite_score(&self, metrics: &HostilityMetrics) -> f64 {
        // Map avg strength [-1, 1] onto a negativity weight [0, 1]:
        // fully negative sentiment contributes the whole 0.3 term.
        let strength_term = 1.0 - (metrics.avg_strength + 1.0) / 2.0;
        let frequency_term = (metrics.comment_frequency / 10.0).min(1.0);

        match self.config.formula {
            HostilityFormula::Nested => {
                metrics.negative_ratio * (0.4 + 0.3 * strength_term + 0.3 * frequency_term)
            }
            HostilityFormula::FlatWeighted => {
                0.4 * metrics.negative_ratio + 0.3 * strength_term + 0.3 * frequency_term
            }
        }
    }
}
