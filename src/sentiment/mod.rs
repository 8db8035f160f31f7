//! Sentiment classification wrapper.
//!
//! Wraps an injected three-class sentiment model. Per-fragment failures
//! degrade to a sentinel record (label `unknown`, confidence 0) and never
//! reach the caller as errors; a model that is down entirely is reported
//! once at component level via [`SentimentClassifier::health_check`].
//!
//! Input longer than the token budget is truncated, not rejected. That is a
//! silent accuracy loss inherited from the model's 512-token context; callers
//! that care can pre-chunk.

pub mod opinion;

use std::borrow::Cow;
use std::sync::Arc;

use tracing::warn;

use crate::cache::{content_key, ContentCache};
use crate::config::SentimentConfig;
use crate::domain::{SentimentLabel, SentimentRecord, SentimentScores, TextFragment};
use crate::model::{ModelError, SentimentModel};

/// Results of a batch classification.
///
/// Partial-failure semantics: records are produced for every well-formed
/// fragment, degraded ones included; malformed fragments are skipped and
/// counted rather than aborting the batch.
#[derive(Debug, Clone)]
pub struct ClassificationBatch {
    /// One record per well-formed input fragment, in input order
    pub records: Vec<SentimentRecord>,

    /// Fragments skipped for missing required fields
    pub skipped: usize,

    /// Records that are the degraded sentinel
    pub degraded: usize,
}

/// Stateless-except-for-cache classifier over a shared model handle.
pub struct SentimentClassifier {
    model: Arc<dyn SentimentModel>,
    cache: ContentCache<[f64; 3]>,
    max_tokens: usize,
}

impl SentimentClassifier {
    pub fn new(config: &SentimentConfig, model: Arc<dyn SentimentModel>) -> Self {
        Self {
            model,
            cache: ContentCache::new(config.cache_capacity),
            max_tokens: config.max_tokens,
        }
    }

    /// Probe the underlying model. A systemic failure here should be
    /// surfaced to the operator instead of silently producing a batch of
    /// sentinels.
    pub async fn health_check(&self) -> Result<(), ModelError> {
        self.model.health_check().await
    }

    /// Classify one fragment. Never fails: model errors produce the
    /// `unknown` sentinel and a warning.
    pub async fn classify(&self, fragment: &TextFragment) -> SentimentRecord {
        let text = truncate_tokens(&fragment.text, self.max_tokens);
        let key = content_key(&text);

        if let Some(scores) = self.cache.get(&key) {
            return record_from_scores(&fragment.id, scores);
        }

        match self.model.predict(&text).await {
            Ok(scores) => {
                self.cache.put(key, scores);
                record_from_scores(&fragment.id, scores)
            }
            Err(e) => {
                warn!(
                    fragment_id = %fragment.id,
                    model = self.model.name(),
                    error = %e,
                    "sentiment prediction failed, degrading to sentinel"
                );
                SentimentRecord::unknown(&fragment.id)
            }
        }
    }

    /// Classify a batch with partial-failure semantics.
    pub async fn classify_batch(&self, fragments: &[TextFragment]) -> ClassificationBatch {
        let mut records = Vec::with_capacity(fragments.len());
        let mut skipped = 0;

        for fragment in fragments {
            if !fragment.is_well_formed() {
                skipped += 1;
                continue;
            }
            records.push(self.classify(fragment).await);
        }

        let degraded = records.iter().filter(|r| r.is_degraded()).count();
        ClassificationBatch {
            records,
            skipped,
            degraded,
        }
    }
}

/// Build a record from one softmax distribution `[negative, neutral,
/// positive]`.
fn record_from_scores(fragment_id: &str, scores: [f64; 3]) -> SentimentRecord {
    let [negative, neutral, positive] = scores;
    let scores = SentimentScores {
        negative,
        neutral,
        positive,
    };

    let (label, confidence) = if negative >= neutral && negative >= positive {
        (SentimentLabel::Negative, negative)
    } else if positive > neutral {
        (SentimentLabel::Positive, positive)
    } else {
        (SentimentLabel::Neutral, neutral)
    };

    SentimentRecord {
        fragment_id: fragment_id.to_string(),
        label,
        confidence,
        strength: scores.strength().clamp(-1.0, 1.0),
        scores,
    }
}

/// Composite sentiment for a post: its own positive probability weighted
/// 0.4 against the mean of its comments' scores weighted 0.6. With no
/// comment scores the post probability stands alone.
pub fn combined_post_score(post_positive: f64, comment_scores: &[f64]) -> f64 {
    if comment_scores.is_empty() {
        return post_positive;
    }
    let comment_avg = comment_scores.iter().sum::<f64>() / comment_scores.len() as f64;
    0.4 * post_positive + 0.6 * comment_avg
}

/// Approximate-token truncation: a CJK character or an ASCII word counts as
/// one token, mirroring how the upstream tokenizer segments mixed text.
fn truncate_tokens(text: &str, max_tokens: usize) -> Cow<'_, str> {
    let mut tokens = 0;
    let mut in_word = false;
    for (i, c) in text.char_indices() {
        if c.is_ascii_alphanumeric() {
            if !in_word {
                tokens += 1;
                in_word = true;
            }
        } else {
            in_word = false;
            if !c.is_whitespace() {
                tokens += 1;
            }
        }
        if tokens > max_tokens {
            return Cow::Owned(text[..i].to_string());
        }
    }
    Cow::Borrowed(text)
}
