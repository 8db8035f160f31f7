//! Admissibility filtering of cleaned text fragments.
//!
//! Decides whether a fragment carries enough meaning to be worth
//! classifying. Checks run in a fixed precedence order, first match wins:
//!
//! 1. Boilerplate patterns (repost marker, quoted forward, bare URL) reject.
//! 2. Empty after trimming rejects.
//! 3. Expressive symbol runs, meaningful numbers, and whitelisted
//!    abbreviations accept.
//! 4. A single character not on any whitelist rejects.
//! 5. The semantic encoder decides: admissible if the L2 norm of the pooled
//!    first-token embedding exceeds the configured threshold.
//! 6. Without an encoder (or when it fails) a lexical heuristic decides.
//!
//! Two content-addressed caches back the filter: one for the semantic
//! verdict, one for the final combined verdict. A batch where every fragment
//! hits the verdict cache short-circuits without touching the encoder.

pub mod patterns;

use std::sync::Arc;

use tracing::warn;

use crate::cache::{content_key, ContentCache};
use crate::config::FilterConfig;
use crate::model::{l2_norm, SemanticEncoder};

/// Batch filter verdicts plus how many inputs were admissible.
#[derive(Debug, Clone)]
pub struct FilterBatch {
    /// Per-input verdict, in input order
    pub verdicts: Vec<bool>,

    /// Count of admissible inputs
    pub admitted: usize,
}

/// The admissibility filter.
///
/// Safe to share across concurrent callers; the caches tolerate racing
/// writers because verdicts are deterministic per input.
pub struct AdmissibilityFilter {
    encoder: Option<Arc<dyn SemanticEncoder>>,
    semantic_cache: ContentCache<bool>,
    verdict_cache: ContentCache<bool>,
    norm_threshold: f64,
}

impl AdmissibilityFilter {
    /// Create a filter with a semantic encoder backing step 5.
    pub fn new(config: &FilterConfig, encoder: Arc<dyn SemanticEncoder>) -> Self {
        Self {
            encoder: Some(encoder),
            semantic_cache: ContentCache::new(config.cache_capacity),
            verdict_cache: ContentCache::new(config.cache_capacity),
            norm_threshold: config.norm_threshold,
        }
    }

    /// Create a filter that relies on the lexical heuristic alone.
    pub fn lexical_only(config: &FilterConfig) -> Self {
        Self {
            encoder: None,
            semantic_cache: ContentCache::new(config.cache_capacity),
            verdict_cache: ContentCache::new(config.cache_capacity),
            norm_threshold: config.norm_threshold,
        }
    }

    /// Judge one fragment.
    pub async fn is_meaningful(&self, text: &str) -> bool {
        let key = content_key(text);
        if let Some(verdict) = self.verdict_cache.get(&key) {
            return verdict;
        }

        let verdict = self.judge(text).await;
        self.verdict_cache.put(key, verdict);
        verdict
    }

    /// Judge a batch, short-circuiting entirely when every input is already
    /// in the verdict cache.
    pub async fn is_meaningful_batch(&self, texts: &[String]) -> FilterBatch {
        let mut verdicts: Vec<Option<bool>> = texts
            .iter()
            .map(|t| self.verdict_cache.get(&content_key(t)))
            .collect();

        if verdicts.iter().any(Option::is_none) {
            for (i, text) in texts.iter().enumerate() {
                if verdicts[i].is_none() {
                    let verdict = self.judge(text).await;
                    self.verdict_cache.put(content_key(text), verdict);
                    verdicts[i] = Some(verdict);
                }
            }
        }

        let verdicts: Vec<bool> = verdicts.into_iter().map(|v| v.unwrap_or(false)).collect();
        let admitted = verdicts.iter().filter(|&&v| v).count();
        FilterBatch { verdicts, admitted }
    }

    async fn judge(&self, text: &str) -> bool {
        if patterns::is_boilerplate(text) {
            return false;
        }

        let trimmed = text.trim();
        if trimmed.is_empty() {
            return false;
        }

        if patterns::has_expressive_symbol_run(trimmed)
            || patterns::has_meaningful_number(trimmed)
            || patterns::has_meaningful_abbreviation(trimmed)
        {
            return true;
        }

        let mut chars = trimmed.chars();
        if let (Some(only), None) = (chars.next(), chars.next()) {
            return patterns::is_whitelisted_single_char(only);
        }

        match self.semantic_verdict(trimmed).await {
            Some(verdict) => verdict,
            None => patterns::is_meaningful_lexical(trimmed),
        }
    }

    /// Semantic branch; `None` means unavailable and the caller must fall
    /// back to the lexical heuristic.
    async fn semantic_verdict(&self, text: &str) -> Option<bool> {
        let encoder = self.encoder.as_ref()?;

        let key = content_key(text);
        if let Some(verdict) = self.semantic_cache.get(&key) {
            return Some(verdict);
        }

        match encoder.encode(text).await {
            Ok(embedding) => {
                let verdict = l2_norm(&embedding) > self.norm_threshold;
                self.semantic_cache.put(key, verdict);
                Some(verdict)
            }
            Err(e) => {
                warn!(error = %e, "semantic encoder failed, using lexical fallback");
                None
            }
        }
    }
}
