//! Admissibility Filter Integration Tests
//!
//! Exercises the full precedence chain through the public API, with and
//! without a semantic encoder.

use async_trait::async_trait;
use starpulse::config::FilterConfig;
use starpulse::model::{ModelError, SemanticEncoder};
use starpulse::AdmissibilityFilter;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// Encoder returning a vector of constant norm.
struct FixedNormEncoder {
    norm: f32,
    calls: AtomicUsize,
}

impl FixedNormEncoder {
    fn new(norm: f32) -> Self {
        Self {
            norm,
            calls: AtomicUsize::new(0),
        }
    }
}

#[async_trait]
impl SemanticEncoder for FixedNormEncoder {
    async fn encode(&self, _text: &str) -> Result<Vec<f32>, ModelError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(vec![self.norm])
    }
}

/// Encoder that always fails.
struct DownEncoder;

#[async_trait]
impl SemanticEncoder for DownEncoder {
    async fn encode(&self, _text: &str) -> Result<Vec<f32>, ModelError> {
        Err(ModelError::Unavailable("backend gone".to_string()))
    }
}

#[tokio::test]
async fn test_boilerplate_rejected_before_anything_else() {
    // High-norm encoder would admit anything it sees; boilerplate must
    // never reach it.
    let encoder = Arc::new(FixedNormEncoder::new(5.0));
    let filter = AdmissibilityFilter::new(&FilterConfig::default(), encoder.clone());

    assert!(!filter.is_meaningful("转发微博").await);
    assert!(!filter.is_meaningful("//@someone: 好棒").await);
    assert!(!filter.is_meaningful("https://example.com/x").await);
    assert!(!filter.is_meaningful("   ").await);
    assert_eq!(encoder.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_expressive_shortcuts_skip_the_encoder() {
    let encoder = Arc::new(FixedNormEncoder::new(0.0));
    let filter = AdmissibilityFilter::new(&FilterConfig::default(), encoder.clone());

    // Symbol runs, numeric slang and abbreviations are admitted without a
    // model call even when the encoder would reject them.
    assert!(filter.is_meaningful("！！！").await);
    assert!(filter.is_meaningful("666666").await);
    assert!(filter.is_meaningful("awsl").await);
    assert_eq!(encoder.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_semantic_verdict_controls_ambiguous_text() {
    let admit = AdmissibilityFilter::new(
        &FilterConfig::default(),
        Arc::new(FixedNormEncoder::new(5.0)),
    );
    let reject = AdmissibilityFilter::new(
        &FilterConfig::default(),
        Arc::new(FixedNormEncoder::new(0.1)),
    );

    assert!(admit.is_meaningful("今天天气真好").await);
    assert!(!reject.is_meaningful("啊这这这").await);
}

#[tokio::test]
async fn test_encoder_failure_falls_back_to_lexical() {
    let filter = AdmissibilityFilter::new(&FilterConfig::default(), Arc::new(DownEncoder));

    // Two non-stopword tokens pass the lexical fallback.
    assert!(filter.is_meaningful("电影 好看").await);
    // A lone non-whitelisted letter does not.
    assert!(!filter.is_meaningful("x").await);
}

#[tokio::test]
async fn test_lexical_only_filter() {
    let filter = AdmissibilityFilter::lexical_only(&FilterConfig::default());

    assert!(filter.is_meaningful("剧情 不错").await);
    assert!(filter.is_meaningful("。").await);
    assert!(!filter.is_meaningful("x").await);
}

#[tokio::test]
async fn test_batch_short_circuits_on_full_cache_hit() {
    let encoder = Arc::new(FixedNormEncoder::new(5.0));
    let filter = AdmissibilityFilter::new(&FilterConfig::default(), encoder.clone());

    let texts = vec!["今天天气真好".to_string(), "666666".to_string()];
    let first = filter.is_meaningful_batch(&texts).await;
    assert_eq!(first.verdicts, vec![true, true]);
    assert_eq!(first.admitted, 2);
    let calls_after_first = encoder.calls.load(Ordering::SeqCst);

    // Second pass answers entirely from the verdict cache.
    let second = filter.is_meaningful_batch(&texts).await;
    assert_eq!(second.verdicts, first.verdicts);
    assert_eq!(encoder.calls.load(Ordering::SeqCst), calls_after_first);
}
