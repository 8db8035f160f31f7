//! Inference seams for the pretrained language models.
//!
//! The core never loads, downloads or owns model weights. Callers inject
//! ready-to-use handles behind these traits; acquisition (ensure the weights
//! are present, then load them) happens behind [`ModelProvider`] outside this
//! crate's concerns. Inference may block on GPU/CPU compute, so every call is
//! async and handles must be shareable across concurrent callers — an
//! implementation that cannot run concurrent inference must serialize access
//! internally.

use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

/// Model-layer failures.
///
/// `Unavailable` is systemic (weights failed to load or the backend is gone)
/// and is surfaced to callers at component level. `Inference` is per-item and
/// is isolated: one failed fragment never aborts a batch.
#[derive(Debug, Clone, Error)]
pub enum ModelError {
    #[error("model unavailable: {0}")]
    Unavailable(String),

    #[error("inference failed: {0}")]
    Inference(String),
}

/// Three-class sentiment head over a pretrained encoder.
///
/// `predict` returns the softmax distribution as `[negative, neutral,
/// positive]`; the wrapper derives label, confidence and strength from it.
#[async_trait]
pub trait SentimentModel: Send + Sync {
    /// Human-readable model name, for logs.
    fn name(&self) -> &str;

    /// One forward pass over a single (already truncated) text.
    async fn predict(&self, text: &str) -> Result<[f64; 3], ModelError>;

    /// Predict a batch. The default implementation loops; backends with real
    /// batched inference should override it.
    async fn predict_batch(&self, texts: &[String]) -> Vec<Result<[f64; 3], ModelError>> {
        let mut results = Vec::with_capacity(texts.len());
        for text in texts {
            results.push(self.predict(text).await);
        }
        results
    }

    /// Cheap liveness probe, called once per run before batch work.
    async fn health_check(&self) -> Result<(), ModelError>;
}

/// Text embedding model used as a semantic-meaningfulness proxy.
///
/// `encode` returns the pooled representation of the first token position;
/// the admissibility filter takes its L2 norm.
#[async_trait]
pub trait SemanticEncoder: Send + Sync {
    /// Embed one text into its pooled first-token representation.
    async fn encode(&self, text: &str) -> Result<Vec<f32>, ModelError>;

    /// Embed a batch. Default loops; override for real batched inference.
    async fn encode_batch(&self, texts: &[String]) -> Vec<Result<Vec<f32>, ModelError>> {
        let mut results = Vec::with_capacity(texts.len());
        for text in texts {
            results.push(self.encode(text).await);
        }
        results
    }
}

/// Two-phase model acquisition.
///
/// Splitting ensure-present from load keeps download/network concerns out of
/// the classifier: the core only ever sees a loaded handle.
#[async_trait]
pub trait ModelProvider: Send + Sync {
    /// Make sure the weights exist locally (download if missing).
    async fn ensure_present(&self) -> Result<(), ModelError>;

    /// Load the weights into a ready-to-use handle.
    async fn load(&self) -> Result<Arc<dyn SentimentModel>, ModelError>;

    /// Convenience: ensure then load.
    async fn acquire(&self) -> Result<Arc<dyn SentimentModel>, ModelError> {
        self.ensure_present().await?;
        self.load().await
    }
}

/// L2 norm of an embedding vector.
pub fn l2_norm(embedding: &[f32]) -> f64 {
    embedding
        .iter()
        .map(|&x| f64::from(x) * f64::from(x))
        .sum::<f64>()
        .sqrt()
}

#[cfg(test)]
pub(crate) mod testing {
    //! Deterministic model doubles for unit tests.

    use super::*;
    use std::collections::HashMap;

    /// Sentiment model that answers from a fixed table and fails otherwise.
    pub struct ScriptedSentimentModel {
        pub responses: HashMap<String, [f64; 3]>,
        pub fallback: Option<[f64; 3]>,
    }

    impl ScriptedSentimentModel {
        pub fn always(scores: [f64; 3]) -> Self {
            Self {
                responses: HashMap::new(),
                fallback: Some(scores),
            }
        }
    }

    #[async_trait]
    impl SentimentModel for ScriptedSentimentModel {
        fn name(&self) -> &str {
            "scripted"
        }

        async fn predict(&self, text: &str) -> Result<[f64; 3], ModelError> {
            self.responses
                .get(text)
                .copied()
                .or(self.fallback)
                .ok_or_else(|| ModelError::Inference(format!("no scripted response: {text}")))
        }

        async fn health_check(&self) -> Result<(), ModelError> {
            Ok(())
        }
    }

    /// Model that is permanently down.
    pub struct DownModel;

    #[async_trait]
    impl SentimentModel for DownModel {
        fn name(&self) -> &str {
            "down"
        }

        async fn predict(&self, _text: &str) -> Result<[f64; 3], ModelError> {
            Err(ModelError::Unavailable("weights not loaded".to_string()))
        }

        async fn health_check(&self) -> Result<(), ModelError> {
            Err(ModelError::Unavailable("weights not loaded".to_string()))
        }
    }

    /// Encoder that returns an embedding of fixed norm, letting tests steer
    /// the admissibility semantic branch.
    pub struct FixedNormEncoder {
        pub norm: f64,
    }

    #[async_trait]
    impl SemanticEncoder for FixedNormEncoder {
        async fn encode(&self, _text: &str) -> Result<Vec<f32>, ModelError> {
            Ok(vec![self.norm as f32, 0.0, 0.0])
        }
    }

    /// Encoder that always fails, forcing the lexical fallback.
    pub struct DownEncoder;

    #[async_trait]
    impl SemanticEncoder for DownEncoder {
        async fn encode(&self, _text: &str) -> Result<Vec<f32>, ModelError> {
            Err(ModelError::Unavailable("encoder offline".to_string()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_l2_norm() {
        assert!((l2_norm(&[3.0, 4.0]) - 5.0).abs() < 1e-9);
        assert_eq!(l2_norm(&[]), 0.0);
    }

    #[tokio::test]
    async fn test_scripted_model_predicts() {
        let model = testing::ScriptedSentimentModel::always([0.1, 0.2, 0.7]);
        let scores = model.predict("anything").await.unwrap();
        assert_eq!(scores, [0.1, 0.2, 0.7]);
    }

    #[tokio::test]
    async fn test_default_batch_loops() {
        let model = testing::ScriptedSentimentModel::always([0.2, 0.5, 0.3]);
        let texts = vec!["a".to_string(), "b".to_string()];
        let results = model.predict_batch(&texts).await;
        assert_eq!(results.len(), 2);
        assert!(results.iter().all(|r| r.is_ok()));
    }
}
