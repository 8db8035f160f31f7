//! Analysis parameter surface.
//!
//! Every tunable the components document — engagement weights, decay
//! constants, hostility thresholds, the minimum-comment floor, window lengths
//! — is a named, overridable field with the production default. Configs are
//! plain serde structs loadable from YAML; absent fields fall back to the
//! defaults, so an empty file is a valid config.

use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::hostility::HostilityFormula;

/// Top-level configuration for one analysis run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AnalysisConfig {
    /// Single-post heat pipeline
    #[serde(default)]
    pub heat: HeatConfig,

    /// Multi-day windowed heat pipeline
    #[serde(default)]
    pub windowed_heat: WindowedHeatConfig,

    /// Hostility detection
    #[serde(default)]
    pub hostility: HostilityConfig,

    /// Admissibility filtering
    #[serde(default)]
    pub filter: FilterConfig,

    /// Sentiment classification
    #[serde(default)]
    pub sentiment: SentimentConfig,
}

impl AnalysisConfig {
    /// Load a config from a YAML file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        Self::from_yaml(&content)
    }

    /// Parse a config from YAML content.
    pub fn from_yaml(content: &str) -> Result<Self> {
        let config: Self = serde_yaml::from_str(content).context("Failed to parse config YAML")?;
        config.validate()?;
        Ok(config)
    }

    /// Check cross-field constraints that serde cannot express.
    pub fn validate(&self) -> Result<()> {
        let h = &self.heat;
        for (name, w) in [
            ("like_weight", h.like_weight),
            ("repost_weight", h.repost_weight),
            ("comment_weight", h.comment_weight),
            ("view_weight", h.view_weight),
            ("decay_weight", h.decay_weight),
        ] {
            if !(0.0..=1.0).contains(&w) {
                anyhow::bail!("heat.{} must be in [0, 1], got {}", name, w);
            }
        }
        if h.decay_hours <= 0.0 {
            anyhow::bail!("heat.decay_hours must be positive, got {}", h.decay_hours);
        }
        if !(h.alert_low <= h.alert_medium && h.alert_medium <= h.alert_high) {
            anyhow::bail!("heat alert thresholds must be ordered low <= medium <= high");
        }

        let alpha = self.windowed_heat.smoothing_alpha;
        if !(alpha > 0.0 && alpha <= 1.0) {
            anyhow::bail!("windowed_heat.smoothing_alpha must be in (0, 1], got {}", alpha);
        }

        if self.hostility.min_comments == 0 {
            anyhow::bail!("hostility.min_comments must be at least 1");
        }
        if self.hostility.threshold <= 0.0 {
            anyhow::bail!(
                "hostility.threshold must be positive, got {}",
                self.hostility.threshold
            );
        }

        Ok(())
    }
}

/// Weights and constants for the single-post normalized-and-decayed heat
/// formula, plus the alert thresholds derived scores are checked against.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HeatConfig {
    /// Like contribution weight (default: 0.3)
    #[serde(default = "default_like_weight")]
    pub like_weight: f64,

    /// Repost contribution weight (default: 0.3)
    #[serde(default = "default_repost_weight")]
    pub repost_weight: f64,

    /// Comment contribution weight (default: 0.2)
    #[serde(default = "default_comment_weight")]
    pub comment_weight: f64,

    /// View contribution weight (default: 0.1)
    #[serde(default = "default_view_weight")]
    pub view_weight: f64,

    /// How much of the decayed fraction shrinks the score (default: 0.1)
    #[serde(default = "default_decay_weight")]
    pub decay_weight: f64,

    /// E-folding time of the decay in hours (default: 24)
    #[serde(default = "default_decay_hours")]
    pub decay_hours: f64,

    /// Log-normalization scale divisor (default: 10)
    #[serde(default = "default_log_scale")]
    pub log_scale: f64,

    /// Low alert threshold (default: 0.3)
    #[serde(default = "default_alert_low")]
    pub alert_low: f64,

    /// Medium alert threshold (default: 0.5)
    #[serde(default = "default_alert_medium")]
    pub alert_medium: f64,

    /// High alert threshold (default: 0.8)
    #[serde(default = "default_alert_high")]
    pub alert_high: f64,

    /// Entity analysis window in days (default: 7)
    #[serde(default = "default_heat_window_days")]
    pub window_days: i64,
}

fn default_like_weight() -> f64 {
    0.3
}
fn default_repost_weight() -> f64 {
    0.3
}
fn default_comment_weight() -> f64 {
    0.2
}
fn default_view_weight() -> f64 {
    0.1
}
fn default_decay_weight() -> f64 {
    0.1
}
fn default_decay_hours() -> f64 {
    24.0
}
fn default_log_scale() -> f64 {
    10.0
}
fn default_alert_low() -> f64 {
    0.3
}
fn default_alert_medium() -> f64 {
    0.5
}
fn default_alert_high() -> f64 {
    0.8
}
fn default_heat_window_days() -> i64 {
    7
}

impl Default for HeatConfig {
    fn default() -> Self {
        Self {
            like_weight: default_like_weight(),
            repost_weight: default_repost_weight(),
            comment_weight: default_comment_weight(),
            view_weight: default_view_weight(),
            decay_weight: default_decay_weight(),
            decay_hours: default_decay_hours(),
            log_scale: default_log_scale(),
            alert_low: default_alert_low(),
            alert_medium: default_alert_medium(),
            alert_high: default_alert_high(),
            window_days: default_heat_window_days(),
        }
    }
}

/// Coarse counter weights and smoothing for the multi-day windowed heat
/// pipeline. Deliberately separate from [`HeatConfig`]: the two formulas are
/// distinct pipelines and must not be conflated.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WindowedHeatConfig {
    /// Weight per post (default: 1.0)
    #[serde(default = "default_wh_post_weight")]
    pub post_weight: f64,

    /// Weight per comment (default: 2.0)
    #[serde(default = "default_wh_comment_weight")]
    pub comment_weight: f64,

    /// Weight per like (default: 0.5)
    #[serde(default = "default_wh_like_weight")]
    pub like_weight: f64,

    /// Weight per repost (default: 1.5)
    #[serde(default = "default_wh_repost_weight")]
    pub repost_weight: f64,

    /// Exponential smoothing factor for new data (default: 0.4)
    #[serde(default = "default_smoothing_alpha")]
    pub smoothing_alpha: f64,

    /// Rolling window in days feeding each day's smoothed value (default: 3)
    #[serde(default = "default_wh_window_days")]
    pub window_days: i64,
}

fn default_wh_post_weight() -> f64 {
    1.0
}
fn default_wh_comment_weight() -> f64 {
    2.0
}
fn default_wh_like_weight() -> f64 {
    0.5
}
fn default_wh_repost_weight() -> f64 {
    1.5
}
fn default_smoothing_alpha() -> f64 {
    0.4
}
fn default_wh_window_days() -> i64 {
    3
}

impl Default for WindowedHeatConfig {
    fn default() -> Self {
        Self {
            post_weight: default_wh_post_weight(),
            comment_weight: default_wh_comment_weight(),
            like_weight: default_wh_like_weight(),
            repost_weight: default_wh_repost_weight(),
            smoothing_alpha: default_smoothing_alpha(),
            window_days: default_wh_window_days(),
        }
    }
}

/// Hostility detection thresholds and window.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HostilityConfig {
    /// Verdict threshold on the composite score (default: 0.7)
    #[serde(default = "default_hostility_threshold")]
    pub threshold: f64,

    /// Minimum comments before an evaluation is attempted (default: 3)
    #[serde(default = "default_min_comments")]
    pub min_comments: usize,

    /// Analysis window in days (default: 7)
    #[serde(default = "default_hostility_window_days")]
    pub window_days: i64,

    /// Which composite formula to use (default: nested)
    #[serde(default)]
    pub formula: HostilityFormula,
}

fn default_hostility_threshold() -> f64 {
    0.7
}
fn default_min_comments() -> usize {
    3
}
fn default_hostility_window_days() -> i64 {
    7
}

impl Default for HostilityConfig {
    fn default() -> Self {
        Self {
            threshold: default_hostility_threshold(),
            min_comments: default_min_comments(),
            window_days: default_hostility_window_days(),
            formula: HostilityFormula::default(),
        }
    }
}

/// Admissibility filter tunables.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FilterConfig {
    /// Bound on each of the two result caches (default: 10000)
    #[serde(default = "default_filter_cache_capacity")]
    pub cache_capacity: usize,

    /// Embedding-norm threshold for the semantic branch (default: 0.5)
    #[serde(default = "default_norm_threshold")]
    pub norm_threshold: f64,
}

fn default_filter_cache_capacity() -> usize {
    10_000
}
fn default_norm_threshold() -> f64 {
    0.5
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            cache_capacity: default_filter_cache_capacity(),
            norm_threshold: default_norm_threshold(),
        }
    }
}

/// Sentiment classifier tunables.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SentimentConfig {
    /// Token budget per fragment; longer text is truncated, not rejected
    /// (default: 512)
    #[serde(default = "default_max_tokens")]
    pub max_tokens: usize,

    /// Bound on the sentiment result cache (default: 10000)
    #[serde(default = "default_sentiment_cache_capacity")]
    pub cache_capacity: usize,
}

fn default_max_tokens() -> usize {
    512
}
fn default_sentiment_cache_capacity() -> usize {
    10_000
}

impl Default for SentimentConfig {
    fn default() -> Self {
        Self {
            max_tokens: default_max_tokens(),
            cache_capacity: default_sentiment_cache_capacity(),
        }
    }
}
