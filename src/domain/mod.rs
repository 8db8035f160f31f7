//! Data model for the analysis core.
//!
//! Inputs (`TextFragment`, `EngagementSnapshot`, `AuthorMeta`) are supplied by
//! the external ingestion collaborator and are never mutated here. Outputs
//! (`SentimentRecord`, `HeatRecord`, `HostilityRecord`, `TrendBucket`) are
//! flat serializable records suitable for persistence and reporting by
//! external collaborators.

pub mod fragment;
pub mod records;

// Re-export commonly used types
pub use fragment::{AuthorMeta, EngagementSnapshot, PostActivity, TextFragment};
pub use records::{
    HeatRecord, HostilityMetrics, HostilityRecord, SentimentLabel, SentimentRecord,
    SentimentScores, TrendBucket,
};
