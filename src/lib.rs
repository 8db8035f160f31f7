//! starpulse - Social-media monitoring analytics
//!
//! The analytic core of a celebrity-monitoring pipeline: decide which text
//! fragments deserve analysis, classify their sentiment, score engagement
//! heat, flag hostile commenters, and aggregate everything into trends and
//! reports.
//!
//! # Architecture
//!
//! The crate is a library of pure scoring components behind injected model
//! seams:
//! - Model inference lives behind async traits; every analyzer works against
//!   a handle, never a concrete backend
//! - Per-item model failures degrade to sentinel records instead of errors
//! - No-data cases come back as tagged outcomes, never as zero scores
//!
//! # Modules
//!
//! - `domain`: Input and output data model (fragments, records, buckets)
//! - `cache`: Content-addressed result caches
//! - `model`: Inference trait seams and scripted test doubles
//! - `filter`: Admissibility filtering (boilerplate, lexical, semantic)
//! - `sentiment`: Three-class classification and opinion summaries
//! - `heat`: Engagement heat scoring, single-post and windowed
//! - `hostility`: Hostile-commenter detection and population profiling
//! - `trend`: Day-bucketed series and top-K extraction
//! - `config`: YAML-loadable analysis parameters
//! - `cli`: JSONL batch commands
//!
//! # Usage
//!
//! ```bash
//! # Judge fragments for admissibility
//! cat fragments.jsonl | starpulse filter
//!
//! # Build an entity heat report
//! cat posts.jsonl | starpulse heat --entity-id star-1
//!
//! # Evaluate commenters for hostility
//! cat comments.jsonl | starpulse hostility --entity-id star-1
//! ```

pub mod cache;
pub mod cli;
pub mod config;
pub mod domain;
pub mod filter;
pub mod heat;
pub mod hostility;
pub mod model;
pub mod sentiment;
pub mod trend;

// Re-export main types at crate root for convenience
pub use config::AnalysisConfig;
pub use domain::{
    AuthorMeta, EngagementSnapshot, HeatRecord, HostilityRecord, PostActivity, SentimentLabel,
    SentimentRecord, TextFragment, TrendBucket,
};
pub use filter::AdmissibilityFilter;
pub use heat::{AlertLevel, EntityHeatOutcome, HeatScorer};
pub use hostility::{HostilityDetector, HostilityFormula, HostilityOutcome};
pub use model::{ModelError, ModelProvider, SemanticEncoder, SentimentModel};
pub use sentiment::SentimentClassifier;
