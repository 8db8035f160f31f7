//! Input records supplied by the ingestion collaborator.
//!
//! Text fragments arrive already cleaned (URLs, @-mentions, bracketed emoji
//! tokens and HTML stripped upstream) and deduplicated at the storage layer.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A single cleaned post or comment, read-only input to the pipeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TextFragment {
    /// Post or comment identifier
    pub id: String,

    /// Author of the fragment
    pub author_id: String,

    /// Monitored entity the fragment is about
    pub entity_id: String,

    /// Cleaned text content
    pub text: String,

    /// When the fragment was published
    pub created_at: DateTime<Utc>,
}

impl TextFragment {
    /// Check that the fragment carries the fields the pipeline requires.
    ///
    /// Fragments failing this check are skipped by batch operations and
    /// counted, not errors that abort the batch.
    pub fn is_well_formed(&self) -> bool {
        !self.id.is_empty() && !self.text.trim().is_empty()
    }
}

/// Engagement counters for one post at a point in time.
///
/// Owned by the post; supplied by the ingestion path and read-only to the
/// heat scorer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngagementSnapshot {
    /// Post identifier
    pub post_id: String,

    /// Like count
    pub likes: u64,

    /// Repost/share count
    pub reposts: u64,

    /// Comment count
    pub comments: u64,

    /// View/read count
    pub views: u64,

    /// When the counters were captured
    pub captured_at: DateTime<Utc>,
}

/// One post with its engagement counters, the unit the entity-level heat
/// analysis consumes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostActivity {
    /// Post identifier
    pub post_id: String,

    /// When the post was published
    pub created_at: DateTime<Utc>,

    /// Latest engagement counters for the post
    pub engagement: EngagementSnapshot,
}

/// Author metadata supplied externally, used only by the hostility
/// ranking step for demographic histograms. Never computed here.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AuthorMeta {
    /// Author identifier
    pub author_id: String,

    /// Display name, if known
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nickname: Option<String>,

    /// Self-reported gender, if known
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gender: Option<String>,

    /// Self-reported location, if known
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fragment_well_formed() {
        let fragment = TextFragment {
            id: "c1".to_string(),
            author_id: "u1".to_string(),
            entity_id: "e1".to_string(),
            text: "great performance".to_string(),
            created_at: Utc::now(),
        };
        assert!(fragment.is_well_formed());
    }

    #[test]
    fn test_fragment_missing_text_is_malformed() {
        let fragment = TextFragment {
            id: "c1".to_string(),
            author_id: "u1".to_string(),
            entity_id: "e1".to_string(),
            text: "   ".to_string(),
            created_at: Utc::now(),
        };
        assert!(!fragment.is_well_formed());
    }

    #[test]
    fn test_snapshot_serialization() {
        let snap = EngagementSnapshot {
            post_id: "p1".to_string(),
            likes: 1000,
            reposts: 500,
            comments: 200,
            views: 10000,
            captured_at: Utc::now(),
        };

        let json = serde_json::to_string(&snap).unwrap();
        let parsed: EngagementSnapshot = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.likes, 1000);
        assert_eq!(parsed.views, 10000);
    }
}
