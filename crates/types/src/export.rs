//! Diagnostic snapshot types for observability exports.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Aggregate model statistics.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ModelStats {
    /// Number of known user profiles.
    pub total_users: usize,
    /// Number of interactions the current model was built from.
    pub total_interactions: usize,
    /// Number of catalog items in the current snapshot.
    pub total_items: usize,
    /// Mean interactions per known user.
    pub average_interactions_per_user: f64,
    /// Whether a retrain cycle is currently running.
    pub training: bool,
    /// Model generation, bumped on every state publish.
    pub generation: u64,
}

/// Per-user summary included in exports.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfileSummary {
    /// User the profile belongs to.
    pub user_id: String,
    /// Interactions attributed to this user.
    pub interaction_count: usize,
    /// Highest-weighted wrapper preference, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub top_wrapper: Option<String>,
    /// Whether an embedding has been derived.
    pub has_embedding: bool,
}

/// Full diagnostic snapshot returned by the export operation.
///
/// This is observability output, not a correctness-critical surface; shapes
/// may grow fields over time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineSnapshot {
    /// Per-user profile summaries.
    pub profiles: Vec<ProfileSummary>,
    /// Aggregate statistics.
    pub stats: ModelStats,
    /// When the snapshot was taken.
    pub exported_at: DateTime<Utc>,
}
