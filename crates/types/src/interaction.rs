//! User interaction events.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Kind of user interaction with a catalog item.
///
/// Each kind carries a fixed signal weight; unrecognized kinds survive
/// deserialization as [`InteractionKind::Other`] instead of failing, and
/// score the default weight.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InteractionKind {
    /// Item detail was viewed.
    View,
    /// Item was clicked in a listing.
    Click,
    /// Item was added to favorites.
    Favorite,
    /// Item received a positive rating.
    RatePositive,
    /// Item received a negative rating.
    RateNegative,
    /// Item was purchased.
    Purchase,
    /// Item was shared.
    Share,
    /// Any interaction kind this engine does not model explicitly.
    Other(String),
}

impl InteractionKind {
    /// Signal weight used when accumulating preference buckets and the
    /// user-item interaction matrix.
    pub fn weight(&self) -> f64 {
        match self {
            InteractionKind::View => 1.0,
            InteractionKind::Click => 2.0,
            InteractionKind::Favorite => 5.0,
            InteractionKind::RatePositive => 4.0,
            InteractionKind::RateNegative => -2.0,
            InteractionKind::Purchase => 8.0,
            InteractionKind::Share => 3.0,
            InteractionKind::Other(_) => 1.0,
        }
    }

    /// Stable label for logging and metrics.
    pub fn label(&self) -> &str {
        match self {
            InteractionKind::View => "view",
            InteractionKind::Click => "click",
            InteractionKind::Favorite => "favorite",
            InteractionKind::RatePositive => "rate_positive",
            InteractionKind::RateNegative => "rate_negative",
            InteractionKind::Purchase => "purchase",
            InteractionKind::Share => "share",
            InteractionKind::Other(label) => label.as_str(),
        }
    }
}

/// A single append-only interaction event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Interaction {
    /// User the event belongs to; anonymous sessions use a shared id.
    pub user_id: String,
    /// Catalog item name the event refers to.
    pub item: String,
    /// What the user did.
    pub kind: InteractionKind,
    /// When it happened.
    pub timestamp: DateTime<Utc>,
    /// Free-form event metadata from the caller.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Value>,
}

impl Interaction {
    /// Create an event stamped with the current time.
    pub fn now(
        user_id: impl Into<String>,
        item: impl Into<String>,
        kind: InteractionKind,
    ) -> Self {
        Self {
            user_id: user_id.into(),
            item: item.into(),
            kind,
            timestamp: Utc::now(),
            metadata: None,
        }
    }
}
