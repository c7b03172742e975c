//! Recommendation outputs and request inputs.

use crate::{CatalogItem, Confidence, ContextualFactors};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Which algorithm produced a recommendation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Algorithm {
    /// Scored from similar users' weighted activity.
    Collaborative,
    /// Scored from embedding similarity to the user's profile.
    Content,
    /// Fixed-weight blend of collaborative and content scores.
    Hybrid,
    /// Global weighted-interaction ranking (collaborative cold start).
    Popularity,
    /// One random pick per wrapper category (content cold start).
    Diverse,
    /// Degraded result after an internal error or empty inputs.
    Fallback,
}

impl Algorithm {
    /// Stable label for logging and metrics.
    pub fn label(self) -> &'static str {
        match self {
            Algorithm::Collaborative => "collaborative",
            Algorithm::Content => "content",
            Algorithm::Hybrid => "hybrid",
            Algorithm::Popularity => "popularity",
            Algorithm::Diverse => "diverse",
            Algorithm::Fallback => "fallback",
        }
    }
}

/// A scored, explained suggestion for one user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    /// The recommended catalog item.
    pub item: CatalogItem,
    /// Raw ranking score; scale depends on the producing algorithm.
    pub score: f64,
    /// Producing algorithm.
    pub algorithm: Algorithm,
    /// Human-readable reason for the suggestion.
    pub explanation: String,
    /// Confidence in the suggestion, always within [0, 1].
    pub confidence: Confidence,
}

/// A recommendation annotated with the moment it was produced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RealtimeRecommendation {
    /// The underlying recommendation.
    #[serde(flatten)]
    pub recommendation: Recommendation,
    /// Production timestamp for freshness tracking.
    pub freshness: DateTime<Utc>,
}

/// Inclusive price range filter.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PriceRange {
    /// Lower bound, inclusive.
    pub min: f64,
    /// Upper bound, inclusive.
    pub max: f64,
}

impl PriceRange {
    /// True when `price` lies within the range.
    pub fn contains(&self, price: f64) -> bool {
        price >= self.min && price <= self.max
    }
}

/// Conjunctive hard filters applied to ranked candidates.
///
/// Empty set filters are inactive; an item must pass every active filter to
/// survive.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RecommendationFilters {
    /// Acceptable wrapper values.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub wrappers: Vec<String>,
    /// Acceptable strength values.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub strengths: Vec<String>,
    /// Acceptable origin values.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub origins: Vec<String>,
    /// Acceptable price range.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price_range: Option<PriceRange>,
}

impl RecommendationFilters {
    /// True when no filter dimension is active.
    pub fn is_empty(&self) -> bool {
        self.wrappers.is_empty()
            && self.strengths.is_empty()
            && self.origins.is_empty()
            && self.price_range.is_none()
    }
}

/// Options for one recommendation request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecommendationRequest {
    /// Algorithm to run; defaults to hybrid.
    #[serde(default)]
    pub algorithm: Option<Algorithm>,
    /// Maximum number of results.
    #[serde(default = "default_count")]
    pub count: usize,
    /// Hard filters.
    #[serde(default)]
    pub filters: RecommendationFilters,
    /// Contextual re-ranking factors.
    #[serde(default)]
    pub contextual_factors: ContextualFactors,
}

fn default_count() -> usize {
    10
}

impl Default for RecommendationRequest {
    fn default() -> Self {
        Self {
            algorithm: None,
            count: default_count(),
            filters: RecommendationFilters::default(),
            contextual_factors: ContextualFactors::default(),
        }
    }
}

impl RecommendationRequest {
    /// Request `count` results from a specific algorithm.
    pub fn with_algorithm(algorithm: Algorithm, count: usize) -> Self {
        Self {
            algorithm: Some(algorithm),
            count,
            ..Self::default()
        }
    }
}
