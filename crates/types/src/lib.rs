//! Domain and wire-format types for the humidor recommendation engine.
//!
//! This crate carries the serde-serializable types shared across the
//! workspace: catalog items, interaction events, recommendations, filter and
//! context inputs, and diagnostic snapshots. It deliberately has no logic
//! beyond small accessors so that every other crate can depend on it without
//! pulling in the engine.

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod catalog;
mod confidence;
mod context;
mod export;
mod interaction;
mod recommendation;

pub use catalog::{CatalogItem, SizeClass};
pub use confidence::Confidence;
pub use context::{ContextualFactors, Mood, TimeOfDay, Weather};
pub use export::{EngineSnapshot, ModelStats, ProfileSummary};
pub use interaction::{Interaction, InteractionKind};
pub use recommendation::{
    Algorithm, PriceRange, RealtimeRecommendation, Recommendation, RecommendationFilters,
    RecommendationRequest,
};
