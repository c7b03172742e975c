//! Hybrid recommendation engine for cigar catalogs.
//!
//! This crate turns a catalog snapshot and an append-only interaction log
//! into ranked, explained, confidence-scored suggestions. It provides:
//! - User profiles aggregated from weighted interactions, with derived
//!   embeddings recomputed on every update
//! - Collaborative and content-based scoring with cold-start fallbacks
//! - A fixed-weight hybrid blender, conjunctive hard filters, and
//!   contextual re-ranking
//! - A background retrain scheduler that publishes rebuilt model state via a
//!   single atomic reference swap
//!
//! The engine is an explicit service object: collaborators (catalog source,
//! interaction log, preference store, context provider, metrics sink) are
//! injected through [`EngineBuilder`], and `get_recommendations` never
//! errors; degradation is visible only through the `fallback` algorithm tag
//! and low confidence.

pub mod collaborative;
pub mod config;
pub mod content;
pub mod context;
mod engine;
pub mod error;
pub mod explain;
pub mod filters;
pub mod hybrid;
pub mod model;
pub mod profile;
mod retrain;
pub mod sources;

pub use config::EngineConfig;
pub use engine::{EngineBuilder, RecommendationEngine};
pub use error::EngineError;
pub use model::{CatalogModel, Candidates, InteractionMatrix, ModelState, ScoredCandidate};
pub use profile::{PreferenceWeights, UserProfile};
pub use retrain::{RetrainOutcome, TrainingStatus};
pub use sources::{
    CatalogSource, ContextProvider, InteractionLog, JsonCatalogFile, JsonPreferenceStore,
    MemoryInteractionLog, MemoryPreferenceStore, MetricEvent, MetricsSink, NullMetricsSink,
    PreferenceStore, StaticCatalog, StaticContextProvider, TracingMetricsSink,
};
