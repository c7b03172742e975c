//! The engine facade: an explicit service object owning the model state.

use crate::config::EngineConfig;
use crate::error::EngineError;
use crate::model::{Candidates, CatalogModel, ModelState, ScoredCandidate};
use crate::sources::{
    CatalogSource, ContextProvider, InteractionLog, MemoryInteractionLog, MemoryPreferenceStore,
    MetricEvent, MetricsSink, NullMetricsSink, PreferenceStore, StaticCatalog,
};
use crate::{collaborative, content, context, explain, filters, hybrid};
use chrono::Utc;
use humidor_types::{
    Algorithm, CatalogItem, Confidence, ContextualFactors, EngineSnapshot, Interaction,
    InteractionKind, ProfileSummary, RealtimeRecommendation, Recommendation,
    RecommendationRequest,
};
use parking_lot::RwLock;
use serde_json::Value;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;

/// Builder wiring collaborators into a [`RecommendationEngine`].
///
/// Unset collaborators default to in-memory implementations, which makes an
/// engine embeddable in tests with two lines.
#[derive(Default)]
pub struct EngineBuilder {
    config: EngineConfig,
    catalog_source: Option<Arc<dyn CatalogSource>>,
    interaction_log: Option<Arc<dyn InteractionLog>>,
    preference_store: Option<Arc<dyn PreferenceStore>>,
    context_provider: Option<Arc<dyn ContextProvider>>,
    metrics: Option<Arc<dyn MetricsSink>>,
}

impl EngineBuilder {
    /// Start from default configuration and in-memory collaborators.
    pub fn new() -> Self {
        Self::default()
    }

    /// Use the given configuration.
    pub fn with_config(mut self, config: EngineConfig) -> Self {
        self.config = config;
        self
    }

    /// Use the given catalog source.
    pub fn with_catalog_source(mut self, source: Arc<dyn CatalogSource>) -> Self {
        self.catalog_source = Some(source);
        self
    }

    /// Use the given interaction log.
    pub fn with_interaction_log(mut self, log: Arc<dyn InteractionLog>) -> Self {
        self.interaction_log = Some(log);
        self
    }

    /// Use the given preference store.
    pub fn with_preference_store(mut self, store: Arc<dyn PreferenceStore>) -> Self {
        self.preference_store = Some(store);
        self
    }

    /// Use the given context provider.
    pub fn with_context_provider(mut self, provider: Arc<dyn ContextProvider>) -> Self {
        self.context_provider = Some(provider);
        self
    }

    /// Use the given metrics sink.
    pub fn with_metrics(mut self, metrics: Arc<dyn MetricsSink>) -> Self {
        self.metrics = Some(metrics);
        self
    }

    /// Build the engine. Call [`RecommendationEngine::initialize`] before
    /// serving to load the catalog and history.
    pub fn build(self) -> RecommendationEngine {
        RecommendationEngine {
            config: self.config,
            catalog_source: self
                .catalog_source
                .unwrap_or_else(|| Arc::new(StaticCatalog::default())),
            interaction_log: self
                .interaction_log
                .unwrap_or_else(|| Arc::new(MemoryInteractionLog::new())),
            preference_store: self
                .preference_store
                .unwrap_or_else(|| Arc::new(MemoryPreferenceStore::new())),
            context_provider: self.context_provider,
            metrics: self.metrics.unwrap_or_else(|| Arc::new(NullMetricsSink)),
            state: RwLock::new(Arc::new(ModelState::default())),
            training: AtomicBool::new(false),
            generation: AtomicU64::new(0),
        }
    }
}

/// The recommendation engine service object.
///
/// All recommendation reads run against one cloned `Arc<ModelState>`
/// snapshot, so concurrent retrains can never expose a half-rebuilt model.
/// Public entry points do not error: failures are logged and degrade to
/// fallback results.
pub struct RecommendationEngine {
    pub(crate) config: EngineConfig,
    pub(crate) catalog_source: Arc<dyn CatalogSource>,
    pub(crate) interaction_log: Arc<dyn InteractionLog>,
    pub(crate) preference_store: Arc<dyn PreferenceStore>,
    pub(crate) context_provider: Option<Arc<dyn ContextProvider>>,
    pub(crate) metrics: Arc<dyn MetricsSink>,
    pub(crate) state: RwLock<Arc<ModelState>>,
    pub(crate) training: AtomicBool,
    pub(crate) generation: AtomicU64,
}

impl RecommendationEngine {
    /// Start building an engine.
    pub fn builder() -> EngineBuilder {
        EngineBuilder::new()
    }

    /// Current model snapshot.
    pub(crate) fn snapshot(&self) -> Arc<ModelState> {
        self.state.read().clone()
    }

    /// Next generation number for a state publish.
    pub(crate) fn next_generation(&self) -> u64 {
        self.generation.fetch_add(1, Ordering::SeqCst) + 1
    }

    /// Trim history to the configured retention window, newest kept.
    pub(crate) fn apply_retention(&self, mut interactions: Vec<Interaction>) -> Vec<Interaction> {
        let Some(max) = self.config.max_interactions else {
            return interactions;
        };
        if interactions.len() <= max {
            return interactions;
        }
        interactions.sort_by_key(|i| i.timestamp);
        let dropped = interactions.len() - max;
        interactions.drain(..dropped);
        tracing::info!(
            target: "humidor::engine",
            dropped,
            retained = max,
            "interaction history trimmed to retention window"
        );
        interactions
    }

    /// Load the catalog and interaction history and build the first model
    /// state.
    ///
    /// Load failures degrade to an empty snapshot instead of propagating;
    /// the engine then serves fallback results until a retrain succeeds.
    pub async fn initialize(&self) {
        let catalog = match self.catalog_source.load_catalog().await {
            Ok(catalog) => catalog,
            Err(error) => {
                let error = EngineError::DataLoad(error);
                tracing::warn!(
                    target: "humidor::engine",
                    error = %error,
                    "catalog load failed; starting with an empty snapshot"
                );
                Vec::new()
            }
        };
        let interactions = match self.interaction_log.all().await {
            Ok(interactions) => interactions,
            Err(error) => {
                let error = EngineError::DataLoad(error);
                tracing::warn!(
                    target: "humidor::engine",
                    error = %error,
                    "interaction load failed; starting with an empty history"
                );
                Vec::new()
            }
        };
        let interactions = self.apply_retention(interactions);

        let mut state = ModelState::build(catalog, &interactions, self.next_generation());

        // Warm-start profiles persisted by earlier sessions, without
        // overriding anything rebuilt from the live history.
        match self.preference_store.load_profiles().await {
            Ok(persisted) => {
                for profile in persisted {
                    state
                        .profiles
                        .entry(profile.user_id.clone())
                        .or_insert(profile);
                }
            }
            Err(error) => {
                tracing::warn!(
                    target: "humidor::engine",
                    error = %error,
                    "preference store read failed; continuing without persisted profiles"
                );
            }
        }

        tracing::info!(
            target: "humidor::engine",
            items = state.catalog.items.len(),
            users = state.profiles.len(),
            interactions = state.matrix.total(),
            generation = state.generation,
            "engine initialized"
        );
        *self.state.write() = Arc::new(state);
    }

    /// Rebuild vocabularies and feature vectors from the given catalog
    /// snapshot, leaving profiles and the interaction matrix in place.
    ///
    /// Vectors are always reconstructed together with their vocabulary, so
    /// the layout can never drift mid-session. Idempotent for the same
    /// snapshot.
    pub fn build_catalog_features(&self, catalog: Vec<CatalogItem>) {
        let catalog = Arc::new(CatalogModel::build(catalog));
        let mut guard = self.state.write();
        let state = Arc::make_mut(&mut *guard);
        state.catalog = catalog;
        state.generation = self.next_generation();
        tracing::info!(
            target: "humidor::engine",
            items = state.catalog.items.len(),
            dimension = state.catalog.features.dimension(),
            generation = state.generation,
            "catalog features rebuilt"
        );
    }

    /// Append an interaction and update the acting user's profile,
    /// embedding, and matrix entry.
    ///
    /// A missing `user_id` attributes the event to the shared anonymous
    /// profile. Log append and profile persistence failures are non-fatal.
    pub async fn record_interaction(
        &self,
        user_id: Option<&str>,
        item: &str,
        kind: InteractionKind,
        metadata: Option<Value>,
    ) {
        let user_id = user_id.unwrap_or("anonymous");
        let interaction = Interaction {
            user_id: user_id.to_string(),
            item: item.to_string(),
            kind: kind.clone(),
            timestamp: Utc::now(),
            metadata,
        };

        if let Err(error) = self.interaction_log.append(interaction.clone()).await {
            tracing::warn!(
                target: "humidor::engine",
                error = %error,
                "interaction log append failed; event kept in memory only"
            );
        }

        let profile = {
            let mut guard = self.state.write();
            let state = Arc::make_mut(&mut *guard);
            state.apply_interaction(&interaction);
            state.generation = self.next_generation();
            state.profiles.get(user_id).cloned()
        };

        if let Some(profile) = profile {
            if let Err(error) = self.preference_store.save_profile(&profile).await {
                tracing::warn!(
                    target: "humidor::engine",
                    user = user_id,
                    error = %error,
                    "preference store write failed; profile kept in memory only"
                );
            }
        }

        self.metrics.emit(MetricEvent::InteractionRecorded {
            user_id: user_id.to_string(),
            item: item.to_string(),
            kind: kind.label().to_string(),
        });
    }

    /// Ranked, explained, confidence-scored recommendations for a user.
    ///
    /// Never errors: any internal failure is isolated to this call and
    /// answered with the fallback list (or an empty list when even the
    /// catalog is unavailable). Returns at most `request.count` results.
    pub async fn get_recommendations(
        &self,
        user: Option<&str>,
        request: RecommendationRequest,
    ) -> Vec<Recommendation> {
        let state = self.snapshot();

        let recommendations =
            match catch_unwind(AssertUnwindSafe(|| compose(&state, user, &request))) {
                Ok(recommendations) => recommendations,
                Err(_) => {
                    let error = EngineError::Request {
                        user: user.unwrap_or("anonymous").to_string(),
                    };
                    tracing::error!(
                        target: "humidor::engine",
                        error = %error,
                        "serving fallback recommendations"
                    );
                    fallback_list(&state, request.count)
                }
            };

        self.metrics.emit(MetricEvent::RecommendationsGenerated {
            user_id: user.map(|u| u.to_string()),
            algorithm: recommendations
                .first()
                .map(|r| r.algorithm)
                .or(request.algorithm)
                .unwrap_or(Algorithm::Hybrid),
            count: recommendations.len(),
            filtered: !request.filters.is_empty(),
        });

        recommendations
    }

    /// Hybrid recommendations at the configured realtime count, stamped for
    /// freshness.
    ///
    /// When no explicit context is given the context provider, if any, is
    /// consulted.
    pub async fn get_realtime_recommendations(
        &self,
        user: Option<&str>,
        context: Option<ContextualFactors>,
    ) -> Vec<RealtimeRecommendation> {
        let contextual_factors = match context {
            Some(factors) => factors,
            None => match &self.context_provider {
                Some(provider) => provider.current_context().await,
                None => ContextualFactors::default(),
            },
        };

        let request = RecommendationRequest {
            algorithm: Some(Algorithm::Hybrid),
            count: self.config.realtime_count,
            contextual_factors,
            ..Default::default()
        };

        self.get_recommendations(user, request)
            .await
            .into_iter()
            .map(|recommendation| RealtimeRecommendation {
                recommendation,
                freshness: Utc::now(),
            })
            .collect()
    }

    /// Diagnostic snapshot of profiles, interaction counts, and model
    /// statistics.
    pub fn export_recommendation_data(&self) -> EngineSnapshot {
        let state = self.snapshot();
        let training = self.training.load(Ordering::SeqCst);

        let mut profiles: Vec<ProfileSummary> = state
            .profiles
            .values()
            .map(|profile| ProfileSummary {
                user_id: profile.user_id.clone(),
                interaction_count: profile.interaction_count,
                top_wrapper: profile
                    .preferences
                    .wrappers
                    .iter()
                    .max_by(|a, b| {
                        a.1.partial_cmp(b.1)
                            .unwrap_or(std::cmp::Ordering::Equal)
                            .then_with(|| b.0.cmp(a.0))
                    })
                    .map(|(wrapper, _)| wrapper.clone()),
                has_embedding: profile.embedding.is_some(),
            })
            .collect();
        profiles.sort_by(|a, b| a.user_id.cmp(&b.user_id));

        EngineSnapshot {
            profiles,
            stats: state.stats(training),
            exported_at: Utc::now(),
        }
    }
}

/// Run the full request pipeline against one model snapshot.
fn compose(
    state: &ModelState,
    user: Option<&str>,
    request: &RecommendationRequest,
) -> Vec<Recommendation> {
    let algorithm = request.algorithm.unwrap_or(Algorithm::Hybrid);
    if algorithm == Algorithm::Fallback {
        return fallback_list(state, request.count);
    }

    let candidates: Candidates = match algorithm {
        Algorithm::Collaborative => collaborative::candidates(state, user),
        Algorithm::Content => content::candidates(state, user),
        Algorithm::Popularity => collaborative::popularity(state),
        Algorithm::Diverse => content::diverse(state),
        _ => hybrid::candidates(state, user, request.count),
    };

    let mut items = candidates.items;
    filters::apply(&mut items, &request.filters, &state.catalog);
    context::apply(&mut items, &request.contextual_factors, &state.catalog);
    items.truncate(request.count);

    let profile = user.and_then(|u| state.profiles.get(u));
    items
        .into_iter()
        .map(|ScoredCandidate { index, score }| {
            let item = state.catalog.items[index].clone();
            let explanation = explain::explanation(candidates.algorithm, &item);
            let confidence = explain::confidence(score, profile);
            Recommendation {
                item,
                score,
                algorithm: candidates.algorithm,
                explanation,
                confidence,
            }
        })
        .collect()
}

/// First-N catalog items at fixed low confidence.
pub(crate) fn fallback_list(state: &ModelState, count: usize) -> Vec<Recommendation> {
    state
        .catalog
        .items
        .iter()
        .take(count)
        .map(|item| Recommendation {
            item: item.clone(),
            score: 0.5,
            algorithm: Algorithm::Fallback,
            explanation: "Featured cigar selection".to_string(),
            confidence: Confidence::new(0.3),
        })
        .collect()
}
