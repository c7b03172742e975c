//! Model state: the immutable snapshot recommendations are served from.
//!
//! # Concurrency model
//!
//! The engine shares one `parking_lot::RwLock<Arc<ModelState>>`. Read paths
//! clone the `Arc` once and compose an entire response from that snapshot,
//! so a retrain publishing a new state mid-request can never be observed as
//! a half-rebuilt mixture. Writers either swap in a freshly built state
//! (retrain) or use `Arc::make_mut` for copy-on-write interaction updates.
//! The heavyweight catalog model sits behind its own `Arc` so copy-on-write
//! only clones profiles and the interaction matrix.

use crate::profile::UserProfile;
use humidor_features::FeatureSpace;
use humidor_types::{Algorithm, CatalogItem, Interaction, ModelStats};
use std::collections::{HashMap, HashSet};
use std::sync::Arc;

/// Catalog snapshot plus its derived feature space.
///
/// Read-only after construction; a catalog change means building a new one.
#[derive(Debug, Default)]
pub struct CatalogModel {
    /// Items in catalog order.
    pub items: Vec<CatalogItem>,
    index: HashMap<String, usize>,
    /// Feature vectors for every item.
    pub features: FeatureSpace,
}

impl CatalogModel {
    /// Build the index and feature vectors for a catalog snapshot.
    pub fn build(items: Vec<CatalogItem>) -> Self {
        let features = FeatureSpace::build(&items);
        let index = items
            .iter()
            .enumerate()
            .map(|(idx, item)| (item.name.clone(), idx))
            .collect();
        Self {
            items,
            index,
            features,
        }
    }

    /// Look up an item by name.
    pub fn get(&self, name: &str) -> Option<&CatalogItem> {
        self.index.get(name).map(|idx| &self.items[*idx])
    }

    /// Position of an item in catalog order.
    pub fn position(&self, name: &str) -> Option<usize> {
        self.index.get(name).copied()
    }

    /// True when the snapshot has no items.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// User × item weighted interaction matrix plus per-user bookkeeping.
#[derive(Debug, Clone, Default)]
pub struct InteractionMatrix {
    weights: HashMap<String, HashMap<String, f64>>,
    seen: HashMap<String, HashSet<String>>,
    counts: HashMap<String, usize>,
    total: usize,
}

impl InteractionMatrix {
    /// Build the matrix from an interaction history.
    pub fn build(interactions: &[Interaction]) -> Self {
        let mut matrix = Self::default();
        for interaction in interactions {
            matrix.record(interaction);
        }
        matrix
    }

    /// Fold one event into the matrix.
    pub fn record(&mut self, interaction: &Interaction) {
        *self
            .weights
            .entry(interaction.user_id.clone())
            .or_default()
            .entry(interaction.item.clone())
            .or_insert(0.0) += interaction.kind.weight();
        self.seen
            .entry(interaction.user_id.clone())
            .or_default()
            .insert(interaction.item.clone());
        *self.counts.entry(interaction.user_id.clone()).or_insert(0) += 1;
        self.total += 1;
    }

    /// Accumulated item weights for one user.
    pub fn user_items(&self, user_id: &str) -> Option<&HashMap<String, f64>> {
        self.weights.get(user_id)
    }

    /// Whether the user has ever interacted with the item.
    pub fn has_interacted(&self, user_id: &str, item: &str) -> bool {
        self.seen
            .get(user_id)
            .is_some_and(|items| items.contains(item))
    }

    /// Number of events recorded for one user.
    pub fn interaction_count(&self, user_id: &str) -> usize {
        self.counts.get(user_id).copied().unwrap_or(0)
    }

    /// Total events across all users.
    pub fn total(&self) -> usize {
        self.total
    }

    /// Total weighted interaction volume per item, across all users.
    pub fn item_popularity(&self) -> HashMap<&str, f64> {
        let mut popularity: HashMap<&str, f64> = HashMap::new();
        for items in self.weights.values() {
            for (item, weight) in items {
                *popularity.entry(item.as_str()).or_insert(0.0) += weight;
            }
        }
        popularity
    }
}

/// One published model generation.
///
/// Cloning is cheap-ish by design: the catalog model is `Arc`-shared, so
/// `Arc::make_mut` copy-on-write touches only profiles and the matrix.
#[derive(Debug, Clone, Default)]
pub struct ModelState {
    /// Catalog snapshot and feature vectors.
    pub catalog: Arc<CatalogModel>,
    /// Profiles for every user seen in the history.
    pub profiles: HashMap<String, UserProfile>,
    /// Weighted user × item matrix.
    pub matrix: InteractionMatrix,
    /// Publish counter; every swap or copy-on-write commit bumps it.
    pub generation: u64,
}

impl ModelState {
    /// Build a full state from a catalog and interaction history.
    pub fn build(catalog: Vec<CatalogItem>, interactions: &[Interaction], generation: u64) -> Self {
        let catalog = Arc::new(CatalogModel::build(catalog));
        let matrix = InteractionMatrix::build(interactions);

        let mut by_user: HashMap<&str, Vec<&Interaction>> = HashMap::new();
        for interaction in interactions {
            by_user
                .entry(interaction.user_id.as_str())
                .or_default()
                .push(interaction);
        }
        let profiles = by_user
            .into_iter()
            .map(|(user_id, events)| {
                let profile = UserProfile::build(user_id, events, |name| catalog.get(name));
                (user_id.to_string(), profile)
            })
            .collect();

        Self {
            catalog,
            profiles,
            matrix,
            generation,
        }
    }

    /// Fold one event into the matrix and the owning user's profile.
    ///
    /// The profile is created lazily on the user's first event; its embedding
    /// is fully recomputed afterwards.
    pub fn apply_interaction(&mut self, interaction: &Interaction) {
        self.matrix.record(interaction);

        let profile = self
            .profiles
            .entry(interaction.user_id.clone())
            .or_insert_with(|| UserProfile::new(interaction.user_id.clone()));
        match self.catalog.get(&interaction.item) {
            Some(item) => profile.apply_interaction(item, interaction.kind.weight()),
            None => {
                // Event still counts; it just carries no preference signal.
                profile.interaction_count += 1;
            }
        }
    }

    /// Aggregate statistics for exports.
    pub fn stats(&self, training: bool) -> ModelStats {
        let total_users = self.profiles.len();
        let total_interactions = self.matrix.total();
        ModelStats {
            total_users,
            total_interactions,
            total_items: self.catalog.items.len(),
            average_interactions_per_user: total_interactions as f64 / total_users.max(1) as f64,
            training,
            generation: self.generation,
        }
    }
}

/// An item index paired with its ranking score.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoredCandidate {
    /// Position in the catalog snapshot.
    pub index: usize,
    /// Ranking score.
    pub score: f64,
}

/// A ranked candidate list plus the algorithm that produced it.
#[derive(Debug, Clone, PartialEq)]
pub struct Candidates {
    /// Producing algorithm (fallbacks report their own tag).
    pub algorithm: Algorithm,
    /// Candidates, best first.
    pub items: Vec<ScoredCandidate>,
}

/// Sort candidates by score descending, breaking ties on catalog order so
/// rankings are deterministic.
pub(crate) fn sort_candidates(items: &mut [ScoredCandidate]) {
    items.sort_by(|a, b| {
        b.score
            .partial_cmp(&a.score)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| a.index.cmp(&b.index))
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use humidor_test_utils::{interaction, sample_catalog};
    use humidor_types::InteractionKind;

    #[test]
    fn matrix_accumulates_weights_per_user_item() {
        let events = vec![
            interaction("u1", "A", InteractionKind::View),
            interaction("u1", "A", InteractionKind::Favorite),
            interaction("u2", "A", InteractionKind::Click),
        ];
        let matrix = InteractionMatrix::build(&events);
        assert_eq!(matrix.user_items("u1").unwrap().get("A"), Some(&6.0));
        assert_eq!(matrix.user_items("u2").unwrap().get("A"), Some(&2.0));
        assert_eq!(matrix.total(), 3);
    }

    #[test]
    fn popularity_sums_across_users() {
        let events = vec![
            interaction("u1", "A", InteractionKind::Favorite),
            interaction("u2", "A", InteractionKind::Purchase),
            interaction("u2", "B", InteractionKind::View),
        ];
        let matrix = InteractionMatrix::build(&events);
        let popularity = matrix.item_popularity();
        assert_eq!(popularity.get("A"), Some(&13.0));
        assert_eq!(popularity.get("B"), Some(&1.0));
    }

    #[test]
    fn state_builds_profiles_per_user() {
        let events = vec![
            interaction("u1", "Midnight Reserve", InteractionKind::Favorite),
            interaction("u2", "Morning Shade", InteractionKind::View),
        ];
        let state = ModelState::build(sample_catalog(), &events, 1);
        assert_eq!(state.profiles.len(), 2);
        assert!(state.profiles["u1"].embedding.is_some());
        assert_eq!(state.generation, 1);
    }

    #[test]
    fn apply_interaction_creates_profile_lazily() {
        let mut state = ModelState::build(sample_catalog(), &[], 1);
        assert!(state.profiles.is_empty());

        state.apply_interaction(&interaction("u1", "Cedar Crown", InteractionKind::Click));
        assert_eq!(state.profiles["u1"].interaction_count, 1);
        assert!(state.matrix.has_interacted("u1", "Cedar Crown"));
    }

    #[test]
    fn stats_average_guards_division_by_zero() {
        let state = ModelState::build(sample_catalog(), &[], 7);
        let stats = state.stats(false);
        assert_eq!(stats.total_users, 0);
        assert_eq!(stats.average_interactions_per_user, 0.0);
        assert_eq!(stats.generation, 7);
    }

    #[test]
    fn sort_is_deterministic_on_ties() {
        let mut items = vec![
            ScoredCandidate { index: 3, score: 1.0 },
            ScoredCandidate { index: 1, score: 1.0 },
            ScoredCandidate { index: 2, score: 2.0 },
        ];
        sort_candidates(&mut items);
        let order: Vec<usize> = items.iter().map(|c| c.index).collect();
        assert_eq!(order, vec![2, 1, 3]);
    }
}
