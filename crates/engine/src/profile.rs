//! User profiles: preference buckets and derived embeddings.

use humidor_features::{
    unit_normalize, COMMON_FLAVOR_KEYWORDS, PROFILE_FLAVOR_SLOTS, PROFILE_STRENGTHS,
    PROFILE_WRAPPERS,
};
use humidor_types::{CatalogItem, Interaction};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Preference weight buckets accumulated from weighted interactions.
///
/// Weights can go negative (negative ratings subtract signal).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PreferenceWeights {
    /// Wrapper type → accumulated weight.
    pub wrappers: HashMap<String, f64>,
    /// Strength → accumulated weight.
    pub strengths: HashMap<String, f64>,
    /// Origin → accumulated weight.
    pub origins: HashMap<String, f64>,
    /// Flavor keyword → accumulated weight.
    pub flavors: HashMap<String, f64>,
}

/// One user's aggregated taste profile.
///
/// The embedding lives in the fixed profile sub-space (five wrapper slots,
/// three strength slots, the ten strongest flavor keywords) and is fully
/// recomputed from the buckets after every change, never patched
/// incrementally. `None` means the buckets carry no signal yet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    /// User this profile belongs to.
    pub user_id: String,
    /// Accumulated preference buckets.
    pub preferences: PreferenceWeights,
    /// Unit-normalized embedding, or `None` without signal.
    pub embedding: Option<Vec<f64>>,
    /// Number of interactions folded into this profile.
    pub interaction_count: usize,
}

impl UserProfile {
    /// Empty cold-start profile.
    pub fn new(user_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            preferences: PreferenceWeights::default(),
            embedding: None,
            interaction_count: 0,
        }
    }

    /// Build a profile from a user's interaction history.
    ///
    /// Events referring to items absent from the catalog still count toward
    /// `interaction_count` but contribute no preference signal.
    pub fn build<'a>(
        user_id: &str,
        interactions: impl IntoIterator<Item = &'a Interaction>,
        lookup: impl Fn(&str) -> Option<&'a CatalogItem>,
    ) -> Self {
        let mut profile = Self::new(user_id);
        for interaction in interactions {
            profile.interaction_count += 1;
            if let Some(item) = lookup(&interaction.item) {
                profile.accumulate(item, interaction.kind.weight());
            }
        }
        profile.recompute_embedding();
        profile
    }

    /// Fold one interaction into the buckets and refresh the embedding.
    pub fn apply_interaction(&mut self, item: &CatalogItem, weight: f64) {
        self.interaction_count += 1;
        self.accumulate(item, weight);
        self.recompute_embedding();
    }

    fn accumulate(&mut self, item: &CatalogItem, weight: f64) {
        *self
            .preferences
            .wrappers
            .entry(item.wrapper.clone())
            .or_insert(0.0) += weight;

        if let Some(strength) = &item.strength {
            *self
                .preferences
                .strengths
                .entry(strength.clone())
                .or_insert(0.0) += weight;
        }
        if let Some(origin) = &item.origin {
            *self
                .preferences
                .origins
                .entry(origin.clone())
                .or_insert(0.0) += weight;
        }
        if let Some(flavor) = &item.flavor {
            let text = flavor.to_lowercase();
            for keyword in COMMON_FLAVOR_KEYWORDS {
                if text.contains(keyword) {
                    *self
                        .preferences
                        .flavors
                        .entry(keyword.to_string())
                        .or_insert(0.0) += weight;
                }
            }
        }
    }

    /// The user's strongest flavor keywords, highest weight first.
    ///
    /// Ties break on the keyword itself so the embedding layout is
    /// deterministic.
    pub fn top_flavor_terms(&self) -> Vec<String> {
        let mut entries: Vec<(&String, f64)> = self
            .preferences
            .flavors
            .iter()
            .map(|(term, weight)| (term, *weight))
            .collect();
        entries.sort_by(|a, b| {
            b.1.partial_cmp(&a.1)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| a.0.cmp(b.0))
        });
        entries
            .into_iter()
            .take(PROFILE_FLAVOR_SLOTS)
            .map(|(term, _)| term.clone())
            .collect()
    }

    /// Fully recompute the embedding from the current buckets.
    pub fn recompute_embedding(&mut self) {
        let mut embedding =
            Vec::with_capacity(PROFILE_WRAPPERS.len() + PROFILE_STRENGTHS.len() + PROFILE_FLAVOR_SLOTS);

        for wrapper in PROFILE_WRAPPERS {
            embedding.push(self.preferences.wrappers.get(wrapper).copied().unwrap_or(0.0));
        }
        for strength in PROFILE_STRENGTHS {
            embedding.push(
                self.preferences
                    .strengths
                    .get(strength)
                    .copied()
                    .unwrap_or(0.0),
            );
        }

        let mut flavor_weights: Vec<f64> = self.preferences.flavors.values().copied().collect();
        flavor_weights.sort_by(|a, b| b.partial_cmp(a).unwrap_or(std::cmp::Ordering::Equal));
        flavor_weights.resize(PROFILE_FLAVOR_SLOTS, 0.0);
        embedding.extend(flavor_weights);

        self.embedding = if unit_normalize(&mut embedding) {
            Some(embedding)
        } else {
            None
        };
    }
}
