//! Collaborative filtering: score unseen items by similar users' activity.

use crate::model::{sort_candidates, Candidates, ModelState, ScoredCandidate};
use crate::profile::UserProfile;
use humidor_features::cosine_similarity;
use humidor_types::Algorithm;
use std::collections::HashMap;

/// Minimum embedding similarity for a user to count as a neighbor.
pub const SIMILARITY_THRESHOLD: f64 = 0.1;

/// Cap on the similar-user candidate pool.
pub const MAX_SIMILAR_USERS: usize = 50;

/// Ranked collaborative candidates for a user.
///
/// Users without a profile or without any interactions get the global
/// popularity ranking instead (cold start).
pub fn candidates(state: &ModelState, user: Option<&str>) -> Candidates {
    let Some(user_id) = user else {
        return popularity(state);
    };
    let Some(profile) = state.profiles.get(user_id) else {
        return popularity(state);
    };
    if state.matrix.interaction_count(user_id) == 0 {
        return popularity(state);
    }

    let neighbors = find_similar_users(state, user_id, profile);

    let mut scores: HashMap<usize, f64> = HashMap::new();
    for (neighbor_id, similarity) in &neighbors {
        let Some(items) = state.matrix.user_items(neighbor_id) else {
            continue;
        };
        for (item, weight) in items {
            if state.matrix.has_interacted(user_id, item) {
                continue;
            }
            if let Some(index) = state.catalog.position(item) {
                *scores.entry(index).or_insert(0.0) += similarity * weight;
            }
        }
    }

    let mut items: Vec<ScoredCandidate> = scores
        .into_iter()
        .map(|(index, score)| ScoredCandidate { index, score })
        .collect();
    sort_candidates(&mut items);

    Candidates {
        algorithm: Algorithm::Collaborative,
        items,
    }
}

/// Users whose embeddings are close to the given profile, most similar
/// first, thresholded and capped.
pub fn find_similar_users(
    state: &ModelState,
    user_id: &str,
    profile: &UserProfile,
) -> Vec<(String, f64)> {
    let Some(embedding) = &profile.embedding else {
        return Vec::new();
    };

    let mut similarities: Vec<(String, f64)> = state
        .profiles
        .iter()
        .filter(|(other_id, _)| other_id.as_str() != user_id)
        .filter_map(|(other_id, other)| {
            let other_embedding = other.embedding.as_ref()?;
            let similarity = cosine_similarity(embedding, other_embedding);
            (similarity > SIMILARITY_THRESHOLD).then(|| (other_id.clone(), similarity))
        })
        .collect();

    similarities.sort_by(|a, b| {
        b.1.partial_cmp(&a.1)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| a.0.cmp(&b.0))
    });
    similarities.truncate(MAX_SIMILAR_USERS);
    similarities
}

/// Global ranking by total weighted interaction volume; excludes nothing.
pub fn popularity(state: &ModelState) -> Candidates {
    let mut items: Vec<ScoredCandidate> = state
        .matrix
        .item_popularity()
        .into_iter()
        .filter_map(|(item, score)| {
            state
                .catalog
                .position(item)
                .map(|index| ScoredCandidate { index, score })
        })
        .collect();
    sort_candidates(&mut items);

    Candidates {
        algorithm: Algorithm::Popularity,
        items,
    }
}
