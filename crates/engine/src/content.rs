//! Content-based scoring: embedding similarity between user and items.

use crate::model::{sort_candidates, Candidates, ModelState, ScoredCandidate};
use humidor_features::{cosine_similarity, project_item};
use humidor_types::Algorithm;
use rand::seq::SliceRandom;
use rand::Rng;

/// Ranked content-based candidates for a user.
///
/// Each catalog item is projected into the profile sub-space and compared
/// against the user's embedding; items the user already touched are skipped.
/// Users without an embedding get the diverse fallback.
pub fn candidates(state: &ModelState, user: Option<&str>) -> Candidates {
    let profile = user.and_then(|u| state.profiles.get(u));
    let Some((user_id, profile)) = user.zip(profile) else {
        return diverse(state);
    };
    let Some(embedding) = &profile.embedding else {
        return diverse(state);
    };

    let top_terms = profile.top_flavor_terms();

    let mut items: Vec<ScoredCandidate> = state
        .catalog
        .items
        .iter()
        .enumerate()
        .filter(|(_, item)| !state.matrix.has_interacted(user_id, &item.name))
        .map(|(index, item)| {
            let projection = project_item(item, &top_terms);
            ScoredCandidate {
                index,
                score: cosine_similarity(embedding, &projection),
            }
        })
        .collect();
    sort_candidates(&mut items);

    Candidates {
        algorithm: Algorithm::Content,
        items,
    }
}

/// Diverse fallback: one random item per wrapper category known to the
/// catalog, each with a random score in [0.5, 1.0).
pub fn diverse(state: &ModelState) -> Candidates {
    let mut rng = rand::thread_rng();
    let mut items = Vec::new();

    for wrapper in &state.catalog.features.vocabulary().wrappers {
        let of_type: Vec<usize> = state
            .catalog
            .items
            .iter()
            .enumerate()
            .filter(|(_, item)| item.wrapper == *wrapper)
            .map(|(index, _)| index)
            .collect();
        if let Some(&index) = of_type.choose(&mut rng) {
            items.push(ScoredCandidate {
                index,
                score: rng.gen_range(0.5..1.0),
            });
        }
    }
    sort_candidates(&mut items);

    Candidates {
        algorithm: Algorithm::Diverse,
        items,
    }
}
