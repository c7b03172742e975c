//! Fixed-weight blending of collaborative and content scores.

use crate::model::{sort_candidates, Candidates, ModelState, ScoredCandidate};
use crate::{collaborative, content};
use humidor_types::Algorithm;
use std::collections::HashMap;

/// Blend weight for the collaborative component.
pub const COLLABORATIVE_WEIGHT: f64 = 0.6;

/// Blend weight for the content component.
pub const CONTENT_WEIGHT: f64 = 0.4;

/// Blend a single candidate pair into the hybrid score.
pub fn blend(collaborative_score: f64, content_score: f64) -> f64 {
    COLLABORATIVE_WEIGHT * collaborative_score + CONTENT_WEIGHT * content_score
}

/// Ranked hybrid candidates for a user.
///
/// Both models contribute a pool of `2 * count` candidates; an item present
/// in only one pool scores 0 for the missing component. The full merged
/// ranking is returned so the caller can filter before truncating.
pub fn candidates(state: &ModelState, user: Option<&str>, count: usize) -> Candidates {
    let pool = count.saturating_mul(2);

    let mut collaborative_pool = collaborative::candidates(state, user).items;
    collaborative_pool.truncate(pool);
    let mut content_pool = content::candidates(state, user).items;
    content_pool.truncate(pool);

    let mut combined: HashMap<usize, (f64, f64)> = HashMap::new();
    for candidate in collaborative_pool {
        combined.entry(candidate.index).or_insert((0.0, 0.0)).0 = candidate.score;
    }
    for candidate in content_pool {
        combined.entry(candidate.index).or_insert((0.0, 0.0)).1 = candidate.score;
    }

    let mut items: Vec<ScoredCandidate> = combined
        .into_iter()
        .map(|(index, (collab, content))| ScoredCandidate {
            index,
            score: blend(collab, content),
        })
        .collect();
    sort_candidates(&mut items);

    Candidates {
        algorithm: Algorithm::Hybrid,
        items,
    }
}
