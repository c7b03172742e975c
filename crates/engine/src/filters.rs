//! Conjunctive hard filters over ranked candidates.

use crate::model::{CatalogModel, ScoredCandidate};
use humidor_types::{CatalogItem, RecommendationFilters};

/// True when the item passes every active filter.
///
/// Empty set filters are inactive. An item missing a field an active filter
/// tests (no strength, no origin, no price) fails that filter.
pub fn passes(item: &CatalogItem, filters: &RecommendationFilters) -> bool {
    if !filters.wrappers.is_empty() && !filters.wrappers.contains(&item.wrapper) {
        return false;
    }
    if !filters.strengths.is_empty() {
        match &item.strength {
            Some(strength) if filters.strengths.contains(strength) => {}
            _ => return false,
        }
    }
    if !filters.origins.is_empty() {
        match &item.origin {
            Some(origin) if filters.origins.contains(origin) => {}
            _ => return false,
        }
    }
    if let Some(range) = &filters.price_range {
        if !range.contains(item.price.unwrap_or(0.0)) {
            return false;
        }
    }
    true
}

/// Drop candidates that fail any active filter, preserving rank order.
pub fn apply(candidates: &mut Vec<ScoredCandidate>, filters: &RecommendationFilters, catalog: &CatalogModel) {
    if filters.is_empty() {
        return;
    }
    candidates.retain(|candidate| passes(&catalog.items[candidate.index], filters));
}
