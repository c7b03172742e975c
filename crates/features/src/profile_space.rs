//! The fixed sub-space that user embeddings and item projections share.
//!
//! User embeddings are not built in the full catalog feature space; they use
//! a fixed 18-slot layout: five wrapper slots, three strength slots, and the
//! user's ten strongest flavor-keyword weights. Content scoring projects each
//! catalog item into the same layout so the two sides are always
//! length-compatible.

use humidor_types::CatalogItem;

/// Wrapper slots of the profile sub-space, in order.
pub const PROFILE_WRAPPERS: [&str; 5] = ["Maduro", "Connecticut", "Habano", "Natural", "Oscuro"];

/// Strength slots of the profile sub-space, in order.
pub const PROFILE_STRENGTHS: [&str; 3] = ["Mild", "Medium", "Full"];

/// Number of flavor-keyword slots.
pub const PROFILE_FLAVOR_SLOTS: usize = 10;

/// Common flavor keywords matched (by substring) against flavor text when
/// accumulating preference buckets.
pub const COMMON_FLAVOR_KEYWORDS: [&str; 14] = [
    "chocolate",
    "vanilla",
    "coffee",
    "cedar",
    "leather",
    "spice",
    "pepper",
    "cream",
    "honey",
    "tobacco",
    "earth",
    "wood",
    "nuts",
    "caramel",
];

/// Total dimensionality of the profile sub-space.
pub fn profile_dimension() -> usize {
    PROFILE_WRAPPERS.len() + PROFILE_STRENGTHS.len() + PROFILE_FLAVOR_SLOTS
}

/// Scale a vector to unit length in place.
///
/// Returns `false` (leaving the vector untouched) when the magnitude is
/// zero, which callers treat as "no signal".
pub fn unit_normalize(vector: &mut [f64]) -> bool {
    let magnitude = vector.iter().map(|v| v * v).sum::<f64>().sqrt();
    if magnitude > 0.0 {
        for v in vector.iter_mut() {
            *v /= magnitude;
        }
        true
    } else {
        false
    }
}

/// Project a catalog item into the profile sub-space.
///
/// `top_flavor_terms` are the requesting user's strongest flavor keywords;
/// each slot is 1.0 when the item's flavor text contains that term. Fewer
/// than ten terms leaves the remaining slots at zero.
pub fn project_item(item: &CatalogItem, top_flavor_terms: &[String]) -> Vec<f64> {
    let mut projection = Vec::with_capacity(profile_dimension());

    for wrapper in PROFILE_WRAPPERS {
        projection.push(if item.wrapper == wrapper { 1.0 } else { 0.0 });
    }
    for strength in PROFILE_STRENGTHS {
        projection.push(if item.strength.as_deref() == Some(strength) {
            1.0
        } else {
            0.0
        });
    }

    let flavor = item.flavor.as_ref().map(|f| f.to_lowercase());
    for slot in 0..PROFILE_FLAVOR_SLOTS {
        let hit = top_flavor_terms
            .get(slot)
            .zip(flavor.as_deref())
            .is_some_and(|(term, text)| text.contains(term.as_str()));
        projection.push(if hit { 1.0 } else { 0.0 });
    }

    projection
}
