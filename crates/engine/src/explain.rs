//! Explanations and confidence scores for recommendations.

use crate::profile::UserProfile;
use humidor_features::COMMON_FLAVOR_KEYWORDS;
use humidor_types::{Algorithm, CatalogItem, Confidence};

/// Flavor keywords present (by substring) in the item's flavor text.
pub fn flavor_notes(item: &CatalogItem) -> Vec<&'static str> {
    let Some(flavor) = &item.flavor else {
        return Vec::new();
    };
    let text = flavor.to_lowercase();
    COMMON_FLAVOR_KEYWORDS
        .iter()
        .copied()
        .filter(|keyword| text.contains(keyword))
        .collect()
}

/// Templated explanation for one recommendation.
pub fn explanation(algorithm: Algorithm, item: &CatalogItem) -> String {
    match algorithm {
        Algorithm::Collaborative => format!(
            "Recommended because users with similar tastes enjoyed {} cigars",
            item.wrapper
        ),
        Algorithm::Content => {
            let mut text = format!("Matches your preference for {} wrapper", item.wrapper);
            let notes = flavor_notes(item);
            if !notes.is_empty() {
                text.push_str(&format!(" with {} notes", notes[..notes.len().min(2)].join(" and ")));
            }
            text
        }
        Algorithm::Hybrid => {
            "Great match based on your taste profile and similar users' preferences".to_string()
        }
        Algorithm::Fallback => "Featured cigar selection".to_string(),
        Algorithm::Popularity | Algorithm::Diverse => {
            "Popular choice among cigar enthusiasts".to_string()
        }
    }
}

/// Confidence for one recommendation.
///
/// Base is `min(score / 10, 1)`. A known profile adds up to 0.3 from its
/// interaction count; anonymous callers are scaled down by 0.7. The
/// [`Confidence`] constructor clamps the result into [0, 1].
pub fn confidence(score: f64, profile: Option<&UserProfile>) -> Confidence {
    let mut value = (score / 10.0).min(1.0);
    match profile {
        Some(profile) => {
            value += (profile.interaction_count as f64 / 20.0).min(0.3);
        }
        None => {
            value *= 0.7;
        }
    }
    Confidence::new(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn item() -> CatalogItem {
        CatalogItem {
            flavor: Some("dark chocolate with a pepper finish".into()),
            ..CatalogItem::new("A", "Maduro")
        }
    }

    fn profile_with(interactions: usize) -> UserProfile {
        let mut profile = UserProfile::new("u1");
        profile.interaction_count = interactions;
        profile
    }

    #[test]
    fn content_explanation_names_wrapper_and_notes() {
        let text = explanation(Algorithm::Content, &item());
        assert_eq!(
            text,
            "Matches your preference for Maduro wrapper with chocolate and pepper notes"
        );
    }

    #[test]
    fn content_explanation_without_flavor_omits_notes() {
        let text = explanation(Algorithm::Content, &CatalogItem::new("B", "Habano"));
        assert_eq!(text, "Matches your preference for Habano wrapper");
    }

    #[test]
    fn collaborative_explanation_names_wrapper() {
        let text = explanation(Algorithm::Collaborative, &item());
        assert!(text.contains("Maduro"));
    }

    #[test]
    fn fallback_explanation_is_featured() {
        assert_eq!(
            explanation(Algorithm::Fallback, &item()),
            "Featured cigar selection"
        );
    }

    #[test]
    fn known_profile_adds_interaction_bonus() {
        // score 5 -> base 0.5; one interaction adds 0.05.
        let c = confidence(5.0, Some(&profile_with(1)));
        assert!((c.value() - 0.55).abs() < 1e-12);
    }

    #[test]
    fn interaction_bonus_caps_at_point_three() {
        let low = confidence(5.0, Some(&profile_with(6)));
        let high = confidence(5.0, Some(&profile_with(600)));
        assert!((low.value() - 0.8).abs() < 1e-12);
        assert!((high.value() - 0.8).abs() < 1e-12);
    }

    #[test]
    fn anonymous_confidence_is_scaled_down() {
        let c = confidence(5.0, None);
        assert!((c.value() - 0.35).abs() < 1e-12);
    }

    #[test]
    fn negative_scores_clamp_to_zero() {
        assert_eq!(confidence(-3.0, None).value(), 0.0);
        assert_eq!(confidence(-3.0, Some(&profile_with(0))).value(), 0.0);
    }

    proptest! {
        #[test]
        fn confidence_is_always_in_unit_interval(
            score in -1000.0f64..1000.0,
            interactions in 0usize..10_000,
            anonymous in proptest::bool::ANY,
        ) {
            let profile = profile_with(interactions);
            let c = if anonymous {
                confidence(score, None)
            } else {
                confidence(score, Some(&profile))
            };
            prop_assert!((0.0..=1.0).contains(&c.value()));
        }
    }
}
