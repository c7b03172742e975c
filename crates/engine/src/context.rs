//! Contextual re-ranking: multiplicative bonuses per context dimension.

use crate::model::{sort_candidates, CatalogModel, ScoredCandidate};
use humidor_types::{CatalogItem, ContextualFactors, Mood, TimeOfDay, Weather};

/// Bonus table rows: key matches a wrapper, a lowercased strength, or (for
/// moods) a flavor-text substring.
type BonusTable = &'static [(&'static str, f64)];

fn time_of_day_bonuses(time: TimeOfDay) -> BonusTable {
    match time {
        TimeOfDay::Morning => &[("Connecticut", 0.2), ("mild", 0.15)],
        TimeOfDay::Afternoon => &[("Habano", 0.15), ("medium", 0.1)],
        TimeOfDay::Evening => &[("Maduro", 0.25), ("full", 0.2)],
        TimeOfDay::Night => &[("Oscuro", 0.3), ("full", 0.25)],
    }
}

fn weather_bonuses(weather: Weather) -> BonusTable {
    match weather {
        Weather::Sunny => &[("Connecticut", 0.15), ("mild", 0.1)],
        Weather::Cloudy => &[("Habano", 0.1), ("medium", 0.1)],
        Weather::Rainy => &[("Maduro", 0.2), ("full", 0.15)],
        Weather::Cold => &[("Oscuro", 0.25), ("full", 0.2)],
    }
}

fn mood_bonuses(mood: Mood) -> BonusTable {
    match mood {
        Mood::Relaxed => &[("Connecticut", 0.2), ("cream", 0.15)],
        Mood::Energetic => &[("Habano", 0.15), ("spice", 0.1)],
        Mood::Contemplative => &[("Maduro", 0.25), ("chocolate", 0.2)],
        Mood::Celebratory => &[("premium", 0.3), ("complex", 0.25)],
    }
}

/// Sum of bonuses whose key matches the item's wrapper or strength.
fn wrapper_strength_bonus(item: &CatalogItem, table: BonusTable) -> f64 {
    let strength = item.strength.as_ref().map(|s| s.to_lowercase());
    table
        .iter()
        .filter(|(key, _)| item.wrapper == *key || strength.as_deref() == Some(*key))
        .map(|(_, bonus)| bonus)
        .sum()
}

/// Sum of mood bonuses: wrapper match plus flavor-text substring matches.
fn mood_bonus(item: &CatalogItem, table: BonusTable) -> f64 {
    let flavor = item.flavor.as_ref().map(|f| f.to_lowercase());
    table
        .iter()
        .map(|(key, bonus)| {
            let mut total = 0.0;
            if item.wrapper == *key {
                total += bonus;
            }
            if flavor.as_deref().is_some_and(|text| text.contains(key)) {
                total += bonus;
            }
            total
        })
        .sum()
}

/// Total contextual bonus fraction for one item.
pub fn bonus_for(item: &CatalogItem, factors: &ContextualFactors) -> f64 {
    let mut bonus = 0.0;
    if let Some(time) = factors.time_of_day {
        bonus += wrapper_strength_bonus(item, time_of_day_bonuses(time));
    }
    if let Some(weather) = factors.weather {
        bonus += wrapper_strength_bonus(item, weather_bonuses(weather));
    }
    if let Some(mood) = factors.mood {
        bonus += mood_bonus(item, mood_bonuses(mood));
    }
    bonus
}

/// Rescale every candidate by `1 + bonus` and re-sort. Absent factors are a
/// no-op.
pub fn apply(
    candidates: &mut Vec<ScoredCandidate>,
    factors: &ContextualFactors,
    catalog: &CatalogModel,
) {
    if factors.is_empty() {
        return;
    }
    for candidate in candidates.iter_mut() {
        let item = &catalog.items[candidate.index];
        candidate.score *= 1.0 + bonus_for(item, factors);
    }
    sort_candidates(candidates);
}

#[cfg(test)]
mod tests {
    use super::*;
    use humidor_types::CatalogItem;

    fn maduro_full() -> CatalogItem {
        CatalogItem {
            strength: Some("Full".into()),
            flavor: Some("dark chocolate".into()),
            ..CatalogItem::new("A", "Maduro")
        }
    }

    #[test]
    fn evening_boosts_maduro_and_full() {
        let factors = ContextualFactors {
            time_of_day: Some(TimeOfDay::Evening),
            ..Default::default()
        };
        // Wrapper bonus 0.25 plus strength bonus 0.2.
        assert!((bonus_for(&maduro_full(), &factors) - 0.45).abs() < 1e-12);
    }

    #[test]
    fn mood_matches_flavor_substring() {
        let factors = ContextualFactors {
            mood: Some(Mood::Contemplative),
            ..Default::default()
        };
        // Maduro wrapper 0.25 plus "chocolate" in flavor text 0.2.
        assert!((bonus_for(&maduro_full(), &factors) - 0.45).abs() < 1e-12);
    }

    #[test]
    fn unmatched_context_adds_nothing() {
        let factors = ContextualFactors {
            time_of_day: Some(TimeOfDay::Morning),
            ..Default::default()
        };
        assert_eq!(bonus_for(&maduro_full(), &factors), 0.0);
    }

    #[test]
    fn factors_stack_across_dimensions() {
        let factors = ContextualFactors {
            time_of_day: Some(TimeOfDay::Evening),
            weather: Some(Weather::Rainy),
            mood: Some(Mood::Contemplative),
        };
        let expected = 0.45 + 0.35 + 0.45;
        assert!((bonus_for(&maduro_full(), &factors) - expected).abs() < 1e-12);
    }

    #[test]
    fn apply_rescales_and_resorts() {
        let catalog = CatalogModel::build(vec![
            maduro_full(),
            CatalogItem {
                strength: Some("Mild".into()),
                ..CatalogItem::new("B", "Connecticut")
            },
        ]);
        let mut candidates = vec![
            ScoredCandidate { index: 1, score: 1.0 },
            ScoredCandidate { index: 0, score: 0.8 },
        ];
        let factors = ContextualFactors {
            time_of_day: Some(TimeOfDay::Evening),
            ..Default::default()
        };
        apply(&mut candidates, &factors, &catalog);
        // 0.8 * 1.45 = 1.16 outranks the unboosted 1.0.
        assert_eq!(candidates[0].index, 0);
        assert!((candidates[0].score - 1.16).abs() < 1e-12);
        assert_eq!(candidates[1].score, 1.0);
    }

    #[test]
    fn empty_factors_are_a_no_op() {
        let catalog = CatalogModel::build(vec![maduro_full()]);
        let mut candidates = vec![ScoredCandidate { index: 0, score: 2.0 }];
        apply(&mut candidates, &ContextualFactors::default(), &catalog);
        assert_eq!(candidates[0].score, 2.0);
    }
}
