//! Vocabularies derived from one catalog snapshot.

use humidor_types::CatalogItem;
use std::collections::HashSet;

/// Seed list of common flavor descriptors; the catalog extends it.
const SEED_FLAVOR_TERMS: &[&str] = &[
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
    "cocoa",
    "fruit",
    "citrus",
    "berry",
    "cherry",
    "apple",
    "floral",
    "herb",
    "mint",
    "sweet",
    "bitter",
    "salty",
    "umami",
    "smoky",
    "ash",
    "barnyard",
    "hay",
];

/// Minimum length for a flavor-text word to join the vocabulary.
const MIN_TERM_LEN: usize = 4;

/// Split free text into lowercase word tokens.
///
/// Punctuation is treated as whitespace; underscores and digits survive, the
/// same way the flavor texts are tokenized for TF counting.
pub fn tokenize(text: &str) -> Vec<String> {
    text.to_lowercase()
        .split(|c: char| !c.is_alphanumeric() && c != '_')
        .filter(|s| !s.is_empty())
        .map(|s| s.to_string())
        .collect()
}

/// Segment sizes of a feature vector, in order.
///
/// The layout is wrapper one-hot, origin one-hot, strength one-hot, flavor
/// TF-IDF, then two scalar features (price, size).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VectorLayout {
    /// Wrapper one-hot width.
    pub wrappers: usize,
    /// Origin one-hot width.
    pub origins: usize,
    /// Strength one-hot width.
    pub strengths: usize,
    /// Flavor TF-IDF width.
    pub flavor_terms: usize,
}

impl VectorLayout {
    /// Scalar features appended after the categorical segments.
    pub const SCALARS: usize = 2;

    /// Total vector length for this layout.
    pub fn dimension(&self) -> usize {
        self.wrappers + self.origins + self.strengths + self.flavor_terms + Self::SCALARS
    }

    /// Offset of the flavor segment.
    pub fn flavor_offset(&self) -> usize {
        self.wrappers + self.origins + self.strengths
    }
}

/// Vocabularies extracted from one catalog snapshot.
///
/// Order is first-seen catalog order, which keeps the layout deterministic
/// for a given ordered snapshot. Vectors from different vocabularies are
/// never comparable; a catalog change requires rebuilding every vector
/// together.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CatalogVocabulary {
    /// Unique wrapper values.
    pub wrappers: Vec<String>,
    /// Unique origin values.
    pub origins: Vec<String>,
    /// Unique strength values.
    pub strengths: Vec<String>,
    /// Seed flavor terms plus catalog-discovered words.
    pub flavor_terms: Vec<String>,
}

impl CatalogVocabulary {
    /// Extract vocabularies from the catalog.
    pub fn build(catalog: &[CatalogItem]) -> Self {
        let mut wrappers = Vec::new();
        let mut origins = Vec::new();
        let mut strengths = Vec::new();
        let mut seen_wrappers = HashSet::new();
        let mut seen_origins = HashSet::new();
        let mut seen_strengths = HashSet::new();

        for item in catalog {
            if seen_wrappers.insert(item.wrapper.clone()) {
                wrappers.push(item.wrapper.clone());
            }
            if let Some(origin) = &item.origin {
                if seen_origins.insert(origin.clone()) {
                    origins.push(origin.clone());
                }
            }
            if let Some(strength) = &item.strength {
                if seen_strengths.insert(strength.clone()) {
                    strengths.push(strength.clone());
                }
            }
        }

        let mut flavor_terms: Vec<String> =
            SEED_FLAVOR_TERMS.iter().map(|s| s.to_string()).collect();
        let mut seen_terms: HashSet<String> = flavor_terms.iter().cloned().collect();
        for item in catalog {
            if let Some(flavor) = &item.flavor {
                for word in tokenize(flavor) {
                    if word.len() >= MIN_TERM_LEN && seen_terms.insert(word.clone()) {
                        flavor_terms.push(word);
                    }
                }
            }
        }

        Self {
            wrappers,
            origins,
            strengths,
            flavor_terms,
        }
    }

    /// Segment layout for vectors built against this vocabulary.
    pub fn layout(&self) -> VectorLayout {
        VectorLayout {
            wrappers: self.wrappers.len(),
            origins: self.origins.len(),
            strengths: self.strengths.len(),
            flavor_terms: self.flavor_terms.len(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(name: &str, wrapper: &str, flavor: Option<&str>) -> CatalogItem {
        CatalogItem {
            flavor: flavor.map(|s| s.to_string()),
            ..CatalogItem::new(name, wrapper)
        }
    }

    #[test]
    fn tokenize_strips_punctuation() {
        assert_eq!(
            tokenize("Rich, dark chocolate; hints of spice!"),
            vec!["rich", "dark", "chocolate", "hints", "of", "spice"]
        );
    }

    #[test]
    fn vocabulary_dedups_in_first_seen_order() {
        let catalog = vec![
            item("A", "Maduro", None),
            item("B", "Connecticut", None),
            item("C", "Maduro", None),
        ];
        let vocab = CatalogVocabulary::build(&catalog);
        assert_eq!(vocab.wrappers, vec!["Maduro", "Connecticut"]);
    }

    #[test]
    fn flavor_vocabulary_extends_seed_with_long_words() {
        let catalog = vec![item("A", "Maduro", Some("bold espresso and figs"))];
        let vocab = CatalogVocabulary::build(&catalog);
        assert!(vocab.flavor_terms.contains(&"espresso".to_string()));
        assert!(vocab.flavor_terms.contains(&"bold".to_string()));
        assert!(vocab.flavor_terms.contains(&"figs".to_string()));
        // three letters and under stay out
        assert!(!vocab.flavor_terms.contains(&"and".to_string()));
    }

    #[test]
    fn seed_terms_are_not_duplicated() {
        let catalog = vec![item("A", "Maduro", Some("chocolate chocolate chocolate"))];
        let vocab = CatalogVocabulary::build(&catalog);
        let count = vocab
            .flavor_terms
            .iter()
            .filter(|t| t.as_str() == "chocolate")
            .count();
        assert_eq!(count, 1);
    }

    #[test]
    fn layout_dimension_accounts_for_scalars() {
        let catalog = vec![item("A", "Maduro", None)];
        let vocab = CatalogVocabulary::build(&catalog);
        let layout = vocab.layout();
        assert_eq!(
            layout.dimension(),
            layout.wrappers + layout.origins + layout.strengths + layout.flavor_terms + 2
        );
    }
}
