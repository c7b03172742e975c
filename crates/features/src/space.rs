//! Feature-vector construction from a catalog snapshot.

use crate::vocabulary::{tokenize, CatalogVocabulary, VectorLayout};
use humidor_types::{CatalogItem, SizeClass};
use std::collections::HashMap;

/// Feature vectors for one catalog snapshot.
///
/// Every vector produced by one build shares the same length and segment
/// layout. The only way to get vectors is [`FeatureSpace::build`], which
/// reconstructs all of them together; the vocabulary can therefore never
/// drift out of sync with the vectors mid-session.
#[derive(Debug, Clone, Default)]
pub struct FeatureSpace {
    vocabulary: CatalogVocabulary,
    dimension: usize,
    vectors: HashMap<String, Vec<f64>>,
}

impl FeatureSpace {
    /// Build vocabularies and a feature vector for every catalog item.
    pub fn build(catalog: &[CatalogItem]) -> Self {
        let vocabulary = CatalogVocabulary::build(catalog);
        let layout = vocabulary.layout();
        let dimension = layout.dimension();

        // Document frequency per flavor term, counted by substring
        // containment rather than token match. Intentional approximation
        // carried over from the scoring design.
        let lowered_flavors: Vec<Option<String>> = catalog
            .iter()
            .map(|item| item.flavor.as_ref().map(|f| f.to_lowercase()))
            .collect();
        let doc_freqs: Vec<usize> = vocabulary
            .flavor_terms
            .iter()
            .map(|term| {
                lowered_flavors
                    .iter()
                    .filter(|flavor| flavor.as_deref().is_some_and(|f| f.contains(term.as_str())))
                    .count()
            })
            .collect();

        let (price_min, price_max) = price_bounds(catalog);

        let mut vectors = HashMap::with_capacity(catalog.len());
        for item in catalog {
            let vector = item_vector(
                item,
                &vocabulary,
                &layout,
                &doc_freqs,
                catalog.len(),
                price_min,
                price_max,
            );
            debug_assert_eq!(vector.len(), dimension);
            vectors.insert(item.name.clone(), vector);
        }

        tracing::debug!(
            target: "humidor::features",
            items = vectors.len(),
            dimension,
            flavor_terms = vocabulary.flavor_terms.len(),
            "feature space built"
        );

        Self {
            vocabulary,
            dimension,
            vectors,
        }
    }

    /// Vector length shared by every item in this space.
    pub fn dimension(&self) -> usize {
        self.dimension
    }

    /// Vocabulary the vectors were built against.
    pub fn vocabulary(&self) -> &CatalogVocabulary {
        &self.vocabulary
    }

    /// Feature vector for an item, if it was part of the snapshot.
    pub fn vector(&self, item_name: &str) -> Option<&[f64]> {
        self.vectors.get(item_name).map(|v| v.as_slice())
    }

    /// Number of items with vectors.
    pub fn len(&self) -> usize {
        self.vectors.len()
    }

    /// True when the snapshot had no items.
    pub fn is_empty(&self) -> bool {
        self.vectors.is_empty()
    }
}

/// Min and max price over the catalog; missing prices count as 0.
fn price_bounds(catalog: &[CatalogItem]) -> (f64, f64) {
    let mut min = f64::INFINITY;
    let mut max = f64::NEG_INFINITY;
    for item in catalog {
        let price = item.price.unwrap_or(0.0);
        min = min.min(price);
        max = max.max(price);
    }
    if catalog.is_empty() {
        (0.0, 0.0)
    } else {
        (min, max)
    }
}

fn item_vector(
    item: &CatalogItem,
    vocabulary: &CatalogVocabulary,
    layout: &VectorLayout,
    doc_freqs: &[usize],
    n_docs: usize,
    price_min: f64,
    price_max: f64,
) -> Vec<f64> {
    let mut features = Vec::with_capacity(layout.dimension());

    for wrapper in &vocabulary.wrappers {
        features.push(if item.wrapper == *wrapper { 1.0 } else { 0.0 });
    }
    for origin in &vocabulary.origins {
        features.push(if item.origin.as_deref() == Some(origin.as_str()) {
            1.0
        } else {
            0.0
        });
    }
    for strength in &vocabulary.strengths {
        features.push(if item.strength.as_deref() == Some(strength.as_str()) {
            1.0
        } else {
            0.0
        });
    }

    features.extend(flavor_tfidf(
        item.flavor.as_deref(),
        &vocabulary.flavor_terms,
        doc_freqs,
        n_docs,
    ));

    features.push(normalize_price(
        item.price.unwrap_or(0.0),
        price_min,
        price_max,
    ));
    features.push(item.size.unwrap_or(SizeClass::Medium).ordinal());

    features
}

/// TF-IDF sub-vector over the flavor vocabulary.
///
/// `tf = count(term token) / word_count`, `idf = ln(n / (1 + doc_freq))`.
/// Missing flavor text yields an all-zero segment.
fn flavor_tfidf(
    flavor: Option<&str>,
    terms: &[String],
    doc_freqs: &[usize],
    n_docs: usize,
) -> Vec<f64> {
    let Some(text) = flavor else {
        return vec![0.0; terms.len()];
    };

    let words = tokenize(text);
    if words.is_empty() {
        return vec![0.0; terms.len()];
    }

    let mut counts: HashMap<&str, usize> = HashMap::new();
    for word in &words {
        *counts.entry(word.as_str()).or_insert(0) += 1;
    }

    terms
        .iter()
        .zip(doc_freqs.iter())
        .map(|(term, &df)| {
            let tf = *counts.get(term.as_str()).unwrap_or(&0) as f64 / words.len() as f64;
            let idf = (n_docs as f64 / (1.0 + df as f64)).ln();
            tf * idf
        })
        .collect()
}

/// Min-max price normalization; a flat price distribution maps to 0.
fn normalize_price(price: f64, min: f64, max: f64) -> f64 {
    if max > min {
        (price - min) / (max - min)
    } else {
        0.0
    }
}
