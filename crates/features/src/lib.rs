//! Vocabulary extraction, feature vectors, and similarity math.
//!
//! This crate turns an ordered catalog snapshot into fixed-length numeric
//! feature vectors and provides the cosine-similarity primitive the models
//! are built on. It has no knowledge of users or interactions; the profile
//! sub-space module only defines the shared slot layout that user embeddings
//! and item projections meet in.
//!
//! # Examples
//!
//! ```
//! use humidor_features::FeatureSpace;
//! use humidor_types::CatalogItem;
//!
//! let catalog = vec![
//!     CatalogItem {
//!         flavor: Some("chocolate and spice".into()),
//!         price: Some(10.0),
//!         ..CatalogItem::new("A", "Maduro")
//!     },
//!     CatalogItem {
//!         flavor: Some("cream and vanilla".into()),
//!         price: Some(20.0),
//!         ..CatalogItem::new("B", "Connecticut")
//!     },
//! ];
//!
//! let space = FeatureSpace::build(&catalog);
//! assert_eq!(space.vector("A").unwrap().len(), space.dimension());
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

/// Shared slot layout for user embeddings and item projections.
pub mod profile_space;
/// Cosine similarity over equal-length vectors.
pub mod similarity;
/// Feature-vector construction from a catalog snapshot.
pub mod space;
/// One-hot and flavor-term vocabularies.
pub mod vocabulary;

pub use profile_space::{
    profile_dimension, project_item, unit_normalize, COMMON_FLAVOR_KEYWORDS, PROFILE_FLAVOR_SLOTS,
    PROFILE_STRENGTHS, PROFILE_WRAPPERS,
};
pub use similarity::cosine_similarity;
pub use space::FeatureSpace;
pub use vocabulary::{tokenize, CatalogVocabulary, VectorLayout};
