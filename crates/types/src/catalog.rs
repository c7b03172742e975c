//! Catalog item records as supplied by the catalog collaborator.

use serde::{Deserialize, Serialize};

/// A single cigar in the catalog.
///
/// Items are immutable once loaded for a given catalog snapshot; the engine
/// only ever reads them. Optional fields reflect real catalog data, where
/// origin, strength, flavor notes, and pricing are frequently missing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogItem {
    /// Item identity; unique within one catalog snapshot.
    pub name: String,
    /// Wrapper leaf type (e.g. "Maduro", "Connecticut").
    pub wrapper: String,
    /// Country or region of origin.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub origin: Option<String>,
    /// Body/strength designation (e.g. "Mild", "Medium", "Full").
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub strength: Option<String>,
    /// Free-text flavor descriptor.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub flavor: Option<String>,
    /// Retail price.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
    /// Size class on the fixed ordinal scale.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<SizeClass>,
}

impl CatalogItem {
    /// Create an item with only the required fields set.
    pub fn new(name: impl Into<String>, wrapper: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            wrapper: wrapper.into(),
            origin: None,
            strength: None,
            flavor: None,
            price: None,
            size: None,
        }
    }
}

/// Vitola size class mapped to a fixed ordinal scale.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum SizeClass {
    /// Smallest vitolas.
    Petit,
    /// Corona-and-under sizes.
    Small,
    /// The common middle of the range.
    #[default]
    Medium,
    /// Toro/Churchill territory.
    Large,
    /// Gordos and presidentes.
    #[serde(rename = "Extra Large")]
    ExtraLarge,
}

impl SizeClass {
    /// Ordinal value used as a scalar feature.
    pub fn ordinal(self) -> f64 {
        match self {
            SizeClass::Petit => 0.2,
            SizeClass::Small => 0.4,
            SizeClass::Medium => 0.6,
            SizeClass::Large => 0.8,
            SizeClass::ExtraLarge => 1.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn size_ordinals_are_monotonic() {
        let ordered = [
            SizeClass::Petit,
            SizeClass::Small,
            SizeClass::Medium,
            SizeClass::Large,
            SizeClass::ExtraLarge,
        ];
        for pair in ordered.windows(2) {
            assert!(pair[0].ordinal() < pair[1].ordinal());
        }
    }

    #[test]
    fn default_size_is_medium() {
        assert_eq!(SizeClass::default().ordinal(), 0.6);
    }

    #[test]
    fn extra_large_serializes_with_space() {
        let json = serde_json::to_string(&SizeClass::ExtraLarge).unwrap();
        assert_eq!(json, "\"Extra Large\"");
    }

    #[test]
    fn item_deserializes_with_missing_optionals() {
        let item: CatalogItem =
            serde_json::from_str(r#"{"name":"Test Robusto","wrapper":"Habano"}"#).unwrap();
        assert_eq!(item.name, "Test Robusto");
        assert!(item.origin.is_none());
        assert!(item.price.is_none());
    }
}
