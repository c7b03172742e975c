//! Shared test fixtures for humidor crates.
//!
//! This crate provides a small, stable sample catalog and interaction
//! builders used across the workspace's unit and integration tests.

use chrono::{DateTime, TimeZone, Utc};
use humidor_types::{CatalogItem, Interaction, InteractionKind, SizeClass};

/// A five-item catalog covering every profile wrapper slot.
///
/// Prices span 8.0..=30.0 so min-max normalization is exercised, and two
/// items share flavor terms so TF-IDF document frequencies differ.
pub fn sample_catalog() -> Vec<CatalogItem> {
    vec![
        CatalogItem {
            origin: Some("Nicaragua".into()),
            strength: Some("Full".into()),
            flavor: Some("dark chocolate and pepper spice".into()),
            price: Some(12.0),
            size: Some(SizeClass::Large),
            ..CatalogItem::new("Midnight Reserve", "Maduro")
        },
        CatalogItem {
            origin: Some("Ecuador".into()),
            strength: Some("Mild".into()),
            flavor: Some("cream and vanilla with honey".into()),
            price: Some(8.0),
            size: Some(SizeClass::Small),
            ..CatalogItem::new("Morning Shade", "Connecticut")
        },
        CatalogItem {
            origin: Some("Nicaragua".into()),
            strength: Some("Medium".into()),
            flavor: Some("cedar and leather with pepper".into()),
            price: Some(15.0),
            size: Some(SizeClass::Medium),
            ..CatalogItem::new("Cedar Crown", "Habano")
        },
        CatalogItem {
            origin: Some("Dominican Republic".into()),
            strength: Some("Medium".into()),
            flavor: Some("nuts and caramel".into()),
            price: Some(18.0),
            size: Some(SizeClass::Medium),
            ..CatalogItem::new("Harvest Gold", "Natural")
        },
        CatalogItem {
            origin: Some("Mexico".into()),
            strength: Some("Full".into()),
            flavor: Some("espresso and dark chocolate".into()),
            price: Some(30.0),
            size: Some(SizeClass::ExtraLarge),
            ..CatalogItem::new("Black Ledger", "Oscuro")
        },
    ]
}

/// Fixed timestamp so fixtures are reproducible.
pub fn fixed_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap()
}

/// Build an interaction at [`fixed_time`].
pub fn interaction(user: &str, item: &str, kind: InteractionKind) -> Interaction {
    Interaction {
        user_id: user.into(),
        item: item.into(),
        kind,
        timestamp: fixed_time(),
        metadata: None,
    }
}

/// Build an interaction offset by `seconds` from [`fixed_time`].
pub fn interaction_at(user: &str, item: &str, kind: InteractionKind, seconds: i64) -> Interaction {
    Interaction {
        timestamp: fixed_time() + chrono::Duration::seconds(seconds),
        ..interaction(user, item, kind)
    }
}
