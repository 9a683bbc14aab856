//! Deterministic demo catalog used by `seed` and local development.

use rust_decimal::Decimal;

use aluquote_core::domain::catalog::{CatalogItem, CatalogItemId, CategoryAttributes, ItemCategory};

use crate::repositories::{CatalogRepository, RepositoryError};

pub fn demo_catalog() -> Vec<CatalogItem> {
    vec![
        CatalogItem {
            id: CatalogItemId("shutter-sl-25".to_string()),
            name: "Sliding Shutter SL-25".to_string(),
            category: ItemCategory::Shutter,
            base_price: Decimal::ZERO,
            attributes: Some(CategoryAttributes::Shutter {
                material: "aluminum".to_string(),
                thickness_mm: Some(Decimal::new(12, 1)),
            }),
        },
        CatalogItem {
            id: CatalogItemId("frame-of-40".to_string()),
            name: "Outer Frame OF-40".to_string(),
            category: ItemCategory::OuterFrame,
            base_price: Decimal::ZERO,
            attributes: Some(CategoryAttributes::OuterFrame {
                material: "aluminum".to_string(),
                thickness_mm: Some(Decimal::new(15, 1)),
            }),
        },
        CatalogItem {
            id: CatalogItemId("glass-clear-6".to_string()),
            name: "Clear Glass 6mm".to_string(),
            category: ItemCategory::Glass,
            base_price: Decimal::ZERO,
            attributes: Some(CategoryAttributes::Glass {
                thickness_mm: Decimal::from(6),
                tint: None,
            }),
        },
        CatalogItem {
            id: CatalogItemId("glass-tinted-8".to_string()),
            name: "Tinted Glass 8mm".to_string(),
            category: ItemCategory::Glass,
            base_price: Decimal::ZERO,
            attributes: Some(CategoryAttributes::Glass {
                thickness_mm: Decimal::from(8),
                tint: Some("bronze".to_string()),
            }),
        },
        CatalogItem {
            id: CatalogItemId("acc-handle-b".to_string()),
            name: "Handle Type B".to_string(),
            category: ItemCategory::Accessory,
            base_price: Decimal::new(875, 2),
            attributes: Some(CategoryAttributes::Accessory {
                color: Some("matte black".to_string()),
            }),
        },
        CatalogItem {
            id: CatalogItemId("acc-corner-cj101".to_string()),
            name: "Corner Joint CJ-101".to_string(),
            category: ItemCategory::Accessory,
            base_price: Decimal::new(250, 2),
            attributes: None,
        },
        CatalogItem {
            id: CatalogItemId("hw-slider-sl200".to_string()),
            name: "Sliding Mechanism SL-200".to_string(),
            category: ItemCategory::Hardware,
            base_price: Decimal::from(65),
            attributes: Some(CategoryAttributes::Hardware {
                description: Some("twin-track set with rollers".to_string()),
            }),
        },
        CatalogItem {
            id: CatalogItemId("oth-sealant".to_string()),
            name: "Silicon Sealant".to_string(),
            category: ItemCategory::Other,
            base_price: Decimal::new(799, 2),
            attributes: Some(CategoryAttributes::Other {
                description: Some("280ml cartridge, clear".to_string()),
            }),
        },
    ]
}

pub async fn seed_catalog(repo: &dyn CatalogRepository) -> Result<usize, RepositoryError> {
    let items = demo_catalog();
    let count = items.len();
    for item in items {
        repo.save(item).await?;
    }
    Ok(count)
}
