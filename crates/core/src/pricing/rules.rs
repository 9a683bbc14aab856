//! Pure unit-price computation. Nothing here mutates state; carts call in
//! with whatever inputs they stored at add-time.

use rust_decimal::Decimal;

use crate::domain::catalog::{CatalogItem, ItemCategory};
use crate::domain::series::{AreaRateTable, Dimensions, SeriesTier};
use crate::errors::DomainError;

/// Per-category price adjustment. Uniform across categories today; the hook
/// exists so a category can diverge without touching call sites.
pub fn category_multiplier(_category: ItemCategory) -> Decimal {
    Decimal::ONE
}

/// Unit price for a flat-priced line: base price scaled by the series tier
/// and category multipliers.
pub fn flat_unit_price(base_price: Decimal, category: ItemCategory, tier: SeriesTier) -> Decimal {
    base_price * tier.multiplier() * category_multiplier(category)
}

/// Unit price for an area-priced line: (area / 1000 mm²) times the table
/// rate for the category and tier.
pub fn area_unit_price(
    category: ItemCategory,
    tier: SeriesTier,
    dimensions: Dimensions,
    rates: &AreaRateTable,
) -> Result<Decimal, DomainError> {
    let rate = rates.rate(category, tier).ok_or_else(|| {
        DomainError::validation(format!(
            "no area rate configured for {}/{}",
            category.as_str(),
            tier.as_str()
        ))
    })?;
    Ok(dimensions.area_mm2() * rate / Decimal::ONE_THOUSAND)
}

/// Dispatches on the item's category: area-priced categories require
/// dimensions, flat categories ignore any that were supplied.
pub fn unit_price(
    item: &CatalogItem,
    tier: SeriesTier,
    dimensions: Option<Dimensions>,
    rates: &AreaRateTable,
) -> Result<Decimal, DomainError> {
    if item.category.is_area_priced() {
        let dimensions = dimensions.ok_or_else(|| {
            DomainError::validation(format!(
                "item `{}` is area-priced and requires width and height",
                item.name
            ))
        })?;
        area_unit_price(item.category, tier, dimensions, rates)
    } else {
        Ok(flat_unit_price(item.base_price, item.category, tier))
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;

    use crate::domain::catalog::{CatalogItem, CatalogItemId, ItemCategory};
    use crate::domain::series::{AreaRateTable, Dimensions, SeriesTier};
    use crate::errors::DomainError;

    use super::{area_unit_price, flat_unit_price, unit_price};

    fn handle() -> CatalogItem {
        CatalogItem {
            id: CatalogItemId("acc-handle-b".to_string()),
            name: "Handle Type B".to_string(),
            category: ItemCategory::Accessory,
            base_price: Decimal::new(875, 2),
            attributes: None,
        }
    }

    fn glass() -> CatalogItem {
        CatalogItem {
            id: CatalogItemId("glass-clear-6".to_string()),
            name: "Clear Glass 6mm".to_string(),
            category: ItemCategory::Glass,
            base_price: Decimal::ZERO,
            attributes: None,
        }
    }

    #[test]
    fn flat_price_scales_with_tier_multiplier() {
        let base = Decimal::new(875, 2);

        assert_eq!(
            flat_unit_price(base, ItemCategory::Accessory, SeriesTier::Standard),
            Decimal::new(875, 2)
        );
        assert_eq!(
            flat_unit_price(base, ItemCategory::Accessory, SeriesTier::Premium),
            Decimal::new(875, 2) * Decimal::new(125, 2)
        );
    }

    #[test]
    fn glass_standard_reference_price() {
        // Glass/standard at 15 per 1000 mm², 1000mm x 1200mm:
        // area 1,200,000 mm² -> (1,200,000 / 1000) * 15 = 18,000.
        let dims =
            Dimensions::new(Decimal::from(1000), Decimal::from(1200)).expect("valid dimensions");
        let price = area_unit_price(
            ItemCategory::Glass,
            SeriesTier::Standard,
            dims,
            &AreaRateTable::default(),
        )
        .expect("priced");

        assert_eq!(price, Decimal::from(18_000));
    }

    #[test]
    fn zero_or_negative_base_price_is_accepted_as_is() {
        assert_eq!(
            flat_unit_price(Decimal::ZERO, ItemCategory::Hardware, SeriesTier::Luxury),
            Decimal::ZERO
        );
        assert_eq!(
            flat_unit_price(Decimal::from(-5), ItemCategory::Hardware, SeriesTier::Standard),
            Decimal::from(-5)
        );
    }

    #[test]
    fn flat_items_ignore_supplied_dimensions() {
        let dims =
            Dimensions::new(Decimal::from(500), Decimal::from(500)).expect("valid dimensions");
        let price = unit_price(
            &handle(),
            SeriesTier::Standard,
            Some(dims),
            &AreaRateTable::default(),
        )
        .expect("priced");

        assert_eq!(price, handle().base_price);
    }

    #[test]
    fn area_items_without_dimensions_fail_validation() {
        let result = unit_price(&glass(), SeriesTier::Standard, None, &AreaRateTable::default());
        assert!(matches!(result, Err(DomainError::Validation(_))));
    }
}
