//! Deterministic derivation of the payable total from a cart.
//!
//! The step order is load-bearing: wastage is applied to the subtotal,
//! the discount to subtotal-plus-wastage, and tax to what remains after
//! the discount. Reordering changes the total. No intermediate rounding;
//! two-decimal formatting happens only at presentation.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::pricing::cart::QuotationCart;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CostSummary {
    pub subtotal: Decimal,
    pub wastage_amount: Decimal,
    pub discount_amount: Decimal,
    pub taxable_amount: Decimal,
    pub tax_amount: Decimal,
    pub total: Decimal,
}

pub fn summarize(cart: &QuotationCart) -> CostSummary {
    let subtotal = cart.subtotal();
    let wastage_amount = subtotal * cart.wastage_percent() / Decimal::ONE_HUNDRED;
    let discount_amount =
        (subtotal + wastage_amount) * cart.discount_percent() / Decimal::ONE_HUNDRED;
    let taxable_amount = subtotal + wastage_amount - discount_amount;
    let tax_amount = taxable_amount * cart.tax_percent() / Decimal::ONE_HUNDRED;
    let total = taxable_amount + tax_amount;

    CostSummary { subtotal, wastage_amount, discount_amount, taxable_amount, tax_amount, total }
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;

    use crate::domain::catalog::{Catalog, CatalogItem, CatalogItemId, ItemCategory};
    use crate::domain::series::AreaRateTable;
    use crate::pricing::cart::{AddItemRequest, QuotationCart};

    use super::summarize;

    /// Cart with a single flat line totalling exactly 1000.
    fn cart_with_subtotal_1000() -> QuotationCart {
        let catalog = Catalog::new(vec![CatalogItem {
            id: CatalogItemId("hw-track".to_string()),
            name: "Track Rail 2m".to_string(),
            category: ItemCategory::Hardware,
            base_price: Decimal::from(100),
            attributes: None,
        }]);

        let mut cart = QuotationCart::new();
        cart.add_item(
            &catalog,
            &AreaRateTable::default(),
            AddItemRequest {
                catalog_item_id: CatalogItemId("hw-track".to_string()),
                quantity: 10,
                width_mm: None,
                height_mm: None,
            },
        )
        .expect("add track rails");
        cart
    }

    #[test]
    fn reference_vector_1000_5_10_18() {
        let mut cart = cart_with_subtotal_1000();
        cart.set_wastage_percent(Decimal::from(5)).expect("wastage");
        cart.set_discount_percent(Decimal::from(10)).expect("discount");
        cart.set_tax_percent(Decimal::from(18)).expect("tax");

        let summary = summarize(&cart);

        assert_eq!(summary.subtotal, Decimal::from(1000));
        assert_eq!(summary.wastage_amount, Decimal::from(50));
        // 10% of 1050, not of 1000: the discount applies after wastage.
        assert_eq!(summary.discount_amount, Decimal::from(105));
        assert_eq!(summary.taxable_amount, Decimal::from(945));
        assert_eq!(summary.tax_amount, Decimal::new(17010, 2));
        assert_eq!(summary.total, Decimal::new(111510, 2));
    }

    #[test]
    fn default_knobs_are_5_0_18() {
        let cart = cart_with_subtotal_1000();
        let summary = summarize(&cart);

        assert_eq!(summary.wastage_amount, Decimal::from(50));
        assert_eq!(summary.discount_amount, Decimal::ZERO);
        assert_eq!(summary.taxable_amount, Decimal::from(1050));
        assert_eq!(summary.tax_amount, Decimal::from(189));
        assert_eq!(summary.total, Decimal::from(1239));
    }

    #[test]
    fn empty_cart_summarizes_to_zeroes() {
        let summary = summarize(&QuotationCart::new());

        assert_eq!(summary.subtotal, Decimal::ZERO);
        assert_eq!(summary.total, Decimal::ZERO);
    }

    #[test]
    fn summary_is_deterministic_for_a_fixed_cart() {
        let cart = cart_with_subtotal_1000();
        assert_eq!(summarize(&cart), summarize(&cart));
    }
}
