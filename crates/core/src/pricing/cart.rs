//! The in-progress quotation: an ordered list of line items plus the
//! cart-level knobs (series tier, wastage/discount/tax percentages).
//!
//! A cart is owned by exactly one quotation-building session; every
//! operation runs synchronously on the caller's thread. Failed operations
//! leave the cart untouched.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::catalog::{CatalogItemId, CatalogSource};
use crate::domain::quotation::{LineItem, LineKey, LinePricing};
use crate::domain::series::{AreaRateTable, Dimensions, SeriesTier};
use crate::errors::DomainError;
use crate::pricing::rules;

/// A requested addition, as it arrives from the selection UI.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AddItemRequest {
    pub catalog_item_id: CatalogItemId,
    pub quantity: u32,
    pub width_mm: Option<Decimal>,
    pub height_mm: Option<Decimal>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct QuotationCart {
    items: Vec<LineItem>,
    series_tier: SeriesTier,
    wastage_percent: Decimal,
    discount_percent: Decimal,
    tax_percent: Decimal,
}

impl Default for QuotationCart {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            series_tier: SeriesTier::Standard,
            wastage_percent: Decimal::from(5),
            discount_percent: Decimal::ZERO,
            tax_percent: Decimal::from(18),
        }
    }
}

impl QuotationCart {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn items(&self) -> &[LineItem] {
        &self.items
    }

    pub fn series_tier(&self) -> SeriesTier {
        self.series_tier
    }

    pub fn wastage_percent(&self) -> Decimal {
        self.wastage_percent
    }

    pub fn discount_percent(&self) -> Decimal {
        self.discount_percent
    }

    pub fn tax_percent(&self) -> Decimal {
        self.tax_percent
    }

    /// Always recomputed from the lines; never cached.
    pub fn subtotal(&self) -> Decimal {
        self.items.iter().map(|line| line.total_price).sum()
    }

    /// Resolves the catalog item, prices it under the cart's current series
    /// tier, and either merges into an existing line with the same identity
    /// or appends a new one. Returns the affected line.
    ///
    /// A merge increments quantity and keeps the existing line's unit
    /// price; it does not reprice from the new request.
    pub fn add_item(
        &mut self,
        catalog: &dyn CatalogSource,
        rates: &AreaRateTable,
        request: AddItemRequest,
    ) -> Result<&LineItem, DomainError> {
        if request.quantity == 0 {
            return Err(DomainError::validation("quantity must be positive"));
        }

        let item = catalog
            .get(&request.catalog_item_id)
            .ok_or_else(|| DomainError::CatalogItemNotFound(request.catalog_item_id.0.clone()))?;

        let dimensions = if item.category.is_area_priced() {
            let width_mm = request.width_mm.ok_or_else(|| {
                DomainError::validation(format!("item `{}` requires a width in mm", item.name))
            })?;
            let height_mm = request.height_mm.ok_or_else(|| {
                DomainError::validation(format!("item `{}` requires a height in mm", item.name))
            })?;
            Some(Dimensions::new(width_mm, height_mm)?)
        } else {
            // Flat categories ignore any dimensions the caller supplied.
            None
        };

        let key = LineKey { catalog_item_id: item.id.clone(), dimensions };
        if let Some(position) = self.items.iter().position(|line| line.key() == key) {
            let merged_quantity = self.items[position].quantity + request.quantity;
            self.items[position].set_quantity(merged_quantity);
            return Ok(&self.items[position]);
        }

        let unit_price = rules::unit_price(&item, self.series_tier, dimensions, rates)?;
        let pricing = match dimensions {
            Some(dimensions) => LinePricing::Area { dimensions },
            None => LinePricing::Flat { base_price: item.base_price },
        };
        let index = self.items.len();
        self.items.push(LineItem {
            catalog_item_id: item.id,
            name: item.name,
            category: item.category,
            pricing,
            quantity: request.quantity,
            unit_price,
            total_price: Decimal::from(request.quantity) * unit_price,
        });
        Ok(&self.items[index])
    }

    /// Sets the quantity of the matching line. A zero quantity is silently
    /// ignored; removal goes through `remove_item`.
    pub fn update_quantity(&mut self, key: &LineKey, quantity: u32) {
        if quantity == 0 {
            return;
        }
        if let Some(line) = self.items.iter_mut().find(|line| &line.key() == key) {
            line.set_quantity(quantity);
        }
    }

    /// Removes the matching line. Idempotent: a second call with the same
    /// key is a no-op.
    pub fn remove_item(&mut self, key: &LineKey) {
        self.items.retain(|line| &line.key() != key);
    }

    /// Switches the series tier and reprices every line from its stored
    /// inputs (base price or dimensions), preserving order. New prices are
    /// computed up front so a lookup failure leaves the cart unchanged.
    pub fn set_series_tier(
        &mut self,
        rates: &AreaRateTable,
        tier: SeriesTier,
    ) -> Result<(), DomainError> {
        let mut repriced = Vec::with_capacity(self.items.len());
        for line in &self.items {
            let unit_price = match &line.pricing {
                LinePricing::Flat { base_price } => {
                    rules::flat_unit_price(*base_price, line.category, tier)
                }
                LinePricing::Area { dimensions } => {
                    rules::area_unit_price(line.category, tier, *dimensions, rates)?
                }
            };
            repriced.push(unit_price);
        }

        self.series_tier = tier;
        for (line, unit_price) in self.items.iter_mut().zip(repriced) {
            line.set_unit_price(unit_price);
        }
        Ok(())
    }

    pub fn set_wastage_percent(&mut self, percent: Decimal) -> Result<(), DomainError> {
        self.wastage_percent = non_negative_percent("wastage", percent)?;
        Ok(())
    }

    pub fn set_discount_percent(&mut self, percent: Decimal) -> Result<(), DomainError> {
        self.discount_percent = non_negative_percent("discount", percent)?;
        Ok(())
    }

    pub fn set_tax_percent(&mut self, percent: Decimal) -> Result<(), DomainError> {
        self.tax_percent = non_negative_percent("tax", percent)?;
        Ok(())
    }
}

/// Non-negativity is the only bound the engine enforces; the interface may
/// suggest tighter ranges but out-of-range values are accepted here.
fn non_negative_percent(label: &str, percent: Decimal) -> Result<Decimal, DomainError> {
    if percent < Decimal::ZERO {
        return Err(DomainError::validation(format!("{label} percent must be non-negative")));
    }
    Ok(percent)
}
