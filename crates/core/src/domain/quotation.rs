use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::catalog::{CatalogItemId, ItemCategory};
use crate::domain::customer::CustomerDetails;
use crate::domain::series::Dimensions;
use crate::errors::DomainError;
use crate::pricing::cart::QuotationCart;
use crate::pricing::summary::{summarize, CostSummary};

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct QuotationId(pub Uuid);

impl QuotationId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for QuotationId {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum QuotationStatus {
    Draft,
    Sent,
    Approved,
    Rejected,
}

impl QuotationStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::Sent => "sent",
            Self::Approved => "approved",
            Self::Rejected => "rejected",
        }
    }
}

impl std::str::FromStr for QuotationStatus {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "draft" => Ok(Self::Draft),
            "sent" => Ok(Self::Sent),
            "approved" => Ok(Self::Approved),
            "rejected" => Ok(Self::Rejected),
            other => Err(format!("unknown quotation status `{other}`")),
        }
    }
}

/// The inputs a line was priced from. Kept on the line so a series switch
/// can reprice from the original inputs instead of applying a delta.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum LinePricing {
    Flat { base_price: Decimal },
    Area { dimensions: Dimensions },
}

impl LinePricing {
    pub fn dimensions(&self) -> Option<Dimensions> {
        match self {
            Self::Flat { .. } => None,
            Self::Area { dimensions } => Some(*dimensions),
        }
    }
}

/// Identity of a line for merge and removal: the catalog item, plus the
/// exact dimensions for area-priced lines.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LineKey {
    pub catalog_item_id: CatalogItemId,
    pub dimensions: Option<Dimensions>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LineItem {
    pub catalog_item_id: CatalogItemId,
    /// Snapshot taken at add-time; later catalog edits do not flow back.
    pub name: String,
    pub category: ItemCategory,
    pub pricing: LinePricing,
    pub quantity: u32,
    pub unit_price: Decimal,
    pub total_price: Decimal,
}

impl LineItem {
    pub fn key(&self) -> LineKey {
        LineKey {
            catalog_item_id: self.catalog_item_id.clone(),
            dimensions: self.pricing.dimensions(),
        }
    }

    pub fn area_mm2(&self) -> Option<Decimal> {
        self.pricing.dimensions().map(|dims| dims.area_mm2())
    }

    pub(crate) fn set_quantity(&mut self, quantity: u32) {
        self.quantity = quantity;
        self.total_price = Decimal::from(quantity) * self.unit_price;
    }

    pub(crate) fn set_unit_price(&mut self, unit_price: Decimal) {
        self.unit_price = unit_price;
        self.total_price = Decimal::from(self.quantity) * unit_price;
    }
}

/// Frozen snapshot of a cart plus customer fields. Line items and the cost
/// summary are copies: mutating the originating cart afterwards does not
/// change an already-built document.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct QuotationDocument {
    pub id: QuotationId,
    pub customer: CustomerDetails,
    pub date: DateTime<Utc>,
    pub status: QuotationStatus,
    pub items: Vec<LineItem>,
    pub notes: Option<String>,
    pub summary: CostSummary,
    pub total: Decimal,
}

impl QuotationDocument {
    pub fn from_cart(
        cart: &QuotationCart,
        customer: CustomerDetails,
        notes: Option<String>,
    ) -> Result<Self, DomainError> {
        customer.validate()?;
        if cart.items().is_empty() {
            return Err(DomainError::validation("a quotation needs at least one line item"));
        }

        let summary = summarize(cart);
        Ok(Self {
            id: QuotationId::new(),
            customer,
            date: Utc::now(),
            status: QuotationStatus::Draft,
            items: cart.items().to_vec(),
            notes,
            total: summary.total,
            summary,
        })
    }

    pub fn can_transition_to(&self, next: QuotationStatus) -> bool {
        matches!(
            (self.status, next),
            (QuotationStatus::Draft, QuotationStatus::Sent)
                | (QuotationStatus::Sent, QuotationStatus::Approved)
                | (QuotationStatus::Sent, QuotationStatus::Rejected)
        )
    }

    pub fn transition_to(&mut self, next: QuotationStatus) -> Result<(), DomainError> {
        if self.can_transition_to(next) {
            self.status = next;
            return Ok(());
        }

        Err(DomainError::InvalidStatusTransition { from: self.status, to: next })
    }

    /// Records the send action. Dispatching the email itself is a
    /// collaborator concern.
    pub fn mark_sent(&mut self) -> Result<(), DomainError> {
        self.transition_to(QuotationStatus::Sent)
    }
}
