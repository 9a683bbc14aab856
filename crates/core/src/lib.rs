pub mod config;
pub mod domain;
pub mod errors;
pub mod pricing;

pub use domain::catalog::{
    Catalog, CatalogItem, CatalogItemId, CatalogSource, CategoryAttributes, ItemCategory,
};
pub use domain::customer::CustomerDetails;
pub use domain::quotation::{
    LineItem, LineKey, LinePricing, QuotationDocument, QuotationId, QuotationStatus,
};
pub use domain::series::{AreaRateTable, Dimensions, SeriesTier};
pub use errors::{ApplicationError, DomainError};
pub use pricing::cart::{AddItemRequest, QuotationCart};
pub use pricing::summary::{summarize, CostSummary};
