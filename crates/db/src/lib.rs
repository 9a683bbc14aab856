pub mod connection;
pub mod fixtures;
pub mod migrations;
pub mod repositories;

pub use connection::{connect, connect_with_settings, DbPool};
pub use repositories::{
    CatalogRepository, InMemoryCatalogRepository, InMemoryQuotationRepository,
    QuotationRepository, RepositoryError, SqlCatalogRepository, SqlQuotationRepository,
};
