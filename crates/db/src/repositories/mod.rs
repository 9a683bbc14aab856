use async_trait::async_trait;
use thiserror::Error;

use aluquote_core::domain::catalog::{CatalogItem, CatalogItemId};
use aluquote_core::domain::quotation::{QuotationDocument, QuotationId};

pub mod catalog;
pub mod memory;
pub mod quotation;

pub use catalog::SqlCatalogRepository;
pub use memory::{InMemoryCatalogRepository, InMemoryQuotationRepository};
pub use quotation::SqlQuotationRepository;

#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("decode error: {0}")]
    Decode(String),
}

#[async_trait]
pub trait CatalogRepository: Send + Sync {
    async fn find_by_id(&self, id: &CatalogItemId) -> Result<Option<CatalogItem>, RepositoryError>;
    async fn list(&self) -> Result<Vec<CatalogItem>, RepositoryError>;
    async fn save(&self, item: CatalogItem) -> Result<(), RepositoryError>;
}

#[async_trait]
pub trait QuotationRepository: Send + Sync {
    async fn find_by_id(
        &self,
        id: &QuotationId,
    ) -> Result<Option<QuotationDocument>, RepositoryError>;
    async fn list(&self) -> Result<Vec<QuotationDocument>, RepositoryError>;
    async fn save(&self, document: QuotationDocument) -> Result<(), RepositoryError>;
}
