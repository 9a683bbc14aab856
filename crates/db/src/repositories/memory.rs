use std::collections::HashMap;

use tokio::sync::RwLock;

use aluquote_core::domain::catalog::{CatalogItem, CatalogItemId};
use aluquote_core::domain::quotation::{QuotationDocument, QuotationId};

use super::{CatalogRepository, QuotationRepository, RepositoryError};

#[derive(Default)]
pub struct InMemoryCatalogRepository {
    items: RwLock<HashMap<String, CatalogItem>>,
}

#[async_trait::async_trait]
impl CatalogRepository for InMemoryCatalogRepository {
    async fn find_by_id(&self, id: &CatalogItemId) -> Result<Option<CatalogItem>, RepositoryError> {
        let items = self.items.read().await;
        Ok(items.get(&id.0).cloned())
    }

    async fn list(&self) -> Result<Vec<CatalogItem>, RepositoryError> {
        let items = self.items.read().await;
        let mut all: Vec<CatalogItem> = items.values().cloned().collect();
        all.sort_by(|a, b| a.id.0.cmp(&b.id.0));
        Ok(all)
    }

    async fn save(&self, item: CatalogItem) -> Result<(), RepositoryError> {
        let mut items = self.items.write().await;
        items.insert(item.id.0.clone(), item);
        Ok(())
    }
}

#[derive(Default)]
pub struct InMemoryQuotationRepository {
    documents: RwLock<HashMap<QuotationId, QuotationDocument>>,
}

#[async_trait::async_trait]
impl QuotationRepository for InMemoryQuotationRepository {
    async fn find_by_id(
        &self,
        id: &QuotationId,
    ) -> Result<Option<QuotationDocument>, RepositoryError> {
        let documents = self.documents.read().await;
        Ok(documents.get(id).cloned())
    }

    async fn list(&self) -> Result<Vec<QuotationDocument>, RepositoryError> {
        let documents = self.documents.read().await;
        let mut all: Vec<QuotationDocument> = documents.values().cloned().collect();
        all.sort_by(|a, b| b.date.cmp(&a.date));
        Ok(all)
    }

    async fn save(&self, document: QuotationDocument) -> Result<(), RepositoryError> {
        let mut documents = self.documents.write().await;
        documents.insert(document.id.clone(), document);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;

    use aluquote_core::domain::catalog::{Catalog, CatalogItem, CatalogItemId, ItemCategory};
    use aluquote_core::domain::customer::CustomerDetails;
    use aluquote_core::domain::quotation::QuotationDocument;
    use aluquote_core::domain::series::AreaRateTable;
    use aluquote_core::pricing::cart::{AddItemRequest, QuotationCart};

    use crate::repositories::{
        CatalogRepository, InMemoryCatalogRepository, InMemoryQuotationRepository,
        QuotationRepository,
    };

    fn sealant() -> CatalogItem {
        CatalogItem {
            id: CatalogItemId("oth-sealant".to_string()),
            name: "Silicon Sealant".to_string(),
            category: ItemCategory::Other,
            base_price: Decimal::new(799, 2),
            attributes: None,
        }
    }

    #[tokio::test]
    async fn in_memory_catalog_round_trip() {
        let repo = InMemoryCatalogRepository::default();
        repo.save(sealant()).await.expect("save item");

        let found = repo.find_by_id(&sealant().id).await.expect("find item");
        assert_eq!(found, Some(sealant()));
        assert_eq!(repo.list().await.expect("list").len(), 1);
    }

    #[tokio::test]
    async fn in_memory_quotation_round_trip() {
        let catalog = Catalog::new(vec![sealant()]);
        let mut cart = QuotationCart::new();
        cart.add_item(
            &catalog,
            &AreaRateTable::default(),
            AddItemRequest {
                catalog_item_id: sealant().id,
                quantity: 4,
                width_mm: None,
                height_mm: None,
            },
        )
        .expect("add sealant");

        let document = QuotationDocument::from_cart(
            &cart,
            CustomerDetails {
                name: "Mehta Glassworks".to_string(),
                email: "site@mehta.example".to_string(),
                phone: None,
                address: None,
            },
            None,
        )
        .expect("build document");

        let repo = InMemoryQuotationRepository::default();
        repo.save(document.clone()).await.expect("save document");

        let found = repo.find_by_id(&document.id).await.expect("find document");
        assert_eq!(found, Some(document));
    }
}
