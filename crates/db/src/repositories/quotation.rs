use std::str::FromStr;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::sqlite::SqliteRow;
use sqlx::Row;
use uuid::Uuid;

use aluquote_core::domain::catalog::{CatalogItemId, ItemCategory};
use aluquote_core::domain::customer::CustomerDetails;
use aluquote_core::domain::quotation::{
    LineItem, LinePricing, QuotationDocument, QuotationId, QuotationStatus,
};
use aluquote_core::pricing::summary::CostSummary;

use super::{QuotationRepository, RepositoryError};
use crate::DbPool;

/// Saved quotation documents. A document and its lines are written in one
/// transaction; `save` replaces any previous revision of the same id.
pub struct SqlQuotationRepository {
    pool: DbPool,
}

impl SqlQuotationRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    async fn lines_for(&self, quotation_id: &str) -> Result<Vec<LineItem>, RepositoryError> {
        let rows = sqlx::query(
            "SELECT catalog_item_id, name, category, pricing, quantity, unit_price, total_price
             FROM quotation_line WHERE quotation_id = ? ORDER BY position",
        )
        .bind(quotation_id)
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(decode_line).collect()
    }
}

fn decode_decimal(row: &SqliteRow, column: &str) -> Result<Decimal, RepositoryError> {
    let raw: String = row.get(column);
    Decimal::from_str(&raw)
        .map_err(|error| RepositoryError::Decode(format!("invalid {column}: {error}")))
}

fn decode_line(row: &SqliteRow) -> Result<LineItem, RepositoryError> {
    let category_raw: String = row.get("category");
    let category = ItemCategory::from_str(&category_raw).map_err(RepositoryError::Decode)?;

    let pricing_raw: String = row.get("pricing");
    let pricing: LinePricing = serde_json::from_str(&pricing_raw)
        .map_err(|error| RepositoryError::Decode(format!("invalid line pricing: {error}")))?;

    let quantity: i64 = row.get("quantity");
    let quantity = u32::try_from(quantity)
        .map_err(|_| RepositoryError::Decode(format!("invalid quantity {quantity}")))?;

    Ok(LineItem {
        catalog_item_id: CatalogItemId(row.get("catalog_item_id")),
        name: row.get("name"),
        category,
        pricing,
        quantity,
        unit_price: decode_decimal(row, "unit_price")?,
        total_price: decode_decimal(row, "total_price")?,
    })
}

fn decode_document(row: &SqliteRow, items: Vec<LineItem>) -> Result<QuotationDocument, RepositoryError> {
    let id_raw: String = row.get("id");
    let id = Uuid::parse_str(&id_raw)
        .map_err(|error| RepositoryError::Decode(format!("invalid quotation id: {error}")))?;

    let date_raw: String = row.get("date");
    let date = DateTime::parse_from_rfc3339(&date_raw)
        .map_err(|error| RepositoryError::Decode(format!("invalid quotation date: {error}")))?
        .with_timezone(&Utc);

    let status_raw: String = row.get("status");
    let status = QuotationStatus::from_str(&status_raw).map_err(RepositoryError::Decode)?;

    let summary = CostSummary {
        subtotal: decode_decimal(row, "subtotal")?,
        wastage_amount: decode_decimal(row, "wastage_amount")?,
        discount_amount: decode_decimal(row, "discount_amount")?,
        taxable_amount: decode_decimal(row, "taxable_amount")?,
        tax_amount: decode_decimal(row, "tax_amount")?,
        total: decode_decimal(row, "total")?,
    };

    Ok(QuotationDocument {
        id: QuotationId(id),
        customer: CustomerDetails {
            name: row.get("customer_name"),
            email: row.get("customer_email"),
            phone: row.get("customer_phone"),
            address: row.get("customer_address"),
        },
        date,
        status,
        items,
        notes: row.get("notes"),
        total: summary.total,
        summary,
    })
}

const DOCUMENT_COLUMNS: &str = "id, customer_name, customer_email, customer_phone, \
     customer_address, date, status, notes, subtotal, wastage_amount, discount_amount, \
     taxable_amount, tax_amount, total";

#[async_trait::async_trait]
impl QuotationRepository for SqlQuotationRepository {
    async fn find_by_id(
        &self,
        id: &QuotationId,
    ) -> Result<Option<QuotationDocument>, RepositoryError> {
        let query = format!("SELECT {DOCUMENT_COLUMNS} FROM quotation WHERE id = ?");
        let row = sqlx::query(&query).bind(id.0.to_string()).fetch_optional(&self.pool).await?;

        match row {
            Some(row) => {
                let items = self.lines_for(&id.0.to_string()).await?;
                Ok(Some(decode_document(&row, items)?))
            }
            None => Ok(None),
        }
    }

    async fn list(&self) -> Result<Vec<QuotationDocument>, RepositoryError> {
        let query = format!("SELECT {DOCUMENT_COLUMNS} FROM quotation ORDER BY date DESC");
        let rows = sqlx::query(&query).fetch_all(&self.pool).await?;

        let mut documents = Vec::with_capacity(rows.len());
        for row in &rows {
            let id: String = row.get("id");
            let items = self.lines_for(&id).await?;
            documents.push(decode_document(row, items)?);
        }
        Ok(documents)
    }

    async fn save(&self, document: QuotationDocument) -> Result<(), RepositoryError> {
        let mut tx = self.pool.begin().await?;
        let id = document.id.0.to_string();

        sqlx::query(
            "INSERT INTO quotation (id, customer_name, customer_email, customer_phone,
                 customer_address, date, status, notes, subtotal, wastage_amount,
                 discount_amount, taxable_amount, tax_amount, total)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
             ON CONFLICT(id) DO UPDATE SET
                 customer_name = excluded.customer_name,
                 customer_email = excluded.customer_email,
                 customer_phone = excluded.customer_phone,
                 customer_address = excluded.customer_address,
                 date = excluded.date,
                 status = excluded.status,
                 notes = excluded.notes,
                 subtotal = excluded.subtotal,
                 wastage_amount = excluded.wastage_amount,
                 discount_amount = excluded.discount_amount,
                 taxable_amount = excluded.taxable_amount,
                 tax_amount = excluded.tax_amount,
                 total = excluded.total",
        )
        .bind(&id)
        .bind(&document.customer.name)
        .bind(&document.customer.email)
        .bind(&document.customer.phone)
        .bind(&document.customer.address)
        .bind(document.date.to_rfc3339())
        .bind(document.status.as_str())
        .bind(&document.notes)
        .bind(document.summary.subtotal.to_string())
        .bind(document.summary.wastage_amount.to_string())
        .bind(document.summary.discount_amount.to_string())
        .bind(document.summary.taxable_amount.to_string())
        .bind(document.summary.tax_amount.to_string())
        .bind(document.summary.total.to_string())
        .execute(&mut *tx)
        .await?;

        sqlx::query("DELETE FROM quotation_line WHERE quotation_id = ?")
            .bind(&id)
            .execute(&mut *tx)
            .await?;

        for (position, line) in document.items.iter().enumerate() {
            let pricing = serde_json::to_string(&line.pricing).map_err(|error| {
                RepositoryError::Decode(format!("could not encode line pricing: {error}"))
            })?;

            sqlx::query(
                "INSERT INTO quotation_line (quotation_id, position, catalog_item_id, name,
                     category, pricing, quantity, unit_price, total_price)
                 VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)",
            )
            .bind(&id)
            .bind(position as i64)
            .bind(&line.catalog_item_id.0)
            .bind(&line.name)
            .bind(line.category.as_str())
            .bind(pricing)
            .bind(i64::from(line.quantity))
            .bind(line.unit_price.to_string())
            .bind(line.total_price.to_string())
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;

    use aluquote_core::domain::catalog::{Catalog, CatalogItem, CatalogItemId, ItemCategory};
    use aluquote_core::domain::customer::CustomerDetails;
    use aluquote_core::domain::quotation::{QuotationDocument, QuotationStatus};
    use aluquote_core::domain::series::AreaRateTable;
    use aluquote_core::pricing::cart::{AddItemRequest, QuotationCart};

    use crate::repositories::{QuotationRepository, SqlQuotationRepository};
    use crate::{connect_with_settings, migrations};

    async fn repo() -> SqlQuotationRepository {
        let pool = connect_with_settings("sqlite::memory:", 1, 30).await.expect("connect");
        migrations::run_pending(&pool).await.expect("run migrations");
        SqlQuotationRepository::new(pool)
    }

    fn document() -> QuotationDocument {
        let catalog = Catalog::new(vec![
            CatalogItem {
                id: CatalogItemId("glass-clear-6".to_string()),
                name: "Clear Glass 6mm".to_string(),
                category: ItemCategory::Glass,
                base_price: Decimal::ZERO,
                attributes: None,
            },
            CatalogItem {
                id: CatalogItemId("hw-slider-sl200".to_string()),
                name: "Sliding Mechanism SL-200".to_string(),
                category: ItemCategory::Hardware,
                base_price: Decimal::from(65),
                attributes: None,
            },
        ]);
        let rates = AreaRateTable::default();

        let mut cart = QuotationCart::new();
        cart.add_item(
            &catalog,
            &rates,
            AddItemRequest {
                catalog_item_id: CatalogItemId("glass-clear-6".to_string()),
                quantity: 2,
                width_mm: Some(Decimal::from(900)),
                height_mm: Some(Decimal::from(1100)),
            },
        )
        .expect("add glass");
        cart.add_item(
            &catalog,
            &rates,
            AddItemRequest {
                catalog_item_id: CatalogItemId("hw-slider-sl200".to_string()),
                quantity: 1,
                width_mm: None,
                height_mm: None,
            },
        )
        .expect("add slider");

        QuotationDocument::from_cart(
            &cart,
            CustomerDetails {
                name: "Sharma Interiors".to_string(),
                email: "orders@sharma.example".to_string(),
                phone: Some("+91 98200 00000".to_string()),
                address: None,
            },
            Some("install in week 34".to_string()),
        )
        .expect("build document")
    }

    #[tokio::test]
    async fn save_and_find_round_trips_the_document() {
        let repo = repo().await;
        let document = document();

        repo.save(document.clone()).await.expect("save document");
        let found = repo.find_by_id(&document.id).await.expect("find document");

        assert_eq!(found, Some(document));
    }

    #[tokio::test]
    async fn save_replaces_a_previous_revision() {
        let repo = repo().await;
        let mut document = document();

        repo.save(document.clone()).await.expect("save draft");
        document.mark_sent().expect("draft -> sent");
        repo.save(document.clone()).await.expect("save sent revision");

        let found = repo
            .find_by_id(&document.id)
            .await
            .expect("find document")
            .expect("document should exist");
        assert_eq!(found.status, QuotationStatus::Sent);
        assert_eq!(found.items.len(), 2);

        let all = repo.list().await.expect("list documents");
        assert_eq!(all.len(), 1);
    }

    #[tokio::test]
    async fn missing_document_is_none() {
        let repo = repo().await;
        let document = document();
        let found = repo.find_by_id(&document.id).await.expect("find");
        assert!(found.is_none());
    }
}
