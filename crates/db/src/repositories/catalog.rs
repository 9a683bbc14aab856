use std::str::FromStr;

use rust_decimal::Decimal;
use sqlx::sqlite::SqliteRow;
use sqlx::Row;

use aluquote_core::domain::catalog::{CatalogItem, CatalogItemId, CategoryAttributes, ItemCategory};

use super::{CatalogRepository, RepositoryError};
use crate::DbPool;

/// Catalog reference data in SQLite. Prices are stored as TEXT and parsed
/// back into `Decimal` to keep values exact.
pub struct SqlCatalogRepository {
    pool: DbPool,
}

impl SqlCatalogRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn decode_item(row: &SqliteRow) -> Result<CatalogItem, RepositoryError> {
    let base_price_raw: String = row.get("base_price");
    let base_price = Decimal::from_str(&base_price_raw)
        .map_err(|error| RepositoryError::Decode(format!("invalid base_price: {error}")))?;

    let category_raw: String = row.get("category");
    let category = ItemCategory::from_str(&category_raw).map_err(RepositoryError::Decode)?;

    let attributes = match row.get::<Option<String>, _>("attributes") {
        Some(raw) => Some(serde_json::from_str::<CategoryAttributes>(&raw).map_err(|error| {
            RepositoryError::Decode(format!("invalid attributes payload: {error}"))
        })?),
        None => None,
    };

    Ok(CatalogItem {
        id: CatalogItemId(row.get("id")),
        name: row.get("name"),
        category,
        base_price,
        attributes,
    })
}

#[async_trait::async_trait]
impl CatalogRepository for SqlCatalogRepository {
    async fn find_by_id(&self, id: &CatalogItemId) -> Result<Option<CatalogItem>, RepositoryError> {
        let row = sqlx::query(
            "SELECT id, name, category, base_price, attributes FROM catalog_item WHERE id = ?",
        )
        .bind(&id.0)
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(decode_item).transpose()
    }

    async fn list(&self) -> Result<Vec<CatalogItem>, RepositoryError> {
        let rows = sqlx::query(
            "SELECT id, name, category, base_price, attributes FROM catalog_item ORDER BY id",
        )
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(decode_item).collect()
    }

    async fn save(&self, item: CatalogItem) -> Result<(), RepositoryError> {
        let attributes = item
            .attributes
            .as_ref()
            .map(serde_json::to_string)
            .transpose()
            .map_err(|error| {
                RepositoryError::Decode(format!("could not encode attributes: {error}"))
            })?;

        sqlx::query(
            "INSERT INTO catalog_item (id, name, category, base_price, attributes)
             VALUES (?, ?, ?, ?, ?)
             ON CONFLICT(id) DO UPDATE SET
                 name = excluded.name,
                 category = excluded.category,
                 base_price = excluded.base_price,
                 attributes = excluded.attributes",
        )
        .bind(&item.id.0)
        .bind(&item.name)
        .bind(item.category.as_str())
        .bind(item.base_price.to_string())
        .bind(attributes)
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}
