use std::str::FromStr;

use async_trait::async_trait;
use chrono::Utc;
use rust_decimal::Decimal;
use sqlx::sqlite::SqliteRow;
use sqlx::Row;

use mashti_core::catalog::{CatalogError, CatalogSource};
use mashti_core::domain::item::{ItemId, RawCatalogItem};

use super::{MenuItemRecord, MenuItemRepository, RepositoryError};
use crate::DbPool;

const SELECT_COLUMNS: &str =
    "SELECT id, name, category, price, is_popular, display_order, active, enabled FROM menu_item";

pub struct SqlMenuItemRepository {
    pool: DbPool,
}

impl SqlMenuItemRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl MenuItemRepository for SqlMenuItemRepository {
    async fn list_active(&self) -> Result<Vec<RawCatalogItem>, RepositoryError> {
        let rows = sqlx::query(&format!(
            "{SELECT_COLUMNS} WHERE active = 1 AND enabled = 1 ORDER BY display_order ASC, name ASC"
        ))
        .fetch_all(&self.pool)
        .await?;

        let mut items = Vec::with_capacity(rows.len());
        for row in &rows {
            match decode_record(row) {
                Ok(record) => items.push(record.item),
                Err(error) => {
                    let id = row.try_get::<String, _>("id").unwrap_or_default();
                    tracing::warn!(
                        event_name = "catalog.row_skipped",
                        id = %id,
                        error = %error,
                        "skipping menu item row that does not decode"
                    );
                }
            }
        }
        Ok(items)
    }

    async fn find_by_id(&self, id: &ItemId) -> Result<Option<MenuItemRecord>, RepositoryError> {
        let row = sqlx::query(&format!("{SELECT_COLUMNS} WHERE id = ?1"))
            .bind(&id.0)
            .fetch_optional(&self.pool)
            .await?;

        row.as_ref().map(decode_record).transpose()
    }

    async fn save(&self, record: MenuItemRecord) -> Result<(), RepositoryError> {
        let item = &record.item;
        sqlx::query(
            "INSERT INTO menu_item (
                id, name, category, price, is_popular, display_order, active, enabled, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
            ON CONFLICT(id) DO UPDATE SET
                name = excluded.name,
                category = excluded.category,
                price = excluded.price,
                is_popular = excluded.is_popular,
                display_order = excluded.display_order,
                active = excluded.active,
                enabled = excluded.enabled,
                updated_at = excluded.updated_at",
        )
        .bind(&item.id.0)
        .bind(&item.name)
        .bind(&item.category)
        .bind(item.price.to_string())
        .bind(item.is_popular)
        .bind(item.display_order)
        .bind(record.active)
        .bind(record.enabled)
        .bind(Utc::now().to_rfc3339())
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn set_availability(
        &self,
        id: &ItemId,
        active: bool,
        enabled: bool,
    ) -> Result<bool, RepositoryError> {
        let result = sqlx::query(
            "UPDATE menu_item SET active = ?2, enabled = ?3, updated_at = ?4 WHERE id = ?1",
        )
        .bind(&id.0)
        .bind(active)
        .bind(enabled)
        .bind(Utc::now().to_rfc3339())
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }
}

#[async_trait]
impl CatalogSource for SqlMenuItemRepository {
    async fn fetch_active(&self) -> Result<Vec<RawCatalogItem>, CatalogError> {
        Ok(self.list_active().await?)
    }
}

fn decode_record(row: &SqliteRow) -> Result<MenuItemRecord, RepositoryError> {
    let id: String = row.try_get("id").map_err(|e| RepositoryError::Decode(e.to_string()))?;
    let price_text: String =
        row.try_get("price").map_err(|e| RepositoryError::Decode(e.to_string()))?;
    let price = Decimal::from_str(price_text.trim()).map_err(|e| {
        RepositoryError::Decode(format!("menu item `{id}` has invalid price `{price_text}`: {e}"))
    })?;

    let item = RawCatalogItem {
        name: row.try_get("name").map_err(|e| RepositoryError::Decode(e.to_string()))?,
        category: row.try_get("category").map_err(|e| RepositoryError::Decode(e.to_string()))?,
        price,
        is_popular: row
            .try_get("is_popular")
            .map_err(|e| RepositoryError::Decode(e.to_string()))?,
        display_order: row
            .try_get("display_order")
            .map_err(|e| RepositoryError::Decode(e.to_string()))?,
        id: ItemId(id),
    };

    Ok(MenuItemRecord {
        item,
        active: row.try_get("active").map_err(|e| RepositoryError::Decode(e.to_string()))?,
        enabled: row.try_get("enabled").map_err(|e| RepositoryError::Decode(e.to_string()))?,
    })
}
