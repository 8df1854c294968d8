use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use mashti_core::catalog::{CatalogError, CatalogSource};
use mashti_core::domain::item::{ItemId, RawCatalogItem};

use super::{MenuItemRecord, MenuItemRepository, RepositoryError};

#[derive(Default)]
pub struct InMemoryMenuItemRepository {
    items: RwLock<HashMap<String, MenuItemRecord>>,
}

impl InMemoryMenuItemRepository {
    pub fn with_items(items: impl IntoIterator<Item = RawCatalogItem>) -> Self {
        let items = items
            .into_iter()
            .map(|item| (item.id.0.clone(), MenuItemRecord::available(item)))
            .collect();
        Self { items: RwLock::new(items) }
    }
}

#[async_trait]
impl MenuItemRepository for InMemoryMenuItemRepository {
    async fn list_active(&self) -> Result<Vec<RawCatalogItem>, RepositoryError> {
        let items = self.items.read().await;
        let mut listed: Vec<RawCatalogItem> = items
            .values()
            .filter(|record| record.is_listed())
            .map(|record| record.item.clone())
            .collect();
        listed.sort_by(|a, b| {
            a.display_order.cmp(&b.display_order).then_with(|| a.name.cmp(&b.name))
        });
        Ok(listed)
    }

    async fn find_by_id(&self, id: &ItemId) -> Result<Option<MenuItemRecord>, RepositoryError> {
        let items = self.items.read().await;
        Ok(items.get(&id.0).cloned())
    }

    async fn save(&self, record: MenuItemRecord) -> Result<(), RepositoryError> {
        let mut items = self.items.write().await;
        items.insert(record.item.id.0.clone(), record);
        Ok(())
    }

    async fn set_availability(
        &self,
        id: &ItemId,
        active: bool,
        enabled: bool,
    ) -> Result<bool, RepositoryError> {
        let mut items = self.items.write().await;
        match items.get_mut(&id.0) {
            Some(record) => {
                record.active = active;
                record.enabled = enabled;
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

#[async_trait]
impl CatalogSource for InMemoryMenuItemRepository {
    async fn fetch_active(&self) -> Result<Vec<RawCatalogItem>, CatalogError> {
        Ok(self.list_active().await?)
    }
}
