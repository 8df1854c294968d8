use async_trait::async_trait;
use thiserror::Error;

use mashti_core::catalog::CatalogError;
use mashti_core::domain::item::{ItemId, RawCatalogItem};

pub mod memory;
pub mod menu_item;

pub use memory::InMemoryMenuItemRepository;
pub use menu_item::SqlMenuItemRepository;

#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("decode error: {0}")]
    Decode(String),
}

impl From<RepositoryError> for CatalogError {
    fn from(value: RepositoryError) -> Self {
        CatalogError::Source(value.to_string())
    }
}

/// Stored menu entry plus the availability flags the catalog listing filters on.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MenuItemRecord {
    pub item: RawCatalogItem,
    pub active: bool,
    pub enabled: bool,
}

impl MenuItemRecord {
    pub fn available(item: RawCatalogItem) -> Self {
        Self { item, active: true, enabled: true }
    }

    pub fn is_listed(&self) -> bool {
        self.active && self.enabled
    }
}

#[async_trait]
pub trait MenuItemRepository: Send + Sync {
    /// Active and enabled items, ordered by display order then name.
    async fn list_active(&self) -> Result<Vec<RawCatalogItem>, RepositoryError>;
    async fn find_by_id(&self, id: &ItemId) -> Result<Option<MenuItemRecord>, RepositoryError>;
    async fn save(&self, record: MenuItemRecord) -> Result<(), RepositoryError>;
    /// Returns `false` when no item has the given id.
    async fn set_availability(
        &self,
        id: &ItemId,
        active: bool,
        enabled: bool,
    ) -> Result<bool, RepositoryError>;
}
