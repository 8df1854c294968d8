pub mod connection;
pub mod fixtures;
pub mod migrations;
pub mod repositories;

pub use connection::{connect, connect_with_settings, DbPool};
pub use fixtures::{MenuSeedDataset, SeedResult, VerificationResult};
pub use repositories::{
    InMemoryMenuItemRepository, MenuItemRepository, RepositoryError, SqlMenuItemRepository,
};
