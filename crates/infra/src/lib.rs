//! Infrastructure layer: configuration, SQLite pool, repositories.

pub mod config;
pub mod db;
pub mod error;
pub mod pagination;
pub mod repository;

pub use config::{AppConfig, ConfigError, DatabaseConfig};
pub use error::StoreError;
pub use pagination::{Page, PageRequest};
pub use repository::{
    CategoryRepository, ItemRepository, SqliteCategoryRepository, SqliteItemRepository,
};
