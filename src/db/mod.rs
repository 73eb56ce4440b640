//! Product persistence.
//!
//! Handlers only see [`ProductStore`]; `PgProductStore` backs it with
//! PostgreSQL and `MemoryProductStore` keeps rows in the process.

use crate::models;
use async_trait::async_trait;

pub mod memory;
pub mod product;

pub use memory::MemoryProductStore;
pub use product::PgProductStore;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("migration error: {0}")]
    Migrate(#[from] sqlx::migrate::MigrateError),
    /// Another live product already holds the code.
    #[error("product code already in use")]
    DuplicateCode,
}

/// Every read skips soft-deleted rows.
#[async_trait]
pub trait ProductStore: Send + Sync {
    /// Live products ordered by ascending id.
    async fn fetch_all(&self) -> Result<Vec<models::Product>, StoreError>;

    async fn fetch(&self, id: i32) -> Result<Option<models::Product>, StoreError>;

    /// Whether a live product other than `except_id` already uses `code`.
    async fn code_exists(&self, code: &str, except_id: Option<i32>) -> Result<bool, StoreError>;

    /// Fails with [`StoreError::DuplicateCode`] when the code is taken.
    async fn insert(&self, product: models::NewProduct) -> Result<models::Product, StoreError>;

    /// `None` when `id` is not a live product. Fails with
    /// [`StoreError::DuplicateCode`] when the code is taken by another one.
    async fn update(
        &self,
        id: i32,
        product: models::NewProduct,
    ) -> Result<Option<models::Product>, StoreError>;

    /// Stamps `deleted_at`; `false` when `id` is not a live product.
    async fn soft_delete(&self, id: i32) -> Result<bool, StoreError>;
}
