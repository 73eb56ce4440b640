use super::{ProductStore, StoreError};
use crate::models;
use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::Mutex;

/// Process-local store for development and tests. Deleted rows are kept
/// and ids are never handed out twice.
#[derive(Debug, Default)]
pub struct MemoryProductStore {
    rows: Mutex<Rows>,
}

#[derive(Debug, Default)]
struct Rows {
    last_id: i32,
    // ascending by id, since ids only grow
    products: Vec<models::Product>,
}

impl Rows {
    fn code_taken(&self, code: Option<&str>, except_id: Option<i32>) -> bool {
        code.is_some_and(|code| {
            self.products.iter().any(|product| {
                !product.is_deleted()
                    && Some(product.id) != except_id
                    && product.product_code.as_deref() == Some(code)
            })
        })
    }

    fn live_mut(&mut self, id: i32) -> Option<&mut models::Product> {
        self.products
            .iter_mut()
            .find(|product| product.id == id && !product.is_deleted())
    }
}

impl MemoryProductStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ProductStore for MemoryProductStore {
    async fn fetch_all(&self) -> Result<Vec<models::Product>, StoreError> {
        let rows = self.rows.lock().await;
        Ok(rows
            .products
            .iter()
            .filter(|product| !product.is_deleted())
            .cloned()
            .collect())
    }

    async fn fetch(&self, id: i32) -> Result<Option<models::Product>, StoreError> {
        let mut rows = self.rows.lock().await;
        Ok(rows.live_mut(id).map(|product| product.clone()))
    }

    async fn code_exists(&self, code: &str, except_id: Option<i32>) -> Result<bool, StoreError> {
        let rows = self.rows.lock().await;
        Ok(rows.code_taken(Some(code), except_id))
    }

    async fn insert(&self, product: models::NewProduct) -> Result<models::Product, StoreError> {
        let mut rows = self.rows.lock().await;
        if rows.code_taken(product.product_code.as_deref(), None) {
            return Err(StoreError::DuplicateCode);
        }
        rows.last_id += 1;

        let now = Utc::now();
        let row = models::Product {
            id: rows.last_id,
            product_code: product.product_code,
            product_name: product.product_name,
            description: product.description,
            price: product.price,
            quantity: product.quantity,
            category: product.category,
            created_at: now,
            updated_at: now,
            deleted_at: None,
        };

        tracing::info!("New product {} has been saved to memory", row.id);
        rows.products.push(row.clone());
        Ok(row)
    }

    async fn update(
        &self,
        id: i32,
        product: models::NewProduct,
    ) -> Result<Option<models::Product>, StoreError> {
        let mut rows = self.rows.lock().await;
        if rows.live_mut(id).is_some()
            && rows.code_taken(product.product_code.as_deref(), Some(id))
        {
            return Err(StoreError::DuplicateCode);
        }
        Ok(rows.live_mut(id).map(|row| {
            row.apply(product);
            row.updated_at = Utc::now();
            row.clone()
        }))
    }

    async fn soft_delete(&self, id: i32) -> Result<bool, StoreError> {
        let mut rows = self.rows.lock().await;
        Ok(match rows.live_mut(id) {
            Some(row) => {
                row.deleted_at = Some(Utc::now());
                true
            }
            None => false,
        })
    }
}
