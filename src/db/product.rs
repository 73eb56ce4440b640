use super::{ProductStore, StoreError};
use crate::models;
use async_trait::async_trait;
use sqlx::PgPool;
use tracing::Instrument;

const COLUMNS: &str = "id, product_code, product_name, description, price, quantity, category, \
                       created_at, updated_at, deleted_at";

#[derive(Debug, Clone)]
pub struct PgProductStore {
    pool: PgPool,
}

impl PgProductStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    pub async fn migrate(&self) -> Result<(), StoreError> {
        sqlx::migrate!("./migrations").run(&self.pool).await?;
        Ok(())
    }
}

#[async_trait]
impl ProductStore for PgProductStore {
    async fn fetch_all(&self) -> Result<Vec<models::Product>, StoreError> {
        let query_span = tracing::info_span!("Fetch all live products.");
        sqlx::query_as::<_, models::Product>(&format!(
            "SELECT {COLUMNS} FROM products WHERE deleted_at IS NULL ORDER BY id ASC"
        ))
        .fetch_all(&self.pool)
        .instrument(query_span)
        .await
        .map_err(|err| {
            tracing::error!("Failed to fetch products, error: {:?}", err);
            err.into()
        })
    }

    async fn fetch(&self, id: i32) -> Result<Option<models::Product>, StoreError> {
        let query_span = tracing::info_span!("Fetch product by id.", id);
        sqlx::query_as::<_, models::Product>(&format!(
            "SELECT {COLUMNS} FROM products WHERE id = $1 AND deleted_at IS NULL LIMIT 1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .instrument(query_span)
        .await
        .map_err(|err| {
            tracing::error!("Failed to fetch product {}, error: {:?}", id, err);
            err.into()
        })
    }

    async fn code_exists(&self, code: &str, except_id: Option<i32>) -> Result<bool, StoreError> {
        let query_span = tracing::info_span!("Check product code usage.", code);
        sqlx::query_scalar::<_, bool>(
            r#"
            SELECT EXISTS (
                SELECT 1 FROM products
                WHERE product_code = $1
                  AND deleted_at IS NULL
                  AND ($2::INTEGER IS NULL OR id <> $2)
            )
            "#,
        )
        .bind(code)
        .bind(except_id)
        .fetch_one(&self.pool)
        .instrument(query_span)
        .await
        .map_err(|err| {
            tracing::error!("Failed to check product code, error: {:?}", err);
            err.into()
        })
    }

    async fn insert(&self, product: models::NewProduct) -> Result<models::Product, StoreError> {
        let query_span = tracing::info_span!("Saving new product into the database");
        sqlx::query_as::<_, models::Product>(&format!(
            r#"
            INSERT INTO products (product_code, product_name, description, price, quantity, category,
                created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, NOW(), NOW())
            RETURNING {COLUMNS}
            "#
        ))
        .bind(product.product_code)
        .bind(product.product_name)
        .bind(product.description)
        .bind(product.price)
        .bind(product.quantity)
        .bind(product.category)
        .fetch_one(&self.pool)
        .instrument(query_span)
        .await
        .map(|product| {
            tracing::info!("New product {} has been saved to database", product.id);
            product
        })
        .map_err(write_error)
    }

    async fn update(
        &self,
        id: i32,
        product: models::NewProduct,
    ) -> Result<Option<models::Product>, StoreError> {
        let query_span = tracing::info_span!("Updating product", id);
        sqlx::query_as::<_, models::Product>(&format!(
            r#"
            UPDATE products
            SET
                product_code=$2,
                product_name=$3,
                description=$4,
                price=$5,
                quantity=$6,
                category=$7,
                updated_at=NOW()
            WHERE id = $1 AND deleted_at IS NULL
            RETURNING {COLUMNS}
            "#
        ))
        .bind(id)
        .bind(product.product_code)
        .bind(product.product_name)
        .bind(product.description)
        .bind(product.price)
        .bind(product.quantity)
        .bind(product.category)
        .fetch_optional(&self.pool)
        .instrument(query_span)
        .await
        .map_err(write_error)
    }

    #[tracing::instrument(name = "Soft delete product.", skip(self))]
    async fn soft_delete(&self, id: i32) -> Result<bool, StoreError> {
        sqlx::query::<sqlx::Postgres>(
            "UPDATE products SET deleted_at = NOW() WHERE id = $1 AND deleted_at IS NULL",
        )
        .bind(id)
        .execute(&self.pool)
        .await
        .map(|result| result.rows_affected() > 0)
        .map_err(|err| {
            tracing::error!("Failed to delete product: {:?}", err);
            err.into()
        })
    }
}

/// A write that hits the partial unique index on live codes.
fn write_error(err: sqlx::Error) -> StoreError {
    if err
        .as_database_error()
        .is_some_and(|db| db.is_unique_violation())
    {
        tracing::warn!("Product code already in use: {:?}", err);
        return StoreError::DuplicateCode;
    }
    tracing::error!("Failed to execute query: {:?}", err);
    err.into()
}
