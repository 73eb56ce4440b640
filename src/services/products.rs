//! Product API service: list, show, create, update and soft delete on top
//! of the validation rules and a [`ProductStore`].

use crate::db::{ProductStore, StoreError};
use crate::forms;
use crate::helpers::JsonResponse;
use crate::models;
use crate::services::validation::{self, FieldErrors, Mode};
use actix_web::{error::ResponseError, http::StatusCode, HttpResponse};
use std::sync::Arc;

pub const NOT_FOUND_MESSAGE: &str = "Product not found";
pub const DELETED_MESSAGE: &str = "Product deleted successfully";

pub type Result<T> = std::result::Result<T, ApiError>;

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("validation failed: {0}")]
    Validation(FieldErrors),
    #[error("Product not found")]
    NotFound,
    #[error("internal error: {0}")]
    Internal(String),
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            // lost a race with a concurrent write of the same code
            StoreError::DuplicateCode => {
                let mut errors = FieldErrors::new();
                errors.add("product_code", validation::CODE_TAKEN_MESSAGE);
                Self::Validation(errors)
            }
            err => {
                tracing::error!("Store failure: {:?}", err);
                Self::Internal(err.to_string())
            }
        }
    }
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            Self::NotFound => StatusCode::NOT_FOUND,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        match self {
            Self::Validation(errors) => JsonResponse::errors(errors),
            Self::NotFound => JsonResponse::not_found(NOT_FOUND_MESSAGE),
            Self::Internal(_) => JsonResponse::internal_server_error(""),
        }
    }
}

#[derive(Clone)]
pub struct ProductService {
    store: Arc<dyn ProductStore>,
}

impl ProductService {
    pub fn new(store: Arc<dyn ProductStore>) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &dyn ProductStore {
        self.store.as_ref()
    }

    /// Live products, ascending by id.
    pub async fn list(&self) -> Result<Vec<models::Product>> {
        Ok(self.store.fetch_all().await?)
    }

    pub async fn show(&self, id: i32) -> Result<models::Product> {
        self.store.fetch(id).await?.ok_or(ApiError::NotFound)
    }

    pub async fn create(&self, form: forms::ProductForm) -> Result<models::Product> {
        let fields = validation::validate(self.store(), form, Mode::Create)
            .await?
            .map_err(ApiError::Validation)?;

        let product = self.store.insert(fields).await?;
        tracing::info!("Created product {} - {}", product.id, product.product_name);
        Ok(product)
    }

    pub async fn update(&self, id: i32, form: forms::ProductForm) -> Result<models::Product> {
        if self.store.fetch(id).await?.is_none() {
            return Err(ApiError::NotFound);
        }

        let fields = validation::validate(self.store(), form, Mode::Update(id))
            .await?
            .map_err(ApiError::Validation)?;

        // the row may have been deleted since the lookup
        let product = self.store.update(id, fields).await?.ok_or(ApiError::NotFound)?;
        tracing::info!("Updated product {} - {}", product.id, product.product_name);
        Ok(product)
    }

    pub async fn delete(&self, id: i32) -> Result<()> {
        let product = self.store.fetch(id).await?.ok_or(ApiError::NotFound)?;

        if !self.store.soft_delete(product.id).await? {
            return Err(ApiError::NotFound);
        }
        tracing::info!("Deleted product {} - {}", product.id, product.product_name);
        Ok(())
    }
}
