//! HTTP client for the product API.
//!
//! - `GET    /api/products`
//! - `GET    /api/products/{id}`
//! - `POST   /api/products`
//! - `PUT    /api/products/{id}`
//! - `DELETE /api/products/{id}`
//!
//! 422 answers become [`CliError::Validation`], 404 answers
//! [`CliError::NotFound`].

use crate::cli::error::CliError;
use crate::cli::view::FormData;
use crate::helpers::{ErrorsBody, MessageBody};
use crate::views::product::Product;
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use std::time::Duration;

/// Default server address, matching `configuration.yaml`.
pub const DEFAULT_INVENTORY_URL: &str = "http://127.0.0.1:8000";

#[derive(Debug, Clone)]
pub struct InventoryClient {
    base_url: String,
    http: reqwest::Client,
}

impl InventoryClient {
    pub fn new(base_url: &str) -> Result<Self, CliError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()?;
        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            http,
        })
    }

    fn products_url(&self) -> String {
        format!("{}/api/products", self.base_url)
    }

    fn product_url(&self, id: i32) -> String {
        format!("{}/api/products/{}", self.base_url, id)
    }

    /// All live products, ascending by id.
    pub async fn list_products(&self) -> Result<Vec<Product>, CliError> {
        let resp = self.http.get(self.products_url()).send().await?;
        decode(resp).await
    }

    pub async fn get_product(&self, id: i32) -> Result<Product, CliError> {
        let resp = self.http.get(self.product_url(id)).send().await?;
        decode(resp).await
    }

    pub async fn create_product(&self, form: &FormData) -> Result<Product, CliError> {
        let resp = self.http.post(self.products_url()).json(form).send().await?;
        decode(resp).await
    }

    pub async fn update_product(&self, id: i32, form: &FormData) -> Result<Product, CliError> {
        let resp = self.http.put(self.product_url(id)).json(form).send().await?;
        decode(resp).await
    }

    /// Returns the server's confirmation message.
    pub async fn delete_product(&self, id: i32) -> Result<String, CliError> {
        let resp = self.http.delete(self.product_url(id)).send().await?;
        let body: MessageBody = decode(resp).await?;
        Ok(body.message)
    }
}

async fn decode<T: DeserializeOwned>(resp: reqwest::Response) -> Result<T, CliError> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp.json::<T>().await?);
    }

    let body = resp.text().await.unwrap_or_default();
    match status {
        StatusCode::UNPROCESSABLE_ENTITY => {
            if let Ok(ErrorsBody { errors }) = serde_json::from_str(&body) {
                return Err(CliError::Validation(errors));
            }
        }
        StatusCode::NOT_FOUND => {
            let message = serde_json::from_str::<MessageBody>(&body)
                .map(|body| body.message)
                .unwrap_or_else(|_| "Not found".to_string());
            return Err(CliError::NotFound(message));
        }
        _ => {}
    }

    Err(CliError::UnexpectedStatus {
        status: status.as_u16(),
        body,
    })
}
