use crate::models;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::convert::From;

/// Public JSON shape of a product, shared by the API and its client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: i32,
    pub product_code: Option<String>,
    pub product_name: String,
    pub description: Option<String>,
    pub price: Decimal,
    pub quantity: i32,
    pub category: Option<String>,
}

impl From<models::Product> for Product {
    fn from(product: models::Product) -> Self {
        Self {
            id: product.id,
            product_code: product.product_code,
            product_name: product.product_name,
            description: product.description,
            price: product.price,
            quantity: product.quantity,
            category: product.category,
        }
    }
}
