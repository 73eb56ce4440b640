use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

/// A row of the `products` table, soft-deleted rows included.
#[derive(Debug, Clone, PartialEq, sqlx::FromRow)]
pub struct Product {
    pub id: i32,
    pub product_code: Option<String>,
    pub product_name: String,
    pub description: Option<String>,
    pub price: Decimal,
    pub quantity: i32,
    pub category: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

impl Product {
    pub fn is_deleted(&self) -> bool {
        self.deleted_at.is_some()
    }

    /// Replace every editable field; id and timestamps are left to the store.
    pub fn apply(&mut self, fields: NewProduct) {
        self.product_code = fields.product_code;
        self.product_name = fields.product_name;
        self.description = fields.description;
        self.price = fields.price;
        self.quantity = fields.quantity;
        self.category = fields.category;
    }
}

/// Field values that passed validation, ready to be written.
#[derive(Debug, Clone, PartialEq)]
pub struct NewProduct {
    pub product_code: Option<String>,
    pub product_name: String,
    pub description: Option<String>,
    pub price: Decimal,
    pub quantity: i32,
    pub category: Option<String>,
}
