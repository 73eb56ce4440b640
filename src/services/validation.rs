//! Field rules for product payloads.
//!
//! Length limits come from the `serde_valid` attributes on
//! [`forms::ProductText`]; presence, types, bounds and code uniqueness are
//! checked here. Errors are keyed by field name in declaration order.

use crate::db::{ProductStore, StoreError};
use crate::forms::{self, Input};
use crate::models::NewProduct;
use indexmap::IndexMap;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use serde_valid::Validate;
use std::fmt;

/// field -> messages, in the order the rules ran
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldErrors(IndexMap<String, Vec<String>>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add<S: Into<String>>(&mut self, field: &str, message: S) {
        self.0
            .entry(field.to_string())
            .or_default()
            .push(message.into());
    }

    pub fn extend<I: IntoIterator<Item = String>>(&mut self, field: &str, messages: I) {
        for message in messages {
            self.add(field, message);
        }
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn contains(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    pub fn get(&self, field: &str) -> Option<&[String]> {
        self.0.get(field).map(Vec::as_slice)
    }

    pub fn remove(&mut self, field: &str) -> Option<Vec<String>> {
        self.0.shift_remove(field)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Vec<String>)> {
        self.0.iter()
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (field, messages) in &self.0 {
            for message in messages {
                if !first {
                    write!(f, "; ")?;
                }
                write!(f, "{}: {}", field, message)?;
                first = false;
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Create,
    /// Update of the product with this id; its own code does not count as taken.
    Update(i32),
}

impl Mode {
    fn existing_id(self) -> Option<i32> {
        match self {
            Mode::Create => None,
            Mode::Update(id) => Some(id),
        }
    }
}

pub const CODE_TAKEN_MESSAGE: &str = "The product code has already been taken.";

/// Largest price the `NUMERIC(10, 2)` column holds.
pub fn max_price() -> Decimal {
    Decimal::new(9_999_999_999, 2)
}

/// Check a payload. The outer `Result` carries store failures from the
/// uniqueness lookup; the inner one is the validation outcome.
pub async fn validate(
    store: &dyn ProductStore,
    form: forms::ProductForm,
    mode: Mode,
) -> Result<Result<NewProduct, FieldErrors>, StoreError> {
    let input = form.read();
    let mut declared = declared_errors(&input.limited_text());
    let mut errors = FieldErrors::new();

    let product_code = match input.product_code {
        Input::Missing => {
            if let Mode::Update(_) = mode {
                errors.add("product_code", required("product_code"));
            }
            None
        }
        Input::Invalid => {
            errors.add("product_code", not_a_string("product_code"));
            None
        }
        Input::Given(code) => match declared.shift_remove("product_code") {
            Some(messages) => {
                errors.extend("product_code", messages);
                None
            }
            None => {
                if store.code_exists(&code, mode.existing_id()).await? {
                    errors.add("product_code", CODE_TAKEN_MESSAGE);
                }
                Some(code)
            }
        },
    };

    let product_name = match input.product_name {
        Input::Missing => {
            errors.add("product_name", required("product_name"));
            None
        }
        Input::Invalid => {
            errors.add("product_name", not_a_string("product_name"));
            None
        }
        Input::Given(name) => match declared.shift_remove("product_name") {
            Some(messages) => {
                errors.extend("product_name", messages);
                None
            }
            None => Some(name),
        },
    };

    let description = match input.description {
        Input::Invalid => {
            errors.add("description", not_a_string("description"));
            None
        }
        other => other.given().cloned(),
    };

    let price = match input.price {
        Input::Missing => {
            errors.add("price", required("price"));
            None
        }
        Input::Invalid => {
            errors.add("price", "The price must be a number.");
            None
        }
        Input::Given(price) if price.is_sign_negative() && !price.is_zero() => {
            errors.add("price", "The price must be at least 0.");
            None
        }
        Input::Given(price) => {
            let cents = to_cents(price);
            if cents > max_price() {
                errors.add(
                    "price",
                    format!("The price may not be greater than {}.", max_price()),
                );
                None
            } else {
                Some(cents)
            }
        }
    };

    let quantity = match input.quantity {
        Input::Missing => {
            errors.add("quantity", required("quantity"));
            None
        }
        Input::Invalid => {
            errors.add("quantity", "The quantity must be an integer.");
            None
        }
        Input::Given(quantity) if quantity < 0 => {
            errors.add("quantity", "The quantity must be at least 0.");
            None
        }
        Input::Given(quantity) => Some(quantity),
    };

    let category = match input.category {
        Input::Missing => None,
        Input::Invalid => {
            errors.add("category", not_a_string("category"));
            None
        }
        Input::Given(category) => match declared.shift_remove("category") {
            Some(messages) => {
                errors.extend("category", messages);
                None
            }
            None => Some(category),
        },
    };

    // anything else serde_valid reported
    for (field, messages) in declared {
        errors.extend(&field, messages);
    }

    Ok(match (product_name, price, quantity) {
        (Some(product_name), Some(price), Some(quantity)) if errors.is_empty() => Ok(NewProduct {
            product_code,
            product_name,
            description,
            price,
            quantity,
            category,
        }),
        _ => Err(errors),
    })
}

fn required(field: &str) -> String {
    format!("The {} field is required.", field.replace('_', " "))
}

fn not_a_string(field: &str) -> String {
    format!("The {} must be a string.", field.replace('_', " "))
}

/// Messages from the `#[validate(..)]` attributes, keyed by field.
fn declared_errors(text: &forms::ProductText) -> IndexMap<String, Vec<String>> {
    let mut found = IndexMap::new();
    let errors = match text.validate() {
        Ok(()) => return found,
        Err(errors) => errors,
    };

    let value = serde_json::to_value(&errors).unwrap_or(Value::Null);
    if let Some(properties) = value.get("properties").and_then(Value::as_object) {
        for (field, property) in properties {
            let list = match property {
                Value::Array(_) => Some(property),
                _ => property.get("errors"),
            };
            let messages: Vec<String> = list
                .and_then(Value::as_array)
                .map(|items| {
                    items
                        .iter()
                        .map(|item| match item {
                            Value::String(message) => message.clone(),
                            other => other.to_string(),
                        })
                        .collect()
                })
                .unwrap_or_default();
            if !messages.is_empty() {
                found.insert(field.clone(), messages);
            }
        }
    }

    if found.is_empty() {
        tracing::warn!("Unrecognised validation error shape: {}", errors);
        found.insert("payload".to_string(), vec![errors.to_string()]);
    }
    found
}

/// Two fractional digits, half away from zero: `5` becomes `5.00`.
fn to_cents(price: Decimal) -> Decimal {
    let mut price = price.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    price.rescale(2);
    price
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::MemoryProductStore;
    use crate::models;
    use serde_json::json;

    fn form(value: Value) -> forms::ProductForm {
        serde_json::from_value(value).unwrap()
    }

    async fn store_with(codes: &[&str]) -> MemoryProductStore {
        let store = MemoryProductStore::new();
        for code in codes {
            store
                .insert(models::NewProduct {
                    product_code: Some(code.to_string()),
                    product_name: format!("Product {}", code),
                    description: None,
                    price: Decimal::ONE,
                    quantity: 1,
                    category: None,
                })
                .await
                .unwrap();
        }
        store
    }

    #[tokio::test]
    async fn create_accepts_minimal_payload() {
        let store = store_with(&[]).await;
        let product = validate(
            &store,
            form(json!({"product_name": "Widget A", "price": 5, "quantity": 2})),
            Mode::Create,
        )
        .await
        .unwrap()
        .unwrap();

        assert_eq!(product.product_name, "Widget A");
        assert_eq!(product.price, Decimal::new(5, 0));
        assert_eq!(product.quantity, 2);
        assert_eq!(product.product_code, None);
        assert_eq!(product.category, None);
    }

    #[tokio::test]
    async fn create_reports_every_missing_field() {
        let store = store_with(&[]).await;
        let errors = validate(&store, form(json!({})), Mode::Create)
            .await
            .unwrap()
            .unwrap_err();

        let fields: Vec<&String> = errors.iter().map(|(field, _)| field).collect();
        assert_eq!(fields, vec!["product_name", "price", "quantity"]);
        assert_eq!(
            errors.get("product_name"),
            Some(&["The product name field is required.".to_string()][..])
        );
    }

    #[tokio::test]
    async fn blank_strings_count_as_missing() {
        let store = store_with(&[]).await;
        let errors = validate(
            &store,
            form(json!({"product_name": "   ", "price": "", "quantity": "3"})),
            Mode::Create,
        )
        .await
        .unwrap()
        .unwrap_err();

        assert!(errors.contains("product_name"));
        assert!(errors.contains("price"));
        assert!(!errors.contains("quantity"));
    }

    #[tokio::test]
    async fn numbers_are_parsed_from_strings() {
        let store = store_with(&[]).await;
        let product = validate(
            &store,
            form(json!({"product_name": "Widget", "price": "12.345", "quantity": "7"})),
            Mode::Create,
        )
        .await
        .unwrap()
        .unwrap();

        assert_eq!(product.price, Decimal::new(1235, 2));
        assert_eq!(product.quantity, 7);
    }

    #[tokio::test]
    async fn rejects_bad_numbers() {
        let store = store_with(&[]).await;
        let errors = validate(
            &store,
            form(json!({"product_name": "Widget", "price": "cheap", "quantity": 1.5})),
            Mode::Create,
        )
        .await
        .unwrap()
        .unwrap_err();

        assert_eq!(
            errors.get("price"),
            Some(&["The price must be a number.".to_string()][..])
        );
        assert_eq!(
            errors.get("quantity"),
            Some(&["The quantity must be an integer.".to_string()][..])
        );
    }

    #[tokio::test]
    async fn rejects_negative_values() {
        let store = store_with(&[]).await;
        let errors = validate(
            &store,
            form(json!({"product_name": "Widget", "price": -0.01, "quantity": -1})),
            Mode::Create,
        )
        .await
        .unwrap()
        .unwrap_err();

        assert_eq!(
            errors.get("price"),
            Some(&["The price must be at least 0.".to_string()][..])
        );
        assert_eq!(
            errors.get("quantity"),
            Some(&["The quantity must be at least 0.".to_string()][..])
        );
    }

    #[tokio::test]
    async fn zero_is_allowed() {
        let store = store_with(&[]).await;
        let product = validate(
            &store,
            form(json!({"product_name": "Freebie", "price": 0, "quantity": 0})),
            Mode::Create,
        )
        .await
        .unwrap()
        .unwrap();

        assert_eq!(product.price.to_string(), "0.00");
        assert_eq!(product.quantity, 0);
    }

    #[tokio::test]
    async fn long_strings_are_rejected() {
        let store = store_with(&[]).await;
        let errors = validate(
            &store,
            form(json!({
                "product_name": "n".repeat(256),
                "price": 1,
                "quantity": 1,
                "category": "c".repeat(256)
            })),
            Mode::Create,
        )
        .await
        .unwrap()
        .unwrap_err();

        assert!(errors.contains("product_name"));
        assert!(errors.contains("category"));
        assert_eq!(errors.len(), 2);
    }

    #[tokio::test]
    async fn update_requires_code() {
        let store = store_with(&[]).await;
        let errors = validate(
            &store,
            form(json!({"product_name": "Widget", "price": 1, "quantity": 1})),
            Mode::Update(1),
        )
        .await
        .unwrap()
        .unwrap_err();

        assert_eq!(
            errors.get("product_code"),
            Some(&["The product code field is required.".to_string()][..])
        );
    }

    #[tokio::test]
    async fn update_checks_code_against_other_products() {
        let store = store_with(&["A-1", "B-1"]).await;
        let payload = json!({
            "product_code": "B-1",
            "product_name": "Widget",
            "price": 1,
            "quantity": 1
        });

        let errors = validate(&store, form(payload.clone()), Mode::Update(1))
            .await
            .unwrap()
            .unwrap_err();
        assert_eq!(
            errors.get("product_code"),
            Some(&["The product code has already been taken.".to_string()][..])
        );

        // product 2 owns B-1
        let product = validate(&store, form(payload), Mode::Update(2))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(product.product_code.as_deref(), Some("B-1"));
    }

    #[tokio::test]
    async fn create_checks_optional_code() {
        let store = store_with(&["A-1"]).await;
        let errors = validate(
            &store,
            form(json!({"product_code": "A-1", "product_name": "Copy", "price": 1, "quantity": 1})),
            Mode::Create,
        )
        .await
        .unwrap()
        .unwrap_err();

        assert!(errors.contains("product_code"));
    }

    #[tokio::test]
    async fn wrong_types_become_field_errors() {
        let store = store_with(&[]).await;
        let errors = validate(
            &store,
            form(json!({
                "product_code": 7,
                "product_name": 123,
                "description": false,
                "price": 1,
                "quantity": 1,
                "category": ["Tools"]
            })),
            Mode::Update(1),
        )
        .await
        .unwrap()
        .unwrap_err();

        let fields: Vec<&String> = errors.iter().map(|(field, _)| field).collect();
        assert_eq!(
            fields,
            vec!["product_code", "product_name", "description", "category"]
        );
        assert_eq!(
            errors.get("product_name"),
            Some(&["The product name must be a string.".to_string()][..])
        );
        assert_eq!(
            errors.get("product_code"),
            Some(&["The product code must be a string.".to_string()][..])
        );
    }

    #[tokio::test]
    async fn lengths_are_counted_in_characters() {
        let store = store_with(&[]).await;
        let errors = validate(
            &store,
            form(json!({
                "product_name": "e\u{301}".repeat(200),
                "price": 1,
                "quantity": 1
            })),
            Mode::Create,
        )
        .await
        .unwrap()
        .unwrap_err();

        assert_eq!(
            errors.get("product_name"),
            Some(&["The product name may not be greater than 255 characters.".to_string()][..])
        );
    }

    #[tokio::test]
    async fn price_fits_the_column() {
        let store = store_with(&[]).await;
        let product = validate(
            &store,
            form(json!({"product_name": "Top", "price": "99999999.99", "quantity": 1})),
            Mode::Create,
        )
        .await
        .unwrap()
        .unwrap();
        assert_eq!(product.price, max_price());

        for price in [json!(1e12), json!("99999999.995"), json!("100000000")] {
            let errors = validate(
                &store,
                form(json!({"product_name": "Huge", "price": price, "quantity": 1})),
                Mode::Create,
            )
            .await
            .unwrap()
            .unwrap_err();
            assert_eq!(
                errors.get("price"),
                Some(&["The price may not be greater than 99999999.99.".to_string()][..])
            );
        }
    }

    #[test]
    fn display_joins_messages() {
        let mut errors = FieldErrors::new();
        errors.add("price", "The price field is required.");
        errors.add("quantity", "The quantity must be an integer.");

        assert_eq!(
            errors.to_string(),
            "price: The price field is required.; quantity: The quantity must be an integer."
        );
        assert_eq!(
            serde_json::to_value(&errors).unwrap(),
            json!({
                "price": ["The price field is required."],
                "quantity": ["The quantity must be an integer."]
            })
        );
    }
}
