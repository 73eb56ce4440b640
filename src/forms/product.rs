use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use serde_valid::Validate;
use std::str::FromStr;

/// Create/update payload as submitted by a client.
///
/// Every field is kept as raw JSON so that a missing or wrongly-typed value
/// becomes a field error instead of a rejected body. Forms submit numbers as
/// strings, so `price` and `quantity` accept both.
#[derive(Serialize, Deserialize, Debug, Default, Clone, PartialEq)]
pub struct ProductForm {
    pub product_code: Option<Value>,
    pub product_name: Option<Value>,
    pub description: Option<Value>,
    pub price: Option<Value>,
    pub quantity: Option<Value>,
    pub category: Option<Value>,
}

/// One payload value after trimming.
#[derive(Debug, Clone, PartialEq)]
pub enum Input<T> {
    /// Absent, `null` or blank.
    Missing,
    /// Present but of the wrong type.
    Invalid,
    Given(T),
}

impl<T> Input<T> {
    pub fn given(&self) -> Option<&T> {
        match self {
            Input::Given(value) => Some(value),
            _ => None,
        }
    }
}

/// Payload values read into their target types.
#[derive(Debug, Clone, PartialEq)]
pub struct ProductInput {
    pub product_code: Input<String>,
    pub product_name: Input<String>,
    pub description: Input<String>,
    pub price: Input<Decimal>,
    pub quantity: Input<i32>,
    pub category: Input<String>,
}

impl ProductForm {
    pub fn read(self) -> ProductInput {
        ProductInput {
            product_code: text(self.product_code),
            product_name: text(self.product_name),
            description: text(self.description),
            price: decimal(self.price),
            quantity: integer(self.quantity),
            category: text(self.category),
        }
    }
}

impl ProductInput {
    /// The text fields with a length limit; absent ones are empty.
    pub fn limited_text(&self) -> ProductText {
        let owned = |input: &Input<String>| input.given().cloned().unwrap_or_default();
        ProductText {
            product_code: owned(&self.product_code),
            product_name: owned(&self.product_name),
            category: owned(&self.category),
        }
    }
}

/// Length limits of the text columns, counted in characters.
#[derive(Debug, Default, Clone, PartialEq, Validate)]
pub struct ProductText {
    #[validate(custom(product_code_length))]
    pub product_code: String,
    #[validate(custom(product_name_length))]
    pub product_name: String,
    #[validate(custom(category_length))]
    pub category: String,
}

#[allow(clippy::ptr_arg)]
fn product_code_length(value: &String) -> Result<(), serde_valid::validation::Error> {
    at_most(value, 100, "product code")
}

#[allow(clippy::ptr_arg)]
fn product_name_length(value: &String) -> Result<(), serde_valid::validation::Error> {
    at_most(value, 255, "product name")
}

#[allow(clippy::ptr_arg)]
fn category_length(value: &String) -> Result<(), serde_valid::validation::Error> {
    at_most(value, 255, "category")
}

fn at_most(value: &str, max: usize, label: &str) -> Result<(), serde_valid::validation::Error> {
    if value.chars().count() > max {
        return Err(serde_valid::validation::Error::Custom(format!(
            "The {} may not be greater than {} characters.",
            label, max
        )));
    }
    Ok(())
}

fn text(value: Option<Value>) -> Input<String> {
    match value {
        None | Some(Value::Null) => Input::Missing,
        Some(Value::String(s)) => match s.trim() {
            "" => Input::Missing,
            trimmed => Input::Given(trimmed.to_string()),
        },
        Some(_) => Input::Invalid,
    }
}

fn decimal(value: Option<Value>) -> Input<Decimal> {
    let text = match value {
        None | Some(Value::Null) => return Input::Missing,
        Some(Value::Number(number)) => number.to_string(),
        Some(Value::String(s)) => match s.trim() {
            "" => return Input::Missing,
            trimmed => trimmed.to_string(),
        },
        Some(_) => return Input::Invalid,
    };
    Decimal::from_str(&text)
        .or_else(|_| Decimal::from_scientific(&text))
        .map_or(Input::Invalid, Input::Given)
}

fn integer(value: Option<Value>) -> Input<i32> {
    let parsed = match value {
        None | Some(Value::Null) => return Input::Missing,
        Some(Value::Number(number)) => number.as_i64().and_then(|n| i32::try_from(n).ok()),
        Some(Value::String(s)) => match s.trim() {
            "" => return Input::Missing,
            trimmed => trimmed.parse::<i32>().ok(),
        },
        Some(_) => None,
    };
    parsed.map_or(Input::Invalid, Input::Given)
}
