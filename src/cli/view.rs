//! Client-side state of the product screen.
//!
//! [`ProductView`] holds the loaded list, the search and category filters,
//! the categories derived from the list, the form being edited and the last
//! field errors returned by the server. Filtering happens locally; the
//! server is only asked for the full list.

use crate::cli::error::CliError;
use crate::cli::inventory_client::InventoryClient;
use crate::services::FieldErrors;
use crate::views::product::Product;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::Serialize;
use std::fmt::Write as _;
use std::str::FromStr;

pub const CURRENCY_SYMBOL: &str = "₱";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    ProductCode,
    ProductName,
    Description,
    Price,
    Quantity,
    Category,
}

impl Field {
    pub const ALL: [Field; 6] = [
        Field::ProductCode,
        Field::ProductName,
        Field::Description,
        Field::Price,
        Field::Quantity,
        Field::Category,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Field::ProductCode => "product_code",
            Field::ProductName => "product_name",
            Field::Description => "description",
            Field::Price => "price",
            Field::Quantity => "quantity",
            Field::Category => "category",
        }
    }
}

impl FromStr for Field {
    type Err = CliError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Field::ALL
            .into_iter()
            .find(|field| field.as_str() == s)
            .ok_or_else(|| CliError::InvalidInput(format!("unknown field '{}'", s)))
    }
}

/// Raw form inputs. Everything is text, as typed; the server parses numbers.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FormData {
    pub product_code: String,
    pub product_name: String,
    pub description: String,
    pub price: String,
    pub quantity: String,
    pub category: String,
}

impl FormData {
    pub fn from_product(product: &Product) -> Self {
        Self {
            product_code: product.product_code.clone().unwrap_or_default(),
            product_name: product.product_name.clone(),
            description: product.description.clone().unwrap_or_default(),
            price: product.price.to_string(),
            quantity: product.quantity.to_string(),
            category: product.category.clone().unwrap_or_default(),
        }
    }

    pub fn get(&self, field: Field) -> &str {
        match field {
            Field::ProductCode => &self.product_code,
            Field::ProductName => &self.product_name,
            Field::Description => &self.description,
            Field::Price => &self.price,
            Field::Quantity => &self.quantity,
            Field::Category => &self.category,
        }
    }

    fn slot_mut(&mut self, field: Field) -> &mut String {
        match field {
            Field::ProductCode => &mut self.product_code,
            Field::ProductName => &mut self.product_name,
            Field::Description => &mut self.description,
            Field::Price => &mut self.price,
            Field::Quantity => &mut self.quantity,
            Field::Category => &mut self.category,
        }
    }
}

/// What submitting the form will do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Submission<'a> {
    Create(&'a FormData),
    Update(i32, &'a FormData),
}

#[derive(Debug, Default)]
pub struct ProductView {
    products: Vec<Product>,
    search_term: String,
    category_filter: String,
    categories: Vec<String>,
    editing_id: Option<i32>,
    form: FormData,
    errors: FieldErrors,
}

impl ProductView {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the list and re-derive the categories.
    pub fn load(&mut self, products: Vec<Product>) {
        self.categories = distinct_categories(&products);
        self.products = products;
    }

    pub fn products(&self) -> &[Product] {
        &self.products
    }

    pub fn product(&self, id: i32) -> Option<&Product> {
        self.products.iter().find(|product| product.id == id)
    }

    pub fn categories(&self) -> &[String] {
        &self.categories
    }

    pub fn search_term(&self) -> &str {
        &self.search_term
    }

    pub fn set_search_term<S: Into<String>>(&mut self, term: S) {
        self.search_term = term.into();
    }

    pub fn category_filter(&self) -> &str {
        &self.category_filter
    }

    /// An empty string means "all categories".
    pub fn set_category_filter<S: Into<String>>(&mut self, category: S) {
        self.category_filter = category.into();
    }

    pub fn filtered(&self) -> Vec<&Product> {
        self.products
            .iter()
            .filter(|product| matches(product, &self.search_term, &self.category_filter))
            .collect()
    }

    pub fn form(&self) -> &FormData {
        &self.form
    }

    /// Typing into a field clears the error shown for it.
    pub fn set_field<S: Into<String>>(&mut self, field: Field, value: S) {
        *self.form.slot_mut(field) = value.into();
        self.errors.remove(field.as_str());
    }

    pub fn editing_id(&self) -> Option<i32> {
        self.editing_id
    }

    /// Copy a row into the form and remember its id.
    pub fn edit(&mut self, product: &Product) {
        self.editing_id = Some(product.id);
        self.form = FormData::from_product(product);
        self.errors = FieldErrors::new();
    }

    pub fn cancel_edit(&mut self) {
        self.reset_form();
    }

    pub fn reset_form(&mut self) {
        self.editing_id = None;
        self.form = FormData::default();
        self.errors = FieldErrors::new();
    }

    pub fn errors(&self) -> &FieldErrors {
        &self.errors
    }

    pub fn submission(&self) -> Submission<'_> {
        match self.editing_id {
            Some(id) => Submission::Update(id, &self.form),
            None => Submission::Create(&self.form),
        }
    }

    /// Fetch the full list from the server.
    pub async fn refresh(&mut self, client: &InventoryClient) -> Result<(), CliError> {
        let products = client.list_products().await?;
        self.load(products);
        Ok(())
    }

    /// Create or update depending on whether a row is being edited. On
    /// success the form is cleared and the list re-fetched; on a 422 the
    /// field errors are kept and the form is left as is.
    pub async fn submit(&mut self, client: &InventoryClient) -> Result<Product, CliError> {
        let result = match self.submission() {
            Submission::Create(form) => client.create_product(form).await,
            Submission::Update(id, form) => client.update_product(id, form).await,
        };

        match result {
            Ok(product) => {
                self.reset_form();
                self.refresh(client).await?;
                Ok(product)
            }
            Err(CliError::Validation(errors)) => {
                self.errors = errors.clone();
                Err(CliError::Validation(errors))
            }
            Err(err) => Err(err),
        }
    }

    /// Delete after `confirm` agrees, then re-fetch. Returns the server's
    /// message, or `None` when the user declined.
    pub async fn delete<F>(
        &mut self,
        client: &InventoryClient,
        id: i32,
        confirm: F,
    ) -> Result<Option<String>, CliError>
    where
        F: FnOnce() -> Result<bool, CliError>,
    {
        if !confirm()? {
            return Ok(None);
        }

        let message = client.delete_product(id).await?;
        self.refresh(client).await?;
        Ok(Some(message))
    }

    /// The filtered list as a text table.
    pub fn render_table(&self) -> String {
        let rows = self.filtered();
        let mut out = String::new();

        let _ = writeln!(
            out,
            "{:<6} {:<14} {:<28} {:<28} {:>14} {:>8} {:<16}",
            "ID", "CODE", "NAME", "DESCRIPTION", "PRICE", "QTY", "CATEGORY"
        );
        let _ = writeln!(out, "{}", "─".repeat(120));

        if rows.is_empty() {
            let _ = writeln!(out, "No products found");
            return out;
        }

        for product in rows {
            let _ = writeln!(
                out,
                "{:<6} {:<14} {:<28} {:<28} {:>14} {:>8} {:<16}",
                product.id,
                truncate(or_dash(product.product_code.as_deref()), 12),
                truncate(&product.product_name, 26),
                truncate(or_dash(product.description.as_deref()), 26),
                format_price(product.price),
                product.quantity,
                truncate(or_dash(product.category.as_deref()), 16),
            );
        }
        out
    }
}

/// Name contains the search term (case-insensitive) and, when a category
/// filter is set, the category equals it.
pub fn matches(product: &Product, search_term: &str, category_filter: &str) -> bool {
    let matches_search = product
        .product_name
        .to_lowercase()
        .contains(&search_term.to_lowercase());
    let matches_category =
        category_filter.is_empty() || product.category.as_deref() == Some(category_filter);

    matches_search && matches_category
}

/// Distinct non-empty categories in first-seen order.
pub fn distinct_categories(products: &[Product]) -> Vec<String> {
    let mut categories: Vec<String> = Vec::new();
    for category in products.iter().filter_map(|product| product.category.as_deref()) {
        if !category.is_empty() && !categories.iter().any(|known| known == category) {
            categories.push(category.to_string());
        }
    }
    categories
}

/// `₱1,234.50`
pub fn format_price(price: Decimal) -> String {
    let mut rounded = price.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    rounded.rescale(2);

    let text = rounded.abs().to_string();
    let (whole, fraction) = text.split_once('.').unwrap_or((text.as_str(), "00"));

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, digit) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    let sign = if rounded.is_sign_negative() && !rounded.is_zero() {
        "-"
    } else {
        ""
    };
    format!("{}{}{}.{}", sign, CURRENCY_SYMBOL, grouped, fraction)
}

fn or_dash(value: Option<&str>) -> &str {
    match value {
        Some(value) if !value.is_empty() => value,
        _ => "-",
    }
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let cut: String = s.chars().take(max.saturating_sub(1)).collect();
        format!("{}…", cut)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn product(id: i32, name: &str, category: Option<&str>) -> Product {
        Product {
            id,
            product_code: Some(format!("P-{}", id)),
            product_name: name.to_string(),
            description: None,
            price: Decimal::new(5, 0),
            quantity: 1,
            category: category.map(str::to_string),
        }
    }

    fn loaded() -> ProductView {
        let mut view = ProductView::new();
        view.load(vec![
            product(1, "Widget A", Some("Tools")),
            product(2, "Gadget", Some("Home")),
        ]);
        view
    }

    fn names(view: &ProductView) -> Vec<&str> {
        view.filtered()
            .iter()
            .map(|product| product.product_name.as_str())
            .collect()
    }

    #[test]
    fn search_is_case_insensitive() {
        let mut view = loaded();
        view.set_search_term("widget");
        assert_eq!(names(&view), vec!["Widget A"]);

        view.set_search_term("GADG");
        assert_eq!(names(&view), vec!["Gadget"]);
    }

    #[test]
    fn category_filter_is_exact() {
        let mut view = loaded();
        view.set_category_filter("Home");
        assert_eq!(names(&view), vec!["Gadget"]);

        view.set_category_filter("home");
        assert!(view.filtered().is_empty());
    }

    #[test]
    fn empty_filters_show_everything() {
        let mut view = loaded();
        view.set_search_term("");
        view.set_category_filter("");
        assert_eq!(names(&view), vec!["Widget A", "Gadget"]);
    }

    #[test]
    fn both_filters_must_match() {
        let mut view = loaded();
        view.set_search_term("widget");
        view.set_category_filter("Home");
        assert!(view.filtered().is_empty());
    }

    #[test]
    fn categories_are_distinct_and_skip_blanks() {
        let mut view = ProductView::new();
        view.load(vec![
            product(1, "A", Some("Tools")),
            product(2, "B", None),
            product(3, "C", Some("")),
            product(4, "D", Some("Home")),
            product(5, "E", Some("Tools")),
        ]);
        assert_eq!(view.categories(), ["Tools".to_string(), "Home".to_string()]);
    }

    #[test]
    fn prices_have_two_decimals() {
        assert_eq!(format_price(Decimal::new(5, 0)), "₱5.00");
        assert_eq!(format_price(Decimal::new(51, 1)), "₱5.10");
        assert_eq!(format_price(Decimal::new(12345, 1)), "₱1,234.50");
        assert_eq!(format_price(Decimal::new(100000000, 2)), "₱1,000,000.00");
        assert_eq!(format_price(Decimal::new(5005, 3)), "₱5.01");
        assert_eq!(format_price(Decimal::ZERO), "₱0.00");
    }

    #[test]
    fn edit_copies_row_and_submission_switches_to_update() {
        let mut view = loaded();
        assert!(matches!(view.submission(), Submission::Create(_)));

        let row = Product {
            description: Some("Blue".to_string()),
            ..product(2, "Gadget", Some("Home"))
        };
        view.edit(&row);

        assert_eq!(view.editing_id(), Some(2));
        assert_eq!(view.form().product_code, "P-2");
        assert_eq!(view.form().description, "Blue");
        assert_eq!(view.form().price, "5");
        assert_eq!(view.form().quantity, "1");
        assert_eq!(view.form().category, "Home");
        assert_eq!(view.submission(), Submission::Update(2, view.form()));

        view.cancel_edit();
        assert_eq!(view.editing_id(), None);
        assert_eq!(view.form(), &FormData::default());
    }

    #[test]
    fn edit_turns_missing_values_into_blanks() {
        let mut view = ProductView::new();
        let row = Product {
            product_code: None,
            ..product(9, "Loose", None)
        };
        view.edit(&row);
        assert_eq!(view.form().product_code, "");
        assert_eq!(view.form().description, "");
        assert_eq!(view.form().category, "");
    }

    #[test]
    fn typing_clears_that_fields_error() {
        let mut view = ProductView::new();
        let mut errors = FieldErrors::new();
        errors.add("price", "The price field is required.");
        errors.add("quantity", "The quantity field is required.");
        view.errors = errors;

        view.set_field(Field::Price, "9.99");
        assert_eq!(view.form().get(Field::Price), "9.99");
        assert!(!view.errors().contains("price"));
        assert!(view.errors().contains("quantity"));
    }

    #[test]
    fn field_names_parse() {
        assert_eq!("product_name".parse::<Field>().unwrap(), Field::ProductName);
        assert!("name".parse::<Field>().is_err());
    }

    #[test]
    fn table_shows_dashes_and_empty_state() {
        let mut view = loaded();
        let table = view.render_table();
        assert!(table.contains("Widget A"));
        assert!(table.contains("₱5.00"));
        assert!(table.contains("-"));

        view.set_search_term("nothing like this");
        assert!(view.render_table().contains("No products found"));
    }
}
