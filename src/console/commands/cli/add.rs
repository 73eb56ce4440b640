use crate::cli::error::CliError;
use crate::cli::inventory_client::InventoryClient;
use crate::cli::progress;
use crate::cli::view::{Field, ProductView};
use crate::console::commands::cli::block_on;
use crate::console::commands::CallableTrait;

/// `inventory add --name N --price P --quantity Q [--code C] [--description D] [--category C]`
pub struct AddCommand {
    pub base_url: String,
    pub values: Vec<(Field, String)>,
}

impl AddCommand {
    pub fn new(
        base_url: String,
        name: String,
        price: String,
        quantity: String,
        code: Option<String>,
        description: Option<String>,
        category: Option<String>,
    ) -> Self {
        let mut values = vec![
            (Field::ProductName, name),
            (Field::Price, price),
            (Field::Quantity, quantity),
        ];
        values.extend(code.map(|v| (Field::ProductCode, v)));
        values.extend(description.map(|v| (Field::Description, v)));
        values.extend(category.map(|v| (Field::Category, v)));

        Self { base_url, values }
    }
}

impl CallableTrait for AddCommand {
    fn call(&self) -> Result<(), Box<dyn std::error::Error>> {
        block_on(async {
            let client = InventoryClient::new(&self.base_url)?;
            let mut view = ProductView::new();
            for (field, value) in &self.values {
                view.set_field(*field, value.as_str());
            }

            let pb = progress::spinner("Creating product...");
            match view.submit(&client).await {
                Ok(product) => {
                    progress::finish_success(
                        &pb,
                        &format!("Created product #{} {}", product.id, product.product_name),
                    );
                    Ok::<(), CliError>(())
                }
                Err(err) => {
                    progress::finish_error(&pb, "Product was not created");
                    Err(err)
                }
            }
        })?;
        Ok(())
    }
}
