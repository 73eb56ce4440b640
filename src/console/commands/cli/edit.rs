use crate::cli::error::CliError;
use crate::cli::inventory_client::InventoryClient;
use crate::cli::progress;
use crate::cli::view::{Field, ProductView};
use crate::console::commands::cli::block_on;
use crate::console::commands::CallableTrait;

/// `inventory edit ID [--code C] [--name N] [--price P] [--quantity Q] [--description D] [--category C]`
///
/// Loads the row into the form, applies the given values and submits the
/// whole form as an update. An empty string clears `--description` or
/// `--category`; an empty `--code` always fails, since updates require a code.
pub struct EditCommand {
    pub base_url: String,
    pub id: i32,
    pub changes: Vec<(Field, String)>,
}

impl EditCommand {
    pub fn new(base_url: String, id: i32, changes: Vec<(Field, String)>) -> Self {
        Self {
            base_url,
            id,
            changes,
        }
    }
}

impl CallableTrait for EditCommand {
    fn call(&self) -> Result<(), Box<dyn std::error::Error>> {
        block_on(async {
            let client = InventoryClient::new(&self.base_url)?;
            let current = client.get_product(self.id).await?;

            let mut view = ProductView::new();
            view.edit(&current);
            for (field, value) in &self.changes {
                view.set_field(*field, value.as_str());
            }

            let pb = progress::spinner(&format!("Updating product #{}...", self.id));
            match view.submit(&client).await {
                Ok(product) => {
                    progress::finish_success(
                        &pb,
                        &format!("Updated product #{} {}", product.id, product.product_name),
                    );
                    Ok::<(), CliError>(())
                }
                Err(err) => {
                    progress::finish_error(&pb, "Product was not updated");
                    Err(err)
                }
            }
        })?;
        Ok(())
    }
}
