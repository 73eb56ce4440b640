use crate::cli::error::CliError;
use crate::cli::inventory_client::InventoryClient;
use crate::cli::view::ProductView;
use crate::console::commands::cli::block_on;
use crate::console::commands::CallableTrait;
use dialoguer::Confirm;

/// `inventory delete ID [--yes]`
///
/// Asks before deleting unless `--yes` is given.
pub struct DeleteCommand {
    pub base_url: String,
    pub id: i32,
    pub yes: bool,
}

impl DeleteCommand {
    pub fn new(base_url: String, id: i32, yes: bool) -> Self {
        Self { base_url, id, yes }
    }
}

impl CallableTrait for DeleteCommand {
    fn call(&self) -> Result<(), Box<dyn std::error::Error>> {
        block_on(async {
            let client = InventoryClient::new(&self.base_url)?;
            let product = client.get_product(self.id).await?;

            let mut view = ProductView::new();
            let yes = self.yes;
            let confirmed = view
                .delete(&client, self.id, || {
                    if yes {
                        return Ok(true);
                    }
                    let answer = Confirm::new()
                        .with_prompt(format!(
                            "Delete product #{} ({})?",
                            product.id, product.product_name
                        ))
                        .default(false)
                        .interact()?;
                    Ok(answer)
                })
                .await?;

            match confirmed {
                Some(message) => {
                    println!("{}", message);
                    Ok::<(), CliError>(())
                }
                None => Err(CliError::Aborted),
            }
        })?;
        Ok(())
    }
}
