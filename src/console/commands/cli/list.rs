use crate::cli::error::CliError;
use crate::cli::inventory_client::InventoryClient;
use crate::cli::progress;
use crate::cli::view::ProductView;
use crate::console::commands::cli::block_on;
use crate::console::commands::CallableTrait;

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// list products
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// `inventory list [--search TEXT] [--category NAME] [--json]`
///
/// Fetches every product and filters locally.
pub struct ListCommand {
    pub base_url: String,
    pub search: Option<String>,
    pub category: Option<String>,
    pub json: bool,
}

impl ListCommand {
    pub fn new(
        base_url: String,
        search: Option<String>,
        category: Option<String>,
        json: bool,
    ) -> Self {
        Self {
            base_url,
            search,
            category,
            json,
        }
    }
}

impl CallableTrait for ListCommand {
    fn call(&self) -> Result<(), Box<dyn std::error::Error>> {
        block_on(async {
            let client = InventoryClient::new(&self.base_url)?;
            let mut view = load_view(&client).await?;

            view.set_search_term(self.search.clone().unwrap_or_default());
            view.set_category_filter(self.category.clone().unwrap_or_default());

            let rows = view.filtered();
            if self.json {
                println!("{}", serde_json::to_string_pretty(&rows)?);
            } else {
                print!("{}", view.render_table());
                eprintln!(
                    "\n{} of {} product(s) shown.",
                    rows.len(),
                    view.products().len()
                );
            }

            Ok::<(), CliError>(())
        })?;
        Ok(())
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// list categories
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// `inventory categories`
///
/// Prints the distinct categories of the loaded products, one per line.
pub struct CategoriesCommand {
    pub base_url: String,
}

impl CategoriesCommand {
    pub fn new(base_url: String) -> Self {
        Self { base_url }
    }
}

impl CallableTrait for CategoriesCommand {
    fn call(&self) -> Result<(), Box<dyn std::error::Error>> {
        block_on(async {
            let client = InventoryClient::new(&self.base_url)?;
            let view = load_view(&client).await?;

            if view.categories().is_empty() {
                eprintln!("No categories found.");
                return Ok(());
            }

            for category in view.categories() {
                println!("{}", category);
            }
            Ok::<(), CliError>(())
        })?;
        Ok(())
    }
}

/// Fetch the list behind a spinner.
pub(crate) async fn load_view(client: &InventoryClient) -> Result<ProductView, CliError> {
    let pb = progress::spinner("Fetching products...");
    let mut view = ProductView::new();

    match view.refresh(client).await {
        Ok(()) => {
            progress::finish_clear(&pb);
            Ok(view)
        }
        Err(err) => {
            progress::finish_error(&pb, "Failed to fetch products");
            Err(err)
        }
    }
}
