//! `inventory` command-line client.
//!
//! ```text
//! inventory list --search widget --category Tools
//! inventory categories
//! inventory add --name "Widget A" --price 9.99 --quantity 3 --category Tools
//! inventory edit 1 --code W-001 --price 10.50
//! inventory delete 1
//! ```

use clap::{Parser, Subcommand};
use inventory::cli::inventory_client::DEFAULT_INVENTORY_URL;
use inventory::cli::view::Field;
use inventory::console::commands::cli::{add, delete, edit, list};
use inventory::console::commands::CallableTrait;

#[derive(Parser, Debug)]
#[command(
    name = "inventory",
    version,
    about = "Manage products on an inventory server"
)]
struct Cli {
    /// Server base URL
    #[arg(long, global = true, env = "INVENTORY_URL", default_value = DEFAULT_INVENTORY_URL)]
    url: String,
    #[command(subcommand)]
    command: InventoryCommands,
}

#[derive(Debug, Subcommand)]
enum InventoryCommands {
    /// List products, optionally filtered
    List {
        /// Case-insensitive text the product name must contain
        #[arg(long, short)]
        search: Option<String>,
        /// Only show products in this category
        #[arg(long, short)]
        category: Option<String>,
        /// Output in JSON format
        #[arg(long)]
        json: bool,
    },
    /// List the categories in use
    Categories,
    /// Create a product
    Add {
        #[arg(long)]
        name: String,
        #[arg(long)]
        price: String,
        #[arg(long)]
        quantity: String,
        #[arg(long)]
        code: Option<String>,
        #[arg(long)]
        description: Option<String>,
        #[arg(long)]
        category: Option<String>,
    },
    /// Update a product; fields not given keep their current value
    Edit {
        id: i32,
        #[arg(long)]
        code: Option<String>,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        price: Option<String>,
        #[arg(long)]
        quantity: Option<String>,
        #[arg(long)]
        description: Option<String>,
        #[arg(long)]
        category: Option<String>,
    },
    /// Delete a product
    Delete {
        id: i32,
        /// Skip the confirmation prompt
        #[arg(long, short = 'y')]
        yes: bool,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let command = get_command(cli);
    if let Err(err) = command.call() {
        eprintln!("Error: {}", err);
        std::process::exit(1);
    }
    Ok(())
}

fn get_command(cli: Cli) -> Box<dyn CallableTrait> {
    let url = cli.url;
    match cli.command {
        InventoryCommands::List {
            search,
            category,
            json,
        } => Box::new(list::ListCommand::new(url, search, category, json)),
        InventoryCommands::Categories => Box::new(list::CategoriesCommand::new(url)),
        InventoryCommands::Add {
            name,
            price,
            quantity,
            code,
            description,
            category,
        } => Box::new(add::AddCommand::new(
            url,
            name,
            price,
            quantity,
            code,
            description,
            category,
        )),
        InventoryCommands::Edit {
            id,
            code,
            name,
            price,
            quantity,
            description,
            category,
        } => {
            let changes = [
                (Field::ProductCode, code),
                (Field::ProductName, name),
                (Field::Price, price),
                (Field::Quantity, quantity),
                (Field::Description, description),
                (Field::Category, category),
            ]
            .into_iter()
            .filter_map(|(field, value)| value.map(|value| (field, value)))
            .collect();
            Box::new(edit::EditCommand::new(url, id, changes))
        }
        InventoryCommands::Delete { id, yes } => Box::new(delete::DeleteCommand::new(url, id, yes)),
    }
}
