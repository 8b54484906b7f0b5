//! Eashop CLI - Inspect and edit the catalog and cart from a terminal.
//!
//! # Usage
//!
//! ```bash
//! # List products, optionally filtered
//! eashop-cli products --category 2 --search shirt
//!
//! # List categories and sizes
//! eashop-cli categories
//! eashop-cli sizes
//!
//! # Show and edit the configured user's cart
//! eashop-cli cart show
//! eashop-cli cart set-quantity --product 3 --size 1 --quantity 2
//! eashop-cli cart remove --product 3 --size 1
//! ```
//!
//! The API location and cart user come from `EASHOP_API_URL` and
//! `EASHOP_CART_USER_ID`.

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "eashop-cli")]
#[command(author, version, about = "Eashop CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List products with their categories and sizes
    Products {
        /// Only products in this category
        #[arg(short, long)]
        category: Option<i32>,

        /// Case-insensitive substring of the product name
        #[arg(short, long)]
        search: Option<String>,
    },
    /// List all categories
    Categories,
    /// List all sizes
    Sizes,
    /// Inspect or edit the cart
    Cart {
        #[command(subcommand)]
        action: CartAction,
    },
}

#[derive(Subcommand)]
enum CartAction {
    /// Show the cart rows and totals
    Show,
    /// Set the quantity of a cart row
    SetQuantity {
        /// Product ID
        #[arg(short, long)]
        product: i32,

        /// Size ID
        #[arg(short, long)]
        size: i32,

        /// New quantity (at least 1)
        #[arg(short, long)]
        quantity: u32,
    },
    /// Remove a cart row
    Remove {
        /// Product ID
        #[arg(short, long)]
        product: i32,

        /// Size ID
        #[arg(short, long)]
        size: i32,
    },
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Products { category, search } => {
            commands::catalog::products(category, search.as_deref()).await?;
        }
        Commands::Categories => commands::catalog::categories().await?,
        Commands::Sizes => commands::catalog::sizes().await?,
        Commands::Cart { action } => match action {
            CartAction::Show => commands::cart::show().await?,
            CartAction::SetQuantity {
                product,
                size,
                quantity,
            } => commands::cart::set_quantity(product, size, quantity).await?,
            CartAction::Remove { product, size } => {
                commands::cart::remove(product, size).await?;
            }
        },
    }
    Ok(())
}
