//! NightBox CLI - Database migrations and management tools.
//!
//! # Usage
//!
//! ```bash
//! # Create or upgrade the schema (including the session table)
//! nightbox-cli migrate
//!
//! # Insert the starter products if the catalog is empty
//! nightbox-cli seed
//!
//! # Show the catalog
//! nightbox-cli products list
//! ```
//!
//! All commands read the same environment as the storefront
//! (`STOREFRONT_DATABASE_URL`, falling back to `DATABASE_URL`, then the
//! local `delivery.db`).

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "nightbox-cli")]
#[command(author, version, about = "NightBox CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run database migrations
    Migrate,
    /// Seed the product catalog (no-op when products exist)
    Seed,
    /// Inspect products
    Products {
        #[command(subcommand)]
        action: ProductsAction,
    },
}

#[derive(Subcommand)]
enum ProductsAction {
    /// List every product with its price
    List,
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
        Commands::Migrate => commands::migrate::run().await?,
        Commands::Seed => commands::seed::run().await?,
        Commands::Products { action } => match action {
            ProductsAction::List => commands::products::list().await?,
        },
    }
    Ok(())
}
