//! Nordic CLI - Session table and local cart tools.
//!
//! # Usage
//!
//! ```bash
//! # Create the storefront session table
//! nordic-cli migrate sessions
//!
//! # Work with a local cart file
//! nordic-cli cart add '{"id": "p1", "name": "Widget", "price": "19.99"}'
//! nordic-cli cart show
//! nordic-cli cart change p1 -1
//! nordic-cli cart remove p1
//! nordic-cli cart clear
//! ```
//!
//! # Commands
//!
//! - `migrate` - Create database tables
//! - `cart` - Inspect and edit a cart stored in a JSON file

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use nordic_core::store::FileStore;

mod commands;

#[derive(Parser)]
#[command(name = "nordic-cli")]
#[command(author, version, about = "Nordic Electronics CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run database migrations
    Migrate {
        #[command(subcommand)]
        target: MigrateTarget,
    },
    /// Manage a local cart file
    Cart {
        /// Cart file
        #[arg(long, default_value = commands::cart::DEFAULT_CART_FILE)]
        store: PathBuf,

        #[command(subcommand)]
        action: CartAction,
    },
}

#[derive(Subcommand)]
enum MigrateTarget {
    /// Create the storefront session table
    Sessions,
}

#[derive(Subcommand)]
enum CartAction {
    /// Print the cart
    Show,
    /// Add one unit of a product given as JSON
    Add {
        /// Product record, e.g. '{"id": "p1", "price": 9.99}'
        product: String,
    },
    /// Remove a line item
    Remove {
        /// Product ID
        id: String,
    },
    /// Change a line item's quantity
    Change {
        /// Product ID
        id: String,

        /// Amount to add (negative to subtract)
        #[arg(allow_negative_numbers = true)]
        delta: i64,
    },
    /// Remove every line item
    Clear,
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
        Commands::Migrate { target } => match target {
            MigrateTarget::Sessions => commands::migrate::sessions().await?,
        },
        Commands::Cart { store, action } => {
            let store = FileStore::new(store);
            let output = match action {
                CartAction::Show => commands::cart::show(store),
                CartAction::Add { product } => commands::cart::add(store, &product)?,
                CartAction::Remove { id } => commands::cart::remove(store, &id),
                CartAction::Change { id, delta } => commands::cart::change(store, &id, delta),
                CartAction::Clear => commands::cart::clear(store),
            };

            #[allow(clippy::print_stdout)]
            {
                println!("{output}");
            }
        }
    }
    Ok(())
}
