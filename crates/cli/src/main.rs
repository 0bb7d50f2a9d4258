//! Wardrobe CLI - browse the shop catalog and manage the local cart.
//!
//! # Usage
//!
//! ```bash
//! # List categories ("All" first)
//! wardrobe categories
//!
//! # Show the first two pages of coats
//! wardrobe products --category coats --pages 2
//!
//! # Add product 42 in size M, looking for it among dresses
//! wardrobe cart add 42 M --category dresses
//!
//! # Show, change and empty the cart
//! wardrobe cart show
//! wardrobe cart inc 6f0c1e1a-...
//! wardrobe cart clear
//! ```
//!
//! # Environment Variables
//!
//! See `wardrobe_storefront::config`. `RUST_LOG` controls log output
//! (default: `warn`).

#![cfg_attr(not(test), forbid(unsafe_code))]
#![allow(clippy::print_stdout)]

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;
use wardrobe_core::LineId;
use wardrobe_storefront::StorefrontError;

mod commands;

#[derive(Parser)]
#[command(name = "wardrobe")]
#[command(author, version, about = "Browse the shop catalog and manage your cart")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List product categories
    Categories,
    /// List products, page by page
    Products {
        /// Category URL to filter by (default: all categories)
        #[arg(short, long)]
        category: Option<String>,

        /// Number of pages to load
        #[arg(short, long, default_value_t = 1)]
        pages: u32,
    },
    /// Manage the cart
    Cart {
        #[command(subcommand)]
        action: CartAction,
    },
}

#[derive(Subcommand)]
enum CartAction {
    /// Show cart lines and totals
    Show,
    /// Add one unit of a product in a size
    Add {
        /// Product id
        product_id: i64,

        /// Size name, as listed by `products`
        size: String,

        /// Category to search for the product (default: all categories)
        #[arg(short, long)]
        category: Option<String>,

        /// Give up after searching this many pages
        #[arg(long, default_value_t = 50, value_parser = clap::value_parser!(u32).range(1..))]
        max_pages: u32,
    },
    /// Remove a line
    Remove { line_id: LineId },
    /// Increase a line's quantity by one
    Inc { line_id: LineId },
    /// Decrease a line's quantity by one, removing it at zero
    Dec { line_id: LineId },
    /// Remove every line
    Clear,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        tracing::debug!(error = ?e, "Command failed");
        tracing::error!("{}", e.user_message());
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), StorefrontError> {
    let context = commands::Context::load()?;

    match cli.command {
        Commands::Categories => commands::catalog::categories(&context).await?,
        Commands::Products { category, pages } => {
            commands::catalog::products(&context, category.as_deref(), pages).await?;
        }
        Commands::Cart { action } => match action {
            CartAction::Show => commands::cart::show(&context),
            CartAction::Add {
                product_id,
                size,
                category,
                max_pages,
            } => {
                commands::cart::add(&context, product_id, &size, category.as_deref(), max_pages)
                    .await?;
            }
            CartAction::Remove { line_id } => commands::cart::remove(&context, line_id)?,
            CartAction::Inc { line_id } => commands::cart::increment(&context, line_id)?,
            CartAction::Dec { line_id } => commands::cart::decrement(&context, line_id)?,
            CartAction::Clear => commands::cart::clear(&context)?,
        },
    }
    Ok(())
}
