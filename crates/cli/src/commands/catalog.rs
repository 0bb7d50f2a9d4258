//! Catalog browsing commands.

use wardrobe_core::{Product, format_price};
use wardrobe_storefront::StorefrontError;
use wardrobe_storefront::catalog::CatalogController;

use super::Context;

/// Print the category list, "All" first.
pub async fn categories(context: &Context) -> Result<(), StorefrontError> {
    let controller = context.catalog()?;
    controller.fetch_categories().await?;

    for category in &controller.state().categories {
        let url = if category.is_all() { "-" } else { category.url() };
        println!("{:<8} {:<20} {}", category.id(), url, category.name());
    }
    Ok(())
}

/// Print up to `pages` pages of products.
pub async fn products(
    context: &Context,
    category: Option<&str>,
    pages: u32,
) -> Result<(), StorefrontError> {
    let controller = context.catalog()?;
    open_listing(&controller, category).await?;

    for _ in 1..pages {
        if !controller.state().has_more {
            break;
        }
        controller.load_more().await?;
    }

    let state = controller.state();
    for product in &state.products {
        println!("{}", product_line(product));
    }
    println!(
        "{} products{}",
        state.products.len(),
        if state.has_more { ", more available" } else { "" }
    );
    Ok(())
}

/// Load the first page of `category`, or of every category.
pub(super) async fn open_listing(
    controller: &CatalogController,
    category: Option<&str>,
) -> Result<(), StorefrontError> {
    match category {
        Some(url) => controller.select_category(url).await?,
        None => controller.fetch_products(true).await?,
    };
    Ok(())
}

fn product_line(product: &Product) -> String {
    format!(
        "{:<8} {:<40} {:>10}  sizes: {}",
        product.id(),
        product.name(),
        format_price(product.price()),
        product.sizes().join(", ")
    )
}
