//! Cart commands.
//!
//! The cart lives in the data directory and survives between runs. Lines are
//! addressed by the id printed by `wardrobe cart show`.

use wardrobe_core::{LineId, Product, ProductId, format_price};
use wardrobe_storefront::StorefrontError;
use wardrobe_storefront::catalog::CatalogController;

use super::Context;
use super::catalog::open_listing;

/// Print every line and the totals.
pub fn show(context: &Context) {
    let cart = context.cart();
    if cart.is_empty() {
        println!("Cart is empty");
        return;
    }

    for item in cart.items() {
        println!(
            "{}  {:<40} {:<6} x{:<3} {:>10}",
            item.line_id(),
            item.product().name(),
            item.size(),
            item.quantity(),
            format_price(item.line_total())
        );
    }
    println!(
        "{} items, total {}",
        cart.total_count(),
        format_price(cart.total_price())
    );
}

/// Find a product in the catalog and add one unit of it in `size`.
///
/// The search gives up after `max_pages` pages.
pub async fn add(
    context: &Context,
    product_id: i64,
    size: &str,
    category: Option<&str>,
    max_pages: u32,
) -> Result<(), StorefrontError> {
    let controller = context.catalog()?;
    let product = find_product(&controller, ProductId::new(product_id), category, max_pages)
        .await?;

    if !product.sizes().is_empty() && !product.has_size(size) {
        return Err(StorefrontError::BadRequest(format!(
            "{} is not available in size {size} (sizes: {})",
            product.name(),
            product.sizes().join(", ")
        )));
    }

    let mut cart = context.cart();
    let line_id = cart.add_item(&product, size)?;
    println!("Added {} ({size}) as line {line_id}", product.name());
    Ok(())
}

pub fn remove(context: &Context, line_id: LineId) -> Result<(), StorefrontError> {
    context.cart().remove_item(line_id)?;
    println!("Removed line {line_id}");
    Ok(())
}

pub fn increment(context: &Context, line_id: LineId) -> Result<(), StorefrontError> {
    let mut cart = context.cart();
    cart.increment(line_id)?;
    print_quantity(cart.get(line_id).map(|item| item.quantity()), line_id);
    Ok(())
}

pub fn decrement(context: &Context, line_id: LineId) -> Result<(), StorefrontError> {
    let mut cart = context.cart();
    cart.decrement(line_id)?;
    print_quantity(cart.get(line_id).map(|item| item.quantity()), line_id);
    Ok(())
}

pub fn clear(context: &Context) -> Result<(), StorefrontError> {
    context.cart().clear()?;
    println!("Cart cleared");
    Ok(())
}

fn print_quantity(quantity: Option<u32>, line_id: LineId) {
    match quantity {
        Some(quantity) => println!("Line {line_id} now has quantity {quantity}"),
        None => println!("Removed line {line_id}"),
    }
}

/// Page through the listing until `id` shows up, the pages run out, or
/// `max_pages` pages have been read.
async fn find_product(
    controller: &CatalogController,
    id: ProductId,
    category: Option<&str>,
    max_pages: u32,
) -> Result<Product, StorefrontError> {
    open_listing(controller, category).await?;
    let mut pages = 1;

    loop {
        let state = controller.state();
        if let Some(product) = state.products.iter().find(|product| product.id() == id) {
            return Ok(product.clone());
        }
        if !state.has_more || pages >= max_pages {
            return Err(StorefrontError::NotFound(format!(
                "product {id} in the first {pages} pages"
            )));
        }
        controller.load_more().await?;
        pages += 1;
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;

    use wardrobe_storefront::shop::ShopApiClient;
    use wardrobe_storefront::testing::{ScriptedTransport, product_page, test_config};

    use super::*;

    fn controller() -> (CatalogController, Arc<ScriptedTransport>) {
        let transport = Arc::new(ScriptedTransport::new());
        let api = ShopApiClient::with_transport(test_config(), transport.clone()).unwrap();
        (CatalogController::new(api), transport)
    }

    #[tokio::test]
    async fn test_find_product_on_a_later_page() {
        let (controller, transport) = controller();
        transport.push_json("products", 200, product_page(1, 12));
        transport.push_json("products", 200, product_page(13, 12));

        let product = find_product(&controller, ProductId::new(20), None, 5)
            .await
            .unwrap();
        assert_eq!(product.id(), ProductId::new(20));
        assert_eq!(transport.requests_to("products").len(), 2);
    }

    #[tokio::test]
    async fn test_find_product_stops_at_page_cap() {
        let (controller, transport) = controller();
        // A server that ignores `page` keeps sending the same full page.
        for _ in 0..10 {
            transport.push_json("products", 200, product_page(1, 12));
        }

        let err = find_product(&controller, ProductId::new(99), None, 3)
            .await
            .unwrap_err();
        assert!(matches!(err, StorefrontError::NotFound(_)));
        assert_eq!(transport.requests_to("products").len(), 3);
    }

    #[tokio::test]
    async fn test_find_product_stops_when_pages_run_out() {
        let (controller, transport) = controller();
        transport.push_json("products", 200, product_page(1, 4));

        let err = find_product(&controller, ProductId::new(99), None, 50)
            .await
            .unwrap_err();
        assert!(matches!(err, StorefrontError::NotFound(_)));
        assert_eq!(transport.requests_to("products").len(), 1);
    }
}
