//! Domain models decoded from the shop API.
//!
//! All models are immutable values except for the quantity of a cart line.

mod cart_item;
mod category;
mod product;

pub use cart_item::{CartItem, MAX_QUANTITY};
pub use category::Category;
pub use product::{MAX_IMAGES, PLACEHOLDER_NAME, Product};
