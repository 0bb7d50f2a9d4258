//! A single line in the shopping cart.

use std::num::NonZeroU32;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::ModelError;
use crate::models::Product;
use crate::types::LineId;

/// Largest quantity a single line can hold.
pub const MAX_QUANTITY: u32 = 999;

/// Unit prices above this are treated as corrupt data.
const MAX_UNIT_PRICE: i64 = 1_000_000_000;

/// One cart line: a product in a given size with a quantity of at least one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawCartItem")]
pub struct CartItem {
    line_id: LineId,
    product: Product,
    size: String,
    quantity: NonZeroU32,
}

/// Persisted shape; older blobs have no `line_id`.
#[derive(Deserialize)]
struct RawCartItem {
    #[serde(default)]
    line_id: Option<LineId>,
    product: Product,
    size: String,
    quantity: u32,
}

impl TryFrom<RawCartItem> for CartItem {
    type Error = ModelError;

    fn try_from(raw: RawCartItem) -> Result<Self, Self::Error> {
        let quantity = NonZeroU32::new(raw.quantity).ok_or_else(|| {
            ModelError::MalformedCartItem(format!(
                "quantity must be at least 1 for product {}",
                raw.product.id()
            ))
        })?;
        if quantity.get() > MAX_QUANTITY {
            return Err(ModelError::MalformedCartItem(format!(
                "quantity {} exceeds {MAX_QUANTITY} for product {}",
                quantity,
                raw.product.id()
            )));
        }
        if raw.product.price().abs() > Decimal::from(MAX_UNIT_PRICE) {
            return Err(ModelError::MalformedCartItem(format!(
                "implausible price {} for product {}",
                raw.product.price(),
                raw.product.id()
            )));
        }
        Ok(Self {
            line_id: raw.line_id.unwrap_or_else(LineId::generate),
            product: raw.product,
            size: raw.size,
            quantity,
        })
    }
}

impl CartItem {
    /// Start a new line with quantity 1.
    #[must_use]
    pub fn new(product: Product, size: impl Into<String>) -> Self {
        Self {
            line_id: LineId::generate(),
            product,
            size: size.into(),
            quantity: NonZeroU32::MIN,
        }
    }

    #[must_use]
    pub const fn line_id(&self) -> LineId {
        self.line_id
    }

    #[must_use]
    pub const fn product(&self) -> &Product {
        &self.product
    }

    #[must_use]
    pub fn size(&self) -> &str {
        &self.size
    }

    #[must_use]
    pub const fn quantity(&self) -> u32 {
        self.quantity.get()
    }

    /// Whether this line holds `product` in `size`.
    #[must_use]
    pub fn matches(&self, product: &Product, size: &str) -> bool {
        self.product.id() == product.id() && self.size == size
    }

    /// `quantity × price`, saturating at the `Decimal` bounds.
    #[must_use]
    pub fn line_total(&self) -> Decimal {
        self.product
            .price()
            .saturating_mul(Decimal::from(self.quantity.get()))
    }

    /// Add one unit. A line already at [`MAX_QUANTITY`] stays there.
    pub fn increment(&mut self) {
        if self.quantity.get() < MAX_QUANTITY {
            self.quantity = self.quantity.saturating_add(1);
        }
    }

    /// Remove one unit.
    ///
    /// Returns `false` without changing anything when the quantity is already
    /// 1; the caller removes the line instead.
    pub fn decrement(&mut self) -> bool {
        match NonZeroU32::new(self.quantity.get() - 1) {
            Some(quantity) => {
                self.quantity = quantity;
                true
            }
            None => false,
        }
    }
}
