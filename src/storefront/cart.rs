//! Shopping cart kept in client storage under the `cart` key.
//!
//! Every mutation writes the cart back immediately. An empty cart removes the key instead of
//! storing `[]`.

use super::storage::{CART_KEY, Storage};
use crate::{
    core::money,
    entities::product,
    errors::{Error, Result},
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::warn;

/// One cart line.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartItem {
    /// Product id
    pub id: i64,
    /// Product name at the time it was added
    pub name: String,
    /// Unit price at the time it was added
    pub price: Decimal,
    /// Units in the cart, always at least one
    pub quantity: u32,
    /// Product image
    pub image_url: String,
}

impl CartItem {
    /// Line total.
    ///
    /// # Errors
    /// Returns [`Error::Validation`] if the total does not fit an order's total price.
    pub fn subtotal(&self) -> Result<Decimal> {
        money::line_total(self.price, self.quantity)
    }
}

/// A storage-backed cart.
pub struct Cart {
    storage: Arc<dyn Storage>,
    items: Vec<CartItem>,
}

impl std::fmt::Debug for Cart {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Cart").field("items", &self.items).finish_non_exhaustive()
    }
}

impl Cart {
    /// Loads the cart from storage. Data that fails to parse is logged and removed.
    pub fn load(storage: Arc<dyn Storage>) -> Self {
        let items = match storage.get(CART_KEY) {
            Some(raw) => serde_json::from_str(&raw).unwrap_or_else(|e| {
                warn!("Failed to parse cart data, clearing it: {e}");
                if let Err(e) = storage.remove(CART_KEY) {
                    warn!("Failed to remove corrupt cart data: {e}");
                }
                Vec::new()
            }),
            None => Vec::new(),
        };
        Self { storage, items }
    }

    /// Current lines, in the order they were added.
    #[must_use]
    pub fn items(&self) -> &[CartItem] {
        &self.items
    }

    /// Whether the cart has no lines.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Adds `quantity` units of `product`, merging with an existing line.
    pub fn add_item(&mut self, product: &product::Model, quantity: u32) -> Result<()> {
        if quantity == 0 {
            return Ok(());
        }
        if let Some(line) = self.items.iter_mut().find(|line| line.id == product.id) {
            line.quantity = line.quantity.saturating_add(quantity);
        } else {
            self.items.push(CartItem {
                id: product.id,
                name: product.name.clone(),
                price: product.price,
                quantity,
                image_url: product.image_url.clone(),
            });
        }
        self.save()
    }

    /// Sets a line's quantity; zero or less removes the line, larger than `u32::MAX` clamps.
    pub fn update_quantity(&mut self, product_id: i64, quantity: i64) -> Result<()> {
        if quantity <= 0 {
            return self.remove_item(product_id);
        }
        let quantity = u32::try_from(quantity).unwrap_or(u32::MAX);
        if let Some(line) = self.items.iter_mut().find(|line| line.id == product_id) {
            line.quantity = quantity;
        }
        self.save()
    }

    /// Removes a line if present.
    pub fn remove_item(&mut self, product_id: i64) -> Result<()> {
        self.items.retain(|line| line.id != product_id);
        self.save()
    }

    /// Empties the cart.
    pub fn clear(&mut self) -> Result<()> {
        self.items.clear();
        self.save()
    }

    /// Total units across all lines.
    #[must_use]
    pub fn total_items(&self) -> u64 {
        self.items.iter().map(|line| u64::from(line.quantity)).sum()
    }

    /// Sum of price times quantity across all lines.
    ///
    /// # Errors
    /// Returns [`Error::Validation`] if a line or the sum overflows.
    pub fn total_price(&self) -> Result<Decimal> {
        self.items.iter().try_fold(Decimal::ZERO, |total, line| {
            total
                .checked_add(line.subtotal()?)
                .ok_or_else(|| Error::validation("Total price is too large"))
        })
    }

    fn save(&self) -> Result<()> {
        if self.items.is_empty() {
            self.storage.remove(CART_KEY)
        } else {
            self.storage.set(CART_KEY, &serde_json::to_string(&self.items)?)
        }
    }
}
