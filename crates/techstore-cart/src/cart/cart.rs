//! Cart and line item types.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::cart::CartTotals;
use crate::error::CartError;

/// A line item in the cart.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LineItem {
    /// Product id. Unique within a cart.
    pub id: i64,
    /// Product name (denormalized for display).
    pub name: String,
    /// Unit price in whole currency units.
    #[serde(rename = "price")]
    pub unit_price: i64,
    /// Quantity, always at least 1 inside a cart.
    pub quantity: i64,
}

impl LineItem {
    /// Create a line item with quantity 1.
    pub fn new(id: i64, name: impl Into<String>, unit_price: i64) -> Self {
        Self {
            id,
            name: name.into(),
            unit_price,
            quantity: 1,
        }
    }

    /// Unit price times quantity.
    pub fn line_total(&self) -> i64 {
        self.unit_price.saturating_mul(self.quantity)
    }
}

/// Result of [`Cart::add_item`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddOutcome {
    /// A new line was appended.
    Added,
    /// An existing line's quantity went up by one.
    Incremented { quantity: i64 },
}

/// Result of [`Cart::update_quantity`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuantityOutcome {
    /// No line with that id.
    Missing,
    /// The line now has this quantity.
    Updated { quantity: i64 },
    /// The quantity dropped to zero or below and the line was removed.
    Removed,
}

/// A shopping cart: ordered line items, unique by product id.
///
/// Serializes as a bare JSON array of line items. Deserializing rejects
/// duplicate ids and quantities below 1.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<LineItem>", into = "Vec<LineItem>")]
pub struct Cart {
    items: Vec<LineItem>,
}

impl Cart {
    /// Create an empty cart.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a cart from existing line items, checking invariants.
    pub fn from_items(items: Vec<LineItem>) -> Result<Self, CartError> {
        let mut seen = HashSet::with_capacity(items.len());
        for item in &items {
            if item.quantity < 1 {
                return Err(CartError::InvalidQuantity {
                    id: item.id,
                    quantity: item.quantity,
                });
            }
            if !seen.insert(item.id) {
                return Err(CartError::DuplicateItem(item.id));
            }
        }
        Ok(Self { items })
    }

    /// Parse the persisted JSON form.
    pub fn from_json(raw: &str) -> Result<Self, CartError> {
        let items: Vec<LineItem> = serde_json::from_str(raw)?;
        Self::from_items(items)
    }

    /// Serialize to the persisted JSON form.
    pub fn to_json(&self) -> Result<String, CartError> {
        Ok(serde_json::to_string(&self.items)?)
    }

    /// Add one unit of a product.
    ///
    /// If the product is already in the cart its quantity goes up by one and
    /// `name` and `unit_price` are ignored: the first add wins.
    pub fn add_item(&mut self, id: i64, name: impl Into<String>, unit_price: i64) -> AddOutcome {
        if let Some(existing) = self.items.iter_mut().find(|i| i.id == id) {
            existing.quantity = existing.quantity.saturating_add(1);
            return AddOutcome::Incremented {
                quantity: existing.quantity,
            };
        }

        self.items.push(LineItem::new(id, name, unit_price));
        AddOutcome::Added
    }

    /// Remove a line. Returns whether anything was removed.
    pub fn remove_item(&mut self, id: i64) -> bool {
        let len_before = self.items.len();
        self.items.retain(|i| i.id != id);
        self.items.len() < len_before
    }

    /// Change a line's quantity by `delta`.
    ///
    /// A line whose quantity would reach zero or below is removed.
    pub fn update_quantity(&mut self, id: i64, delta: i64) -> QuantityOutcome {
        let Some(item) = self.items.iter_mut().find(|i| i.id == id) else {
            return QuantityOutcome::Missing;
        };

        let quantity = item.quantity.saturating_add(delta);
        if quantity <= 0 {
            self.remove_item(id);
            return QuantityOutcome::Removed;
        }

        item.quantity = quantity;
        QuantityOutcome::Updated { quantity }
    }

    /// Remove every line.
    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Line items in insertion order.
    pub fn items(&self) -> &[LineItem] {
        &self.items
    }

    /// Get a line by product id.
    pub fn get_item(&self, id: i64) -> Option<&LineItem> {
        self.items.iter().find(|i| i.id == id)
    }

    /// Check if cart is empty.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Number of distinct lines.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Item count and price totals.
    pub fn totals(&self) -> CartTotals {
        CartTotals::of(self)
    }
}

impl TryFrom<Vec<LineItem>> for Cart {
    type Error = CartError;

    fn try_from(items: Vec<LineItem>) -> Result<Self, Self::Error> {
        Self::from_items(items)
    }
}

impl From<Cart> for Vec<LineItem> {
    fn from(cart: Cart) -> Self {
        cart.items
    }
}
