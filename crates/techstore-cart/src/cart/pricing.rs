//! Cart totals.

use serde::{Deserialize, Serialize};

use crate::cart::Cart;

/// Item count and price totals for a cart.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct CartTotals {
    /// Sum of quantities.
    pub total_items: i64,
    /// Sum of unit price times quantity.
    pub total_price: i64,
}

impl CartTotals {
    /// Compute totals. Sums saturate at the `i64` bounds.
    pub fn of(cart: &Cart) -> Self {
        cart.items().iter().fold(Self::default(), |acc, item| Self {
            total_items: acc.total_items.saturating_add(item.quantity),
            total_price: acc.total_price.saturating_add(item.line_total()),
        })
    }
}

/// Compute the totals of a cart. Pure; an empty cart yields `{0, 0}`.
pub fn compute_totals(cart: &Cart) -> CartTotals {
    CartTotals::of(cart)
}
