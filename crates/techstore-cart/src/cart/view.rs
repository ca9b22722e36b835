//! Derived view of a cart for display.

use serde::Serialize;

use crate::cart::Cart;

/// Currency label appended to displayed amounts.
pub const CURRENCY_LABEL: &str = "DH";

/// Text shown in place of the line list when the cart is empty.
pub const EMPTY_CART_TEXT: &str = "Your cart is empty.";

/// Format an amount for display, e.g. `"35 DH"`.
pub fn price_display(amount: i64) -> String {
    format!("{} {}", amount, CURRENCY_LABEL)
}

/// One rendered cart line.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct LineView {
    pub id: i64,
    pub name: String,
    pub unit_price: i64,
    pub quantity: i64,
    pub line_total: i64,
}

impl LineView {
    /// Price and quantity, e.g. `"10 DH × 2"`.
    pub fn price_line(&self) -> String {
        format!("{} × {}", price_display(self.unit_price), self.quantity)
    }
}

/// Everything a cart display needs, computed from a cart without touching it.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct CartView {
    /// Value for the item count badge.
    pub badge: i64,
    /// Whether the checkout action is available.
    pub checkout_enabled: bool,
    /// Lines in cart order.
    pub lines: Vec<LineView>,
    /// Overall price.
    pub total_price: i64,
}

impl CartView {
    /// Render a cart.
    pub fn render(cart: &Cart) -> Self {
        let totals = cart.totals();
        let lines = cart
            .items()
            .iter()
            .map(|item| LineView {
                id: item.id,
                name: item.name.clone(),
                unit_price: item.unit_price,
                quantity: item.quantity,
                line_total: item.line_total(),
            })
            .collect();

        Self {
            badge: totals.total_items,
            checkout_enabled: !cart.is_empty(),
            lines,
            total_price: totals.total_price,
        }
    }

    /// Whether there is nothing to show.
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Plain-text rendering, one line per item followed by the total.
    pub fn to_text(&self) -> String {
        if self.is_empty() {
            return format!("{}\nTotal: {}", EMPTY_CART_TEXT, price_display(0));
        }

        let mut out = String::new();
        for line in &self.lines {
            out.push_str(&format!(
                "{} | {} = {}\n",
                line.name,
                line.price_line(),
                price_display(line.line_total)
            ));
        }
        out.push_str(&format!("Total: {}", price_display(self.total_price)));
        out
    }
}
