//! Shopping cart module.
//!
//! Contains the cart state machine, totals, and the derived display view.

mod cart;
mod pricing;
mod view;

pub use cart::{AddOutcome, Cart, LineItem, QuantityOutcome};
pub use pricing::{compute_totals, CartTotals};
pub use view::{price_display, CartView, LineView, CURRENCY_LABEL, EMPTY_CART_TEXT};
