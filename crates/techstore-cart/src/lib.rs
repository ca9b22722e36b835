//! Shopping cart for the TechStore storefront.
//!
//! The cart is an ordered list of line items, unique by product id, saved to
//! a client-side key-value store after every change:
//!
//! - **Cart**: line items, quantity rules, totals
//! - **View**: derived display data (badge, lines, checkout availability)
//! - **Manager**: applies operations, persists, and notifies the user
//!
//! # Example
//!
//! ```rust,ignore
//! use techstore_cart::prelude::*;
//! use techstore_kv::MemoryStore;
//!
//! let manager = CartManager::new(MemoryStore::new());
//! let cart = manager.load();
//! let cart = manager.add_item(cart, 1, "Laptop", 9000);
//! let cart = manager.add_item(cart, 1, "Laptop", 9000);
//!
//! let view = CartView::render(&cart);
//! assert_eq!(view.badge, 2);
//!
//! let cart = manager.checkout(cart);
//! assert!(cart.is_empty());
//! ```

pub mod cart;
pub mod catalog;
pub mod error;
pub mod manager;
pub mod notify;

pub use cart::{
    compute_totals, price_display, AddOutcome, Cart, CartTotals, CartView, LineItem, LineView,
    QuantityOutcome, CURRENCY_LABEL, EMPTY_CART_TEXT,
};
pub use catalog::{Catalog, Product};
pub use error::CartError;
pub use manager::{CartManager, CART_KEY};
pub use notify::{Confirmer, Notice, Notifier, OrderConfirmation, Recorder, Silent};

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::cart::{compute_totals, Cart, CartTotals, CartView, LineItem};
    pub use crate::catalog::{Catalog, Product};
    pub use crate::error::CartError;
    pub use crate::manager::{CartManager, CART_KEY};
    pub use crate::notify::{Confirmer, Notifier};
}
