//! Cart error types.

use thiserror::Error;

/// Errors raised while restoring or saving a cart.
///
/// Cart operations themselves never fail; these surface only from the
/// conversion and persistence helpers, and [`crate::CartManager`] absorbs them.
#[derive(Error, Debug)]
pub enum CartError {
    /// Two line items share a product id.
    #[error("Duplicate line item for product {0}")]
    DuplicateItem(i64),

    /// A line item has a quantity below 1.
    #[error("Invalid quantity {quantity} for product {id}")]
    InvalidQuantity { id: i64, quantity: i64 },

    /// The stored value is not a cart.
    #[error("Stored cart is unreadable: {0}")]
    Unreadable(String),

    /// The store rejected a read or write.
    #[error("Storage error: {0}")]
    Storage(#[from] techstore_kv::KvError),
}

impl From<serde_json::Error> for CartError {
    fn from(e: serde_json::Error) -> Self {
        CartError::Unreadable(e.to_string())
    }
}
