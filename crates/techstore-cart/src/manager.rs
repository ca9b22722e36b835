//! Cart manager: the cart state machine wired to storage and notifications.

use techstore_kv::{KvError, KvStore, Store};
use techstore_observability::StructuredLogger;

use crate::cart::{compute_totals, AddOutcome, Cart, CartTotals, QuantityOutcome};
use crate::error::CartError;
use crate::notify::{Confirmer, Notice, Notifier, OrderConfirmation, Silent};

/// Store key the cart is saved under.
pub const CART_KEY: &str = "techstore_cart";

/// Applies cart operations and their side effects.
///
/// The cart is an owned value passed in and returned from every operation;
/// the manager only holds collaborators. Every mutation rewrites the whole
/// cart under the storage key before returning.
///
/// # Example
///
/// ```rust,ignore
/// let manager = CartManager::new(FileStore::open(".techstore")?);
/// let cart = manager.load();
/// let cart = manager.add_item(cart, 1, "Laptop", 9000);
/// let cart = manager.update_quantity(cart, 1, 1);
/// let totals = manager.compute_totals(&cart);
/// ```
pub struct CartManager<S, N = Silent, C = Silent> {
    store: Store<S>,
    key: String,
    notifier: N,
    confirmer: C,
    logger: StructuredLogger,
}

impl<S: KvStore> CartManager<S> {
    /// Create a manager with silent notification surfaces.
    pub fn new(store: S) -> Self {
        Self {
            store: Store::new(store),
            key: CART_KEY.to_string(),
            notifier: Silent,
            confirmer: Silent,
            logger: StructuredLogger::quiet(),
        }
    }
}

impl<S: KvStore, N: Notifier, C: Confirmer> CartManager<S, N, C> {
    /// Use a different notifier.
    pub fn with_notifier<N2: Notifier>(self, notifier: N2) -> CartManager<S, N2, C> {
        CartManager {
            store: self.store,
            key: self.key,
            notifier,
            confirmer: self.confirmer,
            logger: self.logger,
        }
    }

    /// Use a different checkout confirmer.
    pub fn with_confirmer<C2: Confirmer>(self, confirmer: C2) -> CartManager<S, N, C2> {
        CartManager {
            store: self.store,
            key: self.key,
            notifier: self.notifier,
            confirmer,
            logger: self.logger,
        }
    }

    /// Save under a different key.
    pub fn with_key(mut self, key: impl Into<String>) -> Self {
        self.key = key.into();
        self
    }

    /// Log through `logger`.
    pub fn with_logger(mut self, logger: StructuredLogger) -> Self {
        self.logger = logger.with_component("cart");
        self
    }

    /// Restore the saved cart.
    ///
    /// A missing, unreadable or inconsistent saved value yields an empty cart.
    pub fn load(&self) -> Cart {
        match self.read() {
            Ok(Some(cart)) => {
                self.logger
                    .debug("cart restored")
                    .field("lines", cart.len())
                    .emit();
                cart
            }
            Ok(None) => Cart::new(),
            Err(CartError::Storage(e)) => {
                self.logger
                    .error("cart store unreadable, starting empty")
                    .field("key", self.key.as_str())
                    .display("error", e)
                    .emit();
                Cart::new()
            }
            Err(e) => {
                self.logger
                    .warn("discarding corrupt saved cart")
                    .field("key", self.key.as_str())
                    .display("error", e)
                    .emit();
                Cart::new()
            }
        }
    }

    fn read(&self) -> Result<Option<Cart>, CartError> {
        match self.store.get_raw(&self.key)? {
            Some(raw) => Ok(Some(Cart::from_json(&raw)?)),
            None => Ok(None),
        }
    }

    /// Add one unit of a product and announce it.
    pub fn add_item(&self, mut cart: Cart, id: i64, name: &str, unit_price: i64) -> Cart {
        let outcome = cart.add_item(id, name, unit_price);
        self.logger
            .debug("item added")
            .field("id", id)
            .field("new_line", outcome == AddOutcome::Added)
            .emit();
        self.persist(&cart);
        self.notify(Notice::ItemAdded {
            name: name.to_string(),
        });
        cart
    }

    /// Remove a product's line and announce it.
    ///
    /// Removing a product that is not in the cart still saves and announces.
    pub fn remove_item(&self, mut cart: Cart, id: i64) -> Cart {
        let removed = cart.remove_item(id);
        self.logger
            .debug("item removed")
            .field("id", id)
            .field("present", removed)
            .emit();
        self.persist(&cart);
        self.notify(Notice::ItemRemoved);
        cart
    }

    /// Change a product's quantity by `delta`.
    ///
    /// Unknown ids are ignored. Reaching zero behaves like [`Self::remove_item`].
    pub fn update_quantity(&self, mut cart: Cart, id: i64, delta: i64) -> Cart {
        match cart.update_quantity(id, delta) {
            QuantityOutcome::Missing => cart,
            QuantityOutcome::Removed => {
                self.logger
                    .debug("quantity reached zero")
                    .field("id", id)
                    .emit();
                self.persist(&cart);
                self.notify(Notice::ItemRemoved);
                cart
            }
            QuantityOutcome::Updated { quantity } => {
                self.logger
                    .debug("quantity updated")
                    .field("id", id)
                    .field("quantity", quantity)
                    .emit();
                self.persist(&cart);
                cart
            }
        }
    }

    /// Item count and price totals.
    pub fn compute_totals(&self, cart: &Cart) -> CartTotals {
        compute_totals(cart)
    }

    /// Confirm the order total, then empty and save the cart.
    ///
    /// An empty cart is returned untouched with no side effects.
    pub fn checkout(&self, mut cart: Cart) -> Cart {
        if cart.is_empty() {
            return cart;
        }

        let totals = compute_totals(&cart);
        self.confirmer.confirm(
            &OrderConfirmation {
                total_price: totals.total_price,
            }
            .to_string(),
        );
        self.logger
            .info("order placed")
            .field("total_items", totals.total_items)
            .field("total_price", totals.total_price)
            .emit();

        cart.clear();
        self.persist(&cart);
        self.notify(Notice::OrderPlaced);
        cart
    }

    /// Storage key in use.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Borrow the store backend.
    pub fn store(&self) -> &S {
        self.store.backend()
    }

    /// Borrow the notifier.
    pub fn notifier(&self) -> &N {
        &self.notifier
    }

    /// Borrow the confirmer.
    pub fn confirmer(&self) -> &C {
        &self.confirmer
    }

    fn persist(&self, cart: &Cart) {
        if let Err(e) = self.write(cart) {
            self.logger
                .error("failed to save cart")
                .field("key", self.key.as_str())
                .display("error", e)
                .emit();
            self.notify(Notice::SaveFailed);
        }
    }

    fn write(&self, cart: &Cart) -> Result<(), KvError> {
        self.store.set_json(&self.key, cart)
    }

    fn notify(&self, notice: Notice) {
        self.notifier.notify(&notice.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notify::Recorder;
    use techstore_kv::{KvResult, MemoryStore};
    use techstore_observability::SessionId;

    struct FailingStore;

    impl KvStore for FailingStore {
        fn get(&self, _key: &str) -> KvResult<Option<String>> {
            Err(KvError::Unavailable("offline".to_string()))
        }

        fn set(&self, _key: &str, _value: &str) -> KvResult<()> {
            Err(KvError::Unavailable("disk full".to_string()))
        }

        fn delete(&self, _key: &str) -> KvResult<()> {
            Ok(())
        }

        fn keys(&self) -> KvResult<Vec<String>> {
            Ok(vec![])
        }
    }

    #[test]
    fn test_add_item_persists_and_notifies() {
        let manager = CartManager::new(MemoryStore::new()).with_notifier(Recorder::new());
        let cart = manager.add_item(Cart::new(), 1, "Webcam", 300);

        assert_eq!(
            manager.store().get(CART_KEY).unwrap().as_deref(),
            Some(r#"[{"id":1,"name":"Webcam","price":300,"quantity":1}]"#)
        );
        assert_eq!(manager.notifier().messages(), vec!["Webcam added to cart!"]);
        assert_eq!(cart.len(), 1);
    }

    #[test]
    fn test_update_quantity_missing_has_no_side_effects() {
        let manager = CartManager::new(MemoryStore::new()).with_notifier(Recorder::new());
        let cart = manager.update_quantity(Cart::new(), 4, 1);

        assert!(cart.is_empty());
        assert_eq!(manager.store().get(CART_KEY).unwrap(), None);
        assert!(manager.notifier().messages().is_empty());
    }

    #[test]
    fn test_update_quantity_up_is_silent() {
        let manager = CartManager::new(MemoryStore::new()).with_notifier(Recorder::new());
        let cart = manager.add_item(Cart::new(), 1, "Webcam", 300);
        manager.notifier().take();

        let cart = manager.update_quantity(cart, 1, 1);
        assert_eq!(cart.get_item(1).unwrap().quantity, 2);
        assert!(manager.notifier().messages().is_empty());
        assert_eq!(manager.load(), cart);
    }

    #[test]
    fn test_save_failure_degrades_to_notice() {
        let (logger, lines) = StructuredLogger::capturing(SessionId::named("t"));
        let manager = CartManager::new(FailingStore)
            .with_notifier(Recorder::new())
            .with_logger(logger);

        let cart = manager.add_item(Cart::new(), 1, "Webcam", 300);

        assert_eq!(cart.len(), 1);
        assert_eq!(
            manager.notifier().messages(),
            vec!["Could not save your cart.", "Webcam added to cart!"]
        );
        assert!(lines.contains_all(&["failed to save cart", "disk full"]));
    }

    #[test]
    fn test_load_store_failure_is_empty() {
        let manager = CartManager::new(FailingStore);
        assert!(manager.load().is_empty());
    }

    #[test]
    fn test_custom_key() {
        let manager = CartManager::new(MemoryStore::new()).with_key("other_cart");
        manager.add_item(Cart::new(), 1, "Webcam", 300);

        assert_eq!(manager.key(), "other_cart");
        assert!(manager.store().exists("other_cart").unwrap());
        assert!(!manager.store().exists(CART_KEY).unwrap());
    }
}
