use std::collections::HashSet;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use techstore_cart::{Cart, CartManager, CartTotals, LineItem, Recorder, CART_KEY};
use techstore_kv::{FileStore, KvStore, MemoryStore, STORE_FILE_NAME};

fn recording_manager(
    store: MemoryStore,
) -> CartManager<MemoryStore, Recorder, Recorder> {
    CartManager::new(store)
        .with_notifier(Recorder::new())
        .with_confirmer(Recorder::new())
}

#[test]
fn ids_stay_unique_over_many_adds() {
    let manager = CartManager::new(MemoryStore::new());
    let mut rng = StdRng::seed_from_u64(7);
    let mut cart = Cart::new();

    for _ in 0..500 {
        let id: i64 = rng.gen_range(0..12);
        cart = manager.add_item(cart, id, &format!("p{}", id), 10);

        let ids: HashSet<i64> = cart.items().iter().map(|i| i.id).collect();
        assert_eq!(ids.len(), cart.len());
    }
}

#[test]
fn no_line_ever_has_quantity_below_one() {
    let manager = CartManager::new(MemoryStore::new());
    let mut rng = StdRng::seed_from_u64(42);
    let mut cart = Cart::new();

    for step in 0..1000 {
        let id: i64 = rng.gen_range(0..6);
        if step % 3 == 0 {
            cart = manager.add_item(cart, id, "item", 5);
        } else {
            let delta: i64 = rng.gen_range(-4..=2);
            cart = manager.update_quantity(cart, id, delta);
        }
        assert!(cart.items().iter().all(|i| i.quantity >= 1));
    }
}

#[test]
fn repeated_add_accumulates_and_keeps_first_fields() {
    let manager = CartManager::new(MemoryStore::new());
    let cart = manager.add_item(Cart::new(), 1, "X", 10);
    let cart = manager.add_item(cart, 1, "Y", 99);

    assert_eq!(
        cart.items(),
        &[LineItem {
            id: 1,
            name: "X".to_string(),
            unit_price: 10,
            quantity: 2,
        }]
    );
}

#[test]
fn totals_of_two_lines() {
    let manager = CartManager::new(MemoryStore::new());
    let cart = Cart::from_items(vec![
        LineItem {
            id: 1,
            name: "A".to_string(),
            unit_price: 10,
            quantity: 2,
        },
        LineItem {
            id: 2,
            name: "B".to_string(),
            unit_price: 5,
            quantity: 3,
        },
    ])
    .unwrap();

    assert_eq!(
        manager.compute_totals(&cart),
        CartTotals {
            total_items: 5,
            total_price: 35,
        }
    );
    assert_eq!(manager.compute_totals(&Cart::new()), CartTotals::default());
}

#[test]
fn saved_cart_loads_back_identically() {
    let manager = CartManager::new(MemoryStore::new());
    let mut cart = Cart::new();
    for (id, name, price) in [(3, "Monitor", 1800), (1, "Laptop", 9000), (2, "Mouse", 150)] {
        cart = manager.add_item(cart, id, name, price);
    }
    let cart = manager.update_quantity(cart, 1, 2);

    let restored = manager.load();
    assert_eq!(restored, cart);
    let ids: Vec<i64> = restored.items().iter().map(|i| i.id).collect();
    assert_eq!(ids, vec![3, 1, 2]);
}

#[test]
fn saved_cart_survives_reopening_the_file_store() {
    let dir = tempfile::tempdir().unwrap();
    let cart = {
        let manager = CartManager::new(FileStore::open(dir.path()).unwrap());
        let cart = manager.add_item(manager.load(), 5, "Router", 700);
        manager.add_item(cart, 5, "Router", 700)
    };

    let manager = CartManager::new(FileStore::open(dir.path()).unwrap());
    assert_eq!(manager.load(), cart);
}

#[test]
fn cart_saves_again_after_corrupt_store_file() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join(STORE_FILE_NAME), "not json").unwrap();

    let manager = CartManager::new(FileStore::open(dir.path()).unwrap())
        .with_notifier(Recorder::new());
    let cart = manager.load();
    assert!(cart.is_empty());

    let cart = manager.add_item(cart, 1, "X", 10);
    let cart = manager.add_item(cart, 2, "Y", 20);

    assert_eq!(
        manager.notifier().messages(),
        vec!["X added to cart!", "Y added to cart!"]
    );
    assert_eq!(manager.load(), cart);

    let reopened = CartManager::new(FileStore::open(dir.path()).unwrap());
    assert_eq!(reopened.load().len(), 2);
}

#[test]
fn corrupt_saved_values_load_as_empty() {
    for raw in [
        "not json",
        "{\"id\":1}",
        "null",
        "[{\"id\":1,\"name\":\"X\"}]",
        "[{\"id\":1,\"name\":\"X\",\"price\":1,\"quantity\":0}]",
        "[{\"id\":1,\"name\":\"X\",\"price\":1,\"quantity\":1},{\"id\":1,\"name\":\"X\",\"price\":1,\"quantity\":2}]",
    ] {
        let manager = CartManager::new(MemoryStore::with_entry(CART_KEY, raw));
        assert!(manager.load().is_empty(), "expected empty cart for {}", raw);
    }
}

#[test]
fn missing_saved_value_loads_as_empty() {
    let manager = CartManager::new(MemoryStore::new());
    assert!(manager.load().is_empty());
}

#[test]
fn checkout_twice_second_is_noop() {
    let manager = recording_manager(MemoryStore::new());
    let cart = manager.add_item(Cart::new(), 1, "X", 10);
    let cart = manager.add_item(cart, 2, "Y", 5);
    manager.notifier().take();

    let cart = manager.checkout(cart);
    assert!(cart.is_empty());
    assert_eq!(manager.store().get(CART_KEY).unwrap().as_deref(), Some("[]"));
    assert_eq!(manager.notifier().take(), vec!["Order placed successfully!"]);
    let confirmations = manager.confirmer().take();
    assert_eq!(confirmations.len(), 1);
    assert!(confirmations[0].contains("Total: 15 DH"));

    let cart = manager.checkout(cart);
    assert!(cart.is_empty());
    assert_eq!(manager.store().get(CART_KEY).unwrap().as_deref(), Some("[]"));
    assert!(manager.notifier().messages().is_empty());
    assert!(manager.confirmer().messages().is_empty());
}

#[test]
fn checkout_of_empty_cart_touches_nothing() {
    let manager = recording_manager(MemoryStore::new());
    let cart = manager.checkout(Cart::new());

    assert!(cart.is_empty());
    assert_eq!(manager.store().get(CART_KEY).unwrap(), None);
    assert!(manager.confirmer().messages().is_empty());
}

#[test]
fn decrement_from_one_removes_line() {
    let manager = recording_manager(MemoryStore::new());
    let cart = manager.add_item(Cart::new(), 1, "X", 10);
    manager.notifier().take();

    let cart = manager.update_quantity(cart, 1, -1);

    assert!(cart.get_item(1).is_none());
    assert_eq!(manager.notifier().messages(), vec!["Item removed from cart."]);
    assert_eq!(manager.store().get(CART_KEY).unwrap().as_deref(), Some("[]"));
}

#[test]
fn removing_absent_item_still_saves_and_announces() {
    let manager = recording_manager(MemoryStore::new());
    let cart = manager.add_item(Cart::new(), 1, "X", 10);
    manager.notifier().take();

    let cart = manager.remove_item(cart, 99);

    assert_eq!(cart.len(), 1);
    assert_eq!(manager.notifier().messages(), vec!["Item removed from cart."]);
}
