//! Store write failures: the cart keeps its last saved state.

#![allow(clippy::unwrap_used)]

use premium_cart::{CartError, CartManager, CartNotice, KeyValueStore, MemoryStore, StoreError};
use premium_cart_integration_tests::{Recorder, strap, watch};

#[test]
fn test_quota_exceeded_rolls_back() {
    let store = MemoryStore::with_quota(100);
    let mut manager = CartManager::new(store.clone(), "cart");
    let recorder = Recorder::default();
    manager.attach(Box::new(recorder.clone()));

    manager.add_item(&watch()).unwrap();
    let saved = store.get("cart").unwrap();

    let err = manager.add_item(&strap()).unwrap_err();
    assert!(matches!(
        err,
        CartError::Store(StoreError::QuotaExceeded { .. })
    ));

    assert!(manager.cart().get("s1").is_none());
    assert_eq!(store.get("cart").unwrap(), saved);
    assert_eq!(recorder.renders(), 1);
    assert_eq!(recorder.notices(), vec![CartNotice::NotSaved]);
}

#[test]
fn test_unavailable_store_keeps_cart_and_recovers() {
    let store = MemoryStore::new();
    let mut manager = CartManager::new(store.clone(), "cart");
    manager.add_item(&watch()).unwrap();

    store.set_available(false);
    assert!(manager.increment_quantity("w1").is_err());
    assert_eq!(manager.cart().get("w1").unwrap().quantity, 1);

    // Reconcile cannot read either, so the cart is left alone.
    manager.reconcile();
    assert_eq!(manager.cart().len(), 1);

    store.set_available(true);
    manager.increment_quantity("w1").unwrap();
    assert_eq!(manager.view_model().formatted_total(), "$240.00");
}

#[test]
fn test_failed_write_is_not_seen_by_other_tabs() {
    let store = MemoryStore::new();
    let mut a = CartManager::new(store.clone(), "cart");
    let mut b = CartManager::new(store.clone(), "cart");

    store.set_available(false);
    assert!(a.add_item(&watch()).is_err());
    store.set_available(true);

    assert!(!b.sync());
    assert!(b.cart().is_empty());
}

#[test]
fn test_unreadable_store_at_startup_gives_empty_cart() {
    let store = MemoryStore::new();
    store.set_available(false);
    let manager = CartManager::new(store, "cart");
    assert!(manager.cart().is_empty());
}
