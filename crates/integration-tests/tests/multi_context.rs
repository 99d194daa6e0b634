//! Several cart managers sharing one store, as tabs share browser storage.

#![allow(clippy::unwrap_used)]

use premium_cart::{CartManager, ContextId, KeyValueStore, MemoryStore, DEFAULT_CART_KEY};
use premium_cart_integration_tests::{Recorder, strap, watch};

fn tab(store: &MemoryStore) -> (CartManager<MemoryStore>, Recorder) {
    let mut manager = CartManager::new(store.clone(), DEFAULT_CART_KEY);
    let recorder = Recorder::default();
    manager.attach(Box::new(recorder.clone()));
    (manager, recorder)
}

// =============================================================================
// Propagation
// =============================================================================

#[test]
fn test_change_in_one_tab_reaches_the_other() {
    let store = MemoryStore::new();
    let (mut a, _) = tab(&store);
    let (mut b, b_surface) = tab(&store);

    a.add_item(&watch()).unwrap();
    a.add_item(&strap()).unwrap();

    assert!(b.sync());
    let view = b_surface.last_view().unwrap();
    assert_eq!(view.badge(), 2);
    assert_eq!(view.formatted_total(), "$139.99");
    assert_eq!(b.cart(), a.cart());
}

#[test]
fn test_own_writes_do_not_reload() {
    let store = MemoryStore::new();
    let (mut a, a_surface) = tab(&store);

    a.add_item(&watch()).unwrap();
    assert_eq!(a_surface.renders(), 1);

    assert!(!a.sync());
    assert_eq!(a_surface.renders(), 1);
}

#[test]
fn test_new_tab_starts_from_persisted_cart() {
    let store = MemoryStore::new();
    let (mut a, _) = tab(&store);
    a.add_item(&watch()).unwrap();
    a.increment_quantity("w1").unwrap();

    let (late, _) = tab(&store);
    assert_eq!(late.view_model().badge(), 2);
    assert_eq!(late.view_model().formatted_total(), "$240.00");
}

// =============================================================================
// Reconciliation
// =============================================================================

#[test]
fn test_reconcile_replaces_rather_than_merges() {
    let store = MemoryStore::new();
    let (mut a, _) = tab(&store);
    let (mut b, _) = tab(&store);

    // B holds an item A never saw.
    b.add_item(&strap()).unwrap();
    a.sync();

    // A foreign writer replaces the whole snapshot.
    let snapshot = r#"{"w1":{"id":"w1","name":"Watch","price":120,"image":"w1.png","qty":3}}"#;
    store.set(DEFAULT_CART_KEY, snapshot, ContextId::new()).unwrap();

    assert!(b.sync());
    assert!(b.cart().get("s1").is_none());
    assert_eq!(b.cart().get("w1").unwrap().quantity, 3);
    assert!(a.sync());
    assert_eq!(a.cart(), b.cart());
}

#[test]
fn test_last_writer_wins() {
    let store = MemoryStore::new();
    let (mut a, _) = tab(&store);
    let (mut b, _) = tab(&store);

    // Both edit before seeing each other's change.
    a.add_item(&watch()).unwrap();
    b.add_item(&strap()).unwrap();

    assert!(a.sync());
    assert!(b.sync());

    // B wrote last; its snapshot is the only one left.
    assert!(a.cart().get("w1").is_none());
    assert!(a.cart().get("s1").is_some());
    assert_eq!(a.cart(), b.cart());
}

#[test]
fn test_foreign_removal_empties_cart() {
    let store = MemoryStore::new();
    let (mut a, a_surface) = tab(&store);
    a.add_item(&watch()).unwrap();

    store.remove(DEFAULT_CART_KEY, ContextId::new()).unwrap();

    assert!(a.sync());
    assert!(a.cart().is_empty());
    assert!(a_surface.last_view().unwrap().is_empty());
}

#[test]
fn test_foreign_garbage_reads_as_empty() {
    let store = MemoryStore::new();
    let (mut a, _) = tab(&store);
    a.add_item(&watch()).unwrap();

    store
        .set(DEFAULT_CART_KEY, "not json", ContextId::new())
        .unwrap();

    assert!(a.sync());
    assert!(a.cart().is_empty());
}

#[test]
fn test_other_keys_are_ignored() {
    let store = MemoryStore::new();
    let (mut a, a_surface) = tab(&store);
    let mut wishlist = CartManager::new(store.clone(), "wishlist");

    wishlist.add_item(&watch()).unwrap();

    assert!(!a.sync());
    assert!(a.cart().is_empty());
    assert_eq!(a_surface.renders(), 0);
}

#[test]
fn test_lagged_subscription_reloads() {
    let store = MemoryStore::new();
    let (mut a, _) = tab(&store);
    let (mut b, _) = tab(&store);

    // Far more writes than the change channel holds.
    for _ in 0..(premium_cart::store::EVENT_CHANNEL_CAPACITY * 2) {
        a.add_item(&watch()).unwrap();
    }

    assert!(b.sync());
    assert_eq!(b.cart(), a.cart());
}

// =============================================================================
// Checkout across tabs
// =============================================================================

#[test]
fn test_checkout_clears_every_tab() {
    let store = MemoryStore::new();
    let (mut a, a_surface) = tab(&store);
    let (mut b, b_surface) = tab(&store);

    a.add_item(&watch()).unwrap();
    b.sync();

    a.checkout().unwrap();
    assert_eq!(
        a_surface.notices(),
        vec![premium_cart::CartNotice::CheckoutAcknowledged]
    );

    assert!(b.sync());
    assert!(b_surface.last_view().unwrap().is_empty());
    // Notices stay with the tab that raised them.
    assert!(b_surface.notices().is_empty());
}
