//! Managers over the on-disk store, including cross-process change detection.

#![allow(clippy::unwrap_used)]

use std::time::Duration;

use premium_cart::{CartManager, FileStore, KeyValueStore};
use premium_cart_integration_tests::{Recorder, strap, watch};

#[test]
fn test_cart_survives_restart() {
    let dir = tempfile::tempdir().unwrap();

    {
        let mut manager = CartManager::new(FileStore::new(dir.path()), "cart");
        manager.add_item(&watch()).unwrap();
        manager.add_item(&strap()).unwrap();
        manager.decrement_quantity("s1").unwrap();
        manager.add_item(&watch()).unwrap();
    }

    let manager = CartManager::new(FileStore::new(dir.path()), "cart");
    let view = manager.view_model();
    assert_eq!(view.badge(), 2);
    assert_eq!(view.line_items.len(), 1);
    assert_eq!(view.formatted_total(), "$240.00");
}

#[test]
fn test_persisted_layout() {
    let dir = tempfile::tempdir().unwrap();
    let store = FileStore::new(dir.path());
    let mut manager = CartManager::new(store.clone(), "cart");
    manager.add_item(&strap()).unwrap();

    let raw = store.get("cart").unwrap().unwrap();
    let json: serde_json::Value = serde_json::from_str(&raw).unwrap();
    let entry = &json["s1"];
    assert_eq!(entry["id"], "s1");
    assert_eq!(entry["name"], "Strap");
    assert_eq!(entry["price"], 19.99);
    assert_eq!(entry["image"], "s1.png");
    assert_eq!(entry["qty"], 1);
}

#[tokio::test]
async fn test_watcher_reports_other_process_writes() {
    let dir = tempfile::tempdir().unwrap();

    // Two independent stores over one directory stand in for two processes.
    let here = FileStore::new(dir.path());
    let mut manager = CartManager::new(here.clone(), "cart");
    let recorder = Recorder::default();
    manager.attach(Box::new(recorder.clone()));
    let mut events = here.subscribe();
    let watcher = here.watch(Duration::from_millis(10));
    // Let the watcher take its first snapshot.
    tokio::time::sleep(Duration::from_millis(50)).await;

    let mut elsewhere = CartManager::new(FileStore::new(dir.path()), "cart");
    elsewhere.add_item(&watch()).unwrap();

    let event = tokio::time::timeout(Duration::from_secs(5), events.recv())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(event.key, "cart");
    assert_ne!(event.origin, manager.context());

    assert!(manager.sync());
    assert_eq!(recorder.last_view().unwrap().formatted_total(), "$120.00");

    watcher.abort();
}

#[tokio::test]
async fn test_watcher_ignores_own_writes() {
    let dir = tempfile::tempdir().unwrap();
    let store = FileStore::new(dir.path());
    let mut manager = CartManager::new(store.clone(), "cart");
    let watcher = store.watch(Duration::from_millis(10));

    manager.add_item(&watch()).unwrap();
    tokio::time::sleep(Duration::from_millis(100)).await;

    assert!(!manager.sync());
    watcher.abort();
}
