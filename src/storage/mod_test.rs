use super::*;

#[test]
fn memory_storage_round_trips_items() {
    let storage = MemoryStorage::new();
    assert!(storage.is_empty());
    storage.set_item("k", "v").unwrap();
    assert_eq!(storage.get_item("k").unwrap().as_deref(), Some("v"));
    assert_eq!(storage.len(), 1);
}

#[test]
fn memory_storage_remove_is_idempotent() {
    let storage = MemoryStorage::new();
    storage.set_item("k", "v").unwrap();
    storage.remove_item("k").unwrap();
    storage.remove_item("k").unwrap();
    assert_eq!(storage.get_item("k").unwrap(), None);
}

#[test]
fn memory_storage_clones_share_items() {
    let a = MemoryStorage::new();
    let b = a.clone();
    a.set_item("shared", "yes").unwrap();
    assert_eq!(b.get_item("shared").unwrap().as_deref(), Some("yes"));
}

#[cfg(not(feature = "hydrate"))]
#[test]
fn browser_storage_is_unavailable_outside_the_browser() {
    let storage = BrowserStorage;
    assert_eq!(storage.get_item("k"), Err(StorageError::Unavailable));
    assert_eq!(storage.set_item("k", "v"), Err(StorageError::Unavailable));
    assert_eq!(storage.remove_item("k"), Err(StorageError::Unavailable));
}
