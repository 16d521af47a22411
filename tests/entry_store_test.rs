mod helpers;

use helpers::{all_entries, file_store, seed};
use jotter::journal::{EntryStore, SaveRequest, StoreError, ENTRIES_KEY};
use jotter::kv::KvStore;
use tempfile::TempDir;

#[test]
fn day_one_scenario() {
    let tmp = TempDir::new().unwrap();
    let mut store = EntryStore::new(KvStore::open(tmp.path().join("store.json")).unwrap());

    let first = store.save(SaveRequest::create("Day 1", "Hello")).unwrap();
    assert!(!first.id.is_empty());
    assert_eq!(first.created_at, first.updated_at);

    let second = store
        .save(SaveRequest::update(&first, "Day 1", "Hello world"))
        .unwrap();
    assert_eq!(second.id, first.id);
    assert_eq!(second.created_at, first.created_at);
    assert!(second.updated_at >= first.updated_at);
    assert_eq!(second.content, "Hello world");
}

#[test]
fn collection_survives_reopen() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("store.json");

    let store = file_store(&path);
    let a = seed(&store, "Morning", "Coffee and rain.");
    let b = seed(&store, "Evening", "Long walk.");
    drop(store);

    let reopened = file_store(&path);
    assert_eq!(all_entries(&reopened), vec![a, b]);
}

#[test]
fn delete_then_get_is_not_found() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("store.json");
    let store = file_store(&path);
    let entry = seed(&store, "Temp", "short-lived");

    {
        let mut guard = store.lock().unwrap();
        assert!(guard.delete_by_id(&entry.id).unwrap());
        assert!(guard.get_by_id(&entry.id).unwrap().is_none());
        // Deleting an unknown id still reports success.
        assert!(guard.delete_by_id("never-existed").unwrap());
    }

    let reopened = file_store(&path);
    assert!(all_entries(&reopened).is_empty());
}

#[test]
fn reads_slot_written_by_earlier_versions() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("config.json");
    std::fs::write(
        &path,
        r#"{
  "journal-entries": [
    {
      "id": "1712345678901",
      "title": "Untitled",
      "content": "First entry",
      "createdAt": "2024-04-05T10:00:00.000Z",
      "updatedAt": "2024-04-05T10:00:00.000Z"
    }
  ]
}"#,
    )
    .unwrap();

    let mut store = EntryStore::new(KvStore::open(&path).unwrap());
    let old = store.get_by_id("1712345678901").unwrap().unwrap();
    assert_eq!(old.content, "First entry");

    let updated = store
        .save(SaveRequest::update(&old, "Renamed", "First entry, revised"))
        .unwrap();
    assert_eq!(updated.created_at, old.created_at);

    let raw: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(raw[ENTRIES_KEY][0]["title"], "Renamed");
    let created: chrono::DateTime<chrono::Utc> =
        serde_json::from_value(raw[ENTRIES_KEY][0]["createdAt"].clone()).unwrap();
    assert_eq!(created, old.created_at);
}

#[test]
fn update_of_deleted_entry_is_rejected() {
    let tmp = TempDir::new().unwrap();
    let store = file_store(&tmp.path().join("store.json"));
    let entry = seed(&store, "Draft", "to be removed");

    let mut guard = store.lock().unwrap();
    guard.delete_by_id(&entry.id).unwrap();

    let err = guard
        .save(SaveRequest::update(&entry, "Draft", "edited after delete"))
        .unwrap_err();
    assert!(matches!(err, StoreError::NotFound(_)));
    assert!(guard.list_all().unwrap().is_empty());
}

#[test]
fn unreadable_store_path_is_an_error() {
    let tmp = TempDir::new().unwrap();
    // A directory where the store file should be.
    let path = tmp.path().join("store.json");
    std::fs::create_dir(&path).unwrap();

    assert!(KvStore::open(&path).is_err());
}
