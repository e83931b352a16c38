//! Integration tests for durable key/value storage
//!
//! **Purpose**: drive the two [`KeyValueStore`] backends through the flows
//! the session and settings layers rely on, including a simulated restart.
//!
//! **Coverage:**
//! - Both backends behave identically behind the trait object
//! - File-backed state survives reopening at the same path
//! - Every write leaves the backing file parseable, with no temp leftovers
//! - Concurrent writers on tokio tasks

use std::sync::Arc;

use fleetline_common::storage::{FileStore, KeyValueStore, MemoryStore};
use tempfile::TempDir;

async fn backends() -> (TempDir, Vec<Arc<dyn KeyValueStore>>) {
    let dir = TempDir::new().unwrap();
    let file = FileStore::open(dir.path().join("state.json")).await.unwrap();
    (dir, vec![Arc::new(MemoryStore::new()), Arc::new(file)])
}

/// Validates trait-level behavior across both backends.
///
/// Assertions:
/// - Confirms get, set, overwrite, remove, and contains agree between the
///   memory and file implementations.
#[tokio::test]
async fn test_backends_agree_behind_the_trait() {
    let (_dir, stores) = backends().await;

    for store in stores {
        assert_eq!(store.get("fleetline.auth.access_token").await.unwrap(), None);
        assert!(!store.contains("fleetline.auth.access_token").await.unwrap());

        store.set("fleetline.auth.access_token", "tok-1").await.unwrap();
        store.set("fleetline.auth.access_token", "tok-2").await.unwrap();
        assert_eq!(
            store.get("fleetline.auth.access_token").await.unwrap().as_deref(),
            Some("tok-2")
        );

        store.remove("fleetline.auth.access_token").await.unwrap();
        store.remove("fleetline.auth.access_token").await.unwrap();
        assert_eq!(store.get("fleetline.auth.access_token").await.unwrap(), None);
    }
}

/// Validates a session surviving a process restart.
///
/// Assertions:
/// - Confirms session keys written before "shutdown" are all present after
///   reopening the store at the same path.
/// - Confirms a key removed before shutdown stays gone.
#[tokio::test]
async fn test_session_survives_restart() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("state.json");

    {
        let store = FileStore::open(&path).await.unwrap();
        store.set("fleetline.auth.access_token", "at-1").await.unwrap();
        store.set("fleetline.auth.refresh_token", "rt-1").await.unwrap();
        store
            .set("fleetline.auth.session", r#"{"access_token":"at-1","user":null}"#)
            .await
            .unwrap();
        store.set("fleetline.scratch", "gone").await.unwrap();
        store.remove("fleetline.scratch").await.unwrap();
    }

    let reopened = FileStore::open(&path).await.unwrap();
    assert_eq!(
        reopened.get("fleetline.auth.access_token").await.unwrap().as_deref(),
        Some("at-1")
    );
    assert_eq!(
        reopened.get("fleetline.auth.refresh_token").await.unwrap().as_deref(),
        Some("rt-1")
    );
    assert!(reopened.contains("fleetline.auth.session").await.unwrap());
    assert_eq!(reopened.get("fleetline.scratch").await.unwrap(), None);
}

/// Validates the write path leaves clean state on disk.
///
/// Assertions:
/// - Confirms the backing file parses as a JSON object after a write.
/// - Confirms the temp file from the write-and-rename is gone.
#[tokio::test]
async fn test_writes_leave_no_temp_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("state.json");

    let store = FileStore::open(&path).await.unwrap();
    store.set("fleetline.settings", r#"{"orgName":"Northside"}"#).await.unwrap();

    let raw = tokio::fs::read_to_string(&path).await.unwrap();
    let parsed: serde_json::Value = serde_json::from_str(&raw).unwrap();
    assert!(parsed.is_object());
    assert!(!tokio::fs::try_exists(path.with_extension("json.tmp")).await.unwrap());
}

/// Validates concurrent writers against the file backend.
///
/// Assertions:
/// - Confirms every key written by racing tasks is readable afterwards,
///   both in memory and after a reopen.
#[tokio::test(flavor = "multi_thread")]
async fn test_concurrent_writers() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("state.json");
    let store: Arc<dyn KeyValueStore> = Arc::new(FileStore::open(&path).await.unwrap());

    let writers: Vec<_> = (0..8)
        .map(|i| {
            let store = Arc::clone(&store);
            tokio::spawn(async move {
                store.set(&format!("fleetline.key.{i}"), &format!("value-{i}")).await.unwrap();
            })
        })
        .collect();
    for writer in writers {
        writer.await.unwrap();
    }

    for i in 0..8 {
        assert_eq!(
            store.get(&format!("fleetline.key.{i}")).await.unwrap().as_deref(),
            Some(format!("value-{i}").as_str())
        );
    }

    drop(store);
    let reopened = FileStore::open(&path).await.unwrap();
    assert!(reopened.contains("fleetline.key.0").await.unwrap());
    assert!(reopened.contains("fleetline.key.7").await.unwrap());
}
