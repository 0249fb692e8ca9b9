use ambqueue::{decode_snapshot, QueueManager, SnapshotStore};
use std::fs;
use tempfile::TempDir;

fn queue_file(dir: &TempDir) -> std::path::PathBuf {
    dir.path().join("data").join("queue.json")
}

#[tokio::test]
async fn test_restart_restores_queue_and_current_singer() {
    let dir = TempDir::new().unwrap();
    let path = queue_file(&dir);

    {
        let manager = QueueManager::open(&path).await;
        manager.add("Alice").await.unwrap();
        let list = manager.add("Bob").await.unwrap();
        manager
            .set_currently_singing(Some(&list[1].id))
            .await
            .unwrap();
        manager.flush().await.unwrap();
    }

    let restored = QueueManager::open(&path).await;
    let list = restored.list().await;
    let names: Vec<_> = list.iter().map(|e| e.name.as_str()).collect();
    assert_eq!(names, vec!["Alice", "Bob"]);
    assert!(!list[0].is_currently_singing);
    assert!(list[1].is_currently_singing);
}

#[tokio::test]
async fn test_snapshot_file_shape() {
    let dir = TempDir::new().unwrap();
    let path = queue_file(&dir);

    let manager = QueueManager::open(&path).await;
    let list = manager.add("Alice").await.unwrap();
    manager.flush().await.unwrap();

    let value: serde_json::Value = serde_json::from_slice(&fs::read(&path).unwrap()).unwrap();
    assert_eq!(value["currentlySingingId"], serde_json::Value::Null);
    assert_eq!(value["queue"][0]["id"], list[0].id.as_str());
    assert_eq!(value["queue"][0]["name"], "Alice");
    assert!(value["queue"][0]["addedAt"].is_i64());
    assert!(value["queue"][0].get("isCurrentlySinging").is_none());
    // pas de fichier temporaire résiduel
    assert!(!path.with_extension("json.tmp").exists());
}

#[tokio::test]
async fn test_background_writer_persists_mutations() {
    let dir = TempDir::new().unwrap();
    let path = queue_file(&dir);

    let manager = QueueManager::open(&path).await;
    manager.add("Alice").await.unwrap();

    let mut written = false;
    for _ in 0..100 {
        tokio::time::sleep(std::time::Duration::from_millis(20)).await;
        if let Ok(bytes) = fs::read(&path) {
            if String::from_utf8_lossy(&bytes).contains("Alice") {
                written = true;
                break;
            }
        }
    }
    assert!(written, "snapshot was not written in the background");
}

#[tokio::test]
async fn test_legacy_array_is_accepted() {
    let dir = TempDir::new().unwrap();
    let path = queue_file(&dir);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(
        &path,
        r#"[{"id":"a1","name":"Alice","addedAt":1},{"id":"b2","name":"Bob","addedAt":2}]"#,
    )
    .unwrap();

    let manager = QueueManager::open(&path).await;
    let list = manager.list().await;
    assert_eq!(list.len(), 2);
    assert_eq!(list[0].id, "a1");
    assert!(list.iter().all(|e| !e.is_currently_singing));
}

#[tokio::test]
async fn test_malformed_or_missing_snapshot_starts_empty() {
    let dir = TempDir::new().unwrap();

    let missing = QueueManager::open(queue_file(&dir)).await;
    assert!(missing.is_empty().await);

    let path = dir.path().join("broken.json");
    for content in ["{ not json", "42", r#"{"currentlySingingId":"x"}"#, ""] {
        fs::write(&path, content).unwrap();
        let manager = QueueManager::open(&path).await;
        assert!(manager.is_empty().await, "content {:?}", content);
        assert!(manager.list().await.iter().all(|e| !e.is_currently_singing));
    }
}

#[tokio::test]
async fn test_load_repairs_inconsistent_snapshot() {
    let dir = TempDir::new().unwrap();
    let path = queue_file(&dir);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(
        &path,
        r#"{
            "queue": [
                {"id":"a1","name":"Alice","addedAt":1},
                {"id":"a1","name":"Alice again","addedAt":2},
                {"id":"c3","name":"   ","addedAt":3},
                {"id":"d4","name":"Dana","addedAt":4}
            ],
            "currentlySingingId": "c3"
        }"#,
    )
    .unwrap();

    let manager = QueueManager::open(&path).await;
    let list = manager.list().await;
    let ids: Vec<_> = list.iter().map(|e| e.id.as_str()).collect();
    assert_eq!(ids, vec!["a1", "d4"]);
    assert!(list.iter().all(|e| !e.is_currently_singing));
}

#[tokio::test]
async fn test_persistence_failure_does_not_fail_mutation() {
    let dir = TempDir::new().unwrap();
    // le parent du fichier est un fichier ordinaire : toute écriture échoue
    let blocker = dir.path().join("blocker");
    fs::write(&blocker, "x").unwrap();

    let manager = QueueManager::open(blocker.join("queue.json")).await;
    let list = manager.add("Alice").await.unwrap();
    assert_eq!(list.len(), 1);
    assert!(manager.flush().await.is_err());
    assert_eq!(manager.len().await, 1);
}

#[tokio::test]
async fn test_older_snapshot_never_overwrites_newer() {
    let dir = TempDir::new().unwrap();
    let store = SnapshotStore::new(queue_file(&dir));

    let mut newer = decode_snapshot(br#"[{"id":"b2","name":"Bob","addedAt":2}]"#).unwrap();
    newer.revision = 2;
    let mut older = decode_snapshot(br#"[{"id":"a1","name":"Alice","addedAt":1}]"#).unwrap();
    older.revision = 1;

    store.save(&newer).await.unwrap();
    store.save(&older).await.unwrap();

    let on_disk = decode_snapshot(&fs::read(store.path()).unwrap()).unwrap();
    assert_eq!(on_disk.queue.len(), 1);
    assert_eq!(on_disk.queue[0].id(), "b2");
    assert_eq!(on_disk.queue[0].name(), "Bob");
}

#[tokio::test]
async fn test_failed_replace_removes_temporary_file() {
    let dir = TempDir::new().unwrap();
    let path = queue_file(&dir);
    // la cible est un répertoire non vide : le renommage échoue
    fs::create_dir_all(&path).unwrap();
    fs::write(path.join("keep"), "x").unwrap();

    let store = SnapshotStore::new(&path);
    let snapshot = decode_snapshot(br#"[{"id":"a1","name":"Alice","addedAt":1}]"#).unwrap();

    assert!(matches!(
        store.save(&snapshot).await,
        Err(ambqueue::Error::Persistence(_))
    ));
    assert!(!path.with_extension("json.tmp").exists());
}

#[tokio::test]
async fn test_restored_names_are_trimmed() {
    let dir = TempDir::new().unwrap();
    let path = queue_file(&dir);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(&path, r#"[{"id":"a1","name":"  Alice  ","addedAt":1}]"#).unwrap();

    let manager = QueueManager::open(&path).await;
    assert_eq!(manager.list().await[0].name, "Alice");
}
