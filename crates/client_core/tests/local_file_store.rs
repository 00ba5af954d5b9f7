use client_core::{LocalFileStore, Persistence, StoreError, SwimmerStore};
use shared::domain::SwimmerId;

#[tokio::test]
async fn missing_file_loads_empty_and_first_write_creates_it() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("nested").join("swimmers.json");

    let mut store = SwimmerStore::new(LocalFileStore::new(&path));
    let report = store.load().await.expect("load");
    assert_eq!(report.loaded, 0);
    assert!(!path.exists());

    store.add("Alice").await.expect("add");
    assert!(path.exists());

    let raw = std::fs::read_to_string(&path).expect("read");
    let value: serde_json::Value = serde_json::from_str(&raw).expect("json");
    assert_eq!(
        value,
        serde_json::json!([{ "id": 1, "name": "Alice", "lapCount": 0 }])
    );
}

#[tokio::test]
async fn state_survives_reopening() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("swimmers.json");

    {
        let mut store = SwimmerStore::new(LocalFileStore::new(&path));
        store.load().await.expect("load");
        let alice = store.add("Alice").await.expect("add");
        store.add("Bob").await.expect("add");
        store.increment(alice.id).await.expect("increment");
        store.increment(alice.id).await.expect("increment");
    }

    let mut store = SwimmerStore::new(LocalFileStore::new(&path));
    store.load().await.expect("load");
    let names: Vec<_> = store.list().iter().map(|s| s.name.as_str()).collect();
    assert_eq!(names, ["Alice", "Bob"]);
    assert_eq!(store.get(SwimmerId(1)).expect("alice").lap_count, 2);

    let cara = store.add("Cara").await.expect("add");
    assert_eq!(cara.id, SwimmerId(3));
}

#[tokio::test]
async fn malformed_entries_are_dropped_on_load() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("swimmers.json");
    std::fs::write(
        &path,
        r#"[{"id": 1, "lapCount": 4}, {"id": 2, "name": "Bea", "lapCount": 1}]"#,
    )
    .expect("seed");

    let mut store = SwimmerStore::new(LocalFileStore::new(&path));
    let report = store.load().await.expect("load");
    assert_eq!(report.loaded, 1);
    assert_eq!(report.dropped, 1);
    assert_eq!(store.list()[0].name, "Bea");
}

#[tokio::test]
async fn corrupt_file_loads_as_empty() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("swimmers.json");
    std::fs::write(&path, "{ not json").expect("seed");

    let decoded = LocalFileStore::new(&path).load().await.expect("load");
    assert!(decoded.swimmers.is_empty());
}

#[tokio::test]
async fn invalid_utf8_file_loads_as_empty_and_is_replaced() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("swimmers.json");
    std::fs::write(&path, [0x5b, 0xff, 0xfe, 0x5d]).expect("seed");

    let mut store = SwimmerStore::new(LocalFileStore::new(&path));
    let report = store.load().await.expect("load");
    assert_eq!(report.loaded, 0);
    assert_eq!(report.dropped, 1);

    store.add("Alice").await.expect("add");
    let raw = std::fs::read_to_string(&path).expect("rewritten as utf-8");
    assert!(raw.contains("Alice"));
}

#[tokio::test]
async fn unwritable_target_reports_persistence_error_and_rolls_back() {
    let dir = tempfile::tempdir().expect("tempdir");
    // A directory where the file should be makes the final rename fail.
    let path = dir.path().join("swimmers.json");
    std::fs::create_dir(&path).expect("blocker");

    let mut store = SwimmerStore::new(LocalFileStore::new(&path));
    let err = store.add("Alice").await.expect_err("should fail");
    assert!(matches!(err, StoreError::Persistence(_)));
    assert!(store.list().is_empty());
    assert!(!dir.path().join("swimmers.json.tmp").exists());
}
