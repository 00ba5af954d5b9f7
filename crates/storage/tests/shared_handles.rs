use shared::domain::SwimmerId;
use storage::Storage;

#[tokio::test]
async fn cloned_handles_see_the_same_swimmers() {
    let storage = Storage::new();
    let handle = storage.clone();

    let alice = storage.create_swimmer("Alice", 0).await;
    handle.increment_lap_count(alice.id).await.expect("alice");

    let seen = storage.get_swimmer(alice.id).await.expect("alice");
    assert_eq!(seen.lap_count, 1);

    assert!(handle.delete_swimmer(SwimmerId(1)).await);
    assert!(storage.list_swimmers().await.is_empty());
}
