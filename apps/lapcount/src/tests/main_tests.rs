use super::*;
use client_core::MemoryPersistence;
use serde_json::json;

fn seeded() -> MemoryPersistence {
    MemoryPersistence::with_value(json!([
        { "id": 1, "name": "Alice", "lapCount": 3 },
        { "id": 2, "name": "Bob", "lapCount": 0 }
    ]))
}

async fn run_command(persistence: &MemoryPersistence, command: Command) -> Result<()> {
    let store = SwimmerStore::new(persistence.clone());
    execute(store, &Settings::default(), command).await
}

async fn lap_count(persistence: &MemoryPersistence, id: i64) -> Option<u32> {
    let mut store = SwimmerStore::new(persistence.clone());
    store.load().await.expect("load");
    store.get(SwimmerId(id)).ok().map(|s| s.lap_count)
}

#[test]
fn cli_parses_negative_swipe_coordinates() {
    let cli = Cli::try_parse_from(["lapcount", "swipe", "1", "200", "-20", "--steps", "3"])
        .expect("parse");
    assert!(matches!(
        cli.command,
        Command::Swipe { id: 1, steps: 3, .. }
    ));
}

#[test]
fn cli_rejects_both_backends() {
    let parsed = Cli::try_parse_from([
        "lapcount",
        "--data-file",
        "a.json",
        "--server-url",
        "http://localhost:8080",
        "list",
    ]);
    assert!(parsed.is_err());
}

#[test]
fn swipe_past_threshold_commits() {
    let id = SwimmerId(4);
    assert_eq!(
        swipe(LayoutDirection::Ltr, id, 200.0, 50.0, 4),
        Some(Intent::Remove(id))
    );
    assert_eq!(
        swipe(LayoutDirection::Ltr, id, 0.0, 120.0, 1),
        Some(Intent::Reset(id))
    );
    assert_eq!(swipe(LayoutDirection::Ltr, id, 0.0, 60.0, 3), None);
}

#[test]
fn swipe_mirrors_in_rtl() {
    let id = SwimmerId(4);
    assert_eq!(
        swipe(LayoutDirection::Rtl, id, 0.0, 150.0, 2),
        Some(Intent::Remove(id))
    );
}

#[tokio::test]
async fn commands_mutate_the_store() {
    let persistence = seeded();

    run_command(&persistence, Command::Inc { id: 1 })
        .await
        .expect("inc");
    assert_eq!(lap_count(&persistence, 1).await, Some(4));

    run_command(&persistence, Command::Dec { id: 2 })
        .await
        .expect("dec at zero");
    assert_eq!(lap_count(&persistence, 2).await, Some(0));

    run_command(&persistence, Command::Add { name: "Cara".into() })
        .await
        .expect("add");
    assert_eq!(lap_count(&persistence, 3).await, Some(0));

    run_command(&persistence, Command::Remove { id: 2 })
        .await
        .expect("remove");
    assert_eq!(lap_count(&persistence, 2).await, None);
}

#[tokio::test]
async fn swipe_command_resets_through_the_store() {
    let persistence = seeded();
    run_command(
        &persistence,
        Command::Swipe {
            id: 1,
            from: 10.0,
            to: 140.0,
            steps: 5,
        },
    )
    .await
    .expect("swipe");
    assert_eq!(lap_count(&persistence, 1).await, Some(0));
}

#[tokio::test]
async fn unknown_ids_and_blank_names_fail() {
    let persistence = seeded();

    let err = run_command(&persistence, Command::Reset { id: 9 })
        .await
        .expect_err("unknown id");
    assert_eq!(err.to_string(), "no swimmer with id 9");

    assert!(run_command(&persistence, Command::Add { name: "  ".into() })
        .await
        .is_err());

    assert!(run_command(
        &persistence,
        Command::Swipe {
            id: 9,
            from: 0.0,
            to: -200.0,
            steps: 2,
        },
    )
    .await
    .is_err());
}

#[tokio::test]
async fn write_failures_surface_as_errors() {
    let persistence = seeded();
    persistence.set_fail_writes(true);

    let err = run_command(&persistence, Command::Inc { id: 1 })
        .await
        .expect_err("should fail");
    assert!(err.to_string().contains("storage quota exceeded"));
    assert_eq!(lap_count(&persistence, 1).await, Some(3));
}
