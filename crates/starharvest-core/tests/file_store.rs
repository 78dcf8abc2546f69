//! File-backed store: batches survive reopen, bad documents open empty.

use std::fs;
use std::path::PathBuf;

use starharvest_core::prelude::*;

fn scratch_path(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!(
        "starharvest-test-{}-{}",
        name,
        std::process::id()
    ));
    let _ = fs::remove_dir_all(&dir);
    dir.join("save").join("starharvest.json")
}

#[test]
fn batch_visible_after_reopen() {
    let path = scratch_path("reopen");
    let mut store = FileStore::open(&path);
    store
        .commit(&[
            ("inventory", r#"{"minerals":1,"energy":2}"#.to_string()),
            ("lastVisit", "77".to_string()),
        ])
        .unwrap();

    let reopened = FileStore::open(&path);
    assert_eq!(
        reopened.get("inventory").unwrap().as_deref(),
        Some(r#"{"minerals":1,"energy":2}"#)
    );
    assert_eq!(reopened.get("lastVisit").unwrap().as_deref(), Some("77"));
    assert!(!path.with_file_name("starharvest.json.tmp").exists());
}

#[test]
fn stale_temp_file_is_replaced() {
    let path = scratch_path("stale-temp");
    let temp = path.with_file_name("starharvest.json.tmp");
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(&temp, "x".repeat(4096)).unwrap();

    let mut store = FileStore::open(&path);
    store.commit(&[("lastVisit", "5".to_string())]).unwrap();

    let reopened = FileStore::open(&path);
    assert_eq!(reopened.get("lastVisit").unwrap().as_deref(), Some("5"));
    assert!(!temp.exists());
}

#[test]
fn malformed_document_opens_empty() {
    let path = scratch_path("malformed");
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(&path, "this is not json").unwrap();

    let store = FileStore::open(&path);
    assert_eq!(store.get("inventory").unwrap(), None);
}

#[test]
fn session_state_survives_restart() {
    let path = scratch_path("session");
    let now = 1_700_000_000_000;

    let mut session =
        SessionStore::open(FileStore::open(&path), SimConfig::default(), now).unwrap();
    let seed = session.world_seed();
    let robot = session.create_robot(Vec3::new(0.0, 2.0, 0.0), now).unwrap();
    session.add_to_inventory(ResourceKind::Energy, 5).unwrap();
    session.checkpoint(now + 1_000).unwrap();
    drop(session);

    let restarted =
        SessionStore::open(FileStore::open(&path), SimConfig::default(), now + 2_000).unwrap();
    assert_eq!(restarted.world_seed(), seed);
    assert_eq!(restarted.inventory().energy, 5);
    assert_eq!(restarted.last_visit_time(), now + 1_000);
    assert!(restarted.robot(&robot).is_some());
}
