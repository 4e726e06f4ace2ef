mod common;

use std::fs;

use invaders::error::PersistError;
use invaders::persist::{default_score_path, FileScoreStore, MemoryScoreStore, ScoreStore};
use invaders::platform::ManualClock;

use common::*;

// ── FileScoreStore ────────────────────────────────────────────────────────────

#[test]
fn file_store_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let mut store = FileScoreStore::new(dir.path().join("highscore.txt"));
    store.save(4200).unwrap();
    assert_eq!(store.load().unwrap(), 4200);
}

#[test]
fn file_holds_plain_decimal_text() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("highscore.txt");
    FileScoreStore::new(&path).save(1500).unwrap();
    assert_eq!(fs::read_to_string(&path).unwrap(), "1500");
}

#[test]
fn surrounding_whitespace_is_tolerated() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("highscore.txt");
    fs::write(&path, "  870\n").unwrap();
    assert_eq!(FileScoreStore::new(&path).load().unwrap(), 870);
}

#[test]
fn missing_file_is_an_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let store = FileScoreStore::new(dir.path().join("nope.txt"));
    assert!(matches!(store.load(), Err(PersistError::Io { .. })));
}

#[test]
fn garbage_is_a_parse_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("highscore.txt");
    fs::write(&path, "lots").unwrap();
    match FileScoreStore::new(&path).load() {
        Err(PersistError::Parse { contents, .. }) => assert_eq!(contents, "lots"),
        other => panic!("expected a parse error, got {other:?}"),
    }
}

#[test]
fn negative_score_is_a_parse_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("highscore.txt");
    fs::write(&path, "-5").unwrap();
    assert!(matches!(FileScoreStore::new(&path).load(), Err(PersistError::Parse { .. })));
}

#[test]
fn save_creates_missing_directories() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("invaders").join("nested").join("highscore.txt");
    FileScoreStore::new(&path).save(9).unwrap();
    assert!(path.exists());
}

#[test]
fn save_overwrites_previous_value() {
    let dir = tempfile::tempdir().unwrap();
    let mut store = FileScoreStore::new(dir.path().join("highscore.txt"));
    store.save(12345).unwrap();
    store.save(7).unwrap();
    assert_eq!(store.load().unwrap(), 7);
}

#[test]
fn error_message_names_the_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nope.txt");
    let err = FileScoreStore::new(&path).load().unwrap_err();
    assert!(err.to_string().contains("nope.txt"));
}

#[test]
fn default_location_is_under_an_invaders_dir() {
    if let Some(path) = default_score_path() {
        assert!(path.ends_with("invaders/highscore.txt"));
        assert_eq!(FileScoreStore::at_default_location().path(), Some(path.as_path()));
    }
}

// ── MemoryScoreStore ──────────────────────────────────────────────────────────

#[test]
fn empty_memory_store_loads_zero() {
    let store = MemoryScoreStore::default();
    assert_eq!(store.load().unwrap(), 0);
    assert_eq!(store.value(), None);
}

#[test]
fn memory_store_clones_share_a_slot() {
    let store = MemoryScoreStore::with_score(10);
    let mut handle = store.clone();
    handle.save(99).unwrap();
    assert_eq!(store.value(), Some(99));
    assert_eq!(store.saves(), 1);
}

// ── Through a session ─────────────────────────────────────────────────────────

#[test]
fn game_over_writes_the_high_score_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("highscore.txt");
    let clock = ManualClock::new(START_TIME);
    let audio = RecordingAudio::default();

    let mut session = session_with(Box::new(FileScoreStore::new(&path)), &clock, &audio);
    assert_eq!(session.high_score, 0);
    session.add_score(4200);
    session.game_over();
    assert_eq!(fs::read_to_string(&path).unwrap(), "4200");

    let next = session_with(Box::new(FileScoreStore::new(&path)), &clock, &audio);
    assert_eq!(next.high_score, 4200);
}

#[test]
fn lower_score_keeps_the_saved_record() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("highscore.txt");
    fs::write(&path, "5000").unwrap();
    let clock = ManualClock::new(START_TIME);

    let mut session =
        session_with(Box::new(FileScoreStore::new(&path)), &clock, &RecordingAudio::default());
    session.add_score(300);
    session.game_over();
    assert_eq!(fs::read_to_string(&path).unwrap(), "5000");
}

#[test]
fn corrupt_file_starts_from_zero() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("highscore.txt");
    fs::write(&path, "not a number").unwrap();
    let clock = ManualClock::new(START_TIME);

    let mut session =
        session_with(Box::new(FileScoreStore::new(&path)), &clock, &RecordingAudio::default());
    assert_eq!(session.high_score, 0);
    session.add_score(100);
    session.game_over();
    assert_eq!(fs::read_to_string(&path).unwrap(), "100");
}
