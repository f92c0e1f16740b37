use std::fs;

use saveguard_core::data::GameData;
use saveguard_core::engine::FileDataHandler;
use tempfile::TempDir;

const FILE_NAME: &str = "game.json";

fn sample_data() -> GameData {
    let mut data = GameData::new();
    data.name = "Clairey".to_string();
    data.level = 5;
    data.exp = 100;
    data
}

/// Saves once so both primary and backup are valid, then corrupts the
/// primary in place.
fn handler_with_corrupt_primary(dir: &TempDir, use_encryption: bool) -> FileDataHandler {
    let handler = FileDataHandler::new(dir.path(), FILE_NAME, use_encryption);
    handler.save(&sample_data()).expect("setup save failed");
    fs::write(handler.primary_path(), b"\x00\xff not a save file \xfe").expect("corrupt failed");
    handler
}

#[test]
fn corrupt_primary_recovers_from_backup() {
    let dir = TempDir::new().expect("failed to create temp dir");
    let handler = handler_with_corrupt_primary(&dir, true);

    let loaded = handler.load().expect("load did not recover");
    assert_eq!(loaded, sample_data());
}

#[test]
fn rollback_repairs_primary_byte_for_byte() {
    let dir = TempDir::new().expect("failed to create temp dir");
    let handler = handler_with_corrupt_primary(&dir, true);

    handler.load().expect("load did not recover");

    let primary = fs::read(handler.primary_path()).expect("failed to read primary");
    let backup = fs::read(handler.backup_path()).expect("failed to read backup");
    assert_eq!(primary, backup);
}

#[test]
fn corrupt_primary_and_backup_returns_none() {
    let dir = TempDir::new().expect("failed to create temp dir");
    let handler = handler_with_corrupt_primary(&dir, true);
    fs::write(handler.backup_path(), b"also garbage").expect("corrupt backup failed");

    // Must terminate after a single rollback attempt, not loop.
    assert!(handler.load().is_none());
}

#[test]
fn corrupt_primary_without_backup_returns_none() {
    let dir = TempDir::new().expect("failed to create temp dir");
    let handler = FileDataHandler::new(dir.path(), FILE_NAME, true);
    fs::create_dir_all(dir.path()).expect("failed to create dir");
    fs::write(handler.primary_path(), b"garbage").expect("failed to write primary");

    assert!(handler.load().is_none());
    assert!(!handler.backup_path().exists());
}

#[test]
fn attempt_rollback_without_backup_reports_failure() {
    let dir = TempDir::new().expect("failed to create temp dir");
    let handler = FileDataHandler::new(dir.path(), FILE_NAME, true);

    assert!(!handler.attempt_rollback());
}

#[test]
fn failed_load_leaves_backup_untouched() {
    let dir = TempDir::new().expect("failed to create temp dir");
    let handler = handler_with_corrupt_primary(&dir, true);
    let backup_before = fs::read(handler.backup_path()).expect("failed to read backup");

    handler.load();

    let backup_after = fs::read(handler.backup_path()).expect("failed to read backup");
    assert_eq!(backup_before, backup_after);
}

#[test]
fn plaintext_corruption_recovers_too() {
    let dir = TempDir::new().expect("failed to create temp dir");
    let handler = handler_with_corrupt_primary(&dir, false);

    let loaded = handler.load().expect("load did not recover");
    assert_eq!(loaded, sample_data());
}
