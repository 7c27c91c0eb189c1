//! End-to-end tests for the `lantern` command-line interface.

#![allow(deprecated)] // Command::cargo_bin – macro replacement not yet stable

use std::fs;
use std::path::PathBuf;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

const HALL: &str = r#"{
    "name": "Test Hall",
    "locations": [
        {"data_id": 1, "attributes": "0x3", "labels": {"shortname": "hall", "longname": "the hall", "description": "A quiet hall."}, "directions": {"north": 2}},
        {"data_id": 2, "attributes": "0x3", "labels": {"shortname": "yard", "longname": "the yard", "description": "A sunny yard."}, "directions": {"south": 1}}
    ],
    "inventories": [{"data_id": 1, "capacity": 5, "default": true}],
    "players": [{"location": 1}],
    "items": [
        {"data_id": 1, "attributes": "0x8", "labels": {"shortname": "key", "longname": "a key"}, "size": 1, "placement": {"location": 1}}
    ],
    "commands": [
        {"data_id": 1, "attributes": "0x1", "name": "north"},
        {"data_id": 2, "attributes": "0x1", "name": "south"},
        {"data_id": 3, "name": "take", "arguments": [{"source": "location"}]},
        {"data_id": 4, "name": "inventory", "aliases": ["i"]},
        {"data_id": 5, "name": "quit"}
    ]
}"#;

/// Write a world file into a fresh temp directory.
fn world_file(json: &str) -> (TempDir, PathBuf) {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("world.json");
    fs::write(&path, json).unwrap();
    (dir, path)
}

fn lantern() -> Command {
    Command::cargo_bin("lantern").unwrap()
}

// ---------------------------------------------------------------------------
// check
// ---------------------------------------------------------------------------

#[test]
fn check_valid_world() {
    let (_dir, path) = world_file(HALL);

    lantern()
        .args(["check", "--world"])
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::contains("All checks passed for 'Test Hall'"))
        .stdout(predicate::str::contains("locations"))
        .stdout(predicate::str::contains("commands"));
}

#[test]
fn check_bundled_cavern() {
    let path = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../worlds/cavern.json");

    lantern()
        .args(["check", "--world"])
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::contains("All checks passed for 'Cavern'"));
}

#[test]
fn check_reports_warnings_but_passes() {
    let json = HALL.replace(
        r#"{"data_id": 5, "name": "quit"}"#,
        r#"{"data_id": 5, "name": "quit"}, {"data_id": 6, "name": "rub", "arguments": [{}]}"#,
    );
    let (_dir, path) = world_file(&json);

    lantern()
        .args(["check", "--world"])
        .arg(&path)
        .assert()
        .success()
        .stderr(predicate::str::contains(
            "command 6 (rub) uses unknown handler \"rub\"",
        ))
        .stderr(predicate::str::contains("1 warning"));
}

#[test]
fn check_fails_on_dangling_link() {
    let json = HALL.replace(r#""directions": {"south": 1}"#, r#""directions": {"south": 9}"#);
    let (_dir, path) = world_file(&json);

    lantern()
        .args(["check", "--world"])
        .arg(&path)
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown location 9"))
        .stderr(predicate::str::contains("error:"));
}

#[test]
fn check_fails_on_malformed_json() {
    let (_dir, path) = world_file("{ not json");

    lantern()
        .args(["check", "--world"])
        .arg(&path)
        .assert()
        .failure()
        .stderr(predicate::str::contains("error:"));
}

#[test]
fn check_fails_on_missing_file() {
    let dir = TempDir::new().unwrap();

    lantern()
        .args(["check", "--world"])
        .arg(dir.path().join("absent.json"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("absent.json"));
}

// ---------------------------------------------------------------------------
// play
// ---------------------------------------------------------------------------

#[test]
fn play_runs_commands_from_stdin() {
    let (_dir, path) = world_file(HALL);

    lantern()
        .args(["play", "--world"])
        .arg(&path)
        .write_stdin("take key\ni\nnorth\nquit\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("A quiet hall."))
        .stdout(predicate::str::contains("Taken."))
        .stdout(predicate::str::contains("You are carrying:\n  a key"))
        .stdout(predicate::str::contains("A sunny yard."))
        .stdout(predicate::str::contains("Goodbye."))
        .stdout(predicate::str::contains("0 points in 4 moves"));
}

#[test]
fn play_stops_at_end_of_input() {
    let (_dir, path) = world_file(HALL);

    lantern()
        .args(["play", "--world"])
        .arg(&path)
        .write_stdin("dance\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("I don't understand \"dance\"."));
}

#[test]
fn play_verbose_flag() {
    let (_dir, path) = world_file(HALL);

    lantern()
        .args(["play", "--verbose", "--world"])
        .arg(&path)
        .write_stdin("north\nsouth\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("A quiet hall.").count(2));
}

#[test]
fn play_refuses_broken_world() {
    let (_dir, path) = world_file(r#"{"locations": []}"#);

    lantern()
        .args(["play", "--world"])
        .arg(&path)
        .assert()
        .failure()
        .stderr(predicate::str::contains("error:"));
}

// ---------------------------------------------------------------------------
// logging
// ---------------------------------------------------------------------------

#[test]
fn invalid_log_level_is_an_error() {
    let (_dir, path) = world_file(HALL);

    lantern()
        .env_remove("RUST_LOG")
        .args(["--log-level", "lantern=loud", "check", "--world"])
        .arg(&path)
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid log level"));
}

#[test]
fn info_logging_goes_to_stderr() {
    let (_dir, path) = world_file(HALL);

    lantern()
        .env_remove("RUST_LOG")
        .args(["--log-level", "info", "play", "--world"])
        .arg(&path)
        .write_stdin("quit\n")
        .assert()
        .success()
        .stderr(predicate::str::contains("session started"))
        .stdout(predicate::str::contains("session started").not());
}
