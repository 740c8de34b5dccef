//! Integration tests for the `bufscope` binary
//!
//! Each test writes a world file into a temporary data directory and runs
//! the binary against it.

use std::fs;
use std::path::{Path, PathBuf};

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

use super::common::fixtures::{overlapping_pair, scope_with};
use bufscope::{ItemHost, MemoryHost, ScopeHost, ScopeId};

fn write_world(dir: &Path, host: &MemoryHost) -> PathBuf {
    let path = dir.join("world.json");
    fs::write(&path, serde_json::to_string_pretty(host).unwrap()).unwrap();
    path
}

fn read_world(path: &Path) -> MemoryHost {
    serde_json::from_str(&fs::read_to_string(path).unwrap()).unwrap()
}

fn bufscope(dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("bufscope").unwrap();
    cmd.arg("--data-dir").arg(dir.path());
    cmd
}

#[test]
fn test_cli_lists_current_scope() {
    let dir = TempDir::new().unwrap();
    let mut host = MemoryHost::new();
    scope_with(&mut host, ScopeId::new(0, 0), &["A", " hidden"], &["C"]);
    write_world(dir.path(), &host);

    bufscope(&dir)
        .arg("list")
        .assert()
        .success()
        .stdout("A\n");

    bufscope(&dir)
        .args(["list", "--buried", "--hidden"])
        .assert()
        .success()
        .stdout("A\n hidden\nC\n");
}

#[test]
fn test_cli_orphans_and_exclusive() {
    let dir = TempDir::new().unwrap();
    let (mut host, _, _) = overlapping_pair();
    host.add_item("D");
    write_world(dir.path(), &host);

    bufscope(&dir)
        .arg("orphans")
        .assert()
        .success()
        .stdout("D\n");

    bufscope(&dir)
        .args(["exclusive", "--scope", "0:0"])
        .assert()
        .success()
        .stdout("A\n");

    bufscope(&dir)
        .args(["captured", "--excluding", "0:0"])
        .assert()
        .success()
        .stdout("B\nC\n");
}

#[test]
fn test_cli_kill_exclusive_persists_world() {
    let dir = TempDir::new().unwrap();
    let (host, _, _) = overlapping_pair();
    let world = write_world(dir.path(), &host);

    bufscope(&dir)
        .args(["kill-exclusive", "--scope", "0:0"])
        .assert()
        .success()
        .stdout("A\n");

    let host = read_world(&world);
    assert_eq!(host.lookup_by_name("A"), None);
    assert!(host.lookup_by_name("B").is_some());
}

#[test]
fn test_cli_isolate_without_project_is_informational() {
    let dir = TempDir::new().unwrap();
    let (host, _, _) = overlapping_pair();
    write_world(dir.path(), &host);

    bufscope(&dir)
        .args(["isolate", "--scope", "0:1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("has no current project"));
}

#[test]
fn test_cli_capture_then_restore_into_other_scope() {
    let dir = TempDir::new().unwrap();
    let mut host = MemoryHost::new();
    scope_with(&mut host, ScopeId::new(0, 0), &["A", "B"], &[]);
    scope_with(&mut host, ScopeId::new(1, 0), &[], &[]);
    let world = write_world(dir.path(), &host);

    let output = bufscope(&dir)
        .args(["capture", "--scope", "0:0"])
        .output()
        .unwrap();
    assert!(output.status.success());
    let state_path = dir.path().join("state.json");
    fs::write(&state_path, &output.stdout).unwrap();

    bufscope(&dir)
        .args(["restore", "--scope", "1:0", "--state"])
        .arg(&state_path)
        .assert()
        .success()
        .stdout("A\nB\n");

    let host = read_world(&world);
    assert_eq!(host.names(&host.active(ScopeId::new(1, 0))), vec!["A", "B"]);
}

#[test]
fn test_cli_rejects_malformed_scope_id() {
    let dir = TempDir::new().unwrap();
    let (host, _, _) = overlapping_pair();
    write_world(dir.path(), &host);

    bufscope(&dir)
        .args(["exclusive", "--scope", "zero"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("container:tab"));
}
