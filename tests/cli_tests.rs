//! CLI tests for commands that need no object store connection.

// Allow deprecated cargo_bin usage until assert_cmd updates API
#![allow(deprecated)]

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

use dedupload::db::Index;
use dedupload::ingest::hasher;
use dedupload::models::FileRecord;

/// Write a config pointing at `source/` and `index/` inside `dir`.
fn setup_project() -> TempDir {
    let dir = tempfile::tempdir().expect("create tempdir");
    fs::create_dir_all(dir.path().join("source")).unwrap();
    let config = format!(
        "minio:\n  endpoint: 127.0.0.1:9\n  accessKeyID: test\n  secretAccessKey: test\n  bucketName: test\n\
         app:\n  dbPath: {}\n  uploadPath: {}\n",
        dir.path().join("index").display(),
        dir.path().join("source").display()
    );
    fs::write(dir.path().join("config.yml"), config).unwrap();
    dir
}

fn dedupload(dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("dedupload").unwrap();
    cmd.current_dir(dir.path());
    cmd
}

fn seed_record(index_dir: &Path, content: &[u8]) -> String {
    let fingerprint = hasher::hash_bytes(content);
    let index = Index::open(index_dir).unwrap();
    index
        .put(
            &fingerprint,
            &FileRecord {
                fingerprint: fingerprint.clone(),
                stored_name: "a-20240131153000.txt".into(),
                content_type: "text/plain".into(),
                remote_prefix: "202401/".into(),
                modified_at: "20240131153000".into(),
            },
        )
        .unwrap();
    fingerprint
}

#[test]
fn hash_prints_fingerprint() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("a.txt"), "hello").unwrap();

    dedupload(&dir)
        .arg("hash")
        .arg("a.txt")
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "2cf24dba5fb0a30e26e83b2ac5b9e29e1b161e5c1fa7425e73043362938b9824",
        ));
}

#[test]
fn hash_missing_file_fails() {
    let dir = tempfile::tempdir().unwrap();
    dedupload(&dir)
        .arg("hash")
        .arg("missing.bin")
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("missing.bin"));
}

#[test]
fn missing_config_fails() {
    let dir = tempfile::tempdir().unwrap();
    dedupload(&dir)
        .arg("records")
        .assert()
        .failure()
        .stderr(predicate::str::contains("config error"));
}

#[test]
fn incomplete_config_fails() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(
        dir.path().join("config.yml"),
        "minio:\n  endpoint: 127.0.0.1:9000\napp:\n  dbPath: i\n  uploadPath: s\n",
    )
    .unwrap();
    dedupload(&dir)
        .arg("upload")
        .assert()
        .failure()
        .stderr(predicate::str::contains("accessKeyID"));
}

#[test]
fn records_lists_index() {
    let dir = setup_project();
    let fingerprint = seed_record(&dir.path().join("index"), b"hello");

    dedupload(&dir)
        .arg("records")
        .assert()
        .success()
        .stdout(predicate::str::contains("\"count\":1"))
        .stdout(predicate::str::contains(fingerprint));
}

#[test]
fn lookup_finds_record() {
    let dir = setup_project();
    let fingerprint = seed_record(&dir.path().join("index"), b"hello");

    dedupload(&dir)
        .arg("lookup")
        .arg(fingerprint.to_uppercase())
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "\"key\":\"202401/a-20240131153000.txt\"",
        ));
}

#[test]
fn lookup_unknown_fingerprint_fails() {
    let dir = setup_project();
    dedupload(&dir)
        .arg("lookup")
        .arg("0".repeat(64))
        .assert()
        .failure()
        .stderr(predicate::str::contains("record not found"));
}

#[test]
fn lookup_malformed_fingerprint_fails() {
    let dir = setup_project();
    dedupload(&dir)
        .arg("lookup")
        .arg("00")
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("not a fingerprint"));
}

#[test]
fn dry_run_reports_plan_without_network() {
    let dir = setup_project();
    fs::write(dir.path().join("source/a.txt"), "hello").unwrap();
    fs::write(dir.path().join("source/b.txt"), "hello").unwrap();
    fs::write(dir.path().join("source/c.zip"), "PK").unwrap();

    dedupload(&dir)
        .arg("upload")
        .arg("--dry-run")
        .assert()
        .success()
        .stdout(predicate::str::contains("\"planned\":1"))
        .stdout(predicate::str::contains("\"duplicates\":1"))
        .stdout(predicate::str::contains("\"excluded\":1"));

    let index = Index::open(&dir.path().join("index")).unwrap();
    assert!(index.is_empty().unwrap());
}

#[test]
fn upload_to_unreachable_store_fails() {
    let dir = setup_project();
    fs::write(dir.path().join("source/a.txt"), "hello").unwrap();

    dedupload(&dir)
        .arg("upload")
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("upload of"));

    let index = Index::open(&dir.path().join("index")).unwrap();
    assert!(index.is_empty().unwrap());
}
