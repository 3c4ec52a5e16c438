//! End-to-end tests for the `chatgpt-md` binary.

use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::{Value, json};
use std::fs;
use std::path::Path;
use std::time::UNIX_EPOCH;
use tempfile::TempDir;

fn message(role: &str, text: &str) -> Value {
    json!({
        "author": { "role": role },
        "content": { "content_type": "text", "parts": [text] }
    })
}

fn conversation(id: &str, title: Option<&str>, update_time: f64) -> Value {
    json!({
        "id": id,
        "title": title,
        "create_time": 1700000000.25,
        "update_time": update_time,
        "current_node": "a1",
        "mapping": {
            "root": { "parent": null, "message": null, "children": ["sys"] },
            "sys": { "parent": "root", "message": message("system", "hidden prompt") },
            "u1": { "parent": "sys", "message": message("user", "What is 2+2?") },
            "a1": { "parent": "u1", "message": message("assistant", "4\u{e200}cite\u{e201}.") }
        }
    })
}

/// Temp workspace with an archive and an empty config dir.
struct Fixture {
    dir: TempDir,
}

impl Fixture {
    fn new(archive: Value) -> Self {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("conversations.json"), archive.to_string()).unwrap();
        fs::create_dir(dir.path().join("config")).unwrap();
        Self { dir }
    }

    fn path(&self) -> &Path {
        self.dir.path()
    }

    fn cmd(&self) -> Command {
        let mut cmd = Command::cargo_bin("chatgpt-md").unwrap();
        cmd.current_dir(self.path())
            .env("XDG_CONFIG_HOME", self.path().join("config"))
            .env_remove("RUST_LOG")
            .arg("conversations.json");
        cmd
    }
}

fn default_archive() -> Value {
    json!([
        conversation("aaa111", Some("Math: Basics."), 1000.0),
        conversation("abc123", Some("Math: Basics."), 2000.0),
        conversation("ccc333", None, 3000.0),
    ])
}

#[test]
fn help_exits_zero() {
    let mut cmd = Command::cargo_bin("chatgpt-md").unwrap();
    cmd.arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("JSON_FILE"))
        .stdout(predicate::str::contains("--no-frontmatter"));
}

#[test]
fn requires_chat_id_or_out() {
    let fx = Fixture::new(default_archive());
    fx.cmd()
        .assert()
        .failure()
        .stderr(predicate::str::contains("must provide either CHAT_ID or --out"));
}

#[test]
fn chat_id_and_after_conflict() {
    let fx = Fixture::new(default_archive());
    fx.cmd()
        .args(["abc123", "--after", "2024-01-01"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("cannot be used with"));
}

#[test]
fn invalid_after_is_rejected() {
    let fx = Fixture::new(default_archive());
    fx.cmd()
        .args(["--out", "out", "--after", "someday"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Could not parse date"));
}

#[test]
fn prints_single_conversation_from_url() {
    let fx = Fixture::new(default_archive());
    fx.cmd()
        .arg("https://chatgpt.com/c/abc123")
        .assert()
        .success()
        .stdout(
            "---\ncreated: 2023-11-14\n---\n\
             https://chatgpt.com/c/abc123\n\n\
             > [!note] Prompt\n> What is 2+2?\n\n4.\n",
        );
}

#[test]
fn prints_without_frontmatter() {
    let fx = Fixture::new(default_archive());
    fx.cmd()
        .args(["ccc333", "--no-frontmatter"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("https://chatgpt.com/c/ccc333\n\n"))
        .stdout(predicate::str::contains("hidden prompt").not());
}

#[test]
fn unknown_id_fails() {
    let fx = Fixture::new(default_archive());
    fx.cmd()
        .arg("nope")
        .assert()
        .code(1)
        .stdout("")
        .stderr(predicate::str::contains("nope: conversation not found"));
}

#[test]
fn writes_files_with_names_and_times() {
    let fx = Fixture::new(default_archive());
    fx.cmd().args(["--out", "out", "--quiet"]).assert().success().stdout("");

    let out = fx.path().join("out");
    let first = out.join("Math - Basics.md");
    let second = out.join("Math - Basics (2).md");
    let third = out.join("Untitled.md");

    assert!(fs::read_to_string(&first).unwrap().contains("https://chatgpt.com/c/aaa111"));
    assert!(fs::read_to_string(&second).unwrap().contains("https://chatgpt.com/c/abc123"));
    assert!(fs::read_to_string(&third).unwrap().contains("https://chatgpt.com/c/ccc333"));

    let mtime = |p: &Path| {
        fs::metadata(p)
            .unwrap()
            .modified()
            .unwrap()
            .duration_since(UNIX_EPOCH)
            .unwrap()
            .as_secs()
    };
    assert_eq!(mtime(&first), 1000);
    assert_eq!(mtime(&second), 2000);
    assert_eq!(mtime(&third), 3000);
}

#[test]
fn verbose_lists_created_files_on_stderr() {
    let fx = Fixture::new(json!([conversation("aaa111", Some("Foo"), 1.0)]));
    fx.cmd()
        .args(["--out", "out", "-v"])
        .assert()
        .success()
        .stdout("")
        .stderr(predicate::str::contains("Created:  Foo.md"))
        .stderr(predicate::str::contains("Done. 1 written."))
        .stderr(predicate::str::contains("\u{1b}[").not());
}

#[test]
fn second_run_does_not_overwrite() {
    let fx = Fixture::new(json!([conversation("aaa111", Some("Foo"), 1.0)]));
    fx.cmd().args(["--out", "out", "-q"]).assert().success();
    fx.cmd().args(["--out", "out", "-q"]).assert().success();
    fx.cmd().args(["--out", "out", "-q"]).assert().success();

    let out = fx.path().join("out");
    assert!(out.join("Foo.md").exists());
    assert!(out.join("Foo (2).md").exists());
    assert!(out.join("Foo (3).md").exists());
}

#[test]
fn after_filters_by_update_time() {
    let fx = Fixture::new(json!([
        conversation("early", Some("Early"), 1000.0),
        conversation("late", Some("Late"), 2000.0),
    ]));
    fx.cmd()
        .args(["--out", "out", "-q", "--after", "1970-01-01T00:25:00Z"])
        .assert()
        .success();

    let out = fx.path().join("out");
    assert!(out.join("Late.md").exists());
    assert!(!out.join("Early.md").exists());
}

#[test]
fn out_dir_from_config_file() {
    let fx = Fixture::new(json!([conversation("aaa111", Some("Configured"), 1.0)]));
    let cfg = fx.path().join("custom.toml");
    fs::write(&cfg, "out_dir = \"from-config\"\nfrontmatter = false\n").unwrap();

    fx.cmd()
        .args(["-q", "--config"])
        .arg(&cfg)
        .assert()
        .success();

    let doc = fs::read_to_string(fx.path().join("from-config/Configured.md")).unwrap();
    assert!(doc.starts_with("https://chatgpt.com/c/aaa111"));
}

#[test]
fn malformed_archive_fails() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("conversations.json"), "{ not json").unwrap();
    Command::cargo_bin("chatgpt-md")
        .unwrap()
        .current_dir(dir.path())
        .env("XDG_CONFIG_HOME", dir.path())
        .args(["conversations.json", "--out", "out"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to parse archive"));
}
