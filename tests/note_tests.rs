//! Integration tests for note CRUD, metadata and tags

#![allow(deprecated)]

use predicates::prelude::*;
use std::fs;

mod common;
use common::{read, Sandbox};

#[test]
fn test_new_document_from_stdin() {
    let sandbox = Sandbox::new();
    let root = sandbox.workspace("ws");

    sandbox
        .cmd()
        .args(["note", "new", "--stdin"])
        .write_stdin("# Trip Planning\n\nPack bags.\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("trip-planning.md"));

    let text = read(root.join("notes/trip-planning.md"));
    assert!(text.starts_with("---\n"));
    assert!(text.contains("type: document"));
    assert!(text.ends_with("---\n# Trip Planning\n\nPack bags.\n"));
}

#[test]
fn test_slug_collision_gets_suffix() {
    let sandbox = Sandbox::new();
    let root = sandbox.workspace("ws");

    for _ in 0..3 {
        sandbox
            .cmd()
            .args(["note", "new", "# Same Title"])
            .assert()
            .success();
    }

    assert!(root.join("notes/same-title.md").is_file());
    assert!(root.join("notes/same-title-1.md").is_file());
    assert!(root.join("notes/same-title-2.md").is_file());
}

#[test]
fn test_show_write_rm() {
    let sandbox = Sandbox::new();
    sandbox.workspace("ws");

    sandbox
        .cmd()
        .args(["note", "new", "first draft", "--id", "draft"])
        .assert()
        .success();

    sandbox
        .cmd()
        .args(["note", "write", "draft", "second draft"])
        .assert()
        .success();

    sandbox
        .cmd()
        .args(["note", "show", "draft"])
        .assert()
        .success()
        .stdout("second draft");

    sandbox
        .cmd()
        .args(["note", "rm", "draft"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Deleted document/draft"));

    sandbox
        .cmd()
        .args(["note", "rm", "draft"])
        .assert()
        .failure()
        .code(4)
        .stderr(predicate::str::contains("Note not found: document/draft"));

    sandbox
        .cmd()
        .args(["note", "show", "draft"])
        .assert()
        .failure()
        .code(4);
}

#[test]
fn test_write_stdin_streams_body() {
    let sandbox = Sandbox::new();
    let root = sandbox.workspace("ws");

    sandbox
        .cmd()
        .args(["note", "write", "2025-01-17", "--type", "daily", "--stdin"])
        .write_stdin("line one\nline two\n")
        .assert()
        .success();

    let text = read(root.join("journal/daily/2025-01-17.md"));
    assert!(text.contains("type: daily"));
    assert!(text.ends_with("---\nline one\nline two\n"));
}

#[test]
fn test_daily_note_with_explicit_id() {
    let sandbox = Sandbox::new();
    let root = sandbox.workspace("ws");

    sandbox
        .cmd()
        .args(["note", "new", "Ran 5k", "-t", "daily", "--id", "2025-01-17"])
        .assert()
        .success();
    sandbox
        .cmd()
        .args(["note", "new", "Ran 10k", "-t", "daily", "--id", "2025-01-17"])
        .assert()
        .success();

    let files: Vec<_> = fs::read_dir(root.join("journal/daily")).unwrap().collect();
    assert_eq!(files.len(), 1);
    assert!(read(root.join("journal/daily/2025-01-17.md")).ends_with("Ran 10k"));
}

#[test]
fn test_invalid_ids() {
    let sandbox = Sandbox::new();
    sandbox.workspace("ws");

    sandbox
        .cmd()
        .args(["note", "new", "x", "-t", "daily", "--id", "17-01-2025"])
        .assert()
        .failure()
        .code(5)
        .stderr(predicate::str::contains("Invalid note id"));

    sandbox
        .cmd()
        .args(["note", "new", "x", "--id", ""])
        .assert()
        .failure()
        .code(5);

    sandbox
        .cmd()
        .args(["note", "show", "../escape"])
        .assert()
        .failure()
        .code(5);
}

#[test]
fn test_legacy_note_is_readable() {
    let sandbox = Sandbox::new();
    let root = sandbox.workspace("ws");
    fs::create_dir_all(root.join("notes")).unwrap();
    fs::write(root.join("notes/plain.md"), "Just text, no frontmatter\n").unwrap();

    sandbox
        .cmd()
        .args(["note", "show", "plain", "--meta"])
        .assert()
        .success()
        .stdout(predicate::str::contains("type: document"))
        .stdout(predicate::str::contains("Just text, no frontmatter"));
}

#[test]
fn test_tag_and_set() {
    let sandbox = Sandbox::new();
    let root = sandbox.workspace("ws");

    sandbox
        .cmd()
        .args(["note", "new", "# Reading List"])
        .assert()
        .success();

    sandbox
        .cmd()
        .args(["note", "tag", "reading-list", "#books", "later", "books"])
        .assert()
        .success()
        .stdout("books, later\n");

    sandbox
        .cmd()
        .args(["note", "tag", "reading-list", "later", "--remove"])
        .assert()
        .success()
        .stdout("books\n");

    sandbox
        .cmd()
        .args(["note", "set", "reading-list", "status=open", "owner=me"])
        .assert()
        .success()
        .stdout("owner: me\nstatus: open\n");

    sandbox
        .cmd()
        .args(["note", "set", "reading-list", "--unset", "owner"])
        .assert()
        .success()
        .stdout("status: open\n");

    let text = read(root.join("notes/reading-list.md"));
    assert!(text.contains("- books"));
    assert!(text.contains("status: open"));
    assert!(!text.contains("owner"));

    sandbox
        .cmd()
        .args(["note", "tag", "missing", "x"])
        .assert()
        .failure()
        .code(4);
}

#[test]
fn test_ls_and_tags() {
    let sandbox = Sandbox::new();
    sandbox.workspace("ws");

    sandbox
        .cmd()
        .args(["note", "new", "# Alpha #Project"])
        .assert()
        .success();
    sandbox
        .cmd()
        .args(["note", "new", "Standup #team", "-t", "daily", "--id", "2025-01-17"])
        .assert()
        .success();
    sandbox
        .cmd()
        .args(["note", "tag", "alpha-project", "focus"])
        .assert()
        .success();

    sandbox
        .cmd()
        .args(["note", "ls"])
        .assert()
        .success()
        .stdout(predicate::str::contains("alpha-project  #focus"))
        .stdout(predicate::str::contains("2025-01-17"));

    sandbox
        .cmd()
        .args(["note", "ls", "--type", "daily"])
        .assert()
        .success()
        .stdout(predicate::str::contains("alpha-project").not());

    sandbox
        .cmd()
        .args(["note", "ls", "--tag", "focus"])
        .assert()
        .success()
        .stdout(predicate::str::contains("2025-01-17").not());

    sandbox
        .cmd()
        .arg("tags")
        .assert()
        .success()
        .stdout("#focus\n#project\n#team\n");
}
