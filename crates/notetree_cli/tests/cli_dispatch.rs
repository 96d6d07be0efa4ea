use std::path::Path;
use std::process::{Command, Output};

use serde_json::Value;

fn run_notetree(data_dir: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_notetree"))
        .arg("--data-dir")
        .arg(data_dir)
        .arg("--no-log")
        .args(args)
        .env_remove("NOTETREE_DATA_DIR")
        .env_remove("NOTETREE_LOG_LEVEL")
        .output()
        .expect("notetree binary should run")
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).to_string()
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).to_string()
}

fn created_record(output: &Output, header: &str) -> Value {
    let text = stdout(output);
    let body = text
        .strip_prefix(header)
        .unwrap_or_else(|| panic!("missing `{header}` in {text}"));
    serde_json::from_str(body).expect("created record should be JSON")
}

#[test]
fn first_run_creates_document_and_prints_tree() {
    let dir = tempfile::tempdir().unwrap();
    let data_dir = dir.path().join("data");

    let output = run_notetree(&data_dir, &["tree"]);
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert_eq!(stdout(&output), "- [Notebook] Root (root)\n");
    assert!(data_dir.join("notes.json").exists());
}

#[test]
fn full_note_lifecycle_through_cli() {
    let dir = tempfile::tempdir().unwrap();
    let data_dir = dir.path();

    let output = run_notetree(data_dir, &["new-notebook", "root", "Work"]);
    assert!(output.status.success());
    let notebook = created_record(&output, "Notebook created:\n");
    let notebook_id = notebook["id"].as_str().unwrap().to_string();
    assert_eq!(notebook["name"], "Work");

    let output = run_notetree(data_dir, &["new-note", &notebook_id, "Todo", "buy", "milk"]);
    assert!(output.status.success());
    let note = created_record(&output, "Note created:\n");
    let note_id = note["id"].as_str().unwrap().to_string();
    assert_eq!(note["content"], "buy milk");

    let output = run_notetree(data_dir, &["search", "MILK"]);
    assert_eq!(
        stdout(&output),
        format!("Found 1 notes for \"MILK\":\n- Todo ({note_id})\n")
    );

    let output = run_notetree(data_dir, &["update-note", &note_id, "buy", "bread"]);
    assert_eq!(stdout(&output), "Note updated.\n");

    let output = run_notetree(data_dir, &["search", "milk"]);
    assert_eq!(stdout(&output), "Found 0 notes for \"milk\":\n");

    let output = run_notetree(data_dir, &["open-notebook", &notebook_id]);
    let listing = stdout(&output);
    assert!(listing.contains(&format!("[Notebook] Work ({notebook_id})")));
    assert!(listing.contains(&format!("  * Todo ({note_id})")));
    assert!(listing.contains("(no sub-notebooks)"));
}

#[test]
fn user_errors_print_message_and_exit_zero() {
    let dir = tempfile::tempdir().unwrap();
    run_notetree(dir.path(), &["tree"]);
    let before = std::fs::read(dir.path().join("notes.json")).unwrap();

    let output = run_notetree(dir.path(), &["new-notebook", "missing-id", "X"]);
    assert!(output.status.success());
    assert_eq!(stderr(&output), "Error: Notebook with id missing-id not found.\n");

    let output = run_notetree(dir.path(), &["new-note", "root", "   "]);
    assert!(output.status.success());
    assert_eq!(stderr(&output), "Error: Note title cannot be empty.\n");

    let output = run_notetree(dir.path(), &["update-note", "nope", "x"]);
    assert_eq!(stderr(&output), "Error: Note with id nope not found.\n");

    let output = run_notetree(dir.path(), &["open-notebook", "nope"]);
    assert_eq!(stderr(&output), "Error: Notebook with id nope not found.\n");

    assert_eq!(std::fs::read(dir.path().join("notes.json")).unwrap(), before);
}

#[test]
fn unknown_or_missing_command_prints_help() {
    let dir = tempfile::tempdir().unwrap();

    for args in [&[][..], &["frobnicate"][..], &["help"][..]] {
        let output = run_notetree(dir.path(), args);
        assert!(output.status.success(), "args {args:?}");
        let text = stdout(&output);
        assert!(text.contains("new-notebook"), "args {args:?}: {text}");
        assert!(text.contains("update-note"), "args {args:?}: {text}");
    }
    assert!(!dir.path().join("notes.json").exists());
}

#[test]
fn malformed_document_exits_nonzero() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("notes.json"), "{ broken").unwrap();

    let output = run_notetree(dir.path(), &["tree"]);
    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).starts_with("Unexpected error:"));
}

#[test]
fn extra_words_after_single_word_arguments_are_ignored() {
    let dir = tempfile::tempdir().unwrap();

    let output = run_notetree(dir.path(), &["new-notebook", "root", "My", "Notebook"]);
    assert!(output.status.success());
    let notebook = created_record(&output, "Notebook created:\n");
    assert_eq!(notebook["name"], "My");

    run_notetree(dir.path(), &["new-note", "root", "Shopping", "buy", "milk"]);
    let output = run_notetree(dir.path(), &["search", "buy", "milk"]);
    assert!(
        stdout(&output).starts_with("Found 1 notes for \"buy\":\n"),
        "stdout: {}",
        stdout(&output)
    );

    let notebook_id = notebook["id"].as_str().unwrap();
    let output = run_notetree(dir.path(), &["open-notebook", notebook_id, "trailing"]);
    assert!(stdout(&output).contains(&format!("[Notebook] My ({notebook_id})")));
}

#[test]
fn update_note_without_id_reports_error_and_exits_zero() {
    let dir = tempfile::tempdir().unwrap();
    run_notetree(dir.path(), &["tree"]);
    let before = std::fs::read(dir.path().join("notes.json")).unwrap();

    let output = run_notetree(dir.path(), &["update-note"]);
    assert_eq!(output.status.code(), Some(0));
    assert_eq!(stderr(&output), "Error: Please provide a note id.\n");
    assert_eq!(std::fs::read(dir.path().join("notes.json")).unwrap(), before);
}
