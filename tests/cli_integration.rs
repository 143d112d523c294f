//! CLI integration tests for the catalog
//!
//! These tests drive the binary end to end: one-shot subcommands, the
//! interactive shell over stdin, and the catalog file they leave behind.

use predicates::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Get a command instance bound to a catalog file in `dir`
fn nizami_cmd(dir: &Path) -> assert_cmd::Command {
    let mut cmd = assert_cmd::Command::new(assert_cmd::cargo::cargo_bin!("nizami"));
    cmd.current_dir(dir)
        .env_remove("NIZAMI_CATALOG")
        .env_remove("RUST_LOG")
        .env("NIZAMI_CONFIG", dir.join("no-config.toml"));
    cmd
}

fn catalog(dir: &TempDir) -> PathBuf {
    dir.path().join("books.json")
}

fn read_catalog(dir: &TempDir) -> serde_json::Value {
    let content = fs::read_to_string(catalog(dir)).unwrap();
    serde_json::from_str(&content).unwrap()
}

fn add(dir: &TempDir, title: &str, author: &str, year: &str) {
    nizami_cmd(dir.path())
        .args(["add", title, author, year])
        .assert()
        .success();
}

// =============================================================================
// One-shot Commands
// =============================================================================

#[test]
fn test_add_creates_catalog_file() {
    let dir = TempDir::new().unwrap();

    nizami_cmd(dir.path())
        .args(["add", "Dune", "Frank Herbert", "1965"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Added book 1: Dune"));

    let data = read_catalog(&dir);
    assert_eq!(data["lastId"], 1);
    assert_eq!(data["books"][0]["title"], "Dune");
    assert_eq!(data["books"][0]["author"], "Frank Herbert");
    assert_eq!(data["books"][0]["year"], 1965);
    assert_eq!(data["books"][0]["status"], "в наличии");
}

#[test]
fn test_list_renders_books() {
    let dir = TempDir::new().unwrap();
    add(&dir, "Dune", "Herbert", "1965");
    add(&dir, "Hyperion", "Simmons", "1989");

    nizami_cmd(dir.path())
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("========== List of All Books =========="))
        .stdout(predicate::str::contains(
            "Dune __________\nid: 1\nauthor: Herbert\nyear: 1965\nstatus: в наличии\n\n",
        ))
        .stdout(predicate::str::contains("Hyperion __________\nid: 2\n"));
}

#[test]
fn test_list_empty_catalog() {
    let dir = TempDir::new().unwrap();

    nizami_cmd(dir.path())
        .args(["list", "--format", "json"])
        .assert()
        .success()
        .stdout("[]\n");

    // Reading never creates the file
    assert!(!catalog(&dir).exists());
}

#[test]
fn test_add_rejects_bad_year() {
    let dir = TempDir::new().unwrap();

    nizami_cmd(dir.path())
        .args(["add", "Dune", "Herbert", "next year"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("<year> must be an integer."));

    assert!(!catalog(&dir).exists());
}

#[test]
fn test_ids_are_never_reused() {
    let dir = TempDir::new().unwrap();
    add(&dir, "A", "X", "2000");
    add(&dir, "B", "Y", "2001");

    nizami_cmd(dir.path()).args(["delete", "2"]).assert().success();

    let output = nizami_cmd(dir.path())
        .args(["add", "C", "Z", "2002", "--format", "json"])
        .assert()
        .success();

    let stdout = String::from_utf8_lossy(&output.get_output().stdout);
    let json: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(json["id"], 3);
    assert_eq!(read_catalog(&dir)["lastId"], 3);
}

#[test]
fn test_delete_missing_book() {
    let dir = TempDir::new().unwrap();
    add(&dir, "Dune", "Herbert", "1965");

    nizami_cmd(dir.path())
        .args(["delete", "42"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Book not found: 42"));

    assert_eq!(read_catalog(&dir)["books"].as_array().unwrap().len(), 1);
}

#[test]
fn test_delete_rejects_non_numeric_id() {
    let dir = TempDir::new().unwrap();

    nizami_cmd(dir.path())
        .args(["delete", "first"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("must be a positive integer"));
}

#[test]
fn test_update_status() {
    let dir = TempDir::new().unwrap();
    add(&dir, "Dune", "Herbert", "1965");
    add(&dir, "Hyperion", "Simmons", "1989");

    nizami_cmd(dir.path())
        .args(["update-status", "1", "выдана"])
        .assert()
        .success();

    let data = read_catalog(&dir);
    assert_eq!(data["books"][0]["status"], "выдана");
    assert_eq!(data["books"][1]["status"], "в наличии");

    // Underscore spelling and ASCII alias work too
    nizami_cmd(dir.path())
        .args(["update_status", "1", "available"])
        .assert()
        .success();
    assert_eq!(read_catalog(&dir)["books"][0]["status"], "в наличии");
}

#[test]
fn test_update_status_rejects_unknown_status() {
    let dir = TempDir::new().unwrap();
    add(&dir, "Dune", "Herbert", "1965");

    nizami_cmd(dir.path())
        .args(["update-status", "1", "lost"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid status 'lost'"));

    assert_eq!(read_catalog(&dir)["books"][0]["status"], "в наличии");
}

#[test]
fn test_search_by_author() {
    let dir = TempDir::new().unwrap();
    add(&dir, "Dune", "Herbert", "1965");
    add(&dir, "Hyperion", "Simmons", "1989");

    nizami_cmd(dir.path())
        .args(["search", "--author", "Herbert"])
        .assert()
        .success()
        .stdout(predicate::str::contains("========== Search Results =========="))
        .stdout(predicate::str::contains("1 book found"))
        .stdout(predicate::str::contains("Dune __________"))
        .stdout(predicate::str::contains("Hyperion").not());
}

#[test]
fn test_search_json_combines_criteria() {
    let dir = TempDir::new().unwrap();
    add(&dir, "Dune", "Herbert", "1965");
    add(&dir, "Dune Messiah", "Herbert", "1969");

    let output = nizami_cmd(dir.path())
        .args(["search", "--author", "Herbert", "--year", "1969", "--format", "json"])
        .assert()
        .success();

    let stdout = String::from_utf8_lossy(&output.get_output().stdout);
    let json: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    let results = json.as_array().unwrap();
    assert_eq!(results.len(), 1);
    assert_eq!(results[0]["title"], "Dune Messiah");
}

#[test]
fn test_search_no_matches() {
    let dir = TempDir::new().unwrap();
    add(&dir, "Dune", "Herbert", "1965");

    nizami_cmd(dir.path())
        .args(["search", "--title", "Solaris"])
        .assert()
        .success()
        .stdout(predicate::str::contains("0 books found"));
}

#[test]
fn test_search_rejects_bad_year() {
    let dir = TempDir::new().unwrap();
    add(&dir, "Dune", "Herbert", "1965");

    nizami_cmd(dir.path())
        .args(["search", "--year", "sixties"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Year must be an integer"));
}

#[test]
fn test_search_requires_an_option() {
    let dir = TempDir::new().unwrap();

    nizami_cmd(dir.path())
        .arg("search")
        .assert()
        .failure()
        .stderr(predicate::str::contains("requires at least one option"));
}

// =============================================================================
// Catalog File Handling
// =============================================================================

#[test]
fn test_existing_file_is_loaded() {
    let dir = TempDir::new().unwrap();
    fs::write(
        catalog(&dir),
        r#"{"books": [{"id": 4, "title": "Solaris", "author": "Lem", "year": 1961, "status": "выдана"}], "lastId": 9}"#,
    )
    .unwrap();

    nizami_cmd(dir.path())
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("Solaris __________\nid: 4\n"))
        .stdout(predicate::str::contains("status: выдана"));

    add(&dir, "Dune", "Herbert", "1965");
    assert_eq!(read_catalog(&dir)["books"][1]["id"], 10);
}

#[test]
fn test_malformed_file_is_reported_and_kept() {
    let dir = TempDir::new().unwrap();
    fs::write(catalog(&dir), "{ broken").unwrap();

    nizami_cmd(dir.path())
        .args(["add", "Dune", "Herbert", "1965"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Malformed catalog file"));

    assert_eq!(fs::read_to_string(catalog(&dir)).unwrap(), "{ broken");
}

#[test]
fn test_file_flag_and_env() {
    let dir = TempDir::new().unwrap();
    let custom = dir.path().join("data").join("library.json");

    nizami_cmd(dir.path())
        .args(["add", "Dune", "Herbert", "1965", "--file"])
        .arg(&custom)
        .assert()
        .success();
    assert!(custom.is_file());
    assert!(!catalog(&dir).exists());

    nizami_cmd(dir.path())
        .env("NIZAMI_CATALOG", &custom)
        .args(["list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Dune __________"));
}

#[test]
fn test_config_file_sets_catalog_and_format() {
    let dir = TempDir::new().unwrap();
    let config = dir.path().join("config.toml");
    fs::write(
        &config,
        "catalog_file = \"configured.json\"\ndefault_format = \"json\"\n",
    )
    .unwrap();

    nizami_cmd(dir.path())
        .env("NIZAMI_CONFIG", &config)
        .args(["add", "Dune", "Herbert", "1965"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"id\":1"));

    assert!(dir.path().join("configured.json").is_file());
}

// =============================================================================
// Interactive Shell
// =============================================================================

#[test]
fn test_shell_session() {
    let dir = TempDir::new().unwrap();

    nizami_cmd(dir.path())
        .write_stdin(
            "add Dune Herbert 1965\n\
             add \"Hyperion Cantos\" 'Dan Simmons' 1989\n\
             update_status 1 выдана\n\
             search -author Herbert\n\
             delete 7\n\
             add Broken Book year\n\
             quit\n",
        )
        .assert()
        .success()
        .stdout(predicate::str::contains("Welcome to Nizami library management system"))
        .stdout(predicate::str::contains("File (books.json) not found"))
        .stdout(predicate::str::contains("1 book found"))
        .stdout(predicate::str::contains("status: выдана"))
        .stdout(predicate::str::contains("Bye ..."))
        .stderr(predicate::str::contains("Book not found: 7"))
        .stderr(predicate::str::contains("<year> must be an integer."));

    let data = read_catalog(&dir);
    assert_eq!(data["lastId"], 2);
    assert_eq!(data["books"][1]["title"], "Hyperion Cantos");
    assert_eq!(data["books"][1]["author"], "Dan Simmons");
}

#[test]
fn test_shell_reports_bad_input_and_continues() {
    let dir = TempDir::new().unwrap();
    add(&dir, "Dune", "Herbert", "1965");

    nizami_cmd(dir.path())
        .arg("shell")
        .write_stdin("borrow 1\nlist extra\nsearch -isbn 1\nsearch -year abc\nlist\n")
        .assert()
        .success()
        .stderr(predicate::str::contains("*** Unknown syntax: borrow 1"))
        .stderr(predicate::str::contains("Invalid number of arguments. Usage: list"))
        .stderr(predicate::str::contains("Invalid argument: -isbn"))
        .stderr(predicate::str::contains("Year must be an integer"))
        .stdout(predicate::str::contains("Dune __________"))
        .stdout(predicate::str::contains("Bye ..."));
}

#[test]
fn test_shell_help() {
    let dir = TempDir::new().unwrap();

    nizami_cmd(dir.path())
        .write_stdin("help\nhelp update_status\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Documented commands"))
        .stdout(predicate::str::contains("status: 'в наличии' or 'выдана'"));
}

#[test]
fn test_shell_end_of_input_does_not_write() {
    let dir = TempDir::new().unwrap();

    nizami_cmd(dir.path())
        .write_stdin("list\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Bye ..."));

    assert!(!catalog(&dir).exists());
}
