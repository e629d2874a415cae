use assert_cmd::Command;
use predicates::prelude::*;
use std::path::Path;

fn blockr(home: &Path) -> Command {
    let mut cmd = Command::cargo_bin("blockr").unwrap();
    cmd.env("BLOCKR_HOME", home)
        .env("NO_COLOR", "1")
        .env_remove("RUST_LOG");
    cmd
}

fn added_id(stdout: &[u8]) -> String {
    let text = String::from_utf8_lossy(stdout);
    text.lines()
        .find_map(|line| line.trim().strip_prefix("Contact added: "))
        .expect("add output carries the new id")
        .trim()
        .to_string()
}

#[test]
fn test_contact_block_lifecycle() {
    let home = tempfile::tempdir().unwrap();

    let output = blockr(home.path())
        .args(["contacts", "add", "Spam Telecom", "+33 8 99 99 99 99"])
        .output()
        .unwrap();
    assert!(output.status.success());
    let id = added_id(&output.stdout);

    blockr(home.path())
        .args(["contacts", "add", "Alice", "+33 6 11 22 33 44"])
        .assert()
        .success();

    blockr(home.path())
        .args(["block", &id])
        .assert()
        .success()
        .stdout(predicate::str::contains("Contact blocked"));

    blockr(home.path())
        .arg("blacklist")
        .assert()
        .success()
        .stdout(predicate::str::contains("Spam Telecom"))
        .stdout(predicate::str::contains("Alice").not());

    blockr(home.path())
        .args(["contacts", "list", "--search", "ali"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Alice"))
        .stdout(predicate::str::contains("Spam Telecom").not());

    blockr(home.path())
        .arg("stats")
        .assert()
        .success()
        .stdout(predicate::str::is_match(r"Blacklist\s+1").unwrap())
        .stdout(predicate::str::is_match(r"Contacts\s+2").unwrap());

    assert!(home.path().join("storage.json").exists());
}

#[test]
fn test_block_unknown_contact_fails() {
    let home = tempfile::tempdir().unwrap();
    blockr(home.path())
        .args(["block", "ghost"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Contact not found: ghost"));
}

#[test]
fn test_preferences_default_and_update() {
    let home = tempfile::tempdir().unwrap();

    blockr(home.path())
        .arg("prefs")
        .assert()
        .success()
        .stdout(predicate::str::is_match(r"theme\s+light").unwrap())
        .stdout(predicate::str::is_match(r"language\s+fr").unwrap());

    blockr(home.path())
        .args(["prefs", "set", "--theme", "dark", "--language", "en"])
        .assert()
        .success();

    blockr(home.path())
        .args(["prefs", "toggle-theme"])
        .assert()
        .success()
        .stdout(predicate::str::is_match(r"theme\s+light").unwrap())
        .stdout(predicate::str::is_match(r"language\s+en").unwrap());
}

#[test]
fn test_rules_add_and_query() {
    let home = tempfile::tempdir().unwrap();

    blockr(home.path())
        .args([
            "rules", "add", "Nuit", "--type", "block", "--start", "22:00", "--end", "07:00",
            "--days", "Lun,Mar",
        ])
        .assert()
        .success();

    blockr(home.path())
        .args(["rules", "active", "--day", "Lun", "--time", "23:30"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Nuit"));

    blockr(home.path())
        .args(["rules", "active", "--day", "Lun", "--time", "12:00"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No schedule rules found."));

    blockr(home.path())
        .args(["rules", "add", "Broken", "--start", "9h", "--end", "10:00"])
        .assert()
        .failure();
}

#[test]
fn test_clear_requires_confirmation() {
    let home = tempfile::tempdir().unwrap();
    blockr(home.path())
        .args(["contacts", "add", "Bob", "06"])
        .assert()
        .success();

    blockr(home.path()).arg("clear").assert().success();
    blockr(home.path())
        .arg("contacts")
        .assert()
        .stdout(predicate::str::contains("Bob"));

    blockr(home.path()).args(["clear", "--yes"]).assert().success();
    blockr(home.path())
        .arg("contacts")
        .assert()
        .success()
        .stdout(predicate::str::contains("No contacts found."));
}

#[test]
fn test_corrupt_contacts_warn_but_do_not_fail() {
    let home = tempfile::tempdir().unwrap();
    let storage = serde_json::json!({ "@BlockR_contacts": "definitely not json" });
    std::fs::write(home.path().join("storage.json"), storage.to_string()).unwrap();

    blockr(home.path())
        .arg("contacts")
        .assert()
        .success()
        .stdout(predicate::str::contains("No contacts found."))
        .stderr(predicate::str::contains("Warning:"));
}

#[test]
fn test_add_over_corrupt_contacts_warns() {
    let home = tempfile::tempdir().unwrap();
    let storage = serde_json::json!({ "@BlockR_contacts": "<<garbage>>" });
    std::fs::write(home.path().join("storage.json"), storage.to_string()).unwrap();

    blockr(home.path())
        .args(["contacts", "add", "Bob", "06"])
        .assert()
        .success()
        .stderr(predicate::str::contains("Warning:"));
}

#[test]
fn test_invalid_input_is_not_a_store_error() {
    let home = tempfile::tempdir().unwrap();
    blockr(home.path())
        .args(["contacts", "add", "  ", "06"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid input: Name cannot be empty"))
        .stderr(predicate::str::contains("Store error").not());
}

#[test]
fn test_config_set_and_get() {
    let home = tempfile::tempdir().unwrap();

    blockr(home.path())
        .args(["config", "storage_file", "alt.json"])
        .assert()
        .success();
    blockr(home.path())
        .args(["config", "storage_file"])
        .assert()
        .success()
        .stdout(predicate::str::contains("alt.json"));
    blockr(home.path())
        .args(["config", "bogus"])
        .assert()
        .failure();

    blockr(home.path())
        .args(["contacts", "add", "Bob", "06"])
        .assert()
        .success();
    assert!(home.path().join("alt.json").exists());
    assert!(!home.path().join("storage.json").exists());
}
