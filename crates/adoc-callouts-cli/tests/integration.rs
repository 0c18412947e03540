//! Integration tests for the adoc-callouts CLI
//!
//! These tests run the file-level commands against temporary directories.

use std::fs;
use std::path::PathBuf;

use adoc_callouts_cli::{check_paths, convert_paths, expand_paths, load_settings};
use adoc_callouts_core::{BlockStatus, Format, Settings};
use tempfile::TempDir;

const VALID: &str = "[source,yaml]
----
name: <app> <1>
----
<1> The app name.
";

const MISMATCHED: &str = "[source,yaml]
----
a: 1 <1>
b: 2 <2>
----
<1> Only one.
";

fn write(dir: &TempDir, name: &str, content: &str) -> PathBuf {
    let path = dir.path().join(name);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(&path, content).unwrap();
    path
}

#[test]
fn test_convert_rewrites_files() {
    let dir = TempDir::new().unwrap();
    let path = write(&dir, "guide.adoc", VALID);

    let outcomes = convert_paths(&[path.clone()], &Settings::default(), false).unwrap();

    assert_eq!(outcomes.len(), 1);
    assert_eq!(outcomes[0].conversions, 1);
    assert!(outcomes[0].written);
    assert!(outcomes[0].warnings.is_empty());

    let converted = fs::read_to_string(&path).unwrap();
    assert_eq!(
        converted,
        "[source,yaml]\n----\nname: <app>\n----\n\nwhere:\n\n`<app>`::\nThe app name.\n"
    );
}

#[test]
fn test_dry_run_leaves_files_alone() {
    let dir = TempDir::new().unwrap();
    let path = write(&dir, "guide.adoc", VALID);

    let outcomes = convert_paths(&[path.clone()], &Settings::default(), true).unwrap();

    assert_eq!(outcomes[0].conversions, 1);
    assert!(!outcomes[0].written);
    assert_eq!(fs::read_to_string(&path).unwrap(), VALID);
}

#[test]
fn test_directory_expansion_and_warnings() {
    let dir = TempDir::new().unwrap();
    write(&dir, "a.adoc", VALID);
    write(&dir, "nested/b.adoc", MISMATCHED);
    write(&dir, "notes.txt", VALID);

    let outcomes =
        convert_paths(&[dir.path().to_path_buf()], &Settings::default(), false).unwrap();

    assert_eq!(outcomes.len(), 2);
    let mismatched = outcomes
        .iter()
        .find(|o| o.path.ends_with("nested/b.adoc"))
        .unwrap();
    assert_eq!(mismatched.conversions, 0);
    assert!(!mismatched.written);
    assert_eq!(mismatched.warnings.len(), 1);
    assert_eq!(mismatched.warnings[0].code(), "CALLOUT001");
    assert!(mismatched.warnings[0]
        .file_hint()
        .unwrap()
        .ends_with("b.adoc"));

    assert_eq!(
        fs::read_to_string(dir.path().join("notes.txt")).unwrap(),
        VALID
    );
    assert_eq!(
        fs::read_to_string(dir.path().join("nested/b.adoc")).unwrap(),
        MISMATCHED
    );
}

#[test]
fn test_glob_patterns() {
    let dir = TempDir::new().unwrap();
    write(&dir, "one.adoc", VALID);
    write(&dir, "two.adoc", VALID);
    write(&dir, "three.md", VALID);

    let pattern = dir.path().join("*.adoc");
    let files = expand_paths(&[pattern]).unwrap();
    assert_eq!(files.len(), 2);
    assert!(files.windows(2).all(|w| w[0] < w[1]));

    let missing = dir.path().join("*.nothing");
    assert!(expand_paths(&[missing]).is_err());
}

#[test]
fn test_duplicate_paths_processed_once() {
    let dir = TempDir::new().unwrap();
    let path = write(&dir, "guide.adoc", VALID);

    let files = expand_paths(&[path.clone(), dir.path().to_path_buf()]).unwrap();
    assert_eq!(files, vec![path]);
}

#[test]
fn test_settings_file_drives_format() {
    let dir = TempDir::new().unwrap();
    let doc = write(&dir, "guide.adoc", VALID);
    let config = write(
        &dir,
        "adoc-callouts.toml",
        "[convert]\nformat = \"comments\"\n",
    );

    let settings = load_settings(Some(&config)).unwrap();
    assert_eq!(settings.convert.format, Format::Comments);

    convert_paths(&[doc.clone()], &settings, false).unwrap();
    assert_eq!(
        fs::read_to_string(&doc).unwrap(),
        "[source,yaml]\n----\nname: <app> # The app name.\n----\n"
    );
}

#[test]
fn test_invalid_settings_file() {
    let dir = TempDir::new().unwrap();
    let config = write(&dir, "bad.toml", "[convert]\nmax_comment_length = 0\n");
    let err = load_settings(Some(&config)).unwrap_err();
    assert!(format!("{:#}", err).contains("max_comment_length"));

    assert!(load_settings(Some(&dir.path().join("missing.toml"))).is_err());
}

#[test]
fn test_check_reports_without_writing() {
    let dir = TempDir::new().unwrap();
    let valid = write(&dir, "a.adoc", VALID);
    let mismatched = write(&dir, "b.adoc", MISMATCHED);

    let reports = check_paths(&[valid.clone(), mismatched], &Settings::default()).unwrap();

    assert_eq!(reports.len(), 2);
    assert_eq!(reports[0].blocks[0].status, BlockStatus::Convertible);
    assert_eq!(reports[0].blocked(), 0);
    assert_eq!(reports[1].blocks[0].status, BlockStatus::Mismatch);
    assert_eq!(reports[1].blocked(), 1);
    assert_eq!(fs::read_to_string(&valid).unwrap(), VALID);

    let json = serde_json::to_value(&reports).unwrap();
    assert_eq!(json[1]["blocks"][0]["status"], "mismatch");
    assert_eq!(json[0]["blocks"][0]["explanation_shape"], "list");
    assert_eq!(json[0]["blocks"][0]["line_range"]["first"], 1);
}
