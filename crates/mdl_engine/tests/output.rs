use std::fs;

use mdl_engine::{ensure_output_dir, url_to_filename, MarkdownWriter, WriteOutcome};
use pretty_assertions::assert_eq;
use tempfile::TempDir;

#[test]
fn filename_strips_scheme_and_replaces_delimiters() {
    assert_eq!(url_to_filename("https://a.com/b?c=d"), "a.com_b_c_d.md");
    assert_eq!(
        url_to_filename("http://docs.example.com/guide/intro?x=1&y=2"),
        "docs.example.com_guide_intro_x_1_y_2.md"
    );
}

#[test]
fn filename_is_deterministic() {
    let url = "https://example.com/some/page?id=7";
    assert_eq!(url_to_filename(url), url_to_filename(url));
}

#[test]
fn distinct_paths_get_distinct_names() {
    assert_ne!(
        url_to_filename("https://a.com/b/c"),
        url_to_filename("https://a.com/b/d")
    );
}

#[test]
fn long_urls_are_truncated_with_hash_suffix() {
    let base = format!("https://example.com/{}", "segment/".repeat(60));
    let first = url_to_filename(&format!("{base}one"));
    let second = url_to_filename(&format!("{base}two"));

    assert!(first.len() < 255, "name too long: {}", first.len());
    assert!(first.ends_with(".md"));
    assert!(first.contains("--"));
    assert_ne!(first, second);
}

#[test]
fn truncation_respects_char_boundaries() {
    let url = format!("https://example.com/{}", "ü".repeat(150));
    let name = url_to_filename(&url);
    assert!(name.ends_with(".md"));
}

#[test]
fn writer_creates_file_named_from_url() {
    let temp = TempDir::new().unwrap();
    let writer = MarkdownWriter::new(temp.path().to_path_buf());

    let outcome = writer.write("https://a.com/b?c=d", "# Hello\n").unwrap();
    let expected = temp.path().join("a.com_b_c_d.md");
    assert_eq!(outcome, WriteOutcome::Written(expected.clone()));
    assert_eq!(fs::read_to_string(expected).unwrap(), "# Hello\n");
}

#[test]
fn writer_leaves_existing_file_untouched() {
    let temp = TempDir::new().unwrap();
    let existing = temp.path().join("a.com_page.md");
    fs::write(&existing, "original").unwrap();

    let writer = MarkdownWriter::new(temp.path().to_path_buf());
    assert!(writer.exists("https://a.com/page"));
    let outcome = writer.write("https://a.com/page", "replacement").unwrap();

    assert_eq!(outcome, WriteOutcome::Skipped(existing.clone()));
    assert_eq!(fs::read_to_string(existing).unwrap(), "original");
}

#[test]
fn creates_missing_output_dir() {
    let temp = TempDir::new().unwrap();
    let new_dir = temp.path().join("nested").join("out");
    assert!(!new_dir.exists());
    ensure_output_dir(&new_dir).unwrap();
    assert!(new_dir.is_dir());
}

#[test]
fn output_dir_that_is_a_file_is_rejected() {
    let temp = TempDir::new().unwrap();
    let file_path = temp.path().join("not_a_dir");
    fs::write(&file_path, "x").unwrap();

    assert!(ensure_output_dir(&file_path).is_err());
}

#[test]
fn write_into_missing_dir_fails_without_partial_file() {
    let temp = TempDir::new().unwrap();
    let missing = temp.path().join("gone");
    let writer = MarkdownWriter::new(missing.clone());

    assert!(writer.write("https://a.com/x", "data").is_err());
    assert!(!missing.exists());
}
