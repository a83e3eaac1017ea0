use std::fs;

use php_code_scanner::scanner::FileScanError;
use php_code_scanner::{DirectoryScanner, FileScanner, ScanConfig, ScanError, UnbalancedPolicy};
use tempfile::TempDir;

fn project() -> TempDir {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("a.php"), "<?php namespace App; class A {}").unwrap();
    fs::create_dir(dir.path().join("sub")).unwrap();
    fs::write(
        dir.path().join("sub").join("b.php"),
        "<?php namespace App\\Sub; interface B {}",
    )
    .unwrap();
    fs::write(dir.path().join("notes.txt"), "class NotPhp {}").unwrap();
    fs::write(dir.path().join("empty.php"), "").unwrap();
    dir
}

#[test]
fn collects_php_files_recursively() {
    let dir = project();
    let mut scanner = DirectoryScanner::default();
    scanner.add_directory(dir.path());
    let paths = scanner.paths().unwrap();
    assert_eq!(paths.len(), 3);
    assert!(paths.iter().all(|path| path.extension().is_some_and(|ext| ext == "php")));
}

#[test]
fn index_answers_class_queries_across_files() {
    let dir = project();
    let index = DirectoryScanner::default()
        .add_directory(dir.path())
        .scan()
        .unwrap();
    assert_eq!(index.files().len(), 3);
    assert_eq!(index.class_names().unwrap(), vec!["App\\A", "App\\Sub\\B"]);
    assert!(index.has_class("app\\sub\\b").unwrap());
    assert!(!index.has_class("NotPhp").unwrap());

    let b = index.class("App\\Sub\\B").unwrap();
    assert_eq!(b.name().unwrap(), "App\\Sub\\B");
    assert!(b.is_interface().unwrap());

    let declaring = index.file_declaring("App\\Sub\\B").unwrap().unwrap();
    assert!(declaring.path().ends_with("sub/b.php"));

    assert_eq!(
        index.class("Missing").err(),
        Some(ScanError::NotFound {
            kind: "class",
            name: "Missing".to_string(),
        })
    );
}

#[test]
fn single_files_can_be_added() {
    let dir = project();
    let index = DirectoryScanner::default()
        .add_file(dir.path().join("a.php"))
        .scan()
        .unwrap();
    assert_eq!(index.class_names().unwrap(), vec!["App\\A"]);
}

#[test]
fn missing_file_is_an_io_error() {
    let dir = project();
    let error = DirectoryScanner::default()
        .add_file(dir.path().join("gone.php"))
        .scan()
        .err()
        .unwrap();
    assert!(matches!(error, FileScanError::Io { .. }));
    assert!(FileScanner::open(dir.path().join("gone.php")).is_err());
}

#[test]
fn file_scanner_reads_from_disk() {
    let dir = project();
    let file = FileScanner::open(dir.path().join("a.php")).unwrap();
    assert_eq!(file.scanner().class_names().unwrap(), vec!["App\\A"]);
    assert!(file.path().ends_with("a.php"));
}

#[test]
fn config_from_json_keeps_defaults_for_missing_keys() {
    let config = ScanConfig::from_json(r#"{ "unbalanced": "reject" }"#).unwrap();
    assert_eq!(config.unbalanced, UnbalancedPolicy::Reject);
    assert!(config.resolve_type_hints);
    assert_eq!(ScanConfig::from_json("{}").unwrap(), ScanConfig::default());
}

#[test]
fn config_file_errors_name_the_file() {
    let dir = tempfile::tempdir().unwrap();
    let good = dir.path().join("good.json");
    fs::write(&good, r#"{ "resolve_type_hints": false }"#).unwrap();
    assert!(!ScanConfig::load(&good).unwrap().resolve_type_hints);

    let bad = dir.path().join("bad.json");
    fs::write(&bad, "{ not json").unwrap();
    match ScanConfig::load(&bad) {
        Err(FileScanError::Config { path, .. }) => assert_eq!(path, bad),
        other => panic!("expected a config error, got {other:?}"),
    }
}
