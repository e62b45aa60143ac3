use std::fs;
use std::path::PathBuf;

use edgetree_core::{ErrorKind, load_files, transform};
use pretty_assertions::assert_eq;
use tempfile::TempDir;

fn write_files(files: &[(&str, &str)]) -> (TempDir, Vec<PathBuf>) {
    let dir = tempfile::tempdir().expect("tempdir");
    let paths = files
        .iter()
        .map(|(name, content)| {
            let path = dir.path().join(name);
            fs::write(&path, content).expect("write fixture");
            path
        })
        .collect();
    (dir, paths)
}

#[test]
fn files_are_concatenated_in_order() {
    let (_dir, paths) = write_files(&[
        ("b.json", r#"[{"id": "child"}]"#),
        ("a.json", r#"[{"id": "root", "edges": [{"targetid": "child"}]}]"#),
    ]);

    let report = load_files(&paths, false).unwrap();
    assert!(!report.is_partial());
    assert_eq!(report.records.len(), 2);
    assert_eq!(report.records[0]["id"], "child");
    assert_eq!(report.records[1]["id"], "root");

    let hierarchy = transform(&report.records);
    assert_eq!(hierarchy.root_ids().len(), 1);
}

#[test]
fn parallel_loading_preserves_order() {
    let files: Vec<(String, String)> = (0..16)
        .map(|i| (format!("f{i:02}.json"), format!(r#"[{{"id": {i}}}]"#)))
        .collect();
    let borrowed: Vec<(&str, &str)> = files
        .iter()
        .map(|(n, c)| (n.as_str(), c.as_str()))
        .collect();
    let (_dir, paths) = write_files(&borrowed);

    let report = load_files(&paths, true).unwrap();
    let ids: Vec<i64> = report
        .records
        .iter()
        .filter_map(|r| r["id"].as_i64())
        .collect();
    assert_eq!(ids, (0..16).collect::<Vec<i64>>());
}

#[test]
fn bad_files_become_warnings() {
    let (dir, mut paths) = write_files(&[
        ("good.json", r#"[{"id": 1}]"#),
        ("empty.json", "   \n"),
        ("broken.json", "[{"),
        ("object.json", r#"{"id": 2}"#),
        ("nothing.json", "[]"),
    ]);
    paths.push(dir.path().join("absent.json"));

    let report = load_files(&paths, false).unwrap();
    assert_eq!(report.records.len(), 1);
    assert_eq!(report.loaded.len(), 6);

    let kinds: Vec<ErrorKind> = report.warnings.iter().map(|w| w.kind()).collect();
    assert_eq!(
        kinds,
        [
            ErrorKind::EmptyInput,
            ErrorKind::ParseFailed,
            ErrorKind::InvalidShape,
            ErrorKind::FileNotFound,
        ]
    );

    let message = report.warning_message().unwrap();
    assert!(message.contains("empty.json' is empty"), "{message}");
    assert!(message.contains("broken.json' is not valid JSON"), "{message}");
    assert!(
        message.contains("object.json' does not contain a JSON array"),
        "{message}"
    );
}

#[test]
fn all_files_failing_is_no_valid_data() {
    let (_dir, paths) = write_files(&[("empty.json", ""), ("broken.json", "nope")]);

    let err = load_files(&paths, false).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NoValidData);
    assert!(err.message().contains("empty.json' is empty"));
    assert!(err.message().contains("broken.json' is not valid JSON"));
    assert_eq!(err.context().iter().filter(|(k, _)| *k == "failure").count(), 2);
}

#[test]
fn only_empty_arrays_is_no_valid_data() {
    let (_dir, paths) = write_files(&[("a.json", "[]"), ("b.json", "[ ]")]);

    let err = load_files(&paths, false).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NoValidData);
    assert_eq!(err.message(), "no valid data found in input files");
}
