//! Input file discovery for edgetree.

use std::collections::HashSet;
use std::path::Path;
use std::time::Instant;

use ignore::WalkBuilder;
use tracing::{debug, info};

use edgetree_core::{Error, ErrorKind, Result};

use crate::options::InputOptions;

/// Directories to skip during directory scans.
fn should_skip_dir(name: &str) -> bool {
    matches!(
        name,
        // Build output directories
        "target"
            | "build"
            | "dist"
            | "out"
            // Vendor/dependency directories
            | "vendor"
            | "node_modules"
            | "third_party"
    )
}

fn is_json_file(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"))
}

/// Collect the files to load, explicit files first.
///
/// Explicit `--file` paths are kept as given, repeats included, and even if
/// they do not exist so loading can report them. Each directory is walked in
/// file-name order and contributes its `*.json` files; a walked file is
/// skipped if it was already listed or found by an earlier directory.
pub fn discover_files(input: &InputOptions) -> Result<Vec<String>> {
    let discovery_start = Instant::now();

    let mut files = input.files.clone();
    let mut seen: HashSet<String> = files.iter().cloned().collect();

    for dir in &input.dirs {
        if !Path::new(dir).is_dir() {
            return Err(Error::file_not_found(dir.clone())
                .with_operation("discovery::discover_files")
                .with_context("reason", "not a directory"));
        }

        let mut builder = WalkBuilder::new(dir);
        builder
            .standard_filters(true)
            .follow_links(false)
            .sort_by_file_name(|a, b| a.cmp(b))
            .filter_entry(|entry| {
                // Always include root
                if entry.depth() == 0 {
                    return true;
                }
                let Some(file_type) = entry.file_type() else {
                    return true;
                };
                if !file_type.is_dir() {
                    return true;
                }
                let Some(name) = entry.file_name().to_str() else {
                    return true;
                };
                !should_skip_dir(&name.to_ascii_lowercase())
            });

        for entry in builder.build() {
            let entry = entry.map_err(|err| {
                Error::new(
                    ErrorKind::IoFailed,
                    format!("failed to walk directory {dir}: {err}"),
                )
                .with_operation("discovery::discover_files")
                .set_source(err)
            })?;

            if !entry.file_type().is_some_and(|ft| ft.is_file()) {
                continue;
            }
            if is_json_file(entry.path()) {
                let path = entry.path().to_string_lossy().into_owned();
                if seen.insert(path.clone()) {
                    files.push(path);
                } else {
                    debug!(path = %path, "duplicate input skipped");
                }
            }
        }
    }

    info!(
        "File discovery: {:.2}s ({} files)",
        discovery_start.elapsed().as_secs_f64(),
        files.len()
    );

    if files.is_empty() {
        return Err(Error::invalid_argument(
            "no input files found; check that the directory contains .json files",
        )
        .with_operation("discovery::discover_files"));
    }

    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn walks_directories_in_name_order() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("b.json"), "[]").unwrap();
        fs::write(dir.path().join("a.JSON"), "[]").unwrap();
        fs::write(dir.path().join("notes.txt"), "x").unwrap();
        fs::create_dir(dir.path().join("node_modules")).unwrap();
        fs::write(dir.path().join("node_modules/dep.json"), "[]").unwrap();
        fs::create_dir(dir.path().join("nested")).unwrap();
        fs::write(dir.path().join("nested/c.json"), "[]").unwrap();

        let input = InputOptions::new().with_dirs([dir.path().to_string_lossy()]);
        let files = discover_files(&input).unwrap();
        let names: Vec<String> = files
            .iter()
            .map(|f| {
                Path::new(f)
                    .strip_prefix(dir.path())
                    .unwrap()
                    .to_string_lossy()
                    .replace('\\', "/")
            })
            .collect();
        assert_eq!(names, ["a.JSON", "b.json", "nested/c.json"]);
    }

    #[test]
    fn explicit_files_are_kept_and_scans_dedup() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("x.json");
        fs::write(&path, "[]").unwrap();
        let path = path.to_string_lossy().into_owned();

        let input = InputOptions::new()
            .with_files([path.clone(), path.clone()])
            .with_dirs([dir.path().to_string_lossy(), dir.path().to_string_lossy()]);
        assert_eq!(discover_files(&input).unwrap(), [path.clone(), path]);
    }

    #[test]
    fn empty_directory_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let input = InputOptions::new().with_dirs([dir.path().to_string_lossy()]);
        let err = discover_files(&input).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidArgument);
    }
}
