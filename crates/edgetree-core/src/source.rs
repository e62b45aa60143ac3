//! Input boundary: turning raw text and files into records.
//!
//! Failures are reported with these kinds:
//! - `ParseFailed`: the text is not valid JSON
//! - `InvalidShape`: the JSON is not an array
//! - `EmptyInput`: the text is blank, or a pasted array is empty
//! - `NoValidData`: every file failed; the message lists each failure
//!
//! When only some files fail, the others are still used and the failures are
//! returned as warnings in the [`LoadReport`].

use std::fs;
use std::io;
use std::path::Path;
use std::time::Instant;

use edgetree_error::{Error, ErrorKind, Result};
use rayon::prelude::*;
use serde_json::Value;
use tracing::{debug, info, warn};

/// Parse pasted or piped text into records.
///
/// Unlike files, a pasted empty array is rejected.
pub fn parse_text(text: &str) -> Result<Vec<Value>> {
    let value: Value = serde_json::from_str(text).map_err(|err| {
        Error::parse_failed("invalid JSON")
            .with_operation("source::parse_text")
            .set_source(err)
    })?;

    let Value::Array(records) = value else {
        return Err(Error::invalid_shape("input must be a JSON array")
            .with_operation("source::parse_text"));
    };

    if records.is_empty() {
        return Err(Error::empty_input("array is empty").with_operation("source::parse_text"));
    }

    Ok(records)
}

/// Records gathered from a set of files.
#[derive(Debug, Default)]
pub struct LoadReport {
    /// Records of every accepted file, concatenated in file order.
    pub records: Vec<Value>,
    /// Every file that was attempted, in order.
    pub loaded: Vec<String>,
    /// Per-file failures for files that were skipped.
    pub warnings: Vec<Error>,
}

impl LoadReport {
    /// True when some files were skipped but usable records remain.
    pub fn is_partial(&self) -> bool {
        !self.warnings.is_empty()
    }

    /// All warnings joined into one message, if there are any.
    pub fn warning_message(&self) -> Option<String> {
        if self.warnings.is_empty() {
            return None;
        }
        let messages: Vec<&str> = self.warnings.iter().map(Error::message).collect();
        Some(messages.join("; "))
    }
}

/// Load and concatenate the JSON arrays stored in `paths`.
///
/// With `parallel`, files are read and parsed on the rayon pool; records are
/// still concatenated in the order of `paths`.
pub fn load_files<P>(paths: &[P], parallel: bool) -> Result<LoadReport>
where
    P: AsRef<Path> + Sync,
{
    let start = Instant::now();

    let results: Vec<Result<Vec<Value>>> = if parallel {
        paths.par_iter().map(|p| load_file(p.as_ref())).collect()
    } else {
        paths.iter().map(|p| load_file(p.as_ref())).collect()
    };

    let mut report = LoadReport::default();
    for (path, result) in paths.iter().zip(results) {
        report.loaded.push(display_name(path.as_ref()));
        match result {
            Ok(mut records) => {
                debug!(file = %path.as_ref().display(), records = records.len(), "loaded file");
                report.records.append(&mut records);
            }
            Err(err) => {
                warn!(file = %path.as_ref().display(), error = %err.message(), "skipping file");
                report.warnings.push(err);
            }
        }
    }

    if report.records.is_empty() {
        let failures = report.warnings.iter().map(|e| e.message().to_string());
        return Err(Error::no_valid_data(failures.collect::<Vec<_>>())
            .with_operation("source::load_files"));
    }

    info!(
        "Loading {} files: {:.2}s ({} records, {} skipped)",
        paths.len(),
        start.elapsed().as_secs_f64(),
        report.records.len(),
        report.warnings.len()
    );

    Ok(report)
}

fn load_file(path: &Path) -> Result<Vec<Value>> {
    let name = display_name(path);

    let text = fs::read_to_string(path).map_err(|err| {
        let kind = match err.kind() {
            io::ErrorKind::NotFound => ErrorKind::FileNotFound,
            io::ErrorKind::PermissionDenied => ErrorKind::PermissionDenied,
            _ => ErrorKind::IoFailed,
        };
        Error::new(kind, format!("file '{}' could not be read: {}", name, err))
            .with_operation("source::load_file")
            .with_context("file", name.clone())
            .set_source(err)
    })?;

    if text.trim().is_empty() {
        return Err(Error::empty_input(format!("file '{}' is empty", name))
            .with_operation("source::load_file")
            .with_context("file", name));
    }

    let value: Value = serde_json::from_str(&text).map_err(|err| {
        Error::parse_failed(format!("file '{}' is not valid JSON", name))
            .with_operation("source::load_file")
            .with_context("file", name.clone())
            .set_source(err)
    })?;

    match value {
        Value::Array(records) => Ok(records),
        _ => Err(Error::invalid_shape(format!(
            "file '{}' does not contain a JSON array",
            name
        ))
        .with_operation("source::load_file")
        .with_context("file", name)),
    }
}

fn display_name(path: &Path) -> String {
    path.display().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_text_accepts_arrays() {
        let records = parse_text(r#"[{"id": 1}, {"id": 2}]"#).unwrap();
        assert_eq!(records.len(), 2);
    }

    #[test]
    fn parse_text_rejects_bad_input() {
        let err = parse_text("{not json").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ParseFailed);
        assert_eq!(err.message(), "invalid JSON");
        assert!(err.source_ref().is_some());

        let err = parse_text(r#"{"id": 1}"#).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidShape);
        assert_eq!(err.message(), "input must be a JSON array");

        let err = parse_text("  [] ").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::EmptyInput);
        assert_eq!(err.message(), "array is empty");
    }

    #[test]
    fn warning_message_joins_failures() {
        let report = LoadReport {
            records: vec![Value::Null],
            loaded: vec!["a".into(), "b".into()],
            warnings: vec![Error::empty_input("file 'b' is empty")],
        };
        assert!(report.is_partial());
        assert_eq!(report.warning_message().as_deref(), Some("file 'b' is empty"));
        assert_eq!(LoadReport::default().warning_message(), None);
    }
}
