//! The main Error type for edgetree.

use crate::ErrorKind;
use std::fmt;

/// Unified error type for all edgetree operations.
pub struct Error {
    kind: ErrorKind,
    message: String,
    operation: &'static str,
    context: Vec<(&'static str, String)>,
    source: Option<Box<dyn std::error::Error + Send + Sync + 'static>>,
}

impl Error {
    /// Create a new error with the given kind and message.
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            operation: "",
            context: Vec::new(),
            source: None,
        }
    }

    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// Get the operation that caused this error
    pub fn operation(&self) -> &'static str {
        self.operation
    }

    /// Get the context key-value pairs
    pub fn context(&self) -> &[(&'static str, String)] {
        &self.context
    }

    /// Look up the first context value recorded under `key`.
    pub fn context_value(&self, key: &str) -> Option<&str> {
        self.context
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Get the source error (if any).
    pub fn source_ref(&self) -> Option<&(dyn std::error::Error + Send + Sync + 'static)> {
        self.source.as_ref().map(|e| e.as_ref())
    }

    /// Set the operation that caused this error.
    ///
    /// If an operation was already set, the previous one is moved to context
    /// as "called" to preserve the call chain.
    pub fn with_operation(mut self, operation: &'static str) -> Self {
        if !self.operation.is_empty() {
            self.context.push(("called", self.operation.to_string()));
        }
        self.operation = operation;
        self
    }

    pub fn with_context(mut self, key: &'static str, value: impl Into<String>) -> Self {
        self.context.push((key, value.into()));
        self
    }

    /// Set the source error.
    ///
    /// # Panics (debug only)
    /// Panics in debug mode if source was already set.
    pub fn set_source<E>(mut self, source: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        debug_assert!(self.source.is_none(), "source error already set");
        self.source = Some(Box::new(source));
        self
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.kind)?;
        if !self.operation.is_empty() {
            write!(f, " at {}", self.operation)?;
        }

        if !self.context.is_empty() {
            write!(f, ", context {{ ")?;
            for (i, (key, value)) in self.context.iter().enumerate() {
                if i > 0 {
                    write!(f, ", ")?;
                }
                write!(f, "{}: {}", key, value)?;
            }
            write!(f, " }}")?;
        }

        if !self.message.is_empty() {
            write!(f, " => {}", self.message)?;
        }

        Ok(())
    }
}

impl fmt::Debug for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{} at {}", self.kind, self.operation)?;

        if !self.message.is_empty() {
            writeln!(f)?;
            writeln!(f, "    Message: {}", self.message)?;
        }

        if !self.context.is_empty() {
            writeln!(f)?;
            writeln!(f, "    Context:")?;
            for (key, value) in &self.context {
                writeln!(f, "        {}: {}", key, value)?;
            }
        }

        if let Some(source) = &self.source {
            writeln!(f)?;
            writeln!(f, "    Source: {:?}", source)?;
        }

        Ok(())
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_ref()
            .map(|e| e.as_ref() as &(dyn std::error::Error + 'static))
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        let kind = match err.kind() {
            std::io::ErrorKind::NotFound => ErrorKind::FileNotFound,
            std::io::ErrorKind::PermissionDenied => ErrorKind::PermissionDenied,
            _ => ErrorKind::IoFailed,
        };
        Error::new(kind, err.to_string())
            .with_operation("io")
            .set_source(err)
    }
}

impl Error {
    pub fn unexpected(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Unexpected, message)
    }

    pub fn parse_failed(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::ParseFailed, message)
    }

    pub fn invalid_shape(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::InvalidShape, message)
    }

    pub fn empty_input(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::EmptyInput, message)
    }

    /// Create a NoValidData error that carries every collected failure message.
    ///
    /// The messages are joined into the error message and also kept as
    /// individual `failure` context entries.
    pub fn no_valid_data<I, S>(failures: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let failures: Vec<String> = failures.into_iter().map(Into::into).collect();
        let message = if failures.is_empty() {
            "no valid data found in input files".to_string()
        } else {
            failures.join("; ")
        };
        let mut err = Self::new(ErrorKind::NoValidData, message);
        for failure in failures {
            err = err.with_context("failure", failure);
        }
        err
    }

    /// Create a CycleDetected error naming the node that closed the cycle.
    pub fn cycle_detected(node: impl Into<String>) -> Self {
        let node = node.into();
        Self::new(
            ErrorKind::CycleDetected,
            format!("node '{}' is reachable from itself", node),
        )
        .with_context("node", node)
    }

    pub fn file_not_found(path: impl Into<String>) -> Self {
        let path = path.into();
        Self::new(
            ErrorKind::FileNotFound,
            format!("file '{}' not found", path),
        )
        .with_context("path", path)
    }

    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::InvalidArgument, message)
    }

    pub fn config_invalid(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::ConfigInvalid, message)
    }

    pub fn serialization_failed(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::SerializationFailed, message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_creation() {
        let err = Error::new(ErrorKind::ParseFailed, "unexpected token");
        assert_eq!(err.kind(), ErrorKind::ParseFailed);
        assert_eq!(err.message(), "unexpected token");
        assert_eq!(err.operation(), "");
    }

    #[test]
    fn test_error_with_context() {
        let err = Error::invalid_shape("not an array")
            .with_operation("source::parse_text")
            .with_context("file", "nodes.json");

        assert_eq!(err.operation(), "source::parse_text");
        assert_eq!(err.context_value("file"), Some("nodes.json"));
        assert_eq!(err.context_value("line"), None);
    }

    #[test]
    fn test_operation_chaining() {
        let err = Error::parse_failed("failed")
            .with_operation("source::parse_text")
            .with_operation("source::load_files");

        assert_eq!(err.operation(), "source::load_files");
        assert_eq!(
            err.context()[0],
            ("called", "source::parse_text".to_string())
        );
    }

    #[test]
    fn test_io_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let err: Error = io_err.into();
        assert_eq!(err.kind(), ErrorKind::FileNotFound);
        assert!(err.source_ref().is_some());

        let io_err = std::io::Error::other("disk hiccup");
        let err: Error = io_err.into();
        assert_eq!(err.kind(), ErrorKind::IoFailed);
        assert_eq!(err.operation(), "io");
    }

    #[test]
    fn test_no_valid_data_joins_failures() {
        let err = Error::no_valid_data(["file 'a.json' is empty", "file 'b.json' is not valid JSON"]);
        assert_eq!(err.kind(), ErrorKind::NoValidData);
        assert_eq!(
            err.message(),
            "file 'a.json' is empty; file 'b.json' is not valid JSON"
        );
        assert_eq!(err.context().len(), 2);

        let err = Error::no_valid_data(Vec::<String>::new());
        assert_eq!(err.message(), "no valid data found in input files");
    }

    #[test]
    fn test_display() {
        let err = Error::cycle_detected("a").with_operation("walk::to_json");
        let display = format!("{}", err);
        assert!(display.contains("CycleDetected"));
        assert!(display.starts_with("CycleDetected at walk::to_json"));
        assert!(display.contains("walk::to_json"));
        assert!(display.contains("node: a"));
    }
}
