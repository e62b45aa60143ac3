//! Error kinds for edgetree operations

use strum_macros::{Display, IntoStaticStr};

/// The kind of error that occurred.
///
/// Callers match on the kind to decide how to report a failure. Input
/// problems are shown to the user as a plain message; anything else is
/// reported with its full context.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, IntoStaticStr, Display)]
#[non_exhaustive]
pub enum ErrorKind {
    // =========================================================================
    // General errors
    // =========================================================================
    /// An unexpected error occurred - catch-all for unhandled cases
    Unexpected,

    /// Invalid configuration file or values
    ConfigInvalid,

    /// Invalid argument passed to a function or command
    InvalidArgument,

    // =========================================================================
    // Input errors
    // =========================================================================
    /// Raw text is not valid JSON
    ParseFailed,

    /// Parsed JSON is not an array of records
    InvalidShape,

    /// Input text or array contains nothing
    EmptyInput,

    /// Every supplied input failed, no records are left to transform
    NoValidData,

    // =========================================================================
    // Traversal errors
    // =========================================================================
    /// A node was reached again through its own descendants
    CycleDetected,

    // =========================================================================
    // File/IO errors
    // =========================================================================
    /// File not found
    FileNotFound,

    /// Permission denied
    PermissionDenied,

    /// IO operation failed
    IoFailed,

    // =========================================================================
    // Serialization errors
    // =========================================================================
    /// Serialization failed
    SerializationFailed,
}

impl ErrorKind {
    /// Returns the error kind as a static string
    pub fn as_str(&self) -> &'static str {
        (*self).into()
    }

    /// Whether the error describes bad user input rather than a system failure.
    pub fn is_input_error(&self) -> bool {
        matches!(
            self,
            ErrorKind::InvalidArgument
                | ErrorKind::ParseFailed
                | ErrorKind::InvalidShape
                | ErrorKind::EmptyInput
                | ErrorKind::NoValidData
                | ErrorKind::CycleDetected
        )
    }
}
