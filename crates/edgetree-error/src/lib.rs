//! # edgetree-error
//!
//! Unified error handling for edgetree.
//!
//! - **ErrorKind**: what went wrong (e.g. ParseFailed, InvalidShape)
//! - **Context**: key/value pairs naming the file, operation and inputs involved
//! - **Source**: the wrapped lower-level error, if any
//!
//! ## Usage
//!
//! ```rust
//! use edgetree_error::{Error, ErrorKind};
//!
//! fn example() -> Result<(), Error> {
//!     Err(Error::new(ErrorKind::InvalidShape, "input must be a JSON array")
//!         .with_operation("source::parse_text")
//!         .with_context("file", "nodes.json"))
//! }
//! ```
//!
//! ## Principles
//!
//! - Library functions return `Result<T, edgetree_error::Error>`
//! - External errors are wrapped with `set_source(err)`
//! - An error is handled once; callers further up only append context

mod error;
mod kind;

pub use error::Error;
pub use kind::ErrorKind;

/// Result type alias using the edgetree Error
pub type Result<T> = std::result::Result<T, Error>;
