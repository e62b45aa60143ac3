//! edgetree command-line interface.
//!
pub mod config;
pub mod discovery;
pub mod options;
pub mod output;
pub mod pipeline;

use edgetree_core::{Error, Result};
use edgetree_dot::RankDir;

pub use config::Config;
pub use options::{InputOptions, ProcessingOptions, RenderOptions};
pub use output::OutputFormat;
pub use pipeline::{load_input, process_records};

/// Resolved options for one edgetree run.
#[derive(Debug, Clone)]
pub struct EdgetreeOptions {
    pub input: InputOptions,
    pub format: OutputFormat,
    pub show: Vec<String>,
    pub show_all: bool,
    pub max_depth: Option<usize>,
    /// Compact JSON instead of indented
    pub minify: bool,
    pub rankdir: RankDir,
    pub title: String,
    pub parallel: bool,
}

impl EdgetreeOptions {
    pub const DEFAULT_TITLE: &'static str = "hierarchy";

    pub fn new(input: InputOptions) -> Self {
        Self {
            input,
            format: OutputFormat::default(),
            show: Vec::new(),
            show_all: false,
            max_depth: None,
            minify: false,
            rankdir: RankDir::default(),
            title: Self::DEFAULT_TITLE.to_string(),
            parallel: false,
        }
    }

    pub fn with_format(mut self, format: OutputFormat) -> Self {
        self.format = format;
        self
    }
}

/// Rendered output and the files skipped on the way.
#[derive(Debug)]
pub struct RunOutput {
    pub rendered: String,
    pub warnings: Vec<Error>,
}

impl RunOutput {
    /// All warnings joined with `"; "`, or `None` when every input loaded.
    pub fn warning_message(&self) -> Option<String> {
        if self.warnings.is_empty() {
            return None;
        }
        let messages: Vec<&str> = self.warnings.iter().map(|w| w.message()).collect();
        Some(messages.join("; "))
    }
}

/// Process exit status for a failed run: 2 for bad input, 1 otherwise.
pub fn failure_exit_code(err: &Error) -> u8 {
    if err.kind().is_input_error() { 2 } else { 1 }
}

/// What the user sees when a run fails.
///
/// Input problems are reported by message alone; other failures keep the
/// kind, operation and context so they can be diagnosed.
pub fn describe_failure(err: &Error) -> String {
    if err.kind().is_input_error() {
        err.message().to_string()
    } else {
        err.to_string()
    }
}

/// Main entry point
pub fn run_main(opts: &EdgetreeOptions) -> Result<RunOutput> {
    if opts.input.is_empty() {
        return Err(Error::invalid_argument(
            "no input given; use --file, --dir, --text or --stdin",
        )
        .with_operation("run_main"));
    }

    let loaded = load_input(opts)?;
    process_records(opts, loaded)
}
