//! Command-line option groups for edgetree.
//!
//! Each group is a clap `Args` struct flattened into the binary's parser, so
//! tests and embedders can build the same options without going through argv.

use clap::Args;

use crate::output::OutputFormat;

/// Where records come from. Exactly one source kind is used per run.
#[derive(Args, Debug, Clone, Default)]
pub struct InputOptions {
    /// JSON files to load (repeatable, concatenated in the given order)
    #[arg(
        short = 'f',
        long = "file",
        value_name = "FILE",
        num_args = 1..,
        action = clap::ArgAction::Append
    )]
    pub files: Vec<String>,

    /// Directories to scan recursively for `*.json` files (repeatable)
    #[arg(
        short = 'd',
        long = "dir",
        value_name = "DIR",
        num_args = 1..,
        action = clap::ArgAction::Append
    )]
    pub dirs: Vec<String>,

    /// Inline JSON array text
    #[arg(long, value_name = "JSON", conflicts_with_all = ["files", "dirs", "stdin"])]
    pub text: Option<String>,

    /// Read a JSON array from standard input
    #[arg(long, conflicts_with_all = ["files", "dirs"])]
    pub stdin: bool,
}

/// How the hierarchy is rendered.
#[derive(Args, Debug, Clone, Default)]
pub struct RenderOptions {
    /// Output format (default: json)
    #[arg(long, value_enum)]
    pub format: Option<OutputFormat>,

    /// Attribute to show next to each node (repeatable)
    #[arg(long = "show", value_name = "ATTR", action = clap::ArgAction::Append)]
    pub show: Vec<String>,

    /// Show every string attribute found on the roots
    #[arg(long = "show-all")]
    pub show_all: bool,

    /// Stop expanding text views below this depth
    #[arg(long = "max-depth", value_name = "N")]
    pub max_depth: Option<usize>,

    /// DOT layout direction: TB or LR
    #[arg(long, value_name = "DIR")]
    pub rankdir: Option<String>,

    /// Write JSON on one line instead of indented
    #[arg(long)]
    pub minify: bool,
}

/// Options for controlling processing behavior.
#[derive(Args, Debug, Clone, Default)]
pub struct ProcessingOptions {
    /// Load input files in parallel (output order is unchanged).
    #[arg(long)]
    pub parallel: bool,
}

impl InputOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_files<I, S>(mut self, files: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.files.extend(files.into_iter().map(Into::into));
        self
    }

    pub fn with_dirs<I, S>(mut self, dirs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.dirs.extend(dirs.into_iter().map(Into::into));
        self
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty() && self.dirs.is_empty() && self.text.is_none() && !self.stdin
    }
}

impl RenderOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_format(mut self, format: OutputFormat) -> Self {
        self.format = Some(format);
        self
    }

    pub fn with_show(mut self, attr: impl Into<String>) -> Self {
        self.show.push(attr.into());
        self
    }

    pub fn with_show_all(mut self, show_all: bool) -> Self {
        self.show_all = show_all;
        self
    }

    pub fn with_max_depth(mut self, depth: Option<usize>) -> Self {
        self.max_depth = depth;
        self
    }

    pub fn with_rankdir(mut self, rankdir: impl Into<String>) -> Self {
        self.rankdir = Some(rankdir.into());
        self
    }

    pub fn with_minify(mut self, minify: bool) -> Self {
        self.minify = minify;
        self
    }
}

impl ProcessingOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }
}
