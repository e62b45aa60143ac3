use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;

use edgetree_dot::RankDir;

use crate::EdgetreeOptions;
use crate::options::{InputOptions, ProcessingOptions, RenderOptions};
use crate::output::OutputFormat;

/// Defaults loaded from a TOML file. Command-line flags take precedence.
///
/// ```toml
/// format = "tree"
/// max_depth = 8
/// show = ["type", "owner"]
/// minify = true
/// parallel = true
///
/// [dot]
/// title = "services"
/// rankdir = "LR"
/// ```
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default)]
    pub format: Option<OutputFormat>,
    #[serde(default)]
    pub max_depth: Option<usize>,
    #[serde(default)]
    pub show: Vec<String>,
    #[serde(default)]
    pub show_all: bool,
    #[serde(default)]
    pub minify: bool,
    #[serde(default)]
    pub parallel: bool,
    #[serde(default)]
    pub dot: DotConfig,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DotConfig {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub rankdir: Option<String>,
}

impl Config {
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)
            .with_context(|| format!("failed to read config {}", path.display()))?;
        let config: Config =
            toml::from_str(&text).with_context(|| format!("invalid TOML in {}", path.display()))?;
        Ok(config)
    }
}

impl EdgetreeOptions {
    /// Merge command-line groups over an optional config file.
    ///
    /// Scalars from the command line replace config values; `show` lists are
    /// combined; boolean switches are on if either side turns them on.
    pub fn resolve(
        input: InputOptions,
        render: RenderOptions,
        processing: ProcessingOptions,
        config: Option<&Config>,
    ) -> Result<Self> {
        let defaults = Config::default();
        let config = config.unwrap_or(&defaults);

        let mut show = config.show.clone();
        for attr in render.show {
            if !show.contains(&attr) {
                show.push(attr);
            }
        }

        let rankdir = match render.rankdir.as_deref().or(config.dot.rankdir.as_deref()) {
            Some(value) => value
                .parse::<RankDir>()
                .with_context(|| format!("invalid rankdir '{value}'"))?,
            None => RankDir::default(),
        };

        Ok(Self {
            input,
            format: render.format.or(config.format).unwrap_or_default(),
            show,
            show_all: render.show_all || config.show_all,
            max_depth: render.max_depth.or(config.max_depth),
            minify: render.minify || config.minify,
            rankdir,
            title: config
                .dot
                .title
                .clone()
                .unwrap_or_else(|| EdgetreeOptions::DEFAULT_TITLE.to_string()),
            parallel: processing.parallel || config.parallel,
        })
    }
}
