//! Output generation for every supported format.

use std::fmt;
use std::time::Instant;

use clap::ValueEnum;
use serde::Deserialize;
use tracing::info;

use edgetree_core::{
    DisplayContext, Hierarchy, PrintConfig, PrintFormat, Result, extract_string_keys,
    render_hierarchy_with_config, to_json_string,
};
use edgetree_dot::{DotOptions, render_dot};

use crate::EdgetreeOptions;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Nested JSON: `null`, one root object, or an array of roots
    #[default]
    Json,
    Tree,
    Compact,
    Flat,
    Dot,
    /// String attribute names available for display
    Keys,
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            OutputFormat::Json => "json",
            OutputFormat::Tree => "tree",
            OutputFormat::Compact => "compact",
            OutputFormat::Flat => "flat",
            OutputFormat::Dot => "dot",
            OutputFormat::Keys => "keys",
        };
        f.write_str(name)
    }
}

/// Build the visibility filter from `--show` and `--show-all`.
pub fn display_context(opts: &EdgetreeOptions, hierarchy: &Hierarchy<'_>) -> DisplayContext {
    let mut context = DisplayContext::with_visible(opts.show.iter().map(String::as_str));
    if opts.show_all {
        context.show_all(extract_string_keys(hierarchy));
    }
    context
}

/// Render a hierarchy in the requested format.
pub fn render_output(opts: &EdgetreeOptions, hierarchy: &Hierarchy<'_>) -> Result<String> {
    let render_start = Instant::now();

    let rendered = match opts.format {
        OutputFormat::Json => to_json_string(hierarchy, !opts.minify)?,
        OutputFormat::Tree | OutputFormat::Compact | OutputFormat::Flat => {
            let format = match opts.format {
                OutputFormat::Compact => PrintFormat::Compact,
                OutputFormat::Flat => PrintFormat::Flat,
                _ => PrintFormat::Tree,
            };
            let mut config = PrintConfig::new().with_format(format);
            if let Some(depth) = opts.max_depth {
                config = config.with_max_depth(depth);
            }
            let context = display_context(opts, hierarchy);
            render_hierarchy_with_config(hierarchy, &context, &config)?
        }
        OutputFormat::Dot => {
            let context = display_context(opts, hierarchy);
            let options = DotOptions {
                title: opts.title.clone(),
                rankdir: opts.rankdir,
                ..DotOptions::default()
            };
            render_dot(hierarchy, &context, &options)
        }
        OutputFormat::Keys => extract_string_keys(hierarchy).join("\n"),
    };

    info!(
        "Rendering {}: {:.2}s",
        opts.format,
        render_start.elapsed().as_secs_f64()
    );
    Ok(rendered)
}
