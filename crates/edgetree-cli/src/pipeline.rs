//! Core processing pipeline: load → transform → render.

use std::io::Read;
use std::time::Instant;

use serde_json::Value;
use tracing::{info, warn};

use edgetree_core::{Error, Result, load_files, parse_text, transform};

use crate::discovery::discover_files;
use crate::output::render_output;
use crate::{EdgetreeOptions, RunOutput};

/// Records plus the per-file problems that did not stop the run.
pub struct LoadedInput {
    pub records: Vec<Value>,
    pub warnings: Vec<Error>,
}

/// Read records from whichever source the options name.
pub fn load_input(opts: &EdgetreeOptions) -> Result<LoadedInput> {
    let load_start = Instant::now();

    let loaded = if let Some(text) = &opts.input.text {
        LoadedInput {
            records: parse_text(text)?,
            warnings: Vec::new(),
        }
    } else if opts.input.stdin {
        let mut text = String::new();
        std::io::stdin().read_to_string(&mut text).map_err(|err| {
            Error::from(err).with_operation("pipeline::load_input")
        })?;
        LoadedInput {
            records: parse_text(&text)?,
            warnings: Vec::new(),
        }
    } else {
        let files = discover_files(&opts.input)?;
        let report = load_files(&files, opts.parallel)?;
        for warning in &report.warnings {
            warn!(warning = %warning.message(), "input file skipped");
        }
        LoadedInput {
            records: report.records,
            warnings: report.warnings,
        }
    };

    info!(
        "Loading: {:.2}s ({} records)",
        load_start.elapsed().as_secs_f64(),
        loaded.records.len()
    );
    Ok(loaded)
}

/// Transform loaded records and render them.
pub fn process_records(opts: &EdgetreeOptions, loaded: LoadedInput) -> Result<RunOutput> {
    let transform_start = Instant::now();
    let hierarchy = transform(&loaded.records);
    info!(
        "Transform: {:.2}s ({} nodes, {} roots, {} missing)",
        transform_start.elapsed().as_secs_f64(),
        hierarchy.len(),
        hierarchy.root_ids().len(),
        hierarchy.missing_count()
    );

    let rendered = render_output(opts, &hierarchy)?;
    Ok(RunOutput {
        rendered,
        warnings: loaded.warnings,
    })
}
