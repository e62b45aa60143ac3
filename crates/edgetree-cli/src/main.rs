use std::process::ExitCode;
use std::time::Instant;

use anyhow::Context;
use clap::ArgGroup;
use clap::Parser;

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: tikv_jemallocator::Jemalloc = tikv_jemallocator::Jemalloc;

#[cfg(target_env = "msvc")]
#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

use edgetree::{
    Config, EdgetreeOptions, InputOptions, ProcessingOptions, RenderOptions, describe_failure,
    failure_exit_code, run_main,
};

#[derive(Parser, Debug)]
#[command(
    name = "edgetree",
    about = "edgetree: turn flat edge lists into trees",
    version,
    group = ArgGroup::new("inputs").required(true).multiple(true).args(["files", "dirs", "text", "stdin"])
)]
pub struct Cli {
    #[command(flatten)]
    input: InputOptions,

    #[command(flatten)]
    render: RenderOptions,

    #[command(flatten)]
    processing: ProcessingOptions,

    /// TOML file with default options
    #[arg(long, value_name = "PATH")]
    config: Option<String>,

    /// Output file path (writes to file instead of stdout)
    #[arg(short = 'o', long = "output", value_name = "FILE")]
    output: Option<String>,
}

pub fn run(args: Cli) -> anyhow::Result<ExitCode> {
    let total_start = Instant::now();

    // Initialize tracing subscriber for logging
    if std::env::var("RUST_LOG").is_ok() {
        tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_writer(std::io::stderr)
            .init();
    }

    let config = args.config.as_deref().map(Config::from_path).transpose()?;
    let opts = EdgetreeOptions::resolve(args.input, args.render, args.processing, config.as_ref())?;

    let result = match run_main(&opts) {
        Ok(result) => result,
        Err(e) => {
            eprintln!("Error: {}", describe_failure(&e));
            tracing::error!(error = %e, "execution failed");
            return Ok(ExitCode::from(failure_exit_code(&e)));
        }
    };
    if let Some(message) = result.warning_message() {
        eprintln!("Warning: some files were skipped: {message}");
    }

    if let Some(ref path) = args.output {
        std::fs::write(path, &result.rendered)
            .with_context(|| format!("failed to write output to {path}"))?;
        tracing::info!(path, "output written");
    } else {
        println!("{}", result.rendered);
    }

    let total_secs = total_start.elapsed().as_secs_f64();
    tracing::info!(total_secs, "complete");
    Ok(ExitCode::SUCCESS)
}

pub fn main() -> anyhow::Result<ExitCode> {
    let args = Cli::parse();
    run(args)
}
