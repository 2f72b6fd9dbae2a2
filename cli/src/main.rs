//! # recast CLI
//!
//! recast rewrites Python source files through a configured list of
//! modifiers, or reports violations without touching the files. Designed to
//! run as a pre-commit hook: a dirty run (any rewrite or violation) exits
//! non-zero so the calling process can fail the commit.
//!
//! ## Usage
//!
//! ```bash
//! recast --config recast.json src/app.py src/models.py
//! recast --config recast.json --diff $(git ls-files '*.py')
//! ```

mod config;
mod exit_codes;

use std::path::PathBuf;
use std::process;

use clap::Parser;
use log::error;

use recast_modifiers::{EngineError, ModifierPipeline};

use crate::config::RunConfig;
use crate::exit_codes::{EXIT_CLEAN, EXIT_CONFIG_ERROR, EXIT_DIRTY, EXIT_RUNTIME_ERROR};

/// Initialize logger based on verbose flag
fn init_logger(verbose: bool) {
    let mut log_builder = env_logger::Builder::from_default_env();
    if verbose {
        log_builder.filter_level(log::LevelFilter::Debug);
    } else {
        log_builder.filter_level(log::LevelFilter::Info);
    }
    log_builder.init();
}

#[derive(Parser)]
#[command(name = "recast")]
#[command(about = "Rewrite Python sources through configurable modifiers", long_about = None)]
#[command(version)]
struct Cli {
    /// Modifier configuration file (JSON)
    #[arg(long, short = 'c', value_name = "FILE")]
    config: PathBuf,

    /// Print a unified diff for every rewritten file
    #[arg(long)]
    diff: bool,

    /// Enable verbose logging
    #[arg(long, short = 'v')]
    verbose: bool,

    /// Python source files to process
    #[arg(value_name = "PATHS", required = true)]
    paths: Vec<PathBuf>,
}

fn main() {
    let cli = Cli::parse();
    init_logger(cli.verbose);
    process::exit(run(&cli));
}

fn run(cli: &Cli) -> i32 {
    let config = match RunConfig::load(&cli.config) {
        Ok(config) => config,
        Err(err) => {
            error!("{err:#}");
            return EXIT_CONFIG_ERROR;
        }
    };

    let pipeline = match ModifierPipeline::new(config.modifiers) {
        Ok(pipeline) => pipeline.with_show_diff(cli.diff),
        Err(err) => {
            error!("{err}");
            return EXIT_CONFIG_ERROR;
        }
    };

    let mut files = match ModifierPipeline::load_files(&cli.paths) {
        Ok(files) => files,
        Err(err) => {
            error!("{err}");
            return EXIT_RUNTIME_ERROR;
        }
    };

    match pipeline.run(&mut files) {
        Ok(true) => EXIT_DIRTY,
        Ok(false) => EXIT_CLEAN,
        Err(err @ EngineError::Config(_)) => {
            error!("{err}");
            EXIT_CONFIG_ERROR
        }
        Err(err) => {
            error!("{err}");
            EXIT_RUNTIME_ERROR
        }
    }
}
