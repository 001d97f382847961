//! qopt command-line interface.
//!
//! Builds one of the bundled example circuits, runs an optimization
//! pipeline over it and prints depth and gate count before and after,
//! optionally preceded by simulated measurement distributions.
//!
//! ```text
//! qopt --algorithm grover --optimization basic --simulate
//! qopt --algorithm shor --optimization hardware --format json
//! ```

#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

use std::path::PathBuf;

use clap::{ArgAction, Parser};
use console::style;
use tracing_subscriber::EnvFilter;

mod commands;
mod report;

use commands::common::UsageError;
use commands::optimize;
use report::OutputFormat;

/// qopt - commutation-based quantum circuit optimizer
#[derive(Parser, Debug)]
#[command(name = "qopt")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Example circuit to optimize: grover or shor
    #[arg(long, default_value = "grover")]
    pub algorithm: String,

    /// Optimization pipeline: basic, advanced or hardware
    #[arg(long, default_value = "basic")]
    pub optimization: String,

    /// Simulate both circuits and print their measurement distributions
    #[arg(long)]
    pub simulate: bool,

    /// Shots per simulation
    #[arg(
        long,
        default_value_t = qopt_sim::DEFAULT_SHOTS,
        value_parser = clap::value_parser!(u32).range(1..)
    )]
    pub shots: u32,

    /// Seed for reproducible sampling
    #[arg(long)]
    pub seed: Option<u64>,

    /// JSON commutation rule table used by the basic pipeline
    #[arg(long, value_name = "PATH")]
    pub rules: Option<PathBuf>,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    /// Increase log verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,
}

fn main() {
    let cli = Cli::parse();

    // Set up logging
    let filter = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = optimize::execute(&cli) {
        let code = if e.downcast_ref::<UsageError>().is_some() {
            2
        } else {
            1
        };
        eprintln!("{} {:#}", style("Error:").red().bold(), e);
        std::process::exit(code);
    }
}
