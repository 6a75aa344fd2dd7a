//! Command-line interface for experiment expansion
//!
//! `expansion <config>` prints the expanded experiments as JSON, or one line
//! of flags per experiment with `--print_flags`.

use anyhow::Result;
use clap::Parser;
use tracing::Level;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

mod expand;

/// Experiment config expander
#[derive(Parser)]
#[command(name = "expansion")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(flatten)]
    args: expand::ExpandArgs,

    /// Enable verbose logging (sets log level to DEBUG)
    #[arg(short, long)]
    verbose: bool,
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();

    // RUST_LOG in the environment always takes precedence; --verbose falls back to DEBUG.
    let filter = if cli.verbose {
        EnvFilter::from_default_env().add_directive(Level::DEBUG.into())
    } else {
        EnvFilter::from_default_env().add_directive(Level::WARN.into())
    };
    let _ = tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .try_init();

    expand::run(cli.args)
}
