//! Expand command implementation

use anyhow::{Context, Result};
use clap::Args;
use std::io::Write;

use crate::config::load_experiment_config;
use crate::expand::expand_experiment_config;
use crate::render::{render_flags, render_json};

#[derive(Args)]
pub struct ExpandArgs {
    /// Path to an experiment config (JSON, YAML or TOML), or 'stdin' to read JSON from stdin
    #[arg(value_name = "EXPERIMENT_CONFIG")]
    pub experiment_config: String,

    /// Pretty-print the expanded config to stdout
    #[arg(long)]
    pub pprint: bool,

    /// Print the flags generated by each experiment in the expansion, one per line
    #[arg(long = "print_flags", visible_alias = "print-flags")]
    pub print_flags: bool,
}

pub fn run(args: ExpandArgs) -> Result<()> {
    let config = load_experiment_config(&args.experiment_config)?;
    let expanded = expand_experiment_config(&config).with_context(|| {
        format!("Failed to expand experiment config: {}", args.experiment_config)
    })?;
    tracing::debug!(experiments = expanded.len(), "expansion complete");

    let output = if args.print_flags {
        render_flags(&expanded)
    } else {
        format!("{}\n", render_json(&expanded, args.pprint)?)
    };

    let mut stdout = std::io::stdout().lock();
    stdout.write_all(output.as_bytes())?;
    stdout.flush()?;
    Ok(())
}
