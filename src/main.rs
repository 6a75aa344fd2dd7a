//! expansion: Expand experiment sweep configs
//!
//! Reads a declarative sweep config and prints every concrete experiment it
//! describes, either as JSON or as command-line flags.

use anyhow::Result;

fn main() -> Result<()> {
    experiment_expansion::cli::run()
}
