//! Experiment config loading
//!
//! Reads a config from a path or standard input into a raw JSON value with
//! key order preserved. Expansion never touches the filesystem itself.

pub mod loader;

pub use loader::{load_experiment_config, parse_config_str, SourceFormat, STDIN_SOURCE};
