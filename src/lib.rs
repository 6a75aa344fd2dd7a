//! experiment-expansion: expand declarative experiment sweeps
//!
//! A config maps parameter names to fixed values, sweep lists, nested
//! documents, or aligned (zipped) groups. [`expand_experiment_config`]
//! enumerates every concrete experiment in a stable order and
//! [`experiment_to_args`] turns one experiment into command-line flags.
//!
//! ```
//! use experiment_expansion::{expand_experiment_config, experiment_to_args};
//! use serde_json::json;
//!
//! let experiments = expand_experiment_config(&json!({"lr": [0.01, 0.1], "batch": 32})).unwrap();
//! assert_eq!(experiments.len(), 2);
//! assert_eq!(experiment_to_args(&experiments[1]), vec!["--lr", "0.1", "--batch", "32"]);
//! ```

pub mod args;
pub mod cli;
pub mod config;
pub mod domain;
pub mod expand;
pub mod render;

pub use args::{experiment_to_args, experiment_to_args_with_base};
pub use config::load_experiment_config;
pub use domain::{ConfigError, Document, Experiment};
pub use expand::{expand, expand_experiment_config};
