//! Flag-line rendering: one line per experiment

use crate::args::experiment_to_args;
use crate::domain::Experiment;

/// Render each experiment's flags on its own line, tokens joined by single
/// spaces. Every line ends with a newline; an empty expansion renders as "".
pub fn render_flags(experiments: &[Experiment]) -> String {
    let mut out = String::new();
    for experiment in experiments {
        out.push_str(&experiment_to_args(experiment).join(" "));
        out.push('\n');
    }
    out
}
