//! Experiment -> command-line flags
//!
//! Token rules, applied per key in declared order:
//! - `true` emits `--key`; `false` and `null` emit nothing.
//! - strings and numbers emit `--key <value>`; numbers use `serde_json`'s
//!   plain decimal form (`0.1`, `32`, `0.00001`, `2` for `2.0`).
//! - lists emit the flag once followed by one token per element; an empty
//!   list emits nothing.
//! - nested objects are flattened with dotted names (`--model.depth 3`).

use crate::domain::Experiment;
use serde_json::{Map, Value};

pub fn experiment_to_args(experiment: &Experiment) -> Vec<String> {
    let mut args = Vec::new();
    push_flags(&mut args, "", experiment);
    args
}

/// Same as [`experiment_to_args`], with `base` tokens placed in front.
pub fn experiment_to_args_with_base<S: AsRef<str>>(
    base: &[S],
    experiment: &Experiment,
) -> Vec<String> {
    let mut args: Vec<String> = base.iter().map(|s| s.as_ref().to_string()).collect();
    push_flags(&mut args, "", experiment);
    args
}

fn push_flags(args: &mut Vec<String>, prefix: &str, params: &Map<String, Value>) {
    for (key, value) in params {
        let name = if prefix.is_empty() { key.clone() } else { format!("{prefix}.{key}") };
        match value {
            Value::Null | Value::Bool(false) => {}
            Value::Bool(true) => args.push(flag(&name)),
            Value::Array(items) => {
                if items.is_empty() {
                    continue;
                }
                args.push(flag(&name));
                args.extend(items.iter().map(token));
            }
            Value::Object(inner) => push_flags(args, &name, inner),
            Value::String(_) | Value::Number(_) => {
                args.push(flag(&name));
                args.push(token(value));
            }
        }
    }
}

fn flag(name: &str) -> String {
    format!("--{name}")
}

fn token(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => "null".to_string(),
        // Validated experiments never hold these inside a list.
        Value::Array(_) | Value::Object(_) => value.to_string(),
    }
}
