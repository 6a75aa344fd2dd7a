//! Core data model for experiment configs
//!
//! A raw config is plain JSON (`serde_json::Value` with key order preserved).
//! The expander parses it into the typed [`DocumentSpec`] tree before
//! enumerating concrete experiments.

use serde_json::{Map, Value};
use thiserror::Error;

/// A single configuration document: parameter name to raw specification.
pub type Document = Map<String, Value>;

/// One fully resolved assignment of values to parameter names.
pub type Experiment = Map<String, Value>;

/// Parsed form of a [`Document`], one entry per declared key.
#[derive(Debug, Clone, PartialEq)]
pub struct DocumentSpec {
    pub entries: Vec<Entry>,
}

/// A declared key together with its parsed specification.
#[derive(Debug, Clone, PartialEq)]
pub struct Entry {
    pub key: String,
    pub spec: ParamSpec,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ParamSpec {
    /// Fixed value shared by every experiment.
    Scalar(Value),
    /// Independent dimension; one choice per experiment.
    Sweep(Vec<Choice>),
    /// Embedded document, expanded recursively and kept nested.
    Nested(DocumentSpec),
    /// Zipped dimensions: row `i` assigns the `i`-th value of every member.
    Aligned(AlignedGroup),
}

/// One candidate of a sweep dimension.
#[derive(Debug, Clone, PartialEq)]
pub enum Choice {
    /// A scalar, or a literal list of scalars.
    Value(Value),
    /// A document whose every expansion is a candidate.
    Nested(DocumentSpec),
}

/// Members of an aligned group and the rows that pair them up.
#[derive(Debug, Clone, PartialEq)]
pub struct AlignedGroup {
    pub label: String,
    pub members: Vec<String>,
    /// Each row has exactly `members.len()` values.
    pub rows: Vec<Vec<Value>>,
}

impl AlignedGroup {
    pub fn cardinality(&self) -> usize {
        self.rows.len()
    }
}

impl ParamSpec {
    /// True when this entry varies across experiments.
    pub fn is_dimension(&self) -> bool {
        match self {
            ParamSpec::Scalar(_) => false,
            ParamSpec::Sweep(_) | ParamSpec::Aligned(_) => true,
            ParamSpec::Nested(doc) => doc.entries.iter().any(|e| e.spec.is_dimension()),
        }
    }
}

/// Errors raised while validating or expanding a config.
///
/// Paths use dotted keys with bracketed indices, e.g. `model.layers` or
/// `[1].optimizer[0].lr`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("malformed parameter at '{path}': {reason}")]
    Malformed { path: String, reason: String },

    #[error("aligned group '{group}' has mismatched lengths: {}", format_lengths(.lengths))]
    CardinalityMismatch { group: String, lengths: Vec<(String, usize)> },

    #[error("compound key '{path}' expects {expected} values per row, row {row} has {found}")]
    ArityMismatch { path: String, expected: usize, found: usize, row: usize },

    #[error("empty sweep at '{path}' would produce no experiments")]
    EmptySweep { path: String },

    #[error("duplicate parameter '{key}' in '{path}'")]
    DuplicateKey { path: String, key: String },
}

impl ConfigError {
    pub fn malformed(path: impl Into<String>, reason: impl Into<String>) -> Self {
        ConfigError::Malformed { path: path.into(), reason: reason.into() }
    }
}

fn format_lengths(lengths: &[(String, usize)]) -> String {
    lengths.iter().map(|(name, len)| format!("{name}={len}")).collect::<Vec<_>>().join(", ")
}

/// Short name of a JSON value's kind, used in error messages.
pub fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
