//! Raw JSON config -> typed `DocumentSpec`
//!
//! All shape validation happens here, so enumeration itself cannot fail.
//!
//! Key syntax:
//! - `"@zip"` / `"@zip:<label>"`: aligned group, value maps member names to
//!   equal-length arrays.
//! - `"[a,b]"`: compound key, value is an array of rows (or a single flat row).
//!   A single-name key `"[a]"` reads a flat array as one row per element.
//! - anything else: plain parameter name.
//!
//! Parameter names may not contain `.`, which is reserved for the flattened
//! flag names of nested documents.

use crate::domain::{
    kind_of, AlignedGroup, Choice, ConfigError, Document, DocumentSpec, Entry, ParamSpec,
};
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;
use std::collections::HashSet;

static ZIP_KEY_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^@zip(?::[^\s]+)?$").expect("valid zip key regex"));
static COMPOUND_KEY_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\[(.*)\]$").expect("valid compound key regex"));

const ROOT: &str = "<root>";

/// Parse a top-level config: one document, or an array of documents.
pub fn parse_config(config: &Value) -> Result<Vec<DocumentSpec>, ConfigError> {
    match config {
        Value::Object(doc) => Ok(vec![parse_document(doc, "")?]),
        Value::Array(docs) => docs
            .iter()
            .enumerate()
            .map(|(i, item)| {
                let path = index_path("", i);
                match item {
                    Value::Object(doc) => parse_document(doc, &path),
                    other => Err(ConfigError::malformed(
                        path,
                        format!("expected a config document (object), found {}", kind_of(other)),
                    )),
                }
            })
            .collect(),
        other => Err(ConfigError::malformed(
            ROOT,
            format!("expected an object or an array of objects, found {}", kind_of(other)),
        )),
    }
}

pub fn parse_document(doc: &Document, path: &str) -> Result<DocumentSpec, ConfigError> {
    let mut entries = Vec::with_capacity(doc.len());
    let mut seen: HashSet<String> = HashSet::new();

    for (key, value) in doc {
        let key_path = child_path(path, key);
        if key.trim().is_empty() {
            return Err(ConfigError::malformed(display_path(path), "empty parameter name"));
        }

        let spec = if ZIP_KEY_RE.is_match(key) {
            ParamSpec::Aligned(parse_zip_group(key, value, &key_path)?)
        } else if let Some(caps) = COMPOUND_KEY_RE.captures(key) {
            ParamSpec::Aligned(parse_compound(key, &caps[1], value, &key_path)?)
        } else {
            check_name(key, path)?;
            parse_value(value, &key_path)?
        };

        let names: Vec<&str> = match &spec {
            ParamSpec::Aligned(group) => group.members.iter().map(String::as_str).collect(),
            _ => vec![key.as_str()],
        };
        for name in names {
            if !seen.insert(name.to_string()) {
                return Err(ConfigError::DuplicateKey {
                    path: display_path(path),
                    key: name.to_string(),
                });
            }
        }

        entries.push(Entry { key: key.clone(), spec });
    }

    Ok(DocumentSpec { entries })
}

fn parse_value(value: &Value, path: &str) -> Result<ParamSpec, ConfigError> {
    match value {
        Value::Object(doc) => Ok(ParamSpec::Nested(parse_document(doc, path)?)),
        Value::Array(items) => {
            if items.is_empty() {
                return Err(ConfigError::EmptySweep { path: path.to_string() });
            }
            let choices = items
                .iter()
                .enumerate()
                .map(|(i, item)| parse_choice(item, &index_path(path, i)))
                .collect::<Result<Vec<_>, _>>()?;
            Ok(ParamSpec::Sweep(choices))
        }
        scalar => Ok(ParamSpec::Scalar(scalar.clone())),
    }
}

fn parse_choice(item: &Value, path: &str) -> Result<Choice, ConfigError> {
    match item {
        Value::Object(doc) => Ok(Choice::Nested(parse_document(doc, path)?)),
        other => {
            check_literal(other, path)?;
            Ok(Choice::Value(other.clone()))
        }
    }
}

/// Accepts a scalar or a flat list of scalars.
fn check_literal(value: &Value, path: &str) -> Result<(), ConfigError> {
    match value {
        Value::Object(_) => {
            Err(ConfigError::malformed(path, "expected a literal value, found object"))
        }
        Value::Array(items) => {
            for (i, item) in items.iter().enumerate() {
                if matches!(item, Value::Array(_) | Value::Object(_)) {
                    return Err(ConfigError::malformed(
                        index_path(path, i),
                        format!("list values may only hold scalars, found {}", kind_of(item)),
                    ));
                }
            }
            Ok(())
        }
        _ => Ok(()),
    }
}

fn parse_zip_group(key: &str, value: &Value, path: &str) -> Result<AlignedGroup, ConfigError> {
    let Value::Object(members) = value else {
        return Err(ConfigError::malformed(
            path,
            format!("aligned group must map parameter names to arrays, found {}", kind_of(value)),
        ));
    };
    if members.is_empty() {
        return Err(ConfigError::malformed(path, "aligned group has no members"));
    }

    let mut names = Vec::with_capacity(members.len());
    let mut columns = Vec::with_capacity(members.len());
    for (name, column) in members {
        let member_path = child_path(path, name);
        if name.trim().is_empty() {
            return Err(ConfigError::malformed(path, "empty parameter name"));
        }
        if ZIP_KEY_RE.is_match(name) || COMPOUND_KEY_RE.is_match(name) {
            return Err(ConfigError::malformed(member_path, "aligned groups cannot be nested"));
        }
        check_name(name, path)?;
        let Value::Array(items) = column else {
            return Err(ConfigError::malformed(
                member_path,
                format!("aligned member must be an array, found {}", kind_of(column)),
            ));
        };
        for (i, item) in items.iter().enumerate() {
            check_literal(item, &index_path(&member_path, i))?;
        }
        names.push(name.clone());
        columns.push(items);
    }

    let cardinality = columns[0].len();
    if columns.iter().any(|c| c.len() != cardinality) {
        return Err(ConfigError::CardinalityMismatch {
            group: path.to_string(),
            lengths: names.iter().cloned().zip(columns.iter().map(|c| c.len())).collect(),
        });
    }
    if cardinality == 0 {
        return Err(ConfigError::EmptySweep { path: path.to_string() });
    }

    let rows = (0..cardinality).map(|i| columns.iter().map(|c| c[i].clone()).collect()).collect();
    Ok(AlignedGroup { label: key.to_string(), members: names, rows })
}

fn parse_compound(
    key: &str,
    inner: &str,
    value: &Value,
    path: &str,
) -> Result<AlignedGroup, ConfigError> {
    let names: Vec<String> = inner.split(',').map(|n| n.trim().to_string()).collect();
    if names.iter().any(String::is_empty) {
        return Err(ConfigError::malformed(
            path,
            "compound key must list comma-separated parameter names",
        ));
    }
    let mut seen = HashSet::new();
    for name in &names {
        check_name(name, path)?;
        if !seen.insert(name.as_str()) {
            return Err(ConfigError::DuplicateKey { path: path.to_string(), key: name.clone() });
        }
    }

    let Value::Array(items) = value else {
        return Err(ConfigError::malformed(
            path,
            format!("compound key value must be an array, found {}", kind_of(value)),
        ));
    };
    if items.is_empty() {
        return Err(ConfigError::EmptySweep { path: path.to_string() });
    }

    let row_count = items.iter().filter(|item| item.is_array()).count();
    let rows: Vec<&[Value]> = if row_count == items.len() {
        items.iter().filter_map(|item| item.as_array().map(Vec::as_slice)).collect()
    } else if row_count == 0 && names.len() == 1 {
        items.iter().map(std::slice::from_ref).collect()
    } else if row_count == 0 {
        vec![items.as_slice()]
    } else {
        return Err(ConfigError::malformed(
            path,
            "compound key value must be a single row or an array of rows, not a mix",
        ));
    };

    let mut parsed = Vec::with_capacity(rows.len());
    for (i, row) in rows.iter().enumerate() {
        if row.len() != names.len() {
            return Err(ConfigError::ArityMismatch {
                path: path.to_string(),
                expected: names.len(),
                found: row.len(),
                row: i,
            });
        }
        for (j, item) in row.iter().enumerate() {
            check_literal(item, &format!("{path}[{i}][{j}]"))?;
        }
        parsed.push(row.to_vec());
    }

    Ok(AlignedGroup { label: key.to_string(), members: names, rows: parsed })
}

fn check_name(name: &str, path: &str) -> Result<(), ConfigError> {
    if name.contains('.') {
        return Err(ConfigError::malformed(
            display_path(path),
            format!("parameter name '{name}' must not contain '.'"),
        ));
    }
    Ok(())
}

fn child_path(parent: &str, key: &str) -> String {
    if parent.is_empty() {
        key.to_string()
    } else {
        format!("{parent}.{key}")
    }
}

fn index_path(parent: &str, index: usize) -> String {
    format!("{parent}[{index}]")
}

fn display_path(path: &str) -> String {
    if path.is_empty() {
        ROOT.to_string()
    } else {
        path.to_string()
    }
}
