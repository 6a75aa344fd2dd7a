//! Sweep expansion
//!
//! Turns a config into the ordered list of concrete experiments. Keys keep
//! their declared order; the first declared dimension varies slowest and the
//! last varies fastest, with candidates visited in listed order.

use crate::domain::{Choice, ConfigError, Document, DocumentSpec, Entry, Experiment, ParamSpec};
use serde_json::Value;

pub mod parse;

pub use parse::{parse_config, parse_document};

/// Expand a top-level config (a document or an array of documents).
///
/// Array configs expand each document in turn and concatenate the results.
pub fn expand_experiment_config(config: &Value) -> Result<Vec<Experiment>, ConfigError> {
    let documents = parse_config(config)?;

    let mut experiments = Vec::new();
    for (index, document) in documents.iter().enumerate() {
        let expanded = enumerate(document);
        tracing::debug!(
            document = index,
            dimensions = document.entries.iter().filter(|e| e.spec.is_dimension()).count(),
            experiments = expanded.len(),
            "expanded config document"
        );
        experiments.extend(expanded);
    }
    Ok(experiments)
}

/// Expand a single document.
pub fn expand(document: &Document) -> Result<Vec<Experiment>, ConfigError> {
    let spec = parse_document(document, "")?;
    Ok(enumerate(&spec))
}

/// Cartesian product over the document's entries.
///
/// Every entry yields at least one alternative, so the result is never empty;
/// an empty document yields a single empty experiment.
pub fn enumerate(spec: &DocumentSpec) -> Vec<Experiment> {
    spec.entries.iter().fold(vec![Experiment::new()], |partials, entry| {
        let alternatives = alternatives(entry);
        partials
            .iter()
            .flat_map(|partial| {
                alternatives.iter().map(move |assignment| {
                    let mut experiment = partial.clone();
                    for (key, value) in assignment {
                        experiment.insert(key.clone(), value.clone());
                    }
                    experiment
                })
            })
            .collect()
    })
}

type Assignment = Vec<(String, Value)>;

fn alternatives(entry: &Entry) -> Vec<Assignment> {
    let key = &entry.key;
    match &entry.spec {
        ParamSpec::Scalar(value) => vec![vec![(key.clone(), value.clone())]],
        ParamSpec::Sweep(choices) => choices
            .iter()
            .flat_map(choice_values)
            .map(|value| vec![(key.clone(), value)])
            .collect(),
        ParamSpec::Nested(document) => enumerate(document)
            .into_iter()
            .map(|inner| vec![(key.clone(), Value::Object(inner))])
            .collect(),
        ParamSpec::Aligned(group) => group
            .rows
            .iter()
            .map(|row| group.members.iter().cloned().zip(row.iter().cloned()).collect())
            .collect(),
    }
}

fn choice_values(choice: &Choice) -> Vec<Value> {
    match choice {
        Choice::Value(value) => vec![value.clone()],
        Choice::Nested(document) => enumerate(document).into_iter().map(Value::Object).collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use similar_asserts::assert_eq;
    use std::collections::HashSet;

    fn expand_json(value: Value) -> Result<Vec<Value>, ConfigError> {
        expand_experiment_config(&value)
            .map(|experiments| experiments.into_iter().map(Value::Object).collect())
    }

    #[test]
    fn test_no_sweep_is_identity() {
        let doc = json!({"lr": 0.1, "name": "run", "debug": false, "seed": null});
        assert_eq!(expand_json(doc.clone()).expect("expand"), vec![doc]);
    }

    #[test]
    fn test_empty_document_yields_one_empty_experiment() {
        assert_eq!(expand_json(json!({})).expect("expand"), vec![json!({})]);
    }

    #[test]
    fn test_end_to_end_example() {
        let expanded = expand_json(json!({"lr": [0.01, 0.1], "batch": 32})).expect("expand");
        assert_eq!(
            expanded,
            vec![json!({"lr": 0.01, "batch": 32}), json!({"lr": 0.1, "batch": 32})]
        );
    }

    #[test]
    fn test_cross_product_cardinality_and_order() {
        let expanded = expand_json(json!({"a": [1, 2], "b": ["x", "y", "z"]})).expect("expand");
        assert_eq!(
            expanded,
            vec![
                json!({"a": 1, "b": "x"}),
                json!({"a": 1, "b": "y"}),
                json!({"a": 1, "b": "z"}),
                json!({"a": 2, "b": "x"}),
                json!({"a": 2, "b": "y"}),
                json!({"a": 2, "b": "z"}),
            ]
        );
        let distinct: HashSet<String> = expanded.iter().map(Value::to_string).collect();
        assert_eq!(distinct.len(), 6);
    }

    #[test]
    fn test_key_order_follows_document_not_sweep_position() {
        let expanded = expand_json(json!({"z": [1, 2], "a": 0, "m": true})).expect("expand");
        let keys: Vec<&str> =
            expanded[0].as_object().expect("object").keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["z", "a", "m"]);
    }

    #[test]
    fn test_expansion_is_deterministic() {
        let doc = json!({"a": [3, 1, 2], "@zip": {"b": [1, 2], "c": [3, 4]}, "d": {"e": [5, 6]}});
        let first =
            serde_json::to_string(&expand_json(doc.clone()).expect("expand")).expect("json");
        let second = serde_json::to_string(&expand_json(doc).expect("expand")).expect("json");
        assert_eq!(first, second);
    }

    #[test]
    fn test_aligned_lists_zip_instead_of_multiplying() {
        let expanded = expand_json(json!({
            "@zip": {"lr": [0.1, 0.2, 0.3], "batch": [16, 32, 64]},
            "seed": 7
        }))
        .expect("expand");
        assert_eq!(
            expanded,
            vec![
                json!({"lr": 0.1, "batch": 16, "seed": 7}),
                json!({"lr": 0.2, "batch": 32, "seed": 7}),
                json!({"lr": 0.3, "batch": 64, "seed": 7}),
            ]
        );
    }

    #[test]
    fn test_aligned_group_counts_as_one_dimension() {
        let expanded = expand_json(json!({
            "opt": ["sgd", "adam"],
            "@zip": {"lr": [0.1, 0.2, 0.3], "batch": [16, 32, 64]}
        }))
        .expect("expand");
        assert_eq!(expanded.len(), 6);
        assert_eq!(expanded[3], json!({"opt": "adam", "lr": 0.1, "batch": 16}));
    }

    #[test]
    fn test_aligned_length_mismatch_fails() {
        let err = expand_json(json!({"@zip": {"lr": [0.1, 0.2], "batch": [16, 32, 64]}}))
            .unwrap_err();
        assert_eq!(
            err,
            ConfigError::CardinalityMismatch {
                group: "@zip".to_string(),
                lengths: vec![("lr".to_string(), 2), ("batch".to_string(), 3)],
            }
        );
    }

    #[test]
    fn test_separate_zip_groups_multiply() {
        let expanded = expand_json(json!({
            "@zip:a": {"x": [1, 2], "y": [3, 4]},
            "@zip:b": {"p": [5, 6, 7], "q": [8, 9, 10]}
        }))
        .expect("expand");
        assert_eq!(expanded.len(), 6);
    }

    #[test]
    fn test_compound_key_rows() {
        let expanded = expand_json(json!({"[lr,batch]": [[0.1, 16], [0.2, 32]]})).expect("expand");
        assert_eq!(
            expanded,
            vec![json!({"lr": 0.1, "batch": 16}), json!({"lr": 0.2, "batch": 32})]
        );
    }

    #[test]
    fn test_compound_key_arity_mismatch() {
        let err = expand_json(json!({"[lr,batch]": [[0.1, 16], [0.2]]})).unwrap_err();
        assert_eq!(
            err,
            ConfigError::ArityMismatch {
                path: "[lr,batch]".to_string(),
                expected: 2,
                found: 1,
                row: 1,
            }
        );
    }

    #[test]
    fn test_nested_document_stays_nested_and_multiplies() {
        let expanded = expand_json(json!({
            "lr": [0.1, 0.2],
            "model": {"depth": [2, 4], "act": "relu"}
        }))
        .expect("expand");
        assert_eq!(
            expanded,
            vec![
                json!({"lr": 0.1, "model": {"depth": 2, "act": "relu"}}),
                json!({"lr": 0.1, "model": {"depth": 4, "act": "relu"}}),
                json!({"lr": 0.2, "model": {"depth": 2, "act": "relu"}}),
                json!({"lr": 0.2, "model": {"depth": 4, "act": "relu"}}),
            ]
        );
    }

    #[test]
    fn test_sweep_over_documents_contributes_each_expansion() {
        let expanded = expand_json(json!({
            "optimizer": [{"name": "sgd", "momentum": [0.0, 0.9]}, {"name": "adam"}]
        }))
        .expect("expand");
        assert_eq!(
            expanded,
            vec![
                json!({"optimizer": {"name": "sgd", "momentum": 0.0}}),
                json!({"optimizer": {"name": "sgd", "momentum": 0.9}}),
                json!({"optimizer": {"name": "adam"}}),
            ]
        );
    }

    #[test]
    fn test_single_element_sweep_has_no_list_artifact() {
        let expanded = expand_json(json!({"lr": [0.1], "layers": [[64, 32]]})).expect("expand");
        assert_eq!(expanded, vec![json!({"lr": 0.1, "layers": [64, 32]})]);
    }

    #[test]
    fn test_top_level_array_concatenates() {
        let expanded = expand_json(json!([{"a": [1, 2]}, {"b": true}])).expect("expand");
        assert_eq!(expanded, vec![json!({"a": 1}), json!({"a": 2}), json!({"b": true})]);
    }

    #[test]
    fn test_empty_top_level_array_yields_nothing() {
        assert!(expand_json(json!([])).expect("expand").is_empty());
    }

    #[test]
    fn test_empty_sweep_fails() {
        let err = expand_json(json!({"a": 1, "b": {"c": []}})).unwrap_err();
        assert_eq!(err, ConfigError::EmptySweep { path: "b.c".to_string() });
    }

    #[test]
    fn test_error_aborts_whole_expansion() {
        let result = expand_json(json!([{"a": [1, 2]}, {"b": [[[1]]]}]));
        assert!(result.is_err());
    }

    #[test]
    fn test_expand_single_document() {
        let doc = json!({"a": [1, 2]});
        let expanded = expand(doc.as_object().expect("object")).expect("expand");
        assert_eq!(expanded.len(), 2);
        assert_eq!(expanded[1].get("a"), Some(&json!(2)));
    }
}
