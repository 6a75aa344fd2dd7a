//! Config source loading

use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::fs;
use std::io::Read;
use std::path::Path;

/// Source name that reads the config from standard input.
pub const STDIN_SOURCE: &str = "stdin";

/// Syntax of a config source, chosen from the file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceFormat {
    Json,
    Yaml,
    Toml,
}

impl SourceFormat {
    /// `.yaml`/`.yml` and `.toml` select their parsers; anything else is JSON.
    pub fn from_path(path: &Path) -> Self {
        let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("").to_ascii_lowercase();
        match ext.as_str() {
            "yaml" | "yml" => SourceFormat::Yaml,
            "toml" => SourceFormat::Toml,
            _ => SourceFormat::Json,
        }
    }
}

/// Load an experiment config from `source`, a path or the literal `stdin`.
///
/// Standard input is always parsed as JSON.
pub fn load_experiment_config(source: &str) -> Result<Value> {
    if source == STDIN_SOURCE {
        let mut content = String::new();
        std::io::stdin()
            .read_to_string(&mut content)
            .context("Failed reading experiment config from stdin")?;
        tracing::debug!(bytes = content.len(), "read experiment config from stdin");
        return parse_config_str(&content, SourceFormat::Json)
            .context("Invalid experiment config on stdin");
    }

    let path = Path::new(source);
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed reading experiment config: {}", path.display()))?;
    let format = SourceFormat::from_path(path);
    tracing::debug!(path = %path.display(), ?format, "loading experiment config");

    parse_config_str(&content, format)
        .with_context(|| format!("Invalid experiment config: {}", path.display()))
}

/// Parse config text in the given syntax.
///
/// YAML and TOML can spell `inf`/`nan`, which JSON values cannot hold; those
/// are rejected instead of being read as null.
pub fn parse_config_str(content: &str, format: SourceFormat) -> Result<Value> {
    if content.trim().is_empty() {
        anyhow::bail!("Experiment config is empty");
    }
    match format {
        SourceFormat::Json => parse_as(content, "JSON", |c| Ok(serde_json::from_str(c)?)),
        SourceFormat::Yaml => {
            let raw: serde_yaml::Value =
                parse_as(content, "YAML", |c| Ok(serde_yaml::from_str(c)?))?;
            check_finite_yaml(&raw, "")?;
            serde_yaml::from_value(raw).context("Invalid YAML config")
        }
        SourceFormat::Toml => {
            let raw: toml::Value = parse_as(content, "TOML", |c| Ok(toml::from_str(c)?))?;
            check_finite_toml(&raw, "")?;
            raw.try_into().context("Invalid TOML config")
        }
    }
}

fn parse_as<T, F>(content: &str, syntax: &str, parse: F) -> Result<T>
where
    T: DeserializeOwned,
    F: FnOnce(&str) -> Result<T>,
{
    parse(content).with_context(|| format!("Invalid {syntax} syntax"))
}

fn check_finite_yaml(value: &serde_yaml::Value, path: &str) -> Result<()> {
    match value {
        serde_yaml::Value::Number(n) if n.is_nan() || n.is_infinite() => non_finite(path),
        serde_yaml::Value::Sequence(items) => items
            .iter()
            .enumerate()
            .try_for_each(|(i, item)| check_finite_yaml(item, &format!("{path}[{i}]"))),
        serde_yaml::Value::Mapping(map) => map.iter().try_for_each(|(key, item)| {
            let name = match key {
                serde_yaml::Value::String(s) => s.clone(),
                other => serde_yaml::to_string(other)?.trim_end().to_string(),
            };
            check_finite_yaml(item, &child_path(path, &name))
        }),
        serde_yaml::Value::Tagged(tagged) => check_finite_yaml(&tagged.value, path),
        _ => Ok(()),
    }
}

fn check_finite_toml(value: &toml::Value, path: &str) -> Result<()> {
    match value {
        toml::Value::Float(f) if !f.is_finite() => non_finite(path),
        toml::Value::Array(items) => items
            .iter()
            .enumerate()
            .try_for_each(|(i, item)| check_finite_toml(item, &format!("{path}[{i}]"))),
        toml::Value::Table(table) => table
            .iter()
            .try_for_each(|(key, item)| check_finite_toml(item, &child_path(path, key))),
        _ => Ok(()),
    }
}

fn non_finite(path: &str) -> Result<()> {
    let at = if path.is_empty() { "<root>" } else { path };
    anyhow::bail!("Non-finite number at '{at}' cannot be used in an experiment config")
}

fn child_path(parent: &str, key: &str) -> String {
    if parent.is_empty() {
        key.to_string()
    } else {
        format!("{parent}.{key}")
    }
}
