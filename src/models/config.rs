//! Sampler specifications and how they are loaded.
//!
//! A specification is an ordered mapping, usually read from YAML. Key order
//! matters: constant keys are reported in the order they were written.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Value type used throughout specifications and samples.
pub type Value = serde_json::Value;

/// Key under which a sampler block may be nested in a larger document.
const SAMPLER_KEY: &str = "sampler";

/// Declarative sampler specification.
///
/// Holds at least a `type` entry once dispatched; everything else is
/// interpreted by the sampler the type selects.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SamplerSpec {
    fields: IndexMap<String, Value>,
}

impl SamplerSpec {
    /// Create an empty specification.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a specification from YAML (or JSON) text.
    ///
    /// The text may hold the sampler mapping itself, or a document with the
    /// sampler nested under a top-level `sampler` key.
    pub fn from_yaml_str(text: &str) -> Result<Self, ConfigError> {
        let document: serde_yaml::Value = serde_yaml::from_str(text)?;
        Ok(Self::unwrap_document(document_fields(document)?))
    }

    /// Load a specification from a YAML or JSON file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::FileRead {
            path: path.to_owned(),
            source: e,
        })?;

        let document: serde_yaml::Value =
            serde_yaml::from_str(&content).map_err(|e| ConfigError::Parse {
                path: path.to_owned(),
                source: e,
            })?;

        Ok(Self::unwrap_document(document_fields(document)?))
    }

    fn unwrap_document(mut fields: IndexMap<String, Value>) -> Self {
        let nested = !fields.contains_key("type")
            && fields.get(SAMPLER_KEY).is_some_and(Value::is_object);
        if nested {
            if let Some(Value::Object(inner)) = fields.shift_remove(SAMPLER_KEY) {
                return inner.into_iter().collect();
            }
        }
        Self { fields }
    }

    /// Look up a field.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    /// Check whether a field is present.
    pub fn contains_key(&self, key: &str) -> bool {
        self.fields.contains_key(key)
    }

    /// Insert or replace a field, returning the previous value.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.fields.insert(key.into(), value.into())
    }

    /// Raw `type` entry, if any.
    pub fn sampler_type(&self) -> Option<&Value> {
        self.fields.get("type")
    }

    /// Field names in document order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl FromIterator<(String, Value)> for SamplerSpec {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
        Self {
            fields: iter.into_iter().collect(),
        }
    }
}

impl From<IndexMap<String, Value>> for SamplerSpec {
    fn from(fields: IndexMap<String, Value>) -> Self {
        Self { fields }
    }
}

/// Top-level mapping of a parsed document, converted to [`Value`]s.
fn document_fields(document: serde_yaml::Value) -> Result<IndexMap<String, Value>, ConfigError> {
    match from_yaml(document, "")? {
        Value::Object(map) => Ok(map.into_iter().collect()),
        _ => Err(ConfigError::NotAMapping),
    }
}

/// Convert a YAML node, refusing numbers JSON cannot hold.
///
/// `key` is the dotted path of the node, used in error messages.
fn from_yaml(value: serde_yaml::Value, key: &str) -> Result<Value, ConfigError> {
    use serde_yaml::Value as Yaml;

    let value = match value {
        Yaml::Null => Value::Null,
        Yaml::Bool(b) => Value::Bool(b),
        Yaml::Number(n) => {
            if let Some(i) = n.as_i64() {
                Value::from(i)
            } else if let Some(u) = n.as_u64() {
                Value::from(u)
            } else {
                n.as_f64()
                    .and_then(serde_json::Number::from_f64)
                    .map(Value::Number)
                    .ok_or_else(|| ConfigError::NonFiniteNumber {
                        key: key.to_string(),
                        value: n.to_string(),
                    })?
            }
        }
        Yaml::String(s) => Value::String(s),
        Yaml::Sequence(items) => Value::Array(
            items
                .into_iter()
                .enumerate()
                .map(|(i, item)| from_yaml(item, &format!("{key}[{i}]")))
                .collect::<Result<_, _>>()?,
        ),
        Yaml::Mapping(entries) => {
            let mut map = serde_json::Map::with_capacity(entries.len());
            for (name, item) in entries {
                let name = match name {
                    Yaml::String(s) => s,
                    Yaml::Number(n) => n.to_string(),
                    Yaml::Bool(b) => b.to_string(),
                    _ => {
                        return Err(ConfigError::InvalidKey {
                            key: key.to_string(),
                        });
                    }
                };
                let path = if key.is_empty() {
                    name.clone()
                } else {
                    format!("{key}.{name}")
                };
                let item = from_yaml(item, &path)?;
                map.insert(name, item);
            }
            Value::Object(map)
        }
        Yaml::Tagged(tagged) => from_yaml(tagged.value, key)?,
    };
    Ok(value)
}

/// Errors raised while loading a specification.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read sampler file {path}: {source}")]
    FileRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse sampler file {path}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_yaml::Error,
    },

    #[error("Failed to parse sampler specification: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Sampler specification must be a mapping")]
    NotAMapping,

    #[error("Non-scalar mapping key under '{key}'")]
    InvalidKey { key: String },

    #[error("Value {value} for '{key}' is not a finite number")]
    NonFiniteNumber { key: String, value: String },
}
