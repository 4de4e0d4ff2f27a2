//! Sample type and sample-set output.

use super::Value;
use crate::models::{Result, SamplerError};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::io::Write;

/// One fully-resolved parameter point.
///
/// Keys keep insertion order: constants first, then sampler-provided values.
/// Equality ignores key order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Sample(IndexMap<String, Value>);

impl Sample {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get a parameter value.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.0.get(name)
    }

    /// Set a parameter, replacing any earlier value in place.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.0.insert(name.into(), value.into())
    }

    /// Overlay a set of values; later values win on collisions.
    pub fn extend<I, K>(&mut self, values: I)
    where
        I: IntoIterator<Item = (K, Value)>,
        K: Into<String>,
    {
        for (name, value) in values {
            self.0.insert(name.into(), value);
        }
    }

    /// Parameter names in order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<(String, Value)> for Sample {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl From<IndexMap<String, Value>> for Sample {
    fn from(values: IndexMap<String, Value>) -> Self {
        Self(values)
    }
}

/// Serialization format for a sample set.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// One pretty-printed JSON array
    #[default]
    Json,
    /// One JSON object per line
    Jsonl,
}

/// Write a sample set to `writer` in the requested format.
pub fn write_samples<W: Write>(samples: &[Sample], format: OutputFormat, mut writer: W) -> Result<()> {
    let to_io = |e: serde_json::Error| SamplerError::io("Failed to serialize samples", e.into());

    match format {
        OutputFormat::Json => {
            serde_json::to_writer_pretty(&mut writer, samples).map_err(to_io)?;
            writeln!(writer).map_err(|e| SamplerError::io("Failed to write samples", e))?;
        }
        OutputFormat::Jsonl => {
            for sample in samples {
                serde_json::to_writer(&mut writer, sample).map_err(to_io)?;
                writeln!(writer).map_err(|e| SamplerError::io("Failed to write samples", e))?;
            }
        }
    }

    writer
        .flush()
        .map_err(|e| SamplerError::io("Failed to flush samples", e))
}
