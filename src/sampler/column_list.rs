//! Column list sampling.
//!
//! The sampler data takes two blocks, `constants` and `parameters`:
//!
//! ```yaml
//! sampler:
//!     type: column_list
//!     constants:
//!         X1: 20
//!     parameters: |
//!         X2       X3
//!         5        5
//!         10       10
//! ```
//!
//! Constants are added to every sample. The first line of `parameters` names
//! the columns and every further non-blank line is one sample, matched to the
//! headers by position. The block above yields
//! `[{X1: 20, X2: "5", X3: "5"}, {X1: 20, X2: "10", X3: "10"}]`.
//!
//! Table values stay strings; constants keep the type they were written with.
//! Samples are driven by table rows, so constants alone produce no samples.

use super::base::{self, PARAMETERS, SampleCache};
use super::{Sampler, SamplerKind};
use crate::models::{Result, Sample, SamplerError, SamplerSpec, Value};
use tracing::debug;

const KIND: SamplerKind = SamplerKind::ColumnList;

/// Sampler over a whitespace-delimited parameter table.
#[derive(Debug)]
pub struct ColumnListSampler {
    spec: SamplerSpec,
    samples: SampleCache,
}

/// Parsed `parameters` block.
#[derive(Debug, Default, PartialEq)]
struct ParameterTable {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl ParameterTable {
    /// Parse a table, failing on the first row whose width differs from the
    /// header line.
    fn parse(block: &str) -> Result<Self> {
        let mut lines = block.lines().enumerate();
        let headers = lines
            .next()
            .map(|(_, line)| tokens(line))
            .unwrap_or_default();

        let mut rows = Vec::new();
        for (index, line) in lines {
            let data = tokens(line);
            if data.is_empty() {
                continue;
            }
            if data.len() != headers.len() {
                return Err(SamplerError::RowShapeMismatch {
                    row: rows.len() + 1,
                    line: index + 1,
                    expected: headers.len(),
                    found: data.len(),
                });
            }
            rows.push(data);
        }

        Ok(Self { headers, rows })
    }
}

fn tokens(line: &str) -> Vec<String> {
    line.split_whitespace().map(str::to_string).collect()
}

impl ColumnListSampler {
    /// Create a sampler that owns its own copy of `spec`.
    pub fn new(spec: SamplerSpec) -> Self {
        Self {
            spec,
            samples: SampleCache::new(),
        }
    }

    /// The raw `parameters` block, if present.
    fn block(&self) -> Result<Option<&str>> {
        match self.spec.get(PARAMETERS) {
            None => Ok(None),
            Some(Value::String(block)) => Ok(Some(block.as_str())),
            Some(_) => Err(SamplerError::invalid(KIND, "parameters must be a string")),
        }
    }

    fn build_samples(&self) -> Result<Vec<Sample>> {
        let constants = base::constants(&self.spec, KIND)?;
        let Some(block) = self.block()? else {
            debug!("No parameters block; constants alone produce no samples");
            return Ok(Vec::new());
        };

        let ParameterTable { headers, rows } = ParameterTable::parse(block)?;
        Ok(rows
            .into_iter()
            .map(|row| {
                let values = headers.iter().cloned().zip(row.into_iter().map(Value::String));
                base::overlay(constants, values)
            })
            .collect())
    }
}

impl Sampler for ColumnListSampler {
    fn kind(&self) -> SamplerKind {
        KIND
    }

    fn validate(&self) -> Result<()> {
        base::check_base(&self.spec, KIND)?;
        base::require_constants_or_parameters(&self.spec, KIND)?;

        if let Some(block) = self.block()? {
            ParameterTable::parse(block).map_err(|e| SamplerError::invalid(KIND, e.to_string()))?;
        }
        Ok(())
    }

    fn parameters(&self) -> Vec<String> {
        let mut parameters = base::constant_keys(&self.spec);
        if let Ok(Some(block)) = self.block() {
            parameters.extend(block.lines().next().map(tokens).unwrap_or_default());
        }
        parameters
    }

    fn get_samples(&self) -> Result<&[Sample]> {
        self.samples.get_or_build(KIND, || self.build_samples())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sampler(value: Value) -> ColumnListSampler {
        ColumnListSampler::new(serde_json::from_value(value).unwrap())
    }

    #[test]
    fn test_constants_and_parameters() {
        let s = sampler(json!({
            "type": "column_list",
            "constants": {"X1": 20},
            "parameters": "X2       X3\n5        5\n10       10\n",
        }));
        assert!(s.is_valid());

        let samples = s.get_samples().unwrap();
        let expected: Vec<Sample> = vec![
            serde_json::from_value(json!({"X1": 20, "X2": "5", "X3": "5"})).unwrap(),
            serde_json::from_value(json!({"X1": 20, "X2": "10", "X3": "10"})).unwrap(),
        ];
        assert_eq!(samples, expected.as_slice());
        assert_eq!(samples[0].keys().collect::<Vec<_>>(), ["X1", "X2", "X3"]);
    }

    #[test]
    fn test_constants_only_yields_no_samples() {
        let s = sampler(json!({"type": "column_list", "constants": {"X1": 20, "X2": "a"}}));
        assert!(s.is_valid());
        assert!(s.get_samples().unwrap().is_empty());
        assert_eq!(s.parameters(), ["X1", "X2"]);
    }

    #[test]
    fn test_parameters_only() {
        let s = sampler(json!({
            "type": "column_list",
            "parameters": "a b c\n1 2 3\n\n4 5 6\n   \n7 8 9",
        }));
        let samples = s.get_samples().unwrap();
        assert_eq!(samples.len(), 3);
        for sample in samples {
            assert_eq!(sample.keys().collect::<Vec<_>>(), ["a", "b", "c"]);
            assert!(sample.iter().all(|(_, v)| v.is_string()));
        }
        assert_eq!(samples[2].get("c"), Some(&json!("9")));
    }

    #[test]
    fn test_table_values_override_constants() {
        let s = sampler(json!({
            "type": "column_list",
            "constants": {"X1": 20, "X2": 1.5},
            "parameters": "X2\n7",
        }));
        let samples = s.get_samples().unwrap();
        assert_eq!(samples[0].get("X1"), Some(&json!(20)));
        assert_eq!(samples[0].get("X2"), Some(&json!("7")));
        assert_eq!(samples[0].keys().collect::<Vec<_>>(), ["X1", "X2"]);
    }

    #[test]
    fn test_row_mismatch_fails_whole_generation() {
        let s = sampler(json!({
            "type": "column_list",
            "parameters": "X2 X3\n5 5\n\n10 10 10\n15 15",
        }));
        assert!(!s.is_valid());

        match s.get_samples().unwrap_err() {
            SamplerError::RowShapeMismatch {
                row,
                line,
                expected,
                found,
            } => {
                assert_eq!((row, line, expected, found), (2, 4, 2, 3));
            }
            other => panic!("unexpected error: {other}"),
        }
        // Nothing was cached, so a retry fails the same way.
        assert!(s.get_samples().is_err());
    }

    #[test]
    fn test_missing_both_sections() {
        let s = sampler(json!({"type": "column_list", "other": 1}));
        let err = s.validate().unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("constants"));
        assert!(msg.contains("parameters"));
        assert!(!s.is_valid());
    }

    #[test]
    fn test_non_string_parameters_invalid() {
        let s = sampler(json!({"type": "column_list", "parameters": {"X2": [1, 2]}}));
        assert!(s.validate().is_err());
        assert!(s.parameters().is_empty());
    }

    #[test]
    fn test_parameter_listing_independent_of_generation() {
        let s = sampler(json!({
            "type": "column_list",
            "constants": {"B": 1, "A": 2},
            "parameters": "Z Y\n1 2",
        }));
        let before = s.parameters();
        s.get_samples().unwrap();
        assert_eq!(before, ["B", "A", "Z", "Y"]);
        assert_eq!(s.parameters(), before);
    }

    #[test]
    fn test_samples_are_cached() {
        let mut spec: SamplerSpec = serde_json::from_value(json!({
            "type": "column_list",
            "parameters": "a\n1\n2",
        }))
        .unwrap();
        let s = ColumnListSampler::new(spec.clone());

        let first = s.get_samples().unwrap();
        spec.insert("parameters", "a\n9");
        let second = s.get_samples().unwrap();

        assert!(std::ptr::eq(first, second));
        assert_eq!(second.len(), 2);
        assert_eq!(second[0].get("a"), Some(&json!("1")));
    }

    #[test]
    fn test_empty_block() {
        let s = sampler(json!({"type": "column_list", "parameters": ""}));
        assert!(s.is_valid());
        assert!(s.get_samples().unwrap().is_empty());
        assert!(s.parameters().is_empty());
    }
}
