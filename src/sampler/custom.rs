//! Samples produced by an external command.
//!
//! ```yaml
//! sampler:
//!     type: custom
//!     command: ./make_samples.sh
//!     args: ["--count", "4"]
//!     parameters: [X2, X3]
//!     constants:
//!         X1: 20
//! ```
//!
//! The command must print a JSON array of flat objects on stdout. Each object
//! becomes one sample with the constants laid underneath it. The optional
//! `parameters` list only feeds [`Sampler::parameters`].

use super::base::{self, PARAMETERS, SampleCache};
use super::{Sampler, SamplerKind};
use crate::models::{Result, Sample, SamplerError, SamplerSpec, Value};
use indexmap::IndexMap;
use std::process::Command;
use tracing::debug;

const KIND: SamplerKind = SamplerKind::Custom;

/// Sampler delegating generation to an external program.
#[derive(Debug)]
pub struct CustomSampler {
    spec: SamplerSpec,
    samples: SampleCache,
}

impl CustomSampler {
    pub fn new(spec: SamplerSpec) -> Self {
        Self {
            spec,
            samples: SampleCache::new(),
        }
    }

    fn command(&self) -> Result<&str> {
        match self.spec.get("command") {
            Some(Value::String(command)) if !command.trim().is_empty() => Ok(command.as_str()),
            Some(_) => Err(SamplerError::invalid(KIND, "command must be a non-empty string")),
            None => Err(SamplerError::invalid(KIND, "command must be included in the sampler data")),
        }
    }

    fn args(&self) -> Result<Vec<String>> {
        let Some(value) = self.spec.get("args") else {
            return Ok(Vec::new());
        };
        value
            .as_array()
            .and_then(|items| {
                items
                    .iter()
                    .map(|v| match v {
                        Value::String(s) => Some(s.clone()),
                        Value::Number(n) => Some(n.to_string()),
                        Value::Bool(b) => Some(b.to_string()),
                        _ => None,
                    })
                    .collect()
            })
            .ok_or_else(|| SamplerError::invalid(KIND, "args must be a list of scalars"))
    }

    fn declared_parameters(&self) -> Result<Vec<String>> {
        let Some(value) = self.spec.get(PARAMETERS) else {
            return Ok(Vec::new());
        };
        value
            .as_array()
            .and_then(|items| items.iter().map(|v| v.as_str().map(str::to_string)).collect())
            .ok_or_else(|| SamplerError::invalid(KIND, "parameters must be a list of names"))
    }

    fn build_samples(&self) -> Result<Vec<Sample>> {
        let constants = base::constants(&self.spec, KIND)?;
        let command = self.command()?;
        let args = self.args()?;
        let fail = |message: String| SamplerError::Command {
            command: command.to_string(),
            message,
        };

        debug!(command, ?args, "Running custom sampler");
        let output = Command::new(command)
            .args(&args)
            .output()
            .map_err(|e| SamplerError::io(format!("Failed to run '{command}'"), e))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(fail(format!("{} {}", output.status, stderr.trim())));
        }

        let rows: Vec<IndexMap<String, Value>> = serde_json::from_slice(&output.stdout)
            .map_err(|e| fail(format!("output is not a JSON list of objects: {e}")))?;

        if let Some(first) = rows.first() {
            if let Some(index) = rows
                .iter()
                .position(|row| row.len() != first.len() || !row.keys().all(|k| first.contains_key(k)))
            {
                return Err(fail(format!(
                    "sample {} has different parameters than sample 1",
                    index + 1
                )));
            }
        }

        Ok(rows
            .into_iter()
            .map(|row| base::overlay(constants, row))
            .collect())
    }
}

impl Sampler for CustomSampler {
    fn kind(&self) -> SamplerKind {
        KIND
    }

    fn validate(&self) -> Result<()> {
        base::check_base(&self.spec, KIND)?;
        self.command()?;
        self.args()?;
        self.declared_parameters()?;
        Ok(())
    }

    fn parameters(&self) -> Vec<String> {
        let mut parameters = base::constant_keys(&self.spec);
        parameters.extend(self.declared_parameters().unwrap_or_default());
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

    fn sampler(value: Value) -> CustomSampler {
        CustomSampler::new(serde_json::from_value(value).unwrap())
    }

    #[test]
    fn test_validation() {
        assert!(!sampler(json!({"type": "custom"})).is_valid());
        assert!(!sampler(json!({"type": "custom", "command": "echo", "args": [[1]]})).is_valid());

        let s = sampler(json!({
            "type": "custom",
            "command": "echo",
            "parameters": ["X2"],
            "constants": {"X1": 20},
        }));
        assert!(s.is_valid());
        assert_eq!(s.parameters(), ["X1", "X2"]);
    }

    #[cfg(unix)]
    #[test]
    fn test_reads_command_output() {
        let s = sampler(json!({
            "type": "custom",
            "command": "echo",
            "args": [r#"[{"X2": 1, "X1": 5}, {"X2": 2, "X1": 6}]"#],
            "constants": {"X1": 20, "X3": "c"},
        }));

        let samples = s.get_samples().unwrap();
        assert_eq!(samples.len(), 2);
        assert_eq!(samples[0].get("X1"), Some(&json!(5)));
        assert_eq!(samples[1].get("X2"), Some(&json!(2)));
        assert_eq!(samples[1].get("X3"), Some(&json!("c")));
    }

    #[cfg(unix)]
    #[test]
    fn test_rejects_bad_output() {
        let s = sampler(json!({"type": "custom", "command": "echo", "args": ["not json"]}));
        assert!(matches!(s.get_samples().unwrap_err(), SamplerError::Command { .. }));

        let s = sampler(json!({
            "type": "custom",
            "command": "echo",
            "args": [r#"[{"a": 1}, {"b": 2}]"#],
        }));
        let err = s.get_samples().unwrap_err();
        assert!(err.to_string().contains("sample 2"));
    }
}
