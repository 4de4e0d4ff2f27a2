//! List sampling.
//!
//! ```yaml
//! sampler:
//!     type: list
//!     constants:
//!         X1: 20
//!     parameters:
//!         X2: [5, 10]
//!         X3: [5, 10]
//! ```
//!
//! Every list in `parameters` must have the same length; sample `i` takes the
//! `i`-th entry of each. A bare scalar counts as a one-entry list.

use super::base::{self, SampleCache};
use super::{Sampler, SamplerKind};
use crate::models::{Result, Sample, SamplerError, SamplerSpec, Value};

const KIND: SamplerKind = SamplerKind::List;

/// Sampler zipping equal-length value lists.
#[derive(Debug)]
pub struct ListSampler {
    spec: SamplerSpec,
    samples: SampleCache,
}

impl ListSampler {
    pub fn new(spec: SamplerSpec) -> Self {
        Self {
            spec,
            samples: SampleCache::new(),
        }
    }

    /// Value lists, checked for a common length.
    fn columns(&self) -> Result<Vec<(String, Vec<Value>)>> {
        let columns = base::value_lists(&self.spec, KIND)?;
        if let Some((_, first)) = columns.first() {
            let expected = first.len();
            if let Some((name, values)) = columns.iter().find(|(_, v)| v.len() != expected) {
                return Err(SamplerError::LengthMismatch {
                    name: name.clone(),
                    expected,
                    found: values.len(),
                });
            }
        }
        Ok(columns)
    }

    fn build_samples(&self) -> Result<Vec<Sample>> {
        let constants = base::constants(&self.spec, KIND)?;
        let columns = self.columns()?;
        let count = columns.first().map_or(0, |(_, values)| values.len());

        Ok((0..count)
            .map(|i| {
                let values = columns
                    .iter()
                    .map(|(name, values)| (name.clone(), values[i].clone()));
                base::overlay(constants, values)
            })
            .collect())
    }
}

impl Sampler for ListSampler {
    fn kind(&self) -> SamplerKind {
        KIND
    }

    fn validate(&self) -> Result<()> {
        base::check_base(&self.spec, KIND)?;
        base::require_constants_or_parameters(&self.spec, KIND)?;
        self.columns()
            .map(|_| ())
            .map_err(|e| match e {
                SamplerError::LengthMismatch { .. } => SamplerError::invalid(KIND, e.to_string()),
                other => other,
            })
    }

    fn parameters(&self) -> Vec<String> {
        let mut parameters = base::constant_keys(&self.spec);
        if let Ok(columns) = base::value_lists(&self.spec, KIND) {
            parameters.extend(columns.into_iter().map(|(name, _)| name));
        }
        parameters
    }

    fn get_samples(&self) -> Result<&[Sample]> {
        self.samples.get_or_build(KIND, || self.build_samples())
    }
}
