//! Cross product sampling.
//!
//! ```yaml
//! sampler:
//!     type: cross_product
//!     constants:
//!         X1: 20
//!     parameters:
//!         X2: [5, 10]
//!         X3: [5, 10]
//! ```
//!
//! Produces every combination of the listed values; the first parameter
//! varies slowest. The block above yields four samples.

use super::base::{self, SampleCache};
use super::{Sampler, SamplerKind};
use crate::models::{Result, Sample, SamplerSpec, Value};

const KIND: SamplerKind = SamplerKind::CrossProduct;

/// Sampler over the Cartesian product of value lists.
#[derive(Debug)]
pub struct CrossProductSampler {
    spec: SamplerSpec,
    samples: SampleCache,
}

impl CrossProductSampler {
    pub fn new(spec: SamplerSpec) -> Self {
        Self {
            spec,
            samples: SampleCache::new(),
        }
    }

    fn build_samples(&self) -> Result<Vec<Sample>> {
        let constants = base::constants(&self.spec, KIND)?;
        let columns = base::value_lists(&self.spec, KIND)?;
        if columns.is_empty() {
            return Ok(Vec::new());
        }

        let mut combinations: Vec<Vec<(String, Value)>> = vec![Vec::new()];
        for (name, values) in &columns {
            combinations = combinations
                .into_iter()
                .flat_map(|prefix| {
                    values.iter().map(move |value| {
                        let mut next = prefix.clone();
                        next.push((name.clone(), value.clone()));
                        next
                    })
                })
                .collect();
        }

        Ok(combinations
            .into_iter()
            .map(|values| base::overlay(constants, values))
            .collect())
    }
}

impl Sampler for CrossProductSampler {
    fn kind(&self) -> SamplerKind {
        KIND
    }

    fn validate(&self) -> Result<()> {
        base::check_base(&self.spec, KIND)?;
        base::require_constants_or_parameters(&self.spec, KIND)?;
        base::value_lists(&self.spec, KIND).map(|_| ())
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
