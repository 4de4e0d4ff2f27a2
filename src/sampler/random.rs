//! Uniform random sampling.
//!
//! ```yaml
//! sampler:
//!     type: random
//!     num_samples: 30
//!     seed: 7
//!     constants:
//!         X1: 0.5
//!     parameters:
//!         X2:
//!             min: 0.2
//!             max: 0.5
//! ```
//!
//! Each sample draws every parameter uniformly from `[min, max]`. An optional
//! `seed` makes the draws reproducible.

use super::base::{self, PARAMETERS, SampleCache};
use super::{Sampler, SamplerKind};
use crate::models::{Result, Sample, SamplerError, SamplerSpec, Value};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::debug;

const KIND: SamplerKind = SamplerKind::Random;

/// Upper bound on `num_samples`; larger requests are rejected up front.
const MAX_SAMPLES: usize = 1_000_000;

/// Bounds for one random parameter.
#[derive(Debug, Clone, PartialEq)]
struct Bounds {
    name: String,
    min: f64,
    max: f64,
}

/// Sampler drawing uniform values within bounds.
#[derive(Debug)]
pub struct RandomSampler {
    spec: SamplerSpec,
    samples: SampleCache,
}

impl RandomSampler {
    pub fn new(spec: SamplerSpec) -> Self {
        Self {
            spec,
            samples: SampleCache::new(),
        }
    }

    fn num_samples(&self) -> Result<usize> {
        let requested = self
            .spec
            .get("num_samples")
            .and_then(Value::as_u64)
            .ok_or_else(|| {
                SamplerError::invalid(KIND, "num_samples must be a non-negative integer")
            })?;

        usize::try_from(requested)
            .ok()
            .filter(|&n| n <= MAX_SAMPLES)
            .ok_or_else(|| {
                SamplerError::invalid(
                    KIND,
                    format!("num_samples {requested} exceeds the limit of {MAX_SAMPLES}"),
                )
            })
    }

    fn seed(&self) -> Result<Option<u64>> {
        match self.spec.get("seed") {
            None => Ok(None),
            Some(value) => value
                .as_u64()
                .map(Some)
                .ok_or_else(|| SamplerError::invalid(KIND, "seed must be a non-negative integer")),
        }
    }

    fn bounds(&self) -> Result<Vec<Bounds>> {
        let Some(value) = self.spec.get(PARAMETERS) else {
            return Ok(Vec::new());
        };
        let map = value
            .as_object()
            .ok_or_else(|| SamplerError::invalid(KIND, "parameters must be a mapping"))?;

        map.iter()
            .map(|(name, range)| {
                let bound = |key: &str| {
                    range.get(key).and_then(Value::as_f64).ok_or_else(|| {
                        SamplerError::invalid(KIND, format!("parameter '{name}' needs a numeric {key}"))
                    })
                };
                let (min, max) = (bound("min")?, bound("max")?);
                if min > max {
                    return Err(SamplerError::invalid(
                        KIND,
                        format!("parameter '{name}' has min {min} greater than max {max}"),
                    ));
                }
                // Uniform sampling needs a finite span.
                if !(max - min).is_finite() {
                    return Err(SamplerError::invalid(
                        KIND,
                        format!("parameter '{name}' range {min}..{max} is too wide to sample"),
                    ));
                }
                Ok(Bounds {
                    name: name.clone(),
                    min,
                    max,
                })
            })
            .collect()
    }

    fn build_samples(&self) -> Result<Vec<Sample>> {
        let constants = base::constants(&self.spec, KIND)?;
        let count = self.num_samples()?;
        let bounds = self.bounds()?;

        let mut rng = match self.seed()? {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        debug!(count, parameters = bounds.len(), "Drawing random samples");

        Ok((0..count)
            .map(|_| {
                let values: Vec<(String, Value)> = bounds
                    .iter()
                    .map(|b| (b.name.clone(), Value::from(rng.random_range(b.min..=b.max))))
                    .collect();
                base::overlay(constants, values)
            })
            .collect())
    }
}

impl Sampler for RandomSampler {
    fn kind(&self) -> SamplerKind {
        KIND
    }

    fn validate(&self) -> Result<()> {
        base::check_base(&self.spec, KIND)?;
        self.num_samples()?;
        self.seed()?;
        self.bounds()?;
        Ok(())
    }

    fn parameters(&self) -> Vec<String> {
        let mut parameters = base::constant_keys(&self.spec);
        if let Ok(bounds) = self.bounds() {
            parameters.extend(bounds.into_iter().map(|b| b.name));
        }
        parameters
    }

    fn get_samples(&self) -> Result<&[Sample]> {
        self.samples.get_or_build(KIND, || self.build_samples())
    }
}
