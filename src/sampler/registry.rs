//! Sampler registry and dispatcher.
//!
//! The set of sampler types is closed: [`SamplerKind`] names each one and
//! [`SAMPLER_TYPES`] maps the `type` strings found in specifications onto it.
//! The table is a constant, so dispatch never mutates shared state.

use super::{
    ColumnListSampler, CrossProductSampler, CsvSampler, CustomSampler, ListSampler,
    RandomSampler, Sampler,
};
use crate::models::{Result, Sample, SamplerError, SamplerSpec, Value};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::str::FromStr;
use tracing::{error, info};

/// Registered sampler types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SamplerKind {
    /// Whitespace-delimited table plus constants
    ColumnList,
    /// Equal-length value lists zipped together
    List,
    /// Cartesian product of value lists
    CrossProduct,
    /// Rows or columns of a CSV file
    Csv,
    /// Uniform random draws within bounds
    Random,
    /// Samples printed by an external command
    Custom,
}

/// `type` string → sampler kind.
pub const SAMPLER_TYPES: [(&str, SamplerKind); 6] = [
    ("column_list", SamplerKind::ColumnList),
    ("list", SamplerKind::List),
    ("cross_product", SamplerKind::CrossProduct),
    ("csv", SamplerKind::Csv),
    ("random", SamplerKind::Random),
    ("custom", SamplerKind::Custom),
];

impl SamplerKind {
    /// Resolve a `type` string.
    pub fn lookup(name: &str) -> Option<Self> {
        SAMPLER_TYPES
            .iter()
            .find(|(key, _)| *key == name)
            .map(|(_, kind)| *kind)
    }

    /// The `type` string for this kind.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::ColumnList => "column_list",
            Self::List => "list",
            Self::CrossProduct => "cross_product",
            Self::Csv => "csv",
            Self::Random => "random",
            Self::Custom => "custom",
        }
    }

    /// Build (but do not validate) a sampler of this kind.
    pub fn construct(self, spec: SamplerSpec) -> AnySampler {
        match self {
            Self::ColumnList => AnySampler::ColumnList(ColumnListSampler::new(spec)),
            Self::List => AnySampler::List(ListSampler::new(spec)),
            Self::CrossProduct => AnySampler::CrossProduct(CrossProductSampler::new(spec)),
            Self::Csv => AnySampler::Csv(CsvSampler::new(spec)),
            Self::Random => AnySampler::Random(RandomSampler::new(spec)),
            Self::Custom => AnySampler::Custom(CustomSampler::new(spec)),
        }
    }
}

impl fmt::Display for SamplerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SamplerKind {
    type Err = SamplerError;

    fn from_str(s: &str) -> Result<Self> {
        Self::lookup(s).ok_or_else(|| SamplerError::UnknownSamplerType(s.to_string()))
    }
}

/// A validated sampler of any registered kind.
#[derive(Debug)]
pub enum AnySampler {
    ColumnList(ColumnListSampler),
    List(ListSampler),
    CrossProduct(CrossProductSampler),
    Csv(CsvSampler),
    Random(RandomSampler),
    Custom(CustomSampler),
}

impl AnySampler {
    fn inner(&self) -> &dyn Sampler {
        match self {
            Self::ColumnList(s) => s,
            Self::List(s) => s,
            Self::CrossProduct(s) => s,
            Self::Csv(s) => s,
            Self::Random(s) => s,
            Self::Custom(s) => s,
        }
    }
}

impl Sampler for AnySampler {
    fn kind(&self) -> SamplerKind {
        self.inner().kind()
    }

    fn validate(&self) -> Result<()> {
        self.inner().validate()
    }

    fn parameters(&self) -> Vec<String> {
        self.inner().parameters()
    }

    fn get_samples(&self) -> Result<&[Sample]> {
        self.inner().get_samples()
    }
}

/// Dispatch a specification to its sampler.
///
/// # Errors
///
/// Returns `SamplerError::MissingType` if the specification has no `type`.
///
/// Returns `SamplerError::UnknownSamplerType` if the type is not registered.
///
/// Returns `SamplerError::InvalidSamplerSpec` if the sampler rejects the
/// specification.
pub fn create_sampler(spec: &SamplerSpec) -> Result<AnySampler> {
    info!("Dispatching sampler");

    let name = match spec.sampler_type() {
        None => return Err(SamplerError::MissingType),
        Some(Value::String(name)) => name.as_str(),
        Some(other) => return Err(SamplerError::UnknownSamplerType(other.to_string())),
    };

    let kind = SamplerKind::from_str(name)?;
    info!(sampler = %kind, "Sampler type resolved");

    let sampler = kind.construct(spec.clone());
    match sampler.validate() {
        Ok(()) => Ok(sampler),
        Err(e) => {
            error!(sampler = %kind, error = %e, "Sampler is invalid");
            Err(match e {
                e @ SamplerError::InvalidSamplerSpec { .. } => e,
                other => SamplerError::invalid(kind, other.to_string()),
            })
        }
    }
}

/// Load a specification file and dispatch it.
///
/// # Errors
///
/// Returns `SamplerError::Config` if the file cannot be read or parsed, and
/// otherwise whatever [`create_sampler`] returns.
pub fn sampler_from_file(path: &Path) -> Result<AnySampler> {
    let spec = SamplerSpec::from_file(path)?;
    create_sampler(&spec)
}

/// All registered `type` strings.
pub fn sampler_types() -> impl Iterator<Item = &'static str> {
    SAMPLER_TYPES.iter().map(|(name, _)| *name)
}
