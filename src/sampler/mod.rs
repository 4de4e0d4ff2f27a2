//! Sampler strategies and the dispatcher that selects between them.
//!
//! Every strategy implements [`Sampler`]; [`create_sampler`] resolves a
//! specification's `type` to one of them through a fixed table.

mod base;
mod column_list;
mod cross_product;
mod csv_file;
mod custom;
mod list;
mod random;
mod registry;

pub use column_list::ColumnListSampler;
pub use cross_product::CrossProductSampler;
pub use csv_file::CsvSampler;
pub use custom::CustomSampler;
pub use list::ListSampler;
pub use random::RandomSampler;
pub use registry::*;

use crate::models::{Result, Sample};
use std::fmt;
use tracing::error;

/// Capability shared by all sampler strategies.
///
/// A sampler owns its specification. Samples are computed on the first call
/// to [`Sampler::get_samples`] and cached for the sampler's lifetime.
pub trait Sampler: fmt::Debug + Send + Sync {
    /// The registered type this sampler implements.
    fn kind(&self) -> SamplerKind;

    /// Check the specification, returning the first problem found.
    fn validate(&self) -> Result<()>;

    /// Boolean form of [`Sampler::validate`]; logs the reason on failure.
    fn is_valid(&self) -> bool {
        match self.validate() {
            Ok(()) => true,
            Err(e) => {
                error!(sampler = %self.kind(), error = %e, "Sampler is invalid");
                false
            }
        }
    }

    /// Names of the parameters this sampler produces, in output order.
    fn parameters(&self) -> Vec<String>;

    /// Generate (or return the cached) samples.
    fn get_samples(&self) -> Result<&[Sample]>;
}
