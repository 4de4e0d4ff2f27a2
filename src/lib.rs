//! scisample - Parameter sample generation from declarative specifications.
//!
//! ## Architecture
//!
//! - **Dispatcher**: resolves a specification's `type` to a sampler through a
//!   fixed table and validates it before handing it back
//! - **Samplers**: strategies that turn one specification into a list of flat
//!   parameter → value mappings
//!
//! ## Samplers
//!
//! - `column_list`: whitespace-delimited table plus constants
//! - `list`, `cross_product`: zipped or combined value lists
//! - `csv`, `random`, `custom`: CSV files, uniform draws, external commands
//!
//! ```ignore
//! use scisample::{Sampler, SamplerSpec, create_sampler};
//!
//! let spec = SamplerSpec::from_yaml_str(
//!     "type: column_list\nconstants:\n  X1: 20\nparameters: |\n  X2 X3\n  5 5\n  10 10\n",
//! )?;
//! let sampler = create_sampler(&spec)?;
//! for sample in sampler.get_samples()? {
//!     println!("{}", serde_json::to_string(sample)?);
//! }
//! ```

pub mod models;
pub mod sampler;

// Re-exports for convenience
pub use models::{
    ConfigError, OutputFormat, Result, Sample, SamplerError, SamplerSpec, Value, write_samples,
};
pub use sampler::{AnySampler, Sampler, SamplerKind, create_sampler, sampler_from_file, sampler_types};
