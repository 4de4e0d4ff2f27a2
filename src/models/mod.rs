//! Core data models for scisample.
//!
//! - `SamplerSpec`: the declarative input a sampler is built from
//! - `Sample`: one resolved point handed to a downstream consumer
//! - `SamplerError`: everything dispatch, validation and generation can fail with

mod config;
mod error;
mod sample;

pub use config::*;
pub use error::*;
pub use sample::*;
