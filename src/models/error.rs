//! Error types for scisample.
//!
//! Taxonomy:
//! - Dispatch: the specification names no sampler, or one that is not registered
//! - Validation: the chosen sampler rejected its specification
//! - Generation: the data turned out malformed, or an external source failed

use std::path::PathBuf;
use thiserror::Error;

/// Top-level error type for scisample.
#[derive(Debug, Error)]
pub enum SamplerError {
    // ═══════════════════════════════════════════════════════════════════
    // DISPATCH
    // ═══════════════════════════════════════════════════════════════════
    #[error("No type entry in sampler data")]
    MissingType,

    #[error("'{0}' is not a recognized sampler type")]
    UnknownSamplerType(String),

    // ═══════════════════════════════════════════════════════════════════
    // VALIDATION
    // ═══════════════════════════════════════════════════════════════════
    #[error("Invalid '{kind}' sampler: {reason}")]
    InvalidSamplerSpec { kind: String, reason: String },

    // ═══════════════════════════════════════════════════════════════════
    // GENERATION
    // ═══════════════════════════════════════════════════════════════════
    #[error(
        "Parameter row {row} (line {line}) has {found} entries but there are {expected} headers; \
         all parameters must have the same number of entries"
    )]
    RowShapeMismatch {
        row: usize,
        line: usize,
        expected: usize,
        found: usize,
    },

    #[error("Parameter '{name}' has {found} values, expected {expected}")]
    LengthMismatch {
        name: String,
        expected: usize,
        found: usize,
    },

    #[error("Custom command '{command}' failed: {message}")]
    Command { command: String, message: String },

    // ═══════════════════════════════════════════════════════════════════
    // INFRASTRUCTURE
    // ═══════════════════════════════════════════════════════════════════
    #[error("Configuration error: {0}")]
    Config(#[from] super::ConfigError),

    #[error("CSV error in {path}: {source}")]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("IO error: {context}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },
}

impl SamplerError {
    /// Create a validation error for the given sampler type.
    pub fn invalid(kind: impl ToString, reason: impl Into<String>) -> Self {
        Self::InvalidSamplerSpec {
            kind: kind.to_string(),
            reason: reason.into(),
        }
    }

    /// Create an IO error with context.
    pub fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            context: context.into(),
            source,
        }
    }

    /// Whether the error was raised before any sampler was constructed.
    pub fn is_dispatch_error(&self) -> bool {
        matches!(self, Self::MissingType | Self::UnknownSamplerType(_))
    }
}

/// Result type alias for scisample.
pub type Result<T> = std::result::Result<T, SamplerError>;
