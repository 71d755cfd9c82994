//! Provider error types.

use std::path::PathBuf;
use thiserror::Error;

use crate::config::{ConfigFormat, Diagnostics};

/// Result type for provider operations.
pub type ProviderResult<T> = Result<T, ProviderError>;

/// Errors that can occur outside of configuration validation proper.
///
/// Validation failures are reported as [`Diagnostics`]; this type wraps them
/// only when a caller wants a single error channel.
#[derive(Debug, Error)]
pub enum ProviderError {
    /// Configuration file not found.
    #[error("Configuration file not found: {0}")]
    NotFound(PathBuf),

    /// File extension does not map to a known configuration format.
    #[error("Unsupported configuration format: {0} (expected .toml, .json, .yaml or .yml)")]
    UnsupportedFormat(PathBuf),

    /// Raw configuration could not be decoded.
    #[error("Failed to parse {format} configuration: {message}")]
    Parse { format: ConfigFormat, message: String },

    /// Output could not be rendered.
    #[error("Serialization error: {0}")]
    Serialize(String),

    /// The configure cycle produced error diagnostics.
    #[error("Configuration rejected: {0}")]
    Rejected(Diagnostics),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<Diagnostics> for ProviderError {
    fn from(diagnostics: Diagnostics) -> Self {
        Self::Rejected(diagnostics)
    }
}
