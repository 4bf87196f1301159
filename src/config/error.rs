//! Configuration error types.

use crate::builder::BuildError;
use thiserror::Error;

/// Errors that can occur while loading a declaration from configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The document is not a valid declaration
    #[error("Failed to parse declaration: {0}")]
    Parse(String),

    /// The declaration could not be written out
    #[error("Failed to serialize declaration: {0}")]
    Serialize(String),

    /// The declaration parsed but does not describe a valid kind
    #[error("Invalid declaration: {0}")]
    Build(#[from] BuildError),
}
