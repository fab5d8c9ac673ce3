//! Error types for Louhos.

use thiserror::Error;

/// Top-level error type for Louhos operations.
#[derive(Debug, Error)]
pub enum LouhosError {
    /// Configuration errors
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration file errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The file could not be read
    #[error("Failed to read {path}: {source}")]
    Read {
        /// Path that was read
        path: String,
        /// Underlying IO error
        source: std::io::Error,
    },

    /// The file is not valid TOML for the expected schema
    #[error("Failed to parse {path}: {message}")]
    Parse {
        /// Path that was parsed
        path: String,
        /// Parser message
        message: String,
    },

    /// The configuration could not be written
    #[error("Failed to write config: {0}")]
    Write(String),
}

/// Result type alias for Louhos operations.
pub type LouhosResult<T> = Result<T, LouhosError>;
