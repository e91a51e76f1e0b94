//! Common error types for chessrate

use thiserror::Error;

/// Common result type for chessrate operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised while loading configuration or touching local state files
#[derive(Error, Debug)]
pub enum Error {
    /// I/O operation error (wraps std::io::Error)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration loading or validation error
    #[error("Configuration error: {0}")]
    Config(String),

    /// TOML file present but not parseable
    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    /// Value could not be serialized to TOML
    #[error("TOML write error: {0}")]
    TomlWrite(#[from] toml::ser::Error),

    /// Invalid user input or request parameter
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}
