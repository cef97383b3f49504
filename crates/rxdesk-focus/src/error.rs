//! Error types for focus management

use thiserror::Error;

use crate::types::ScopeId;

/// Result type for focus manager operations
pub type FocusResult<T> = Result<T, FocusError>;

/// Errors returned by element adapters.
///
/// The focus core never propagates these; it logs them and carries on.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AdapterError {
    #[error("Adapter does not implement {0}")]
    Unsupported(&'static str),

    #[error("Native widget refused the request: {0}")]
    Refused(String),
}

/// Errors that can occur in the focus manager
#[derive(Debug, Error)]
pub enum FocusError {
    #[error("Unknown or released scope: {0}")]
    UnknownScope(ScopeId),

    #[error("The root scope is released only by shutting the focus manager down")]
    RootScope,

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

/// Errors that can occur while loading or saving configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid configuration: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Serialization error: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("Could not determine config directory")]
    NoConfigDir,
}
