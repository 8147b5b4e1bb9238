//! Error types for the simulation core.
//!
//! A stale target id is deliberately *not* an error: behavior states recover
//! from it by falling back to exploring. Errors here are configuration
//! problems that should surface at setup time.

use crate::model::brain::StateName;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SimError {
    /// A state machine was asked to enter a state it never registered.
    #[error("state not registered: {0}")]
    UnknownState(StateName),

    /// File system errors while loading configuration
    #[error("file system error: {0}")]
    FileSystem(#[from] std::io::Error),

    /// TOML parsing errors
    #[error("config parse error: {0}")]
    Config(#[from] toml::de::Error),
}

/// Result type alias for simulation setup operations.
pub type Result<T> = std::result::Result<T, SimError>;
