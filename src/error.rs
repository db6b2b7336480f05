//! Error types for multikv
//!
//! The data store itself answers with `Option` results; parse and
//! argument errors explain an absent result in the logs, the rest carry
//! failures of the protocol and network layers.

use thiserror::Error;

/// Result type alias using Error
pub type Result<T> = std::result::Result<T, Error>;

/// Unified error type for multikv operations
#[derive(Debug, Error)]
pub enum Error {
    // -------------------------------------------------------------------------
    // Data Store Outcomes
    // -------------------------------------------------------------------------
    #[error("Parse failure: {0}")]
    ParseFailure(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    // -------------------------------------------------------------------------
    // I/O Errors
    // -------------------------------------------------------------------------
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // -------------------------------------------------------------------------
    // Network Errors
    // -------------------------------------------------------------------------
    #[error("Network error: {0}")]
    Network(String),

    #[error("Protocol error: {0}")]
    Protocol(String),

    #[error("Unknown command '{0}'")]
    UnknownCommand(String),

    // -------------------------------------------------------------------------
    // Configuration Errors
    // -------------------------------------------------------------------------
    #[error("Configuration error: {0}")]
    Config(String),
}
