//! Error types and handling for the tool runner.
//!
//! This module defines a unified error type that can represent errors from
//! the tools domain, the transports and the process environment.

use thiserror::Error;

use super::transport::TransportError;
use crate::domains::tools::ToolError;

/// A specialized Result type for runner operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Unified error type for the runner.
#[derive(Debug, Error)]
pub enum Error {
    /// Error originating from the tools domain.
    #[error(transparent)]
    Tool(#[from] ToolError),

    /// Error while serving the protocol.
    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),

    /// Configuration-related errors.
    #[error("Configuration error: {0}")]
    Config(String),

    /// I/O errors on the standard streams.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Create a new configuration error.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }
}
