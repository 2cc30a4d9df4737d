//! Tool-specific error types.
//!
//! `ToolError` is the taxonomy every layer of the registry subsystem
//! (coercion, flag parsing, dispatch) reports with. `DiscoveryError` never
//! leaves discovery: it is logged as a warning and the candidate is skipped.

use std::path::PathBuf;
use std::process::ExitStatus;

use thiserror::Error;

use super::schema::ParamType;

/// Errors that can occur while resolving, validating or running a tool.
#[derive(Debug, Error)]
pub enum ToolError {
    /// The requested tool is not in the registry.
    #[error("Unknown tool: {0}")]
    UnknownTool(String),

    /// An argument was supplied that the schema does not declare.
    #[error("Unknown parameter: {0}")]
    UnknownParameter(String),

    /// A parameter marked required was not supplied.
    #[error("Missing required parameter: {0}")]
    MissingRequiredParameter(String),

    /// A value could not be converted to the declared type.
    #[error("Invalid value '{value}' for parameter '{name}': expected {expected}")]
    TypeCoercion {
        name: String,
        value: String,
        expected: ParamType,
    },

    /// A flag was the last token and had no value after it.
    #[error("Parameter {0} requires a value")]
    MalformedFlag(String),

    /// A token that is neither a flag nor a flag's value.
    #[error("Unexpected argument: {0}")]
    UnexpectedPositionalToken(String),

    /// The tool itself failed while executing.
    #[error("Tool '{name}' failed: {source:#}")]
    Execution {
        name: String,
        #[source]
        source: anyhow::Error,
    },
}

impl ToolError {
    /// Create a new "unknown tool" error.
    pub fn unknown_tool(name: impl Into<String>) -> Self {
        Self::UnknownTool(name.into())
    }

    /// Create a new "unknown parameter" error.
    pub fn unknown_parameter(name: impl Into<String>) -> Self {
        Self::UnknownParameter(name.into())
    }

    /// Create a new "missing required parameter" error.
    pub fn missing_required(name: impl Into<String>) -> Self {
        Self::MissingRequiredParameter(name.into())
    }

    /// Create a new type coercion error.
    pub fn type_coercion(name: impl Into<String>, value: impl Into<String>, expected: ParamType) -> Self {
        Self::TypeCoercion {
            name: name.into(),
            value: value.into(),
            expected,
        }
    }

    /// Create a new "execution failed" error, keeping the cause chain.
    pub fn execution(name: impl Into<String>, source: anyhow::Error) -> Self {
        Self::Execution {
            name: name.into(),
            source,
        }
    }

    /// Whether this error was caused by the caller's input rather than the tool.
    pub fn is_usage_error(&self) -> bool {
        !matches!(self, Self::Execution { .. } | Self::UnknownTool(_))
    }
}

/// Why a plugin candidate could not be loaded.
#[derive(Debug, Error)]
pub enum DiscoveryError {
    /// The plugin directory or a candidate could not be read.
    #[error("Cannot read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The candidate could not be started.
    #[error("Cannot start plugin: {0}")]
    Spawn(#[source] std::io::Error),

    /// The candidate did not answer `--describe` in time.
    #[error("Plugin did not describe itself within {0}s")]
    Timeout(u64),

    /// The candidate exited unsuccessfully when asked to describe itself.
    #[error("Plugin description failed ({status}): {stderr}")]
    DescribeFailed { status: ExitStatus, stderr: String },

    /// The description printed by the candidate is not valid.
    #[error("Invalid plugin description: {0}")]
    InvalidDescription(#[from] serde_json::Error),
}
