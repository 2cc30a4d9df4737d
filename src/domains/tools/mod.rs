//! Tools domain module.
//!
//! This module is the tool registry and dispatch subsystem: the plugin
//! contract, discovery, parameter schemas, validation and coercion,
//! command-line flag parsing, and dispatch.
//!
//! ## Architecture
//!
//! - `handlers.rs` - The `ToolHandler` contract (describe + execute)
//! - `schema.rs` - Declarative parameter schemas
//! - `args.rs` - Raw and typed argument maps
//! - `coercion.rs` - Schema validation and type coercion
//! - `flags.rs` - `-name value` parsing and help text
//! - `registry.rs` - Name to descriptor map
//! - `discovery.rs` - Builds the registry from builtins and plugins
//! - `external.rs` - Out-of-process plugin executables
//! - `dispatcher.rs` - Resolve, validate, execute
//! - `definitions/` - Builtin tools (one file per tool)
//! - `error.rs` - Tool-specific error types

pub mod args;
pub mod coercion;
pub mod definitions;
pub mod discovery;
pub mod dispatcher;
mod error;
pub mod external;
pub mod flags;
mod handlers;
mod registry;
pub mod schema;

pub use args::{RawArgs, ToolArgs};
pub use coercion::validate;
pub use discovery::PluginDiscovery;
pub use dispatcher::Dispatcher;
pub use error::{DiscoveryError, ToolError};
pub use external::ExternalTool;
pub use flags::{parse_flags, render_help};
pub use handlers::{ToolHandler, render_output};
pub use registry::{ToolDescriptor, ToolRegistry};
pub use schema::{ParamSpec, ParamType, Schema, ToolDescription};
