//! Toolbelt library
//!
//! An extensible command runner. Tools describe their parameters with a
//! declarative schema; the runner discovers them once at startup, validates
//! and coerces arguments against that schema, and invokes them either from
//! the command line or over line-delimited JSON-RPC.
//!
//! # Architecture
//!
//! - **core**: configuration, error handling, the CLI front-end, the protocol
//!   server and its transports
//! - **domains**: business logic organized by bounded contexts
//!   - **tools**: schemas, coercion, flag parsing, registry, discovery,
//!     dispatch and the builtin tools
//!
//! # Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use toolbelt::core::{Config, ToolServer};
//! use toolbelt::domains::tools::PluginDiscovery;
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::from_env()?;
//!     let registry = PluginDiscovery::new(&config.plugins).discover().await;
//!     let server = ToolServer::new(Arc::new(config), registry);
//!     println!("{} tools", server.list_tools().len());
//!     Ok(())
//! }
//! ```

pub mod core;
pub mod domains;

// Re-export commonly used types for convenience
pub use core::{Config, Error, Result, ToolServer};
