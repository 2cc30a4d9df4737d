//! Core module containing shared infrastructure components.
//!
//! Configuration, error handling, the command-line front-end, the JSON-RPC
//! server and the transports it runs on.

pub mod cli;
pub mod config;
pub mod error;
pub mod server;
pub mod transport;

pub use cli::{CliOutcome, CommandLine};
pub use config::Config;
pub use error::{Error, Result};
pub use server::ToolServer;
pub use transport::{TransportConfig, TransportService};
