//! Transport layer for the protocol mode.
//!
//! Every transport runs the same line-delimited loop (`lines.rs`):
//! - **STDIO**: stdin/stdout, the default - feature: `stdio`
//! - **TCP**: one client connection at a time - feature: `tcp`

mod config;
mod error;
pub mod jsonrpc;
pub mod lines;
mod service;

#[cfg(feature = "tcp")]
pub mod tcp;

#[cfg(feature = "stdio")]
pub mod stdio;

pub use config::TransportConfig;
pub use error::{TransportError, TransportResult};
pub use jsonrpc::{JsonRpcError, JsonRpcRequest, JsonRpcResponse};
pub use lines::serve_lines;
pub use service::TransportService;

#[cfg(feature = "tcp")]
pub use config::TcpConfig;
