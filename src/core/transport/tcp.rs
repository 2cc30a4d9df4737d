//! TCP transport implementation.
//!
//! Line-delimited JSON-RPC over a TCP socket. Connections are served one at
//! a time: the next client is accepted once the current one disconnects.

use tokio::io::BufReader;
use tokio::net::{TcpListener, TcpStream};
use tracing::{info, warn};

use super::lines::serve_lines;
use super::{TransportError, TransportResult, config::TcpConfig};
use crate::core::ToolServer;

/// TCP transport handler.
pub struct TcpTransport {
    config: TcpConfig,
}

impl TcpTransport {
    /// Create a new TCP transport with the given config.
    pub fn new(config: TcpConfig) -> Self {
        Self { config }
    }

    /// Get the bind address.
    pub fn address(&self) -> String {
        format!("{}:{}", self.config.host, self.config.port)
    }

    /// Bind and serve until Ctrl-C.
    pub async fn run(self, server: ToolServer) -> TransportResult<()> {
        let addr = self.address();

        let listener = TcpListener::bind(&addr)
            .await
            .map_err(|e| TransportError::bind(&addr, e))?;

        info!("Ready - listening on {} (JSON-RPC over TCP)", addr);

        tokio::select! {
            _ = Self::accept_loop(&server, &listener) => {}
            _ = tokio::signal::ctrl_c() => info!("Shutdown requested"),
        }

        info!("TCP transport finished");
        Ok(())
    }

    pub(crate) async fn accept_loop(server: &ToolServer, listener: &TcpListener) {
        loop {
            match listener.accept().await {
                Ok((stream, peer_addr)) => {
                    info!("Accepted connection from {}", peer_addr);
                    Self::handle_connection(server, stream, peer_addr).await;
                }
                Err(e) => {
                    warn!("Failed to accept connection: {}", e);
                    // Small delay to avoid spinning on persistent errors
                    tokio::time::sleep(tokio::time::Duration::from_millis(100)).await;
                }
            }
        }
    }

    /// Serve a single connection to completion.
    async fn handle_connection(server: &ToolServer, stream: TcpStream, peer_addr: std::net::SocketAddr) {
        if let Err(e) = stream.set_nodelay(true) {
            warn!("Failed to set TCP_NODELAY for {}: {}", peer_addr, e);
        }

        let (read_half, write_half) = stream.into_split();
        let result = serve_lines(
            server,
            BufReader::new(read_half),
            write_half,
            std::future::pending(),
        )
        .await;

        match result {
            Ok(()) => info!("Client {} disconnected cleanly", peer_addr),
            Err(e) => warn!("Error while serving client {}: {}", peer_addr, e),
        }
    }
}
