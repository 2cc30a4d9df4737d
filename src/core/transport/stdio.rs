//! STDIO transport implementation.
//!
//! Requests on stdin, responses on stdout. Logs go to stderr.

use tokio::io::BufReader;
use tracing::info;

use super::TransportResult;
use super::lines::serve_lines;
use crate::core::ToolServer;

/// STDIO transport handler.
pub struct StdioTransport;

impl StdioTransport {
    /// Run until stdin closes or Ctrl-C is received.
    pub async fn run(server: ToolServer) -> TransportResult<()> {
        info!("Ready - communicating via stdin/stdout");

        let stdin = BufReader::new(tokio::io::stdin());
        let stdout = tokio::io::stdout();
        let interrupt = async {
            // Without a signal handler only end of input stops the loop.
            if tokio::signal::ctrl_c().await.is_err() {
                std::future::pending::<()>().await;
            }
        };

        serve_lines(&server, stdin, stdout, interrupt).await?;

        info!("STDIO transport finished");
        Ok(())
    }
}
