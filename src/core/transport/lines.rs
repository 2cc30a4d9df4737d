//! Line-delimited request loop shared by every transport.
//!
//! One JSON object per input line, one response line per answered request.
//! Requests are handled strictly one after the other.

use std::future::Future;

use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tracing::{debug, info, warn};

use super::TransportResult;
use super::jsonrpc::JsonRpcResponse;
use crate::core::ToolServer;

/// Serve requests read from `reader` until end of input or `shutdown`
/// completes.
///
/// Bad input never ends the loop. A failure of the streams themselves does,
/// since nothing more could be delivered.
pub async fn serve_lines<R, W, F>(
    server: &ToolServer,
    mut reader: R,
    mut writer: W,
    shutdown: F,
) -> TransportResult<()>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
    F: Future<Output = ()>,
{
    tokio::pin!(shutdown);
    let mut buf = Vec::new();

    loop {
        buf.clear();
        let read = tokio::select! {
            _ = &mut shutdown => {
                info!("Shutdown requested");
                break;
            }
            read = reader.read_until(b'\n', &mut buf) => read?,
        };

        if read == 0 {
            info!("End of input");
            break;
        }

        let line = match std::str::from_utf8(&buf) {
            Ok(line) => line.trim(),
            Err(e) => {
                warn!("Skipping input line that is not valid UTF-8: {}", e);
                continue;
            }
        };
        if line.is_empty() {
            continue;
        }

        if let Some(response) = server.handle_line(line).await {
            write_response(&mut writer, &response).await?;
        }
    }

    Ok(())
}

async fn write_response<W>(writer: &mut W, response: &JsonRpcResponse) -> TransportResult<()>
where
    W: AsyncWrite + Unpin,
{
    let mut payload = serde_json::to_vec(response).map_err(std::io::Error::from)?;
    payload.push(b'\n');
    writer.write_all(&payload).await?;
    writer.flush().await?;
    debug!("Response written ({} bytes)", payload.len());
    Ok(())
}
