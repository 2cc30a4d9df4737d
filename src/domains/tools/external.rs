//! Out-of-process plugins.
//!
//! A plugin is an executable answering two invocations:
//!
//! - `<plugin> --describe` prints its description as one JSON object;
//! - `<plugin> --execute` reads the typed arguments as a JSON object on
//!   stdin and prints the result on stdout. A non-zero exit is a failure
//!   and stderr is reported as the cause.

use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Duration;

use anyhow::{Context, bail};
use serde_json::Value;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tracing::{debug, instrument};

use super::args::ToolArgs;
use super::error::DiscoveryError;
use super::handlers::ToolHandler;
use super::schema::ToolDescription;

pub const DESCRIBE_FLAG: &str = "--describe";
pub const EXECUTE_FLAG: &str = "--execute";

/// A tool backed by a plugin executable.
#[derive(Debug, Clone)]
pub struct ExternalTool {
    path: PathBuf,
    description: ToolDescription,
}

impl ExternalTool {
    /// Ask the executable at `path` to describe itself.
    #[instrument(skip_all, fields(path = %path.display()))]
    pub async fn load(path: &Path, timeout: Duration) -> Result<Self, DiscoveryError> {
        let mut command = Command::new(path);
        command
            .arg(DESCRIBE_FLAG)
            .stdin(Stdio::null())
            .kill_on_drop(true);

        let output = tokio::time::timeout(timeout, command.output())
            .await
            .map_err(|_| DiscoveryError::Timeout(timeout.as_secs()))?
            .map_err(DiscoveryError::Spawn)?;

        if !output.status.success() {
            return Err(DiscoveryError::DescribeFailed {
                status: output.status,
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        let description: ToolDescription = serde_json::from_slice(&output.stdout)?;
        debug!("Plugin describes itself as '{}'", description.name);

        Ok(Self {
            path: path.to_path_buf(),
            description,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait::async_trait]
impl ToolHandler for ExternalTool {
    fn describe(&self) -> ToolDescription {
        self.description.clone()
    }

    async fn execute(&self, args: ToolArgs) -> anyhow::Result<Value> {
        let mut child = Command::new(&self.path)
            .arg(EXECUTE_FLAG)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .with_context(|| format!("Cannot start plugin {}", self.path.display()))?;

        let payload = serde_json::to_vec(&args.to_json())?;
        let stdin = child.stdin.take();
        let send_args = async move {
            let Some(mut stdin) = stdin else {
                return Ok(());
            };
            match stdin.write_all(&payload).await {
                // A plugin that ignores its input may exit before reading it.
                Err(e) if e.kind() != std::io::ErrorKind::BrokenPipe => Err(e),
                _ => Ok(()),
            }
        };

        // Output is collected while the arguments are still being written.
        let (sent, output) = tokio::join!(send_args, child.wait_with_output());
        sent.context("Cannot send arguments to plugin")?;
        let output = output.context("Plugin did not finish")?;

        if !output.status.success() {
            bail!(
                "plugin exited with {}: {}",
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            );
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        let text = stdout.trim();
        Ok(serde_json::from_str(text).unwrap_or_else(|_| Value::String(text.to_string())))
    }
}
