//! Command-line front-end.
//!
//! ```text
//! toolbelt                      list tools
//! toolbelt -h | --help | help   list tools
//! toolbelt --mcp-server         serve JSON-RPC on the configured transport
//! toolbelt <tool> -h            tool help
//! toolbelt <tool> [-name value]...
//! ```

use std::io::Write;
use std::process::ExitCode;

use tracing::{debug, instrument};

use super::error::Result;
use super::server::ToolServer;
use super::transport::TransportService;
use crate::domains::tools::{ToolRegistry, parse_flags, render_help, render_output};

/// Name used in help and hint lines.
pub const PROGRAM: &str = env!("CARGO_PKG_NAME");

const HELP_FLAGS: &[&str] = &["-h", "--help"];
const SERVE_FLAG: &str = "--mcp-server";

/// How a command-line invocation ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CliOutcome {
    Success,
    Failure,
}

impl From<CliOutcome> for ExitCode {
    fn from(outcome: CliOutcome) -> Self {
        match outcome {
            CliOutcome::Success => ExitCode::SUCCESS,
            CliOutcome::Failure => ExitCode::FAILURE,
        }
    }
}

/// What the arguments ask for.
#[derive(Debug, PartialEq, Eq)]
pub enum Command<'a> {
    Help,
    Serve,
    ToolHelp(&'a str),
    Run { tool: &'a str, tokens: &'a [String] },
}

impl<'a> Command<'a> {
    /// Classify arguments (program name excluded).
    pub fn parse(args: &'a [String]) -> Self {
        let Some((first, rest)) = args.split_first() else {
            return Self::Help;
        };

        match first.as_str() {
            "help" => Self::Help,
            flag if HELP_FLAGS.contains(&flag) => Self::Help,
            SERVE_FLAG => Self::Serve,
            tool => match rest.first() {
                Some(flag) if HELP_FLAGS.contains(&flag.as_str()) => Self::ToolHelp(tool),
                _ => Self::Run { tool, tokens: rest },
            },
        }
    }
}

/// Runs one command against a discovered registry.
pub struct CommandLine {
    server: ToolServer,
}

impl CommandLine {
    pub fn new(server: ToolServer) -> Self {
        Self { server }
    }

    fn registry(&self) -> &ToolRegistry {
        self.server.dispatcher().registry()
    }

    /// Execute `args`, writing results to `out` and diagnostics to `err`.
    ///
    /// User errors are reported and turned into [`CliOutcome::Failure`];
    /// only I/O and transport failures are returned as `Err`.
    pub async fn run<W, E>(&self, args: &[String], out: &mut W, err: &mut E) -> Result<CliOutcome>
    where
        W: Write,
        E: Write,
    {
        match Command::parse(args) {
            Command::Help => {
                self.print_help(out)?;
                Ok(CliOutcome::Success)
            }
            Command::Serve => {
                let transport = TransportService::new(self.server.config().transport.clone());
                transport.run(self.server.clone()).await?;
                Ok(CliOutcome::Success)
            }
            Command::ToolHelp(tool) => self.print_tool_help(tool, out, err),
            Command::Run { tool, tokens } => self.run_tool(tool, tokens, out, err).await,
        }
    }

    /// List every tool with its one-line description.
    pub fn print_help<W: Write>(&self, out: &mut W) -> Result<()> {
        let title = format!("{PROGRAM} - extensible command runner");
        writeln!(out, "{title}")?;
        writeln!(out, "{}", "=".repeat(50))?;
        writeln!(out)?;

        if self.registry().is_empty() {
            writeln!(out, "No tools available.")?;
        } else {
            writeln!(out, "Available tools:")?;
            for descriptor in self.registry().descriptors() {
                writeln!(out, "  {:<15} - {}", descriptor.name(), descriptor.description())?;
            }
        }

        writeln!(out)?;
        writeln!(out, "Usage:")?;
        writeln!(out, "  Show help:        {PROGRAM} -h")?;
        writeln!(out, "  Tool help:        {PROGRAM} <tool> -h")?;
        writeln!(out, "  Run a tool:       {PROGRAM} <tool> [-param value] ...")?;
        writeln!(out, "  Protocol server:  {PROGRAM} {SERVE_FLAG}")?;
        Ok(())
    }

    fn print_tool_help<W: Write, E: Write>(&self, tool: &str, out: &mut W, err: &mut E) -> Result<CliOutcome> {
        match self.registry().get(tool) {
            Some(descriptor) => {
                writeln!(out, "{}", render_help(descriptor, PROGRAM))?;
                Ok(CliOutcome::Success)
            }
            None => {
                writeln!(err, "Error: Unknown tool: {tool}")?;
                self.print_tool_names(err)?;
                Ok(CliOutcome::Failure)
            }
        }
    }

    #[instrument(skip(self, tokens, out, err))]
    async fn run_tool<W: Write, E: Write>(
        &self,
        tool: &str,
        tokens: &[String],
        out: &mut W,
        err: &mut E,
    ) -> Result<CliOutcome> {
        let Some(descriptor) = self.registry().get(tool) else {
            writeln!(err, "Error: Unknown tool: {tool}")?;
            self.print_tool_names(err)?;
            writeln!(err)?;
            writeln!(err, "Hint: run '{PROGRAM} -h' to list all tools")?;
            return Ok(CliOutcome::Failure);
        };

        let outcome = match parse_flags(tokens, descriptor.schema()) {
            Ok(raw) => self.server.call_tool(tool, raw).await,
            Err(e) => Err(e),
        };

        match outcome {
            Ok(result) => {
                debug!("Tool '{}' succeeded", tool);
                if !result.is_null() {
                    writeln!(out, "{}", render_output(&result))?;
                }
                Ok(CliOutcome::Success)
            }
            Err(e) => {
                writeln!(err, "Error: {e}")?;
                writeln!(err, "Hint: run '{PROGRAM} {tool} -h' for usage")?;
                Ok(CliOutcome::Failure)
            }
        }
    }

    fn print_tool_names<E: Write>(&self, err: &mut E) -> Result<()> {
        writeln!(err)?;
        writeln!(err, "Available tools:")?;
        for name in self.registry().tool_names() {
            writeln!(err, "  {name}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Config;
    use crate::domains::tools::definitions::test_support::StaticTool;
    use crate::domains::tools::{ParamSpec, ParamType, Schema};
    use serde_json::json;
    use std::sync::Arc;

    fn args(tokens: &[&str]) -> Vec<String> {
        tokens.iter().map(|t| t.to_string()).collect()
    }

    fn command_line(registry: ToolRegistry) -> CommandLine {
        CommandLine::new(ToolServer::new(Arc::new(Config::default()), registry))
    }

    fn sample() -> CommandLine {
        let mut registry = ToolRegistry::new();
        registry.register(
            StaticTool::new(
                "add",
                Schema::new()
                    .param("a", ParamSpec::required(ParamType::Int, "First operand"))
                    .param("b", ParamSpec::optional(ParamType::Int, "Second operand")),
            )
            .with_description("Echo integer operands")
            .echoing()
            .descriptor(),
        );
        registry.register(
            StaticTool::new("quiet", Schema::new())
                .replying(json!(null))
                .descriptor(),
        );
        registry.register(
            StaticTool::new("greet", Schema::new())
                .replying(json!("hello"))
                .descriptor(),
        );
        command_line(registry)
    }

    async fn run(cli: &CommandLine, tokens: &[&str]) -> (CliOutcome, String, String) {
        let mut out = Vec::new();
        let mut err = Vec::new();
        let outcome = cli.run(&args(tokens), &mut out, &mut err).await.unwrap();
        (
            outcome,
            String::from_utf8(out).unwrap(),
            String::from_utf8(err).unwrap(),
        )
    }

    #[test]
    fn test_command_parse() {
        assert_eq!(Command::parse(&[]), Command::Help);
        assert_eq!(Command::parse(&args(&["help"])), Command::Help);
        assert_eq!(Command::parse(&args(&["--help"])), Command::Help);
        assert_eq!(Command::parse(&args(&["--mcp-server"])), Command::Serve);
        assert_eq!(Command::parse(&args(&["ping", "-h"])), Command::ToolHelp("ping"));
        let tokens = args(&["add", "-a", "1"]);
        assert_eq!(
            Command::parse(&tokens),
            Command::Run {
                tool: "add",
                tokens: &tokens[1..]
            }
        );
    }

    #[tokio::test]
    async fn test_global_help_lists_tools() {
        let (outcome, out, _) = run(&sample(), &[]).await;
        assert_eq!(outcome, CliOutcome::Success);
        assert!(out.contains("  add             - Echo integer operands"));
        assert!(out.contains("toolbelt --mcp-server"));
    }

    #[tokio::test]
    async fn test_global_help_empty_registry() {
        let (_, out, _) = run(&command_line(ToolRegistry::new()), &["-h"]).await;
        assert!(out.contains("No tools available."));
    }

    #[tokio::test]
    async fn test_tool_help() {
        let (outcome, out, _) = run(&sample(), &["add", "--help"]).await;
        assert_eq!(outcome, CliOutcome::Success);
        assert!(out.starts_with("Tool: add\n"));
        assert!(out.contains("toolbelt add -a <value> [-b <value>]"));

        let (outcome, _, err) = run(&sample(), &["nope", "-h"]).await;
        assert_eq!(outcome, CliOutcome::Failure);
        assert!(err.contains("Unknown tool: nope"));
        assert!(err.contains("  add\n"));
    }

    #[tokio::test]
    async fn test_run_prints_coerced_result() {
        let (outcome, out, err) = run(&sample(), &["add", "-a", "2", "-b", "40"]).await;
        assert_eq!(outcome, CliOutcome::Success, "{err}");
        let printed: serde_json::Value = serde_json::from_str(out.trim()).unwrap();
        assert_eq!(printed, json!({"a": 2, "b": 40}));
    }

    #[tokio::test]
    async fn test_run_output_forms() {
        let (_, out, _) = run(&sample(), &["greet"]).await;
        assert_eq!(out, "hello\n");

        let (outcome, out, _) = run(&sample(), &["quiet"]).await;
        assert_eq!(outcome, CliOutcome::Success);
        assert!(out.is_empty());
    }

    #[tokio::test]
    async fn test_run_errors_carry_hint() {
        let (outcome, out, err) = run(&sample(), &["add", "-a"]).await;
        assert_eq!(outcome, CliOutcome::Failure);
        assert!(out.is_empty());
        assert!(err.contains("Error: Parameter a requires a value"));
        assert!(err.contains("Hint: run 'toolbelt add -h' for usage"));

        let (_, _, err) = run(&sample(), &["add", "-b", "1"]).await;
        assert!(err.contains("Missing required parameter: a"));

        let (_, _, err) = run(&sample(), &["add", "-a", "one"]).await;
        assert!(err.contains("Invalid value 'one' for parameter 'a'"));
    }

    #[tokio::test]
    async fn test_run_unknown_tool() {
        let (outcome, _, err) = run(&sample(), &["nope", "-x", "1"]).await;
        assert_eq!(outcome, CliOutcome::Failure);
        assert!(err.contains("Error: Unknown tool: nope"));
        assert!(err.contains("Hint: run 'toolbelt -h' to list all tools"));
    }
}
