//! Toolbelt entry point.
//!
//! Loads configuration, initializes logging, discovers tools and hands the
//! command line over to the CLI front-end.

use std::process::ExitCode;
use std::sync::Arc;

use tracing::{Level, error, info};
use tracing_subscriber::{EnvFilter, fmt};

use toolbelt::core::config::LoggingConfig;
use toolbelt::core::{CommandLine, Config, ToolServer};
use toolbelt::domains::tools::PluginDiscovery;

fn main() -> ExitCode {
    // Load configuration from environment
    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {e}");
            return ExitCode::FAILURE;
        }
    };

    init_logging(&config.logging);

    let runtime = match tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            eprintln!("Error: cannot start the async runtime: {e}");
            return ExitCode::FAILURE;
        }
    };

    let code = runtime.block_on(run(config));

    // Do not wait on a pending stdin read left on the blocking pool.
    runtime.shutdown_background();
    code
}

async fn run(config: Config) -> ExitCode {
    info!("Starting {} v{}", config.server.name, config.server.version);

    let registry = PluginDiscovery::new(&config.plugins).discover().await;
    let cli = CommandLine::new(ToolServer::new(Arc::new(config), registry));

    let args: Vec<String> = std::env::args_os()
        .skip(1)
        .map(|arg| arg.to_string_lossy().into_owned())
        .collect();

    match cli.run(&args, &mut std::io::stdout(), &mut std::io::stderr()).await {
        Ok(outcome) => outcome.into(),
        Err(e) => {
            error!("Fatal: {}", e);
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

/// Initialize the logging subsystem.
///
/// Logs always go to stderr; stdout carries tool output and protocol lines.
fn init_logging(logging: &LoggingConfig) {
    let level = match logging.level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "error" => Level::ERROR,
        _ => Level::WARN,
    };

    let filter = EnvFilter::from_default_env().add_directive(level.into());

    let builder = fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .with_writer(std::io::stderr);

    if logging.with_timestamps {
        builder.init();
    } else {
        builder.without_time().init();
    }
}
