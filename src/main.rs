//! droidtail - process-scoped Android log tailing
//!
//! Entry point: parse the CLI, initialize logging and configuration, and
//! dispatch to the subcommand executors.

use clap::Parser;
use tracing::warn;
use tracing_subscriber::EnvFilter;

use droidtail::cli::{Cli, Command};
use droidtail::commands;
use droidtail_core::AppConfig;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = match AppConfig::load() {
        Ok(config) => config,
        Err(err) => {
            warn!("failed to load configuration, using defaults: {err}");
            AppConfig::default()
        }
    };

    let result = match cli.command {
        Command::Logs(args) => commands::logs(&config, args).await,
        Command::Devices(args) => commands::devices(&config, args).await,
        Command::Info(args) => commands::info(args).await,
    };

    if let Err(err) = result {
        eprintln!("error: {err:#}");
        std::process::exit(1);
    }
}

/// Route diagnostics to stderr so they never interleave with the log
/// stream on stdout. `-v` raises the default level; `RUST_LOG` overrides
/// it entirely.
fn init_tracing(verbosity: u8) {
    let default_level = match verbosity {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
