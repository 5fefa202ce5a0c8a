//! Command-line interface definitions

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use droidtail_device_bridge::{LogBuffer, LogLevel};

/// Process-scoped Android logcat tailing that survives app restarts
#[derive(Debug, Parser)]
#[command(name = "droidtail", version, about)]
pub struct Cli {
    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Tail the device log, scoped to the app's current process
    Logs(LogsArgs),
    /// List attached devices
    Devices(DevicesArgs),
    /// Show project identity from the Gradle build script
    Info(InfoArgs),
}

#[derive(Debug, Args)]
pub struct LogsArgs {
    /// Device serial to use when several are attached
    #[arg(short = 's', long = "device")]
    pub device: Option<String>,

    /// Package to follow; read from app/build.gradle when omitted
    #[arg(short, long)]
    pub package: Option<String>,

    /// Minimum priority to display (V, D, I, W, E, F)
    #[arg(short, long)]
    pub level: Option<LogLevel>,

    /// Only show records whose tag contains this string
    #[arg(long)]
    pub tag: Option<String>,

    /// Only show records whose message contains this string
    #[arg(long)]
    pub grep: Option<String>,

    /// Logcat buffer to read (main, system, radio, events, crash, all)
    #[arg(short, long)]
    pub buffer: Option<LogBuffer>,

    /// Clear the device-side buffer before tailing
    #[arg(long)]
    pub clear: bool,
}

#[derive(Debug, Args)]
pub struct DevicesArgs {
    /// Print the device list as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Args)]
pub struct InfoArgs {
    /// Project directory containing app/build.gradle
    #[arg(default_value = ".")]
    pub path: PathBuf,

    /// Print the project info as JSON
    #[arg(long)]
    pub json: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_logs_flags() {
        let cli = Cli::parse_from([
            "droidtail", "logs", "-s", "emulator-5554", "--package", "com.example.demo",
            "--level", "w", "--clear",
        ]);
        match cli.command {
            Command::Logs(args) => {
                assert_eq!(args.device.as_deref(), Some("emulator-5554"));
                assert_eq!(args.package.as_deref(), Some("com.example.demo"));
                assert_eq!(args.level, Some(LogLevel::Warning));
                assert!(args.clear);
                assert!(args.buffer.is_none());
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }
}
