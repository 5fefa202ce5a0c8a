//! CLI commands for droidtail
//!
//! One executor per subcommand. Device selection and terminal rendering
//! live here; everything stateful is in the workspace crates.

use std::io::{self, Write};

use anyhow::{anyhow, bail, Context, Result};
use is_terminal::IsTerminal;
use owo_colors::OwoColorize;
use tokio::sync::mpsc;
use tracing::info;

use droidtail_core::{AppConfig, ProjectInfo};
use droidtail_device_bridge::{
    AdbClient, Device, LogEntry, LogFilter, LogLevel, LogcatReader, ProcessResolver,
};
use droidtail_log_tailer::{TailError, TailSession, Transition};

use crate::cli::{DevicesArgs, InfoArgs, LogsArgs};

/// `droidtail logs`: the tailing loop
pub async fn logs(config: &AppConfig, args: LogsArgs) -> Result<()> {
    let adb = adb_client(config)?;
    let pinned = args.device.as_deref().or(config.default_device.as_deref());
    let device = pick_device(&adb, pinned).await?;

    let package = match args.package {
        Some(package) => package,
        None => {
            let cwd = std::env::current_dir()?;
            ProjectInfo::load(&cwd)
                .map(|info| info.application_id)
                .context("no --package given and no applicationId found in app/build.gradle")?
        }
    };

    let buffer = match args.buffer {
        Some(buffer) => buffer,
        None => config
            .log_buffer
            .parse()
            .map_err(|err| anyhow!("bad log_buffer in config: {err}"))?,
    };

    let reader = LogcatReader::new(adb.clone(), device.serial.as_str()).with_buffer(buffer);
    if args.clear {
        reader.clear().await?;
    }

    let filter = LogFilter {
        min_level: args.level,
        tag_contains: args.tag,
        message_contains: args.grep,
    };

    info!("tailing {} on {}", package, device.display_name());

    let records = reader.stream()?;
    let resolver = ProcessResolver::new(adb, device.serial.as_str(), package.as_str());
    let session = TailSession::new(config.poll_interval());

    let cancel = session.cancellation_token();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            cancel.cancel();
        }
    });

    let (out_tx, mut out_rx) = mpsc::channel::<LogEntry>(1024);
    let (event_tx, mut event_rx) = mpsc::channel::<Transition>(16);

    let color = io::stdout().is_terminal();
    let printer = tokio::spawn(async move {
        while let Some(entry) = out_rx.recv().await {
            if filter.matches(&entry) {
                println!("{}", render_entry(&entry, color));
            }
        }
    });

    let status_color = io::stderr().is_terminal();
    let status_package = package.clone();
    let status = tokio::spawn(async move {
        while let Some(event) = event_rx.recv().await {
            eprintln!("{}", render_transition(&event, &status_package, status_color));
        }
    });

    let result = session.run(resolver, records, out_tx, event_tx).await;
    let _ = printer.await;
    let _ = status.await;

    match result {
        Ok(()) => Ok(()),
        Err(TailError::StreamClosed) => {
            bail!("lost {}: device disconnected while streaming logs", device.serial)
        }
    }
}

/// `droidtail devices`: list attached devices
pub async fn devices(config: &AppConfig, args: DevicesArgs) -> Result<()> {
    let adb = adb_client(config)?;
    let devices = adb.list_devices().await?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&devices)?);
        return Ok(());
    }

    if devices.is_empty() {
        println!("No devices connected");
        return Ok(());
    }

    println!("Connected devices:");
    for device in &devices {
        println!("  {} - {}", device.display_name(), device.state.as_str());
    }
    Ok(())
}

/// `droidtail info`: project identity from the Gradle build script
pub async fn info(args: InfoArgs) -> Result<()> {
    let project = ProjectInfo::load(&args.path)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&project)?);
        return Ok(());
    }

    println!("Project info:");
    println!("  Application ID: {}", project.application_id);
    println!("  Version code:   {}", display_opt(project.version_code));
    println!("  Version name:   {}", display_opt(project.version_name));
    println!("  Min SDK:        {}", display_opt(project.min_sdk));
    println!("  Target SDK:     {}", display_opt(project.target_sdk));
    println!("  Compile SDK:    {}", display_opt(project.compile_sdk));
    Ok(())
}

fn adb_client(config: &AppConfig) -> Result<AdbClient> {
    match &config.adb_path {
        Some(path) => Ok(AdbClient::with_path(path.clone())),
        None => Ok(AdbClient::discover()?),
    }
}

/// Choose the target device: pinned serial, sole online device, or an
/// interactive prompt when several are online.
async fn pick_device(adb: &AdbClient, serial: Option<&str>) -> Result<Device> {
    let devices = adb.list_devices().await?;
    let mut online: Vec<Device> = devices.into_iter().filter(|d| d.is_usable()).collect();

    if let Some(serial) = serial {
        return online
            .into_iter()
            .find(|d| d.serial == serial)
            .with_context(|| format!("device {serial} is not attached or not online"));
    }

    match online.len() {
        0 => bail!("no online device; connect one via USB or start an emulator"),
        1 => Ok(online.remove(0)),
        _ => prompt_device(online),
    }
}

/// Numbered stdin prompt, mirroring `adb`-style interactive selection
fn prompt_device(devices: Vec<Device>) -> Result<Device> {
    eprintln!("Multiple devices attached:");
    for (i, device) in devices.iter().enumerate() {
        eprintln!("  {}. {}", i + 1, device.display_name());
    }
    eprint!("Select device (number): ");
    io::stderr().flush()?;

    let mut line = String::new();
    io::stdin().read_line(&mut line)?;
    let selection: usize = line.trim().parse().context("invalid selection")?;

    selection
        .checked_sub(1)
        .and_then(|i| devices.into_iter().nth(i))
        .context("selection out of range")
}

fn render_entry(entry: &LogEntry, color: bool) -> String {
    if !color {
        return entry.formatted();
    }

    let head = format!(
        "{} {:>5} {}",
        entry.timestamp,
        entry.pid,
        entry.level.as_char()
    );
    let head = match entry.level {
        LogLevel::Error | LogLevel::Fatal => head.red().to_string(),
        LogLevel::Warning => head.yellow().to_string(),
        LogLevel::Info => head.green().to_string(),
        LogLevel::Debug => head.blue().to_string(),
        _ => head.dimmed().to_string(),
    };
    format!("{} {}: {}", head, entry.tag.cyan(), entry.message)
}

fn render_transition(event: &Transition, package: &str, color: bool) -> String {
    let line = match event {
        Transition::Started { pid } => format!("-- {package} running (pid {pid})"),
        Transition::Restarted { old, new } => {
            format!("-- {package} restarted (pid {old} -> {new})")
        }
        Transition::Stopped { pid } => {
            format!("-- {package} stopped (pid was {pid}); waiting for restart")
        }
    };
    if color {
        line.magenta().to_string()
    } else {
        line
    }
}

fn display_opt<T: std::fmt::Display>(value: Option<T>) -> String {
    value
        .map(|v| v.to_string())
        .unwrap_or_else(|| "unknown".to_string())
}
