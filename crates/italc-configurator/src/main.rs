//! iTALC Configurator entry point.
//!
//! Lets an administrator review and edit the settings every iTALC component
//! reads at startup, apply them to this computer, exchange them as JSON
//! files, and produce a bug report archive.
//!
//! # Usage
//!
//! ```text
//! italc-configurator [OPTIONS] [COMMAND]
//!
//! Commands:
//!   shell                  Interactive configurator (default)
//!   show                   Print the current settings
//!   set <KEY> <VALUE>      Change one setting and apply it
//!   apply                  Apply the current settings
//!   apply-file <PATH>      Load a settings file and apply it
//!   save <PATH>            Export the current settings to a JSON file
//!   bug-report <PATH>      Write a bug report archive
//!   extract-logs <REPORT> <DIR>
//!                          Unpack the log files of a bug report archive
//!
//! Options:
//!   --config-file <PATH>   Applied configuration file [env: ITALC_CONFIG_FILE]
//!   --log-level <LEVEL>    Log filter when RUST_LOG is unset [default: warn]
//! ```
//!
//! Log output goes to stderr so command output stays scriptable.

use std::io;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use italc_config_core::{default_configuration, split_key};
use italc_configurator::application::bug_report::ArchiveBuilder;
use italc_configurator::application::main_window::{ActionOutcome, MainWindow, WindowAction};
use italc_configurator::application::settings_controller::SettingsController;
use italc_configurator::infrastructure::console::{
    parse_value, render_configuration, run_shell, ConsoleDialogs, PresetDialogs, SummaryPage,
    SummaryView,
};
use italc_configurator::infrastructure::log_files::{
    extract_report_logs, platform_temp_dir, LogDirectoryScanner,
};
use italc_configurator::infrastructure::storage::local_backend::LocalBackend;
use italc_configurator::infrastructure::system_info::NativeSystemInfo;

// ── CLI argument definitions ──────────────────────────────────────────────────

/// iTALC configurator.
#[derive(Debug, Parser)]
#[command(
    name = "italc-configurator",
    about = "Review, apply and export iTALC settings, and build bug report archives",
    version
)]
struct Cli {
    /// Applied configuration file.
    ///
    /// Defaults to `italc.toml` in the platform config directory.
    #[arg(long, env = "ITALC_CONFIG_FILE")]
    config_file: Option<PathBuf>,

    /// Log filter used when `RUST_LOG` is not set, e.g. `info` or `debug`.
    #[arg(long, default_value = "warn")]
    log_level: String,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Interactive configurator.
    Shell,
    /// Print the current settings as `Group/Key = value` lines.
    Show,
    /// Change one setting and apply it, e.g. `set Network/CoreServerPort 11200`.
    Set { key: String, value: String },
    /// Apply the current settings, completing a partial configuration.
    Apply,
    /// Load a JSON settings file on top of the current settings and apply.
    ApplyFile { path: PathBuf },
    /// Export the current settings to a JSON file.
    Save { path: PathBuf },
    /// Write a bug report archive.
    BugReport { path: PathBuf },
    /// Unpack the log files of a bug report archive into a directory.
    ExtractLogs { report: PathBuf, dir: PathBuf },
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // RUST_LOG takes precedence over --log-level.
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&cli.log_level)),
        )
        .init();

    info!("iTALC configurator {} starting", italc_config_core::VERSION);

    match cli.command.unwrap_or(Command::Shell) {
        Command::ExtractLogs { report, dir } => extract_logs(&report, &dir),
        command => {
            let (mut window, summary) = build_window(cli.config_file)?;
            run_command(&mut window, &summary, command)
        }
    }
}

/// Wires the main window to the local backend and the native probes.
fn build_window(config_file: Option<PathBuf>) -> anyhow::Result<(MainWindow, SummaryView)> {
    let backend = match config_file {
        Some(path) => LocalBackend::new(path),
        None => LocalBackend::platform_default()
            .context("cannot locate the configuration file; pass --config-file")?,
    };
    info!("local configuration: {}", backend.path().display());

    let mut settings = SettingsController::new(Box::new(backend), default_configuration());
    let (page, summary) = SummaryPage::new();
    settings.add_page(Box::new(page));
    settings.on_pending_changed(|pending| debug!("pending changes: {pending}"));

    let archive = ArchiveBuilder::new(
        Box::new(NativeSystemInfo::new()),
        Box::new(LogDirectoryScanner::new()?),
        vec![platform_temp_dir()],
    );

    let home = dirs::home_dir().unwrap_or_else(|| PathBuf::from("."));
    Ok((MainWindow::new(settings, archive, home), summary))
}

fn run_command(window: &mut MainWindow, summary: &SummaryView, command: Command) -> anyhow::Result<()> {
    match command {
        Command::Shell => {
            let stdin = io::stdin();
            let mut console = ConsoleDialogs::new(stdin.lock(), io::stdout());
            run_shell(window, &mut console, summary);
            Ok(())
        }
        Command::Show => {
            for line in render_configuration(window.settings().config()) {
                println!("{line}");
            }
            Ok(())
        }
        Command::Set { key, value } => {
            let (key, parent) = split_key(&key)?;
            window.settings_mut().set_value(key, parse_value(&value), parent);
            trigger(window, WindowAction::Apply, PresetDialogs::default())
        }
        Command::Apply => trigger(window, WindowAction::Apply, PresetDialogs::default()),
        Command::ApplyFile { path } => {
            trigger(window, WindowAction::LoadSettings, PresetDialogs::with_path(&path))?;
            trigger(window, WindowAction::Apply, PresetDialogs::default())
        }
        Command::Save { path } => trigger(window, WindowAction::SaveSettings, PresetDialogs::with_path(&path)),
        Command::BugReport { path } => {
            trigger(window, WindowAction::GenerateBugReport, PresetDialogs::with_path(&path))
        }
        Command::ExtractLogs { report, dir } => extract_logs(&report, &dir),
    }
}

fn extract_logs(report: &Path, dir: &Path) -> anyhow::Result<()> {
    let written = extract_report_logs(report, dir)
        .with_context(|| format!("extracting logs from {}", report.display()))?;
    println!("Extracted {} log file(s) to {}", written.len(), dir.display());
    Ok(())
}

/// Runs one window action with fixed dialog answers and prints any
/// information boxes it raised.
fn trigger(window: &mut MainWindow, action: WindowAction, mut dialogs: PresetDialogs) -> anyhow::Result<()> {
    let outcome = window.trigger(action, &mut dialogs);
    for (title, text) in &dialogs.messages {
        println!("{title}\n{text}");
    }

    match outcome {
        ActionOutcome::Completed => Ok(()),
        ActionOutcome::Cancelled => bail!("{action:?} cancelled: {}", describe(dialogs.path.as_deref())),
        ActionOutcome::Failed => bail!("{action:?} failed"),
    }
}

fn describe(path: Option<&Path>) -> String {
    path.map_or_else(|| "no file given".to_string(), |p| p.display().to_string())
}
