//! iptv-probe main entry point
//!
//! This is the command-line interface for the IPTV link checker.

use clap::{Parser, ValueEnum};
use iptv_probe::checker::{check_channels, ResultSet, RunOutcome};
use iptv_probe::config::{load_config_or_default, validate, Config};
use iptv_probe::output::{
    export_to_file, output_path, print_partial, print_summary, print_table, ExportFormat,
};
use iptv_probe::source::{load_channels, Channel};
use iptv_probe::ProbeError;
use std::io::{BufRead, Write};
use std::path::PathBuf;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;

/// iptv-probe: batch availability checker for IPTV stream links
///
/// Loads channels from an M3U playlist (local file or URL) or a plain URL
/// list, tests every link concurrently, and exports the results as CSV,
/// text, or M3U.
#[derive(Parser, Debug)]
#[command(name = "iptv-probe")]
#[command(version = "1.0.0")]
#[command(about = "Batch availability checker for IPTV stream links", long_about = None)]
struct Cli {
    /// Playlist file, URL list, or playlist URL (defaults to source.playlist-url)
    #[arg(value_name = "INPUT")]
    input: Option<String>,

    /// Path to TOML configuration file
    #[arg(short, long, value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// What to do after testing; without it an interactive menu is shown
    #[arg(short, long, value_enum, default_value_t = Mode::Menu)]
    mode: Mode,

    /// Per-link timeout in seconds
    #[arg(short, long)]
    timeout: Option<f64>,

    /// Maximum number of links tested at once
    #[arg(short = 'j', long)]
    concurrency: Option<usize>,

    /// Export only reachable channels
    #[arg(long)]
    only_available: bool,

    /// Directory export files are written to
    #[arg(short, long, value_name = "DIR")]
    output_dir: Option<String>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

/// Operation modes
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Mode {
    /// Test links and print the results only
    Test,
    /// Export results as CSV
    Csv,
    /// Export results as a text report
    Text,
    /// Export results as an M3U playlist
    M3u,
    /// Export CSV, text, and M3U
    All,
    /// Export only reachable channels as M3U
    AvailableM3u,
    /// Choose interactively after testing
    Menu,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    run(cli).await?;
    Ok(())
}

/// Loads the channels, runs the check, then exports or shows the menu
async fn run(cli: Cli) -> iptv_probe::Result<()> {
    let config = build_config(&cli)?;
    let input = cli
        .input
        .clone()
        .unwrap_or_else(|| config.source.playlist_url.clone());

    let channels = load_channels(&input, &config.source).await?;

    let cancel = CancellationToken::new();
    spawn_interrupt_handler(cancel.clone());

    let results = match run_check(&channels, &config, &cancel).await? {
        Some(results) => results,
        None => return Ok(()),
    };

    match cli.mode {
        Mode::Test => Ok(()),
        Mode::Menu => run_menu(results, &channels, &config, &cancel).await,
        mode => export_mode(mode, &results, &config),
    }
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("iptv_probe=info,warn"),
            1 => EnvFilter::new("iptv_probe=debug,info"),
            2 => EnvFilter::new("iptv_probe=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Loads the configuration file (if any) and applies command-line overrides
fn build_config(cli: &Cli) -> iptv_probe::Result<Config> {
    if let Some(path) = &cli.config {
        tracing::info!("Loading configuration from: {}", path.display());
    }
    let mut config = load_config_or_default(cli.config.as_deref())?;

    if let Some(timeout) = cli.timeout {
        config.probe.timeout_seconds = timeout;
    }
    if let Some(concurrency) = cli.concurrency {
        config.probe.concurrency_limit = concurrency;
    }
    if cli.only_available {
        config.output.include_unavailable = false;
    }
    if let Some(dir) = &cli.output_dir {
        config.output.directory = dir.clone();
    }

    validate(&config)?;
    Ok(config)
}

/// Cancels `token` on Ctrl-C
fn spawn_interrupt_handler(token: CancellationToken) {
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("Interrupt received, stopping...");
            token.cancel();
        }
    });
}

/// Runs one check and prints the outcome
///
/// Returns `None` when the run was cancelled.
async fn run_check(
    channels: &[Channel],
    config: &Config,
    cancel: &CancellationToken,
) -> iptv_probe::Result<Option<ResultSet>> {
    let outcome = check_channels(channels, &config.probe, cancel).await?;

    match outcome {
        RunOutcome::Complete(results) => {
            print_table(results.as_slice());
            println!();
            print_summary(&results.summary());
            println!(
                "\nTest complete: {} reachable channels",
                results.summary().available
            );
            Ok(Some(results))
        }
        RunOutcome::Cancelled(partial) => {
            print_partial(&partial);
            println!();
            print_summary(&partial.into_result_set().summary());
            Ok(None)
        }
    }
}

/// Writes the exports selected by `mode`
fn export_mode(mode: Mode, results: &ResultSet, config: &Config) -> iptv_probe::Result<()> {
    let output = &config.output;
    let all = output.include_unavailable;
    let jobs: Vec<(ExportFormat, bool, &str)> = match mode {
        Mode::Csv => vec![(ExportFormat::Csv, all, output.csv_file.as_str())],
        Mode::Text => vec![(ExportFormat::Text, all, output.text_file.as_str())],
        Mode::M3u => vec![(ExportFormat::M3u, all, output.m3u_file.as_str())],
        Mode::All => vec![
            (ExportFormat::Csv, all, output.csv_file.as_str()),
            (ExportFormat::Text, all, output.text_file.as_str()),
            (ExportFormat::M3u, all, output.m3u_file.as_str()),
        ],
        Mode::AvailableM3u => vec![(
            ExportFormat::M3u,
            false,
            output.available_m3u_file.as_str(),
        )],
        Mode::Test | Mode::Menu => vec![],
    };

    for (format, include_unavailable, file_name) in jobs {
        let path = output_path(&output.directory, file_name);
        let written = export_to_file(format, results.as_slice(), include_unavailable, &path)
            .map_err(|e| {
                tracing::error!("Failed to export {}", path.display());
                ProbeError::from(e)
            })?;
        println!("✓ Exported {} channels to {}", written, path.display());
    }

    Ok(())
}

/// Reads stdin lines on a plain thread so a pending read never holds up shutdown
fn spawn_stdin_reader() -> mpsc::UnboundedReceiver<String> {
    let (tx, rx) = mpsc::unbounded_channel();
    std::thread::spawn(move || {
        for line in std::io::stdin().lock().lines() {
            let Ok(line) = line else { break };
            if tx.send(line).is_err() {
                break;
            }
        }
    });
    rx
}

/// Numbered menu shown after a run
async fn run_menu(
    mut results: ResultSet,
    channels: &[Channel],
    config: &Config,
    cancel: &CancellationToken,
) -> iptv_probe::Result<()> {
    let mut input = spawn_stdin_reader();

    loop {
        print!(
            "\nOptions:\n\
             1. Retest links\n\
             2. Export CSV\n\
             3. Export text\n\
             4. Export M3U\n\
             5. Export all\n\
             6. Export available channels only (M3U)\n\
             0. Exit\n\
             Select an option (0-6): "
        );
        std::io::stdout().flush()?;

        let line = tokio::select! {
            line = input.recv() => line,
            _ = cancel.cancelled() => None,
        };
        let Some(choice) = line else {
            println!();
            return Ok(());
        };

        let mode = match choice.trim() {
            "1" => {
                match run_check(channels, config, cancel).await? {
                    Some(retested) => results = retested,
                    None => return Ok(()),
                }
                continue;
            }
            "2" => Mode::Csv,
            "3" => Mode::Text,
            "4" => Mode::M3u,
            "5" => Mode::All,
            "6" => Mode::AvailableM3u,
            "0" => {
                println!("Bye");
                return Ok(());
            }
            other => {
                println!("Unknown option: {}", other);
                continue;
            }
        };

        if let Err(e) = export_mode(mode, &results, config) {
            tracing::error!("{}", e);
        }
    }
}
