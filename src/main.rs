//! Linkwatch main entry point
//!
//! This is the command-line interface for the Linkwatch link monitor.

use anyhow::Context;
use clap::Parser;
use linkwatch::config::load_config_or_default;
use linkwatch::crawler::monitor;
use linkwatch::output::print_summary;
use linkwatch::storage::{load_snapshot, load_url_list, CsvReportWriter, RunContext};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Linkwatch: link inventory monitoring for external sites
///
/// Linkwatch renders every page in a URL list, extracts its links, and
/// compares them with the snapshot from the previous run. New links and
/// changed link text are written to a timestamped report alongside the
/// updated snapshot and the pages that could not be processed.
#[derive(Parser, Debug)]
#[command(name = "linkwatch")]
#[command(version)]
#[command(about = "Monitors external sites for new and changed links", long_about = None)]
struct Cli {
    /// CSV file with url, label and include_nav_links columns
    #[arg(value_name = "NEW_URLS_FILE")]
    new_urls_file: PathBuf,

    /// Snapshot CSV written by a previous run
    #[arg(value_name = "ALL_LINKS_FILE")]
    all_links_file: Option<PathBuf>,

    /// Render pages without a visible browser window
    #[arg(long)]
    headless: bool,

    /// Path to TOML configuration file
    #[arg(short, long, value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// Directory for the report files, overriding the configuration
    #[arg(long, value_name = "DIR")]
    output_dir: Option<PathBuf>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    if let Err(e) = run(cli).await {
        tracing::error!("{:?}", e);
        return Err(e);
    }

    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("linkwatch=info,warn"),
            1 => EnvFilter::new("linkwatch=debug,info"),
            2 => EnvFilter::new("linkwatch=trace,debug"),
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

/// Loads the inputs, runs one monitoring pass and prints its summary
async fn run(cli: Cli) -> anyhow::Result<()> {
    let (config, config_hash) =
        load_config_or_default(cli.config.as_deref()).context("Failed to load configuration")?;
    match config_hash {
        Some(hash) => tracing::info!("Configuration loaded successfully (hash: {})", hash),
        None => tracing::debug!("No configuration file given, using defaults"),
    }

    let output_dir = cli
        .output_dir
        .unwrap_or_else(|| PathBuf::from(&config.output.directory));
    let context = RunContext::new(output_dir);
    tracing::info!("Run timestamp: {}", context.timestamp());

    // Inputs are validated before any browser is started
    let urls = load_url_list(Some(cli.new_urls_file.as_path())).context("Failed to load URL list")?;
    let snapshot =
        load_snapshot(cli.all_links_file.as_deref()).context("Failed to load link snapshot")?;

    let writer = CsvReportWriter::new(context);
    let summary = monitor(&config, cli.headless, &writer, &urls, snapshot.as_deref())
        .await
        .context("Link monitoring run failed")?;

    if !cli.quiet {
        println!();
        print_summary(&summary);
    }

    Ok(())
}
