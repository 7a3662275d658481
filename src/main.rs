//! Devpost-Export main entry point
//!
//! This is the command-line interface for the Devpost-Export project harvester.

use anyhow::Context;
use clap::Parser;
use devpost_export::config::{load_config_with_hash, validate_workers, Config, OutputFormat};
use devpost_export::crawler::Exporter;
use devpost_export::output::print_summary;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

/// Devpost-Export: a profile project harvester
///
/// Takes a Devpost username, scrapes every project on the user's profile and
/// writes the project details into a folder in the chosen format. Projects
/// that fail to load are reported but do not stop the export.
#[derive(Parser, Debug)]
#[command(name = "devpost-export")]
#[command(version)]
#[command(about = "Export every project of a Devpost profile", long_about = None)]
struct Cli {
    /// Username of the profile to export
    #[arg(value_name = "USERNAME")]
    username: String,

    /// Format to save the project information in
    #[arg(short, long, value_enum)]
    format: Option<OutputFormat>,

    /// Output folder (default: "<USERNAME>-projects")
    #[arg(short, long, value_name = "DIR")]
    output: Option<PathBuf>,

    /// Number of concurrent project fetches
    #[arg(short = 'j', long)]
    workers: Option<u32>,

    /// Path to a TOML configuration file
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Validate settings and show what would be exported without any network access
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("devpost_export=info,warn"),
            1 => EnvFilter::new("devpost_export=debug,info"),
            2 => EnvFilter::new("devpost_export=trace,debug"),
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

async fn run(cli: Cli) -> anyhow::Result<()> {
    let mut config = match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            let (config, hash) = load_config_with_hash(path)
                .with_context(|| format!("failed to load {}", path.display()))?;
            tracing::info!("Configuration loaded successfully (hash: {})", hash);
            config
        }
        None => Config::default(),
    };

    if let Some(workers) = cli.workers {
        validate_workers(workers)?;
        config.crawler.workers = workers;
    }
    if let Some(format) = cli.format {
        config.output.format = format;
    }

    let destination = cli
        .output
        .clone()
        .unwrap_or_else(|| PathBuf::from(format!("{}-projects", cli.username)));

    if cli.dry_run {
        return handle_dry_run(&config, &cli.username, &destination);
    }

    let workers = config.crawler.workers as usize;
    let format = config.output.format;

    let bar = progress_bar(cli.quiet)?;
    let observer = bar.clone();
    let exporter = Exporter::new(config)?.with_progress(move |snapshot| {
        observer.set_length(snapshot.total as u64);
        observer.set_position(snapshot.completed as u64);
    });

    let summary = exporter
        .export(&cli.username, workers, &destination, format)
        .await?;
    bar.finish_and_clear();

    if !cli.quiet {
        print_summary(&summary);
    }

    Ok(())
}

fn progress_bar(quiet: bool) -> anyhow::Result<ProgressBar> {
    if quiet {
        return Ok(ProgressBar::hidden());
    }

    let bar = ProgressBar::new(0);
    bar.set_style(ProgressStyle::with_template(
        "Scraping project infos [{bar:40}] {pos}/{len}",
    )?);
    Ok(bar)
}

/// Handles the --dry-run mode: shows the resolved settings
fn handle_dry_run(
    config: &Config,
    username: &str,
    destination: &std::path::Path,
) -> anyhow::Result<()> {
    let first_page = config
        .site
        .profile_page_url(username, 1)
        .context("invalid profile URL")?;

    println!("=== Devpost-Export Dry Run ===\n");

    println!("Profile:");
    println!("  Username: {}", username);
    println!("  First page: {}", first_page);
    println!("  Project links: {}*", config.site.detail_prefix());
    println!("  Excluded marker: {}", config.site.excluded_marker);

    println!("\nCrawler:");
    println!("  Workers: {}", config.crawler.workers);
    match config.crawler.request_timeout_secs {
        Some(secs) => println!("  Request timeout: {}s", secs),
        None => println!("  Request timeout: transport default"),
    }
    println!("  User agent: {}", config.user_agent.header_value());

    println!("\nOutput:");
    println!("  Format: {}", config.output.format);
    println!("  Folder: {}", destination.display());
    println!("  Manifest: {}", config.output.manifest_name);

    println!("\n✓ Configuration is valid");
    Ok(())
}
