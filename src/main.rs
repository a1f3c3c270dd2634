//! Sumi-Glean main entry point
//!
//! This is the command-line interface for the Sumi-Glean content gleaner.

use anyhow::Context;
use clap::Parser;
use std::path::PathBuf;
use sumi_glean::config::{load_config_with_hash, Config};
use sumi_glean::crawler::crawl;
use sumi_glean::output::print_statistics;
use tracing_subscriber::EnvFilter;

/// Sumi-Glean: a polite same-domain content gleaner
///
/// Sumi-Glean crawls each configured site without leaving its domain,
/// waits between pages as the site's robots.txt asks, and writes the text
/// matched by each target's CSS selectors to a CSV file.
#[derive(Parser, Debug)]
#[command(name = "sumi-glean")]
#[command(version)]
#[command(about = "A polite same-domain content gleaner", long_about = None)]
struct Cli {
    /// Path to TOML configuration file
    #[arg(value_name = "CONFIG")]
    config: PathBuf,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Validate config and show what would be crawled without actually crawling
    #[arg(long)]
    dry_run: bool,

    /// Write records to this CSV file instead of the configured one
    #[arg(short, long, value_name = "PATH")]
    output: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    tracing::info!("Loading configuration from: {}", cli.config.display());
    let (mut config, hash) = load_config_with_hash(&cli.config)
        .with_context(|| format!("failed to load {}", cli.config.display()))?;
    tracing::info!("Configuration loaded successfully (hash: {})", hash);

    if let Some(output) = cli.output {
        config.output.csv_path = output.display().to_string();
    }

    if cli.dry_run {
        handle_dry_run(&config);
        return Ok(());
    }

    handle_crawl(config).await
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("sumi_glean=info,warn"),
            1 => EnvFilter::new("sumi_glean=debug,info"),
            2 => EnvFilter::new("sumi_glean=trace,debug"),
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

/// Handles the --dry-run mode: shows the validated config and the targets
fn handle_dry_run(config: &Config) {
    println!("=== Sumi-Glean Dry Run ===\n");

    println!("Crawler Configuration:");
    println!("  Default delay: {}s", config.crawler.default_delay_secs);
    println!("  Request timeout: {}s", config.crawler.request_timeout_secs);
    println!("  Respect Disallow rules: {}", config.crawler.respect_disallow);
    match config.crawler.max_pages {
        Some(max) => println!("  Max pages per target: {}", max),
        None => println!("  Max pages per target: unbounded"),
    }

    println!("\nUser Agent:");
    println!("  {}", config.user_agent.header_value());

    println!("\nOutput:");
    println!("  CSV: {}", config.output.csv_path);

    println!("\nTargets ({}):", config.targets.len());
    for target in &config.targets {
        println!("  - {}", target.url);
        for selector in &target.selectors {
            println!("    * {}", selector);
        }
    }

    println!("\n✓ Configuration is valid");
}

/// Handles the main crawl operation
async fn handle_crawl(config: Config) -> anyhow::Result<()> {
    let csv_path = config.output.csv_path.clone();

    let stats = crawl(config)
        .await
        .with_context(|| format!("crawl aborted (output: {})", csv_path))?;

    tracing::info!("Crawl completed successfully");
    print_statistics(&stats);

    Ok(())
}
