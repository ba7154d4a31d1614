//! Vacancy-Harvester main entry point
//!
//! This is the command-line interface for the Vacancy-Harvester snapshot collector.

use clap::Parser;
use std::path::{Path, PathBuf};
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;
use vacancy_harvester::config::{load_config_with_hash, Config};
use vacancy_harvester::output::{list_vacancies, print_listings, print_report, render_json};
use vacancy_harvester::{Harvester, RecordFilter, SearchQuery, SearchRequest, SqliteSnapshotStore};

/// Vacancy-Harvester: a job-listing snapshot collector
///
/// Vacancy-Harvester pages through job-search results for a query, extracts
/// every listing and replaces the local SQLite snapshot with the fresh set.
/// The stored snapshot can be filtered with --list.
#[derive(Parser, Debug)]
#[command(name = "vacancy-harvester")]
#[command(version = "1.0.0")]
#[command(about = "A job-listing snapshot collector", long_about = None)]
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

    /// Search text
    #[arg(short, long, required_unless_present = "list")]
    text: Option<String>,

    /// Experience option index (0 = any)
    #[arg(long, value_name = "IDX", default_value_t = 0)]
    experience: usize,

    /// Education option indices, comma-separated or repeated (0 = any)
    #[arg(long, value_name = "IDX", value_delimiter = ',')]
    education: Vec<usize>,

    /// Employment option indices, comma-separated or repeated (0 = any)
    #[arg(long, value_name = "IDX", value_delimiter = ',')]
    employment: Vec<usize>,

    /// Validate config and query, show what would be requested and exit
    #[arg(long, conflicts_with = "list")]
    dry_run: bool,

    /// List the stored snapshot instead of harvesting
    #[arg(long)]
    list: bool,

    /// Filter listings by company (with --list)
    #[arg(long, requires = "list")]
    company: Option<String>,

    /// Filter listings by salary (with --list)
    #[arg(long, requires = "list")]
    salary: Option<String>,

    /// Filter listings by location (with --list)
    #[arg(long, requires = "list")]
    location: Option<String>,

    /// Print listings as JSON (with --list)
    #[arg(long, requires = "list")]
    json: bool,
}

impl Cli {
    fn search_request(&self) -> SearchRequest {
        SearchRequest {
            text: self.text.clone().unwrap_or_default(),
            experience_id: self.experience,
            education_options: self.education.clone(),
            employment_options: self.employment.clone(),
        }
    }

    fn record_filter(&self) -> RecordFilter {
        RecordFilter {
            company: self.company.clone(),
            salary: self.salary.clone(),
            location: self.location.clone(),
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    // Load and validate configuration
    tracing::info!("Loading configuration from: {}", cli.config.display());
    let config = match load_config_with_hash(&cli.config) {
        Ok((cfg, hash)) => {
            tracing::info!("Configuration loaded successfully (hash: {})", hash);
            cfg
        }
        Err(e) => {
            tracing::error!("Failed to load configuration: {}", e);
            return Err(e.into());
        }
    };

    // Handle different modes
    if cli.dry_run {
        handle_dry_run(&config, &cli.search_request())?;
    } else if cli.list {
        handle_list(&config, &cli.record_filter(), cli.json)?;
    } else {
        handle_harvest(config, &cli.search_request()).await?;
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
            0 => EnvFilter::new("vacancy_harvester=info,warn"),
            1 => EnvFilter::new("vacancy_harvester=debug,info"),
            2 => EnvFilter::new("vacancy_harvester=trace,debug"),
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

/// Handles the --dry-run mode: validates config and query, shows the first request
fn handle_dry_run(config: &Config, request: &SearchRequest) -> Result<(), Box<dyn std::error::Error>> {
    println!("=== Vacancy-Harvester Dry Run ===\n");

    println!("Fetcher Configuration:");
    println!("  Timeout: {}s", config.fetcher.timeout_secs);
    println!("  Connect timeout: {}s", config.fetcher.connect_timeout_secs);
    println!("  User agents in pool: {}", config.fetcher.user_agents.len());

    println!("\nPagination:");
    match config.pagination.max_pages {
        0 => println!("  Max pages: unlimited"),
        n => println!("  Max pages: {}", n),
    }
    println!("  Retry attempts: {}", config.pagination.retry_attempts);
    println!("  Retry delay: {}ms", config.pagination.retry_delay_ms);

    println!("\nOutput:");
    println!("  Database: {}", config.output.database_path);

    let query = SearchQuery::from_request(request, config.search.area)?;

    println!("\nFirst request: {}", config.search.base_url);
    for (key, value) in query.to_params() {
        println!("  {} = {}", key, value);
    }
    println!("  page = 0");

    println!("\n✓ Configuration is valid");
    println!("✓ Query is valid");

    Ok(())
}

/// Handles the --list mode: reads the stored snapshot
fn handle_list(
    config: &Config,
    filter: &RecordFilter,
    json: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let store = SqliteSnapshotStore::new(Path::new(&config.output.database_path))?;

    let records = list_vacancies(&store, filter)?;

    if json {
        println!("{}", render_json(&records)?);
    } else {
        print_listings(&records);
    }

    Ok(())
}

/// Handles the main harvest operation
async fn handle_harvest(
    config: Config,
    request: &SearchRequest,
) -> Result<(), Box<dyn std::error::Error>> {
    let store = SqliteSnapshotStore::new(Path::new(&config.output.database_path))?;
    let harvester = Harvester::new(config, store)?;

    // Ctrl-C stops the run before the next page; the stored snapshot is kept
    let cancel = CancellationToken::new();
    let signal_token = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("Interrupt received, cancelling harvest");
            signal_token.cancel();
        }
    });

    match harvester.run_with_report(request, cancel).await {
        Ok(report) => {
            tracing::info!("Harvest completed successfully");
            print_report(&report);
            Ok(())
        }
        Err(e) => {
            tracing::error!("Harvest failed: {}", e);
            Err(e.into())
        }
    }
}
