//! Catalog-Harvest main entry point
//!
//! This is the command-line interface for the catalog product harvester.

use anyhow::Context;
use catalog_harvest::config::{load_config_with_hash, validate, Config};
use catalog_harvest::crawler::Pipeline;
use catalog_harvest::output::{export_records, print_statistics};
use clap::Parser;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Catalog-Harvest: a product catalog scraper
///
/// Catalog-Harvest walks the paginated listing pages of a catalog, collects
/// every product page, and exports one record per product with its name,
/// brand, category, ingredients, size and image.
#[derive(Parser, Debug)]
#[command(name = "catalog-harvest")]
#[command(version)]
#[command(about = "A product catalog harvester", long_about = None)]
struct Cli {
    /// Path to TOML configuration file
    #[arg(value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// Catalog root URL (overrides site.base-url)
    #[arg(long)]
    base_url: Option<String>,

    /// Listing pages to fetch per listing root (overrides crawler.max-pages)
    #[arg(long)]
    max_pages: Option<u32>,

    /// CSV output path (overrides output.csv-path)
    #[arg(short, long)]
    output: Option<String>,

    /// Seconds between requests (overrides crawler.request-delay-ms)
    #[arg(long)]
    delay: Option<f64>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Validate config and show what would be harvested without fetching anything
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    let mut config = match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            let (config, hash) = load_config_with_hash(path)
                .with_context(|| format!("Failed to load configuration from {}", path.display()))?;
            tracing::info!("Configuration loaded successfully (hash: {})", hash);
            config
        }
        None => Config::default(),
    };

    apply_overrides(&mut config, &cli)?;
    validate(&config).context("Invalid configuration")?;

    if cli.dry_run {
        handle_dry_run(&config)?;
    } else {
        handle_harvest(config).await?;
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
            0 => EnvFilter::new("catalog_harvest=info,warn"),
            1 => EnvFilter::new("catalog_harvest=debug,info"),
            2 => EnvFilter::new("catalog_harvest=trace,debug"),
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

/// Folds command-line flags into the loaded configuration
fn apply_overrides(config: &mut Config, cli: &Cli) -> anyhow::Result<()> {
    if let Some(base_url) = &cli.base_url {
        config.site.base_url = base_url.clone();
    }
    if let Some(max_pages) = cli.max_pages {
        config.crawler.max_pages = max_pages;
        config.crawler.stop_after_empty_pages = config.crawler.stop_after_empty_pages.min(max_pages);
    }
    if let Some(output) = &cli.output {
        config.output.csv_path = output.clone();
    }
    if let Some(delay) = cli.delay {
        if !delay.is_finite() || delay < 0.0 {
            anyhow::bail!("--delay must be a non-negative number of seconds, got {}", delay);
        }
        config.crawler.request_delay_ms = (delay * 1000.0).round() as u64;
    }
    Ok(())
}

/// Handles the --dry-run mode: shows what would be harvested
fn handle_dry_run(config: &Config) -> anyhow::Result<()> {
    println!("=== Catalog-Harvest Dry Run ===\n");

    println!("Site:");
    println!("  Base URL: {}", config.site.base_url);
    println!("  Product path marker: {}", config.site.product_path_marker);

    println!("\nCrawler Configuration:");
    println!("  Max listing pages: {}", config.crawler.max_pages);
    println!(
        "  Stop after empty pages: {}",
        config.crawler.stop_after_empty_pages
    );
    println!("  Request delay: {}ms", config.crawler.request_delay_ms);
    match config.crawler.max_products {
        Some(max) => println!("  Max products: {}", max),
        None => println!("  Max products: unlimited"),
    }
    println!("  Max retries: {}", config.crawler.max_retries);
    println!("  Timeout: {}s", config.crawler.timeout_secs);

    println!("\nUser Agent:");
    println!("  {}", config.user_agent.header_value());

    println!("\nOutput:");
    println!("  CSV: {}", config.output.csv_path);
    if let Some(json_path) = &config.output.json_path {
        println!("  JSON: {}", json_path);
    }

    let pipeline = Pipeline::from_config(config.clone())?;
    let roots = pipeline.listing_roots()?;
    println!("\nListing Roots ({}):", roots.len());
    for root in &roots {
        println!("  - {}", root);
    }

    println!("\nBrand Table ({}):", config.brands.len());
    for (category, brand) in &config.brands {
        println!("  {} -> {}", category, brand);
    }

    println!("\n✓ Configuration is valid");
    println!(
        "✓ Would paginate {} listing roots, up to {} pages each",
        roots.len(),
        config.crawler.max_pages
    );

    Ok(())
}

/// Handles the main harvest operation
async fn handle_harvest(config: Config) -> anyhow::Result<()> {
    let output_config = config.output.clone();
    let mut pipeline = Pipeline::from_config(config)?;

    let cancel = pipeline.cancellation_token();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("Interrupt received, finishing with the records gathered so far");
            cancel.cancel();
        }
    });

    let records = match pipeline.run().await {
        Ok(records) => records,
        Err(e) => {
            tracing::error!("Harvest failed: {}", e);
            return Err(e.into());
        }
    };

    let written = export_records(&records, &output_config).context("Failed to write output")?;
    for path in &written {
        println!("✓ Wrote {} records to {}", records.len(), path.display());
    }
    println!();

    print_statistics(pipeline.stats());

    Ok(())
}
