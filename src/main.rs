//! Webdex main entry point
//!
//! This is the command-line interface for the Webdex crawl-to-index pipeline.

use anyhow::Context;
use clap::Parser;
use std::path::PathBuf;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;
use webdex::backend::{DocumentStore, ElasticsearchClient, SearchRequest, DEFAULT_PAGE_SIZE};
use webdex::config::{load_config_with_hash, Config};
use webdex::crawler::run_crawl;
use webdex::output::print_statistics;

/// Webdex: crawl sites and index their text into Elasticsearch
///
/// Webdex crawls outward from a set of seed URLs, stays inside the configured
/// domains and URL patterns, and writes one search document per fetched URL.
#[derive(Parser, Debug)]
#[command(name = "webdex")]
#[command(version)]
#[command(about = "Crawl sites and index them into a search backend", long_about = None)]
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

    /// Override the backend URL from the configuration
    #[arg(long, value_name = "URL")]
    backend_url: Option<String>,

    /// Validate config and show what would be crawled without actually crawling
    #[arg(long, conflicts_with_all = ["search", "get"])]
    dry_run: bool,

    /// Search the index and print one page of hits
    #[arg(long, value_name = "QUERY", conflicts_with = "get")]
    search: Option<String>,

    /// Cursor from a previous search page
    #[arg(long, requires = "search")]
    cursor: Option<String>,

    /// Hits per search page
    #[arg(long, default_value_t = DEFAULT_PAGE_SIZE)]
    size: u32,

    /// Fetch one stored document by id and print it as JSON
    #[arg(long, value_name = "ID")]
    get: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    tracing::info!("Loading configuration from: {}", cli.config.display());
    let (mut config, config_hash) = load_config_with_hash(&cli.config)
        .with_context(|| format!("failed to load {}", cli.config.display()))?;
    tracing::info!("Configuration loaded successfully (hash: {})", config_hash);

    if let Some(url) = cli.backend_url {
        config.backend.url = url;
    }

    if cli.dry_run {
        handle_dry_run(&config);
    } else if let Some(query) = cli.search {
        let request = SearchRequest::new(query)
            .with_size(cli.size)
            .with_cursor(cli.cursor);
        handle_search(&config, &request).await?;
    } else if let Some(id) = cli.get {
        handle_get(&config, &id).await?;
    } else {
        handle_crawl(config).await?;
    }

    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("webdex=info,warn"),
            1 => EnvFilter::new("webdex=debug,info"),
            2 => EnvFilter::new("webdex=trace,debug"),
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

/// Handles the --dry-run mode: validates config and shows what would be crawled
fn handle_dry_run(config: &Config) {
    println!("=== Webdex Dry Run ===\n");

    println!("Crawler Configuration:");
    println!("  Max depth: {}", config.crawler.max_depth);
    println!("  Delay: {:.2}s", config.crawler.delay);
    println!("  Workers: {}", config.crawler.workers);
    println!("  Request timeout: {}s", config.crawler.request_timeout);
    println!("  User agent: {}", config.crawler.user_agent);
    match config.crawler.max_documents {
        Some(max) => println!("  Max documents: {}", max),
        None => println!("  Max documents: unbounded"),
    }

    println!("\nSeeds ({}):", config.crawler.seeds.len());
    for seed in &config.crawler.seeds {
        println!("  - {}", seed);
    }

    print_list("Allowed Domains", &config.filter.allowed_domains);
    print_list("Target Patterns", &config.filter.target_patterns);
    print_list("Exclude Patterns", &config.filter.exclude_patterns);

    println!("\nIndex:");
    println!("  Name: {}", config.index.name);
    println!("  Description: {}", config.index.description);
    println!("  Backend: {}", config.backend.url);

    println!("\n✓ Configuration is valid");
    println!(
        "✓ Would start crawling with {} seed URLs",
        config.crawler.seeds.len()
    );
}

fn print_list(heading: &str, items: &[String]) {
    if items.is_empty() {
        println!("\n{}: (any)", heading);
        return;
    }
    println!("\n{} ({}):", heading, items.len());
    for item in items {
        println!("  - {}", item);
    }
}

/// Handles the --search mode: prints one page of hits
async fn handle_search(config: &Config, request: &SearchRequest) -> anyhow::Result<()> {
    let client = ElasticsearchClient::new(&config.backend.url, &config.index.name)?;
    let page = client.search(request).await?;

    println!("{} hits for \"{}\"\n", page.total, request.query);
    for hit in &page.hits {
        println!("{}  {}", hit.id, hit.title);
        for fragments in hit.highlight.values() {
            for fragment in fragments {
                println!("    … {}", fragment);
            }
        }
    }

    if let Some(cursor) = page.next_cursor {
        println!("\nMore results: --cursor {}", cursor);
    }

    Ok(())
}

/// Handles the --get mode: prints one stored document
async fn handle_get(config: &Config, id: &str) -> anyhow::Result<()> {
    let client = ElasticsearchClient::new(&config.backend.url, &config.index.name)?;

    match client.get(id).await? {
        Some(document) => println!("{}", serde_json::to_string_pretty(&document)?),
        None => anyhow::bail!("no document with id {} in index {}", id, config.index.name),
    }

    Ok(())
}

/// Handles the main crawl operation
async fn handle_crawl(config: Config) -> anyhow::Result<()> {
    tracing::info!(
        "Seeds: {}, allowed domains: {}, target patterns: {}, exclude patterns: {}",
        config.crawler.seeds.len(),
        config.filter.allowed_domains.len(),
        config.filter.target_patterns.len(),
        config.filter.exclude_patterns.len()
    );

    let shutdown = CancellationToken::new();
    let interrupt = shutdown.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::info!("Interrupt received, finishing in-flight work");
            interrupt.cancel();
        }
    });

    match run_crawl(config, shutdown).await {
        Ok(stats) => {
            tracing::info!("Crawl completed successfully");
            println!();
            print_statistics(&stats);
            Ok(())
        }
        Err(e) => {
            tracing::error!("Crawl failed: {}", e);
            Err(e.into())
        }
    }
}
