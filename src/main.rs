//! Image-Harvest main entry point
//!
//! This is the command-line interface for the Image-Harvest crawler.

use anyhow::Context;
use clap::{Parser, ValueEnum};
use image_harvest::config::{compute_config_hash, read_config, Config, CrawlRequest, RendererKind};
use image_harvest::crawl_until;
use image_harvest::output::print_summary;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

/// Image-Harvest: a breadth-first website image cataloguer
///
/// Image-Harvest crawls a website from a base URL, follows same-scope links
/// up to a depth bound, and catalogues every image it finds in page markup,
/// linked stylesheets and inline data.
#[derive(Parser, Debug)]
#[command(name = "image-harvest")]
#[command(version)]
#[command(about = "A breadth-first website image cataloguer", long_about = None)]
struct Cli {
    /// Base URL to start from (overrides the config file)
    #[arg(value_name = "BASE_URL")]
    base_url: Option<String>,

    /// Path to TOML configuration file
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Path to a JSON crawl request ({baseUrl, maxDepth, maxImageSize, allowedExtensions})
    #[arg(long, value_name = "FILE")]
    request: Option<PathBuf>,

    /// Maximum link depth from the base URL
    #[arg(long)]
    max_depth: Option<u32>,

    /// Largest image to catalogue, in bytes
    #[arg(long, value_name = "BYTES")]
    max_image_size: Option<u64>,

    /// Only catalogue images with this extension (repeatable)
    #[arg(long = "allow-ext", value_name = "EXT")]
    allow_ext: Vec<String>,

    /// Page renderer to use
    #[arg(long, value_enum)]
    renderer: Option<RendererArg>,

    /// WebDriver endpoint for the browser renderer
    #[arg(long, value_name = "URL")]
    webdriver_url: Option<String>,

    /// Upper bound on a single page load, in seconds
    #[arg(long, value_name = "SECS")]
    page_timeout: Option<u64>,

    /// Stop the whole crawl after this many seconds
    #[arg(long, value_name = "SECS")]
    timeout: Option<u64>,

    /// Write the JSON report here instead of stdout
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum RendererArg {
    /// Headless browser over WebDriver
    Webdriver,
    /// Plain HTTP GET, no script execution
    Http,
}

impl From<RendererArg> for RendererKind {
    fn from(arg: RendererArg) -> Self {
        match arg {
            RendererArg::Webdriver => RendererKind::Webdriver,
            RendererArg::Http => RendererKind::Http,
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    let config = build_config(&cli)?;
    tracing::info!(
        "Crawling {} (max depth {}, max image size {} bytes)",
        config.scope.base_url,
        config.scope.max_depth,
        config.scope.max_image_size
    );

    let shutdown = async {
        if tokio::signal::ctrl_c().await.is_err() {
            // No signal handler available; never request shutdown
            std::future::pending::<()>().await;
        }
        tracing::warn!("Received Ctrl-C");
    };

    let report = crawl_until(config, shutdown)
        .await
        .context("Crawl failed")?;

    let json = serde_json::to_string_pretty(&report).context("Failed to serialize report")?;

    match &cli.output {
        Some(path) => {
            std::fs::write(path, json)
                .with_context(|| format!("Failed to write report to {}", path.display()))?;
            tracing::info!("Report written to {}", path.display());
            if !cli.quiet {
                print_summary(&report);
            }
        }
        None => println!("{}", json),
    }

    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
///
/// Logs go to stderr so a report on stdout stays machine-readable.
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("image_harvest=info,warn"),
            1 => EnvFilter::new("image_harvest=debug,info"),
            2 => EnvFilter::new("image_harvest=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Layers the config file, the crawl request and CLI flags, in that order
fn build_config(cli: &Cli) -> anyhow::Result<Config> {
    let mut config = match &cli.config {
        Some(path) => load_file(path)?,
        None => Config::default(),
    };

    if let Some(path) = &cli.request {
        let body = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read crawl request {}", path.display()))?;
        let mut request = CrawlRequest::from_json(&body)
            .with_context(|| format!("Invalid crawl request {}", path.display()))?;
        if request.base_url.is_none() {
            request.base_url = cli
                .base_url
                .clone()
                .or_else(|| Some(config.scope.base_url.clone()));
        }
        config.scope = request.into_scope().context("Invalid crawl request")?;
    }

    if let Some(base_url) = &cli.base_url {
        config.scope.base_url = base_url.clone();
    }
    if let Some(depth) = cli.max_depth {
        config.scope.max_depth = depth;
    }
    if let Some(size) = cli.max_image_size {
        config.scope.max_image_size = size;
    }
    if !cli.allow_ext.is_empty() {
        config.scope.allowed_extensions = cli.allow_ext.clone();
    }
    if let Some(renderer) = cli.renderer {
        config.renderer.kind = renderer.into();
    }
    if let Some(url) = &cli.webdriver_url {
        config.renderer.webdriver_url = url.clone();
    }
    if let Some(secs) = cli.page_timeout {
        config.renderer.page_timeout_secs = secs;
    }
    if let Some(secs) = cli.timeout {
        config.crawl.timeout_secs = Some(secs);
    }

    Ok(config)
}

fn load_file(path: &Path) -> anyhow::Result<Config> {
    tracing::info!("Loading configuration from: {}", path.display());

    let config = read_config(path)
        .with_context(|| format!("Failed to load configuration from {}", path.display()))?;
    let hash = compute_config_hash(path)?;
    tracing::info!("Configuration loaded (hash: {})", hash);

    Ok(config)
}
