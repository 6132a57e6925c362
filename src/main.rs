//! Relicscan main entry point
//!
//! Command-line interface for the legacy-system reference scanner.

use anyhow::Context;
use clap::{Parser, Subcommand};
use relicscan::analyzer::analyze;
use relicscan::completion::OpenAiCompatClient;
use relicscan::config::{load_config, Config};
use relicscan::crawler::{build_http_client, crawl, merge_url_records, UrlRecord};
use relicscan::report::{build_report, render_markdown, Report};
use relicscan::{canonicalize_url, with_time_ceiling};
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

/// Relicscan: find and classify legacy-system references on a website
///
/// Crawls a site, detects CougarWeb/Colleague mentions, asks a
/// text-completion model to classify each one, and produces a structured
/// migration report.
#[derive(Parser, Debug)]
#[command(name = "relicscan")]
#[command(version)]
#[command(about = "Legacy-system reference scanner", long_about = None)]
struct Cli {
    /// Path to TOML configuration file (defaults apply without one)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose", global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Crawl a site breadth-first and list the discovered URLs
    Scan {
        /// Seed URL to start from
        seed: String,

        /// Maximum crawl depth (overrides config, <= 5)
        #[arg(long)]
        max_depth: Option<u32>,

        /// Maximum URLs to record (overrides config, <= 300)
        #[arg(long)]
        max_urls: Option<usize>,

        /// Previous scan output (or plain URL list) to skip
        #[arg(long)]
        exclude_file: Option<PathBuf>,

        /// Write the URL list as JSON here instead of stdout
        #[arg(long)]
        output: Option<PathBuf>,
    },

    /// Analyze pages for legacy references and classify each one
    Analyze {
        /// Previous scan output (or plain URL list) to analyze
        #[arg(long)]
        urls_file: Option<PathBuf>,

        /// URL to analyze (repeatable)
        #[arg(long = "url")]
        urls: Vec<String>,

        /// SEO keyword hint (repeatable, adds to config)
        #[arg(long = "keyword")]
        keywords: Vec<String>,

        /// Work-stream hint (repeatable, adds to config)
        #[arg(long = "work-stream")]
        work_streams: Vec<String>,

        /// Write the JSON report here instead of stdout
        #[arg(long)]
        report: Option<PathBuf>,

        /// Also write a markdown rendering of the report here
        #[arg(long)]
        markdown: Option<PathBuf>,
    },

    /// Scan and analyze in one pass, producing the full migration report
    Run {
        /// Seed URL to start from
        seed: String,

        /// Maximum crawl depth (overrides config, <= 5)
        #[arg(long)]
        max_depth: Option<u32>,

        /// Maximum URLs to record (overrides config, <= 300)
        #[arg(long)]
        max_urls: Option<usize>,

        /// Previous scan output (or plain URL list) to skip
        #[arg(long)]
        exclude_file: Option<PathBuf>,

        /// SEO keyword hint (repeatable, adds to config)
        #[arg(long = "keyword")]
        keywords: Vec<String>,

        /// Work-stream hint (repeatable, adds to config)
        #[arg(long = "work-stream")]
        work_streams: Vec<String>,

        /// Write the JSON report here instead of stdout
        #[arg(long)]
        report: Option<PathBuf>,

        /// Also write a markdown rendering of the report here
        #[arg(long)]
        markdown: Option<PathBuf>,
    },
}

/// JSON shape of the scan operation's output
///
/// Deserializable so that a rescan pointed at an existing output file can
/// merge with the previous run's URL list.
#[derive(Debug, Serialize, serde::Deserialize)]
struct ScanOutput {
    urls: Vec<UrlRecord>,
    #[serde(default)]
    count: usize,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    setup_logging(cli.verbose, cli.quiet);

    let config = match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            load_config(path).with_context(|| format!("Failed to load {}", path.display()))?
        }
        None => Config::default(),
    };

    match cli.command {
        Command::Scan {
            seed,
            max_depth,
            max_urls,
            exclude_file,
            output,
        } => handle_scan(config, seed, max_depth, max_urls, exclude_file, output).await,

        Command::Analyze {
            urls_file,
            urls,
            keywords,
            work_streams,
            report,
            markdown,
        } => {
            let mut config = config;
            config.hints.keywords.extend(keywords);
            config.hints.work_streams.extend(work_streams);
            handle_analyze(config, urls_file, urls, report, markdown).await
        }

        Command::Run {
            seed,
            max_depth,
            max_urls,
            exclude_file,
            keywords,
            work_streams,
            report,
            markdown,
        } => {
            let mut config = config;
            config.hints.keywords.extend(keywords);
            config.hints.work_streams.extend(work_streams);
            handle_run(config, seed, max_depth, max_urls, exclude_file, report, markdown).await
        }
    }
}

/// Sets up the tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("relicscan=info,warn"),
            1 => EnvFilter::new("relicscan=debug,info"),
            2 => EnvFilter::new("relicscan=trace,debug"),
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

/// Handles the scan subcommand: crawl only, emit the URL list
async fn handle_scan(
    config: Config,
    seed: String,
    max_depth: Option<u32>,
    max_urls: Option<usize>,
    exclude_file: Option<PathBuf>,
    output: Option<PathBuf>,
) -> anyhow::Result<()> {
    let depth = max_depth.unwrap_or(config.crawler.max_depth);
    let urls = max_urls.unwrap_or(config.crawler.max_urls);
    let exclude = read_url_list(exclude_file.as_deref())?;

    let client = build_http_client(&config.crawler, &config.user_agent)?;
    let records = with_time_ceiling(
        config.crawler.overall_timeout_secs,
        crawl(&client, &seed, depth, urls, &exclude),
    )
    .await?;

    // A rescan into an existing output file extends the prior list; new
    // results win on depth conflicts.
    let records = match output.as_deref() {
        Some(path) if path.exists() => {
            let prior = read_prior_scan(path)?;
            tracing::info!("Merging with {} previously recorded URLs", prior.len());
            merge_url_records(prior, records)
        }
        _ => records,
    };

    let payload = ScanOutput {
        count: records.len(),
        urls: records,
    };

    write_json(&payload, output.as_deref())
}

/// Loads the URL list from a previous scan's output file
fn read_prior_scan(path: &Path) -> anyhow::Result<Vec<UrlRecord>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let prior: ScanOutput = serde_json::from_str(&content)
        .with_context(|| format!("{} is not a scan output file", path.display()))?;
    Ok(prior.urls)
}

/// Handles the analyze subcommand: classify an explicit URL list
async fn handle_analyze(
    config: Config,
    urls_file: Option<PathBuf>,
    urls: Vec<String>,
    report_path: Option<PathBuf>,
    markdown_path: Option<PathBuf>,
) -> anyhow::Result<()> {
    let mut all_urls = read_url_list(urls_file.as_deref())?;
    all_urls.extend(urls);

    let mut records = Vec::new();
    for raw in &all_urls {
        let canonical = canonicalize_url(raw)
            .map_err(|e| anyhow::anyhow!("Invalid URL '{}': {}", raw, e))?;
        if !records.iter().any(|r: &UrlRecord| r.url == canonical) {
            records.push(UrlRecord::new(canonical, 0));
        }
    }

    let client = build_http_client(&config.crawler, &config.user_agent)?;
    let model = OpenAiCompatClient::new(&config.model)?;

    let results = with_time_ceiling(
        config.crawler.overall_timeout_secs,
        analyze(&client, &model, &mut records, &config),
    )
    .await?;

    let report = build_report(&records, &results, &config.hints, None);
    emit_report(&report, report_path.as_deref(), markdown_path.as_deref())
}

/// Handles the run subcommand: the full crawl-and-classify pipeline
async fn handle_run(
    config: Config,
    seed: String,
    max_depth: Option<u32>,
    max_urls: Option<usize>,
    exclude_file: Option<PathBuf>,
    report_path: Option<PathBuf>,
    markdown_path: Option<PathBuf>,
) -> anyhow::Result<()> {
    let depth = max_depth.unwrap_or(config.crawler.max_depth);
    let urls = max_urls.unwrap_or(config.crawler.max_urls);
    let exclude = read_url_list(exclude_file.as_deref())?;

    let client = build_http_client(&config.crawler, &config.user_agent)?;
    let model = OpenAiCompatClient::new(&config.model)?;

    let mut records = with_time_ceiling(
        config.crawler.overall_timeout_secs,
        crawl(&client, &seed, depth, urls, &exclude),
    )
    .await?;

    let seed_canonical = canonicalize_url(&seed).ok();
    let results = with_time_ceiling(
        config.crawler.overall_timeout_secs,
        analyze(&client, &model, &mut records, &config),
    )
    .await?;

    let report = build_report(&records, &results, &config.hints, seed_canonical);
    emit_report(&report, report_path.as_deref(), markdown_path.as_deref())
}

/// Reads a URL list from a file
///
/// Accepts either a scan output file (JSON) or plain text with one URL
/// per line; blank lines and `#` comments are skipped in the latter.
fn read_url_list(path: Option<&Path>) -> anyhow::Result<Vec<String>> {
    let Some(path) = path else {
        return Ok(Vec::new());
    };
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;

    if content.trim_start().starts_with('{') {
        let prior: ScanOutput = serde_json::from_str(&content)
            .with_context(|| format!("{} is not a scan output file", path.display()))?;
        return Ok(prior.urls.into_iter().map(|r| r.url).collect());
    }

    Ok(content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(str::to_string)
        .collect())
}

/// Writes a JSON payload to a file or stdout
fn write_json<T: Serialize>(payload: &T, path: Option<&Path>) -> anyhow::Result<()> {
    let json = serde_json::to_string_pretty(payload)?;
    match path {
        Some(path) => {
            std::fs::write(path, json)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            tracing::info!("Wrote {}", path.display());
        }
        None => println!("{}", json),
    }
    Ok(())
}

/// Emits the report in its JSON encoding and, optionally, as markdown
fn emit_report(
    report: &Report,
    report_path: Option<&Path>,
    markdown_path: Option<&Path>,
) -> anyhow::Result<()> {
    write_json(report, report_path)?;
    if let Some(path) = markdown_path {
        render_markdown(report, path)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        tracing::info!("Wrote {}", path.display());
    }
    Ok(())
}
