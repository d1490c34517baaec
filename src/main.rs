// file: src/main.rs
// description: commandline application entry point with command handling
// reference: application bootstrap and orchestration

use anyhow::{Context, Result};
use car_checker::utils::logging::{format_info, format_step, format_success, format_warning};
use car_checker::{
    Config, FirecrawlClient, JsonExporter, OperationTimer, Report, ReportPipeline, ReportRequest,
    SearchBackend, SummaryMode, TextChunker, TextCompressor, Validator,
};
use clap::{ArgAction, Parser, Subcommand};
use colored::Colorize;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

const DEFAULT_CAR: &str = "porsche cayman 2007";
const PREVIEW_CHARS: usize = 300;

#[derive(Parser)]
#[command(name = "car_checker")]
#[command(author = "cipher")]
#[command(version = "0.1.0")]
#[command(about = "Search, summarize and report on a car model", long_about = None)]
struct Cli {
    #[arg(
        short,
        long,
        value_name = "FILE",
        default_value = "config/default.toml"
    )]
    config: PathBuf,

    #[arg(long, default_value_t = true, action = ArgAction::Set)]
    color: bool,

    #[arg(short, long, action = ArgAction::SetTrue)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Search reviews and spec sheets, then write the buying report
    Report {
        #[arg(long, default_value = DEFAULT_CAR)]
        car: String,

        #[arg(long, value_name = "NUM")]
        search_limit: Option<usize>,

        #[arg(long, value_name = "NUM")]
        spec_limit: Option<usize>,

        #[arg(long, value_name = "NUM")]
        max_model_calls: Option<usize>,

        #[arg(long, value_name = "MODE")]
        mode: Option<SummaryMode>,

        /// Directory for a JSON copy of the report
        #[arg(short, long)]
        output: Option<PathBuf>,

        #[arg(short, long)]
        pretty: bool,
    },

    /// Run one search and list the scraped hits
    Search {
        query: String,

        #[arg(short, long, default_value_t = 5)]
        limit: usize,
    },

    /// Split a local markdown file the way chunked summaries do
    Chunk {
        file: PathBuf,

        #[arg(long, value_name = "NUM")]
        max_chars: Option<usize>,
    },

    /// Sample a local markdown file the way single-call summaries do
    Compress {
        file: PathBuf,

        #[arg(long, value_name = "NUM")]
        max_chars: Option<usize>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    car_checker::utils::logging::init_logger(cli.color, cli.verbose);
    colored::control::set_override(cli.color);

    info!("Car Checker");
    info!("Loading configuration from: {}", cli.config.display());

    let config = if cli.config.exists() {
        Config::load(Some(cli.config.as_path())).context("Failed to load configuration")?
    } else {
        warn!(
            "Config file {} not found, using default configuration",
            cli.config.display()
        );
        Config::load(None).context("Failed to load configuration")?
    };

    match cli.command {
        Commands::Report {
            car,
            search_limit,
            spec_limit,
            max_model_calls,
            mode,
            output,
            pretty,
        } => {
            let mut config = config;
            if let Some(mode) = mode {
                config.pipeline.summary_mode = mode;
            }
            let request = ReportRequest::for_car(&car, &config.pipeline).with_limits(
                search_limit.unwrap_or(config.pipeline.search_limit),
                spec_limit.unwrap_or(config.pipeline.spec_limit),
            );
            let default_max_model_calls = request.max_model_calls;
            let request =
                request.with_max_model_calls(max_model_calls.unwrap_or(default_max_model_calls));

            cmd_report(&config, &request, output.as_deref(), pretty).await?;
        }
        Commands::Search { query, limit } => {
            cmd_search(&config, &query, limit).await?;
        }
        Commands::Chunk { file, max_chars } => {
            cmd_chunk(&file, max_chars.unwrap_or(config.pipeline.chunk_max_chars))?;
        }
        Commands::Compress { file, max_chars } => {
            cmd_compress(&file, max_chars.unwrap_or(config.pipeline.compress_max_chars))?;
        }
    }

    Ok(())
}

async fn cmd_report(
    config: &Config,
    request: &ReportRequest,
    output: Option<&Path>,
    pretty: bool,
) -> Result<()> {
    let credentials = config
        .credentials()
        .context("API credentials are required for a report run")?;

    info!(
        "Building report for {} ({} mode, {} model calls max)",
        request.label(),
        config.pipeline.summary_mode,
        request.max_model_calls
    );

    let pipeline = ReportPipeline::from_config(config, credentials)?.with_progress(true);
    let report = pipeline
        .search_and_summarize(request)
        .await
        .context("Report run failed")?;

    print_report(&report);

    if let Some(dir) = output {
        let exporter = JsonExporter::new(dir)?;
        let path = exporter.export(&report, request.label(), pretty)?;
        println!("\n{}", format_success(&format!("Saved to {}", path.display())));
    }

    Ok(())
}

fn print_report(report: &Report) {
    println!("\n{}\n", "FINAL SUMMARY:".bold());
    println!("{}", report.text);

    if report.summaries.is_empty() {
        println!("\n{}", format_warning("No review documents were summarized"));
        return;
    }

    println!("\n{}", "=".repeat(80));
    let total = report.summaries.len();
    for (idx, summary) in report.summaries.iter().enumerate() {
        let url = summary.url.as_deref().unwrap_or("unknown");
        println!("\n{}", format_step(idx + 1, total, url));
        println!("{}", summary.summary);
    }
    println!("\n{}", "=".repeat(80));

    let sources = report.source_urls();
    if !sources.is_empty() {
        println!("Sources consulted:");
        for url in sources {
            println!("  - {}", url);
        }
    }

    println!(
        "{}",
        format_info(&format!(
            "{} model calls ({:.1}s each), {} documents skipped, {} spec sources",
            report.stats.model_calls,
            report.stats.seconds_per_call(),
            report.stats.documents_skipped,
            report.stats.spec_sources
        ))
    );
}

async fn cmd_search(config: &Config, query: &str, limit: usize) -> Result<()> {
    Validator::validate_query(query)?;
    info!("Searching for: {}", query);

    let api_key = config.search_api_key()?;
    let client = FirecrawlClient::new(&config.search, api_key)?;

    let timer = OperationTimer::new(&format!("search '{}'", query));
    let response = client
        .search(query, limit, &config.search.scrape)
        .await
        .context("Search request failed")?;
    timer.finish();

    if response.is_empty() {
        println!("\nNo results found for query: \"{}\"\n", query);
        println!("Response shape: {}", response.shape());
        return Ok(());
    }

    println!("\nSearch Results for: \"{}\"\n", query);
    println!(
        "Found {} result(s) ({} response)\n",
        response.len(),
        response.shape()
    );
    println!("{}", "=".repeat(80));

    for (idx, item) in response.normalized().enumerate() {
        match item {
            Ok(result) => {
                let url = result.url.as_deref().unwrap_or("unknown");
                println!(
                    "\n{}. {} ({} chars)",
                    idx + 1,
                    url,
                    result.markdown.chars().count()
                );
                println!("   Preview:");
                let preview = Validator::truncate_text(&result.markdown, PREVIEW_CHARS);
                for line in preview.lines().take(5) {
                    println!("     {}", line);
                }
            }
            Err(e) => {
                println!("\n{}. {}", idx + 1, format_warning(&e.to_string()));
            }
        }
    }

    println!("\n{}", "=".repeat(80));
    Ok(())
}

fn read_markdown(file: &Path) -> Result<String> {
    Validator::validate_file_path(file)?;
    let content = std::fs::read_to_string(file)
        .with_context(|| format!("Failed to read {}", file.display()))?;
    Validator::validate_content_not_empty(&content)?;
    Ok(content)
}

fn cmd_chunk(file: &Path, max_chars: usize) -> Result<()> {
    let content = read_markdown(file)?;
    let chunker = TextChunker::new(max_chars)?;

    let chunks: Vec<&str> = chunker.chunks(&content).collect();
    info!(
        "{} split into {} chunks of at most {} chars",
        file.display(),
        chunks.len(),
        chunker.max_chars()
    );

    for (idx, chunk) in chunks.iter().enumerate() {
        println!(
            "\n{}",
            format_step(idx + 1, chunks.len(), &format!("{} chars", chunk.chars().count()))
        );
        println!("{}", chunk);
    }

    println!(
        "\n{}",
        format_info(&format!(
            "Chunked mode would spend {} model calls on this document",
            chunks.len() + 1
        ))
    );
    Ok(())
}

fn cmd_compress(file: &Path, max_chars: usize) -> Result<()> {
    let content = read_markdown(file)?;
    let compressor = TextCompressor::new(max_chars)?;

    let compressed = compressor.compress(&content);
    println!("{}", compressed);
    println!(
        "\n{}",
        format_info(&format!(
            "{} -> {} chars (budget {})",
            content.trim().chars().count(),
            compressed.chars().count(),
            compressor.max_chars()
        ))
    );
    Ok(())
}
