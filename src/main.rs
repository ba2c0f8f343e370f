// src/main.rs
// =============================================================================
// This is the entry point of our CLI application.
//
// What happens here:
// 1. Parse command-line arguments using clap
// 2. For every URL, in order: fetch the page, count its distinct external
//    references, print "<url> <count>"
// 3. Exit with proper code (0 = every page reported, 1 = a page failed,
//    2 = usage or internal error)
//
// Failure policy:
// - Invalid URL or unknown host stops the whole batch (unless --keep-going)
// - Any other fetch failure skips that page and carries on
// =============================================================================

// Module declarations
mod cli;        // src/cli.rs - command-line parsing
mod collector;  // src/collector/ - reference extraction and classification
mod fetch;      // src/fetch/ - HTTP fetching and error categories
mod logging;    // src/logging.rs - tracing subscriber setup
mod report;     // src/report.rs - output lines

use anyhow::Result;
use clap::Parser;
use futures::stream::{self, StreamExt};
use std::io::{self, Write};

use cli::{Cli, RunOptions};
use fetch::{FetchError, Fetcher};
use report::{write_report, UrlReport};

#[tokio::main]
async fn main() {
    if let Err(e) = logging::init_logging() {
        // Reporting still works without logs, so carry on
        eprintln!("Warning: {:#}", e);
    }

    let exit_code = match run().await {
        Ok(code) => code,
        Err(e) => {
            // Unexpected error: print it with its causes and exit with code 2
            eprintln!("Error: {:#}", e);
            2
        }
    };

    std::process::exit(exit_code);
}

// Returns the process exit code; Err only for unexpected failures
async fn run() -> Result<i32> {
    // Exits with status 2 and a usage message when no URL is given
    let cli = Cli::parse();

    let fetcher = Fetcher::new(&cli.fetch_config())?;

    process_urls(
        &fetcher,
        &cli.urls,
        cli.run_options(),
        &mut io::stdout(),
        &mut io::stderr(),
    )
    .await
}

// Runs the fetch -> collect -> report pipeline over every URL
//
// Parameters:
//   fetcher: shared HTTP client
//   urls: the command-line URLs, also used as each page's base URI
//   options: output format, prefetch depth and failure policy
//   out: where report lines go (stdout)
//   err: where diagnostics go (stderr)
//
// Returns: Ok(0) if every page was reported, Ok(1) if any page failed
async fn process_urls<O: Write, E: Write>(
    fetcher: &Fetcher,
    urls: &[String],
    options: RunOptions,
    out: &mut O,
    err: &mut E,
) -> Result<i32> {
    // `buffered` keeps up to `jobs` fetches in flight but yields results in
    // input order, so reports still come out in command-line order.
    let pages = stream::iter(urls.iter().map(|url| async move {
        let page = fetcher.fetch(url).await;
        (url, page)
    }))
    .buffered(options.jobs.max(1));
    let mut pages = std::pin::pin!(pages);

    let mut failures = 0usize;

    while let Some((url, page)) = pages.next().await {
        let error = match page {
            Ok(html) => {
                let external = collector::external_references(&html, url);
                tracing::info!(url = url.as_str(), external = external.len(), "page classified");
                write_report(out, &UrlReport::new(url.as_str(), external.len()), options.json)?;
                continue;
            }
            Err(error) => error,
        };

        failures += 1;

        let fatal = match &error {
            FetchError::InvalidUrl { .. } => {
                writeln!(err, "{}", error)?;
                writeln!(err, "Invalid URL: {}", url)?;
                true
            }
            FetchError::UnknownHost { .. } => {
                writeln!(err, "{}", error)?;
                writeln!(err, "Unable to connect to host: {}", url)?;
                true
            }
            FetchError::Io { .. } => {
                writeln!(err, "Warning: {}", error)?;
                false
            }
        };

        if fatal && !options.keep_going {
            tracing::debug!(url = url.as_str(), "stopping batch");
            return Ok(1);
        }

        tracing::debug!(url = url.as_str(), "page skipped");
    }

    Ok(if failures > 0 { 1 } else { 0 })
}
