// src/cli.rs
// =============================================================================
// This file defines our command-line interface using the `clap` crate.
//
// The CLI is deliberately small:
//   extlinks [OPTIONS] <URL>...
//
// Every positional argument is a page to fetch. The options only tune how
// the pages are fetched and how the results are printed; with no options the
// output is one "<url> <count>" line per page.
//
// Rust concepts:
// - Derive macros: clap generates the parser from the struct definition
// - Vec<String>: a positional argument that can be repeated
// =============================================================================

use clap::Parser;
use std::num::NonZeroUsize;
use std::time::Duration;

use crate::fetch::FetchConfig;

// The parsed command line
//
// #[derive(Parser)] tells clap to generate the parsing code for us.
// Missing URLs are a usage error: clap prints the usage text to stderr and
// exits with status 2 before any page is fetched.
#[derive(Parser, Debug)]
#[command(
    name = "extlinks",
    version,
    about = "Count the distinct external links referenced by web pages",
    long_about = "extlinks fetches every URL given on the command line, collects the href \
                  and src references found in the page, and prints how many distinct \
                  references point outside the page's own URL."
)]
pub struct Cli {
    /// URLs of the pages to inspect, processed in the order given
    ///
    /// Each URL is also the base used to decide whether a reference is
    /// internal: anything starting with it is treated as internal.
    #[arg(required = true, value_name = "URL")]
    pub urls: Vec<String>,

    /// Print one JSON object per page instead of "<url> <count>"
    #[arg(long)]
    pub json: bool,

    /// Per-request timeout in seconds
    #[arg(long, value_name = "SECONDS", default_value_t = 30)]
    pub timeout: u64,

    /// Number of pages fetched ahead of the one being reported
    ///
    /// Output order always follows the command line, whatever this is set to.
    #[arg(long, value_name = "N", default_value_t = NonZeroUsize::MIN)]
    pub jobs: NonZeroUsize,

    /// Skip pages with an invalid URL or unknown host instead of stopping
    #[arg(long)]
    pub keep_going: bool,
}

// How the driver loop behaves, independent of how the pages are fetched
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunOptions {
    pub json: bool,
    pub jobs: usize,
    pub keep_going: bool,
}

impl Cli {
    /// Settings for the HTTP client
    pub fn fetch_config(&self) -> FetchConfig {
        FetchConfig {
            timeout: Duration::from_secs(self.timeout),
            ..FetchConfig::default()
        }
    }

    /// Settings for the driver loop
    pub fn run_options(&self) -> RunOptions {
        RunOptions {
            json: self.json,
            jobs: self.jobs.get(),
            keep_going: self.keep_going,
        }
    }
}
