use clap::Parser;
use std::path::PathBuf;

use crate::config::{FailurePolicy, DEFAULT_ENDPOINT};
use crate::extractor::{DEFAULT_BLOCK_SELECTOR, DEFAULT_LINK_SELECTOR};

#[derive(Parser, Debug)]
#[command(
    name = "serpcmp",
    about = "Scrape search result rankings and compare them against a reference result set",
    version,
    long_about = None
)]
pub struct Args {
    /// Query list, one query per line
    #[arg(short, long, default_value = "input/queries.txt")]
    pub queries: PathBuf,

    /// Scraped result store (JSON), read before and written after scraping
    #[arg(short, long, default_value = "output/results.json")]
    pub results: PathBuf,

    /// Reference result store (JSON) to compare against
    #[arg(long, default_value = "input/reference.json")]
    pub reference: PathBuf,

    /// Output path for the per-query statistics (CSV)
    #[arg(short, long, default_value = "output/stats.csv")]
    pub stats: PathBuf,

    /// Scrape the query list before computing statistics
    #[arg(long)]
    pub scrape: bool,

    /// Index of the first query to scrape
    #[arg(long, default_value_t = 0)]
    pub query_start: usize,

    /// Index one past the last query to scrape
    #[arg(long)]
    pub query_end: Option<usize>,

    /// Number of results kept per query
    #[arg(short = 'n', long, default_value_t = 10)]
    pub results_per_query: usize,

    /// Number of results requested from the search engine per query
    #[arg(long, default_value_t = 30)]
    pub raw_count: usize,

    /// Disable the random delay between requests
    #[arg(long)]
    pub no_sleep: bool,

    /// Minimum delay between requests, in seconds
    #[arg(long, default_value_t = 5)]
    pub min_delay: u64,

    /// Maximum delay between requests, in seconds
    #[arg(long, default_value_t = 15)]
    pub max_delay: u64,

    /// What to do when a query fails to scrape
    #[arg(long, value_enum, default_value_t = FailurePolicy::Skip)]
    pub on_error: FailurePolicy,

    /// Extra attempts per query with --on-error retry
    #[arg(long, default_value_t = 2)]
    pub retries: u32,

    /// Save the result store after every N scraped queries
    #[arg(long)]
    pub checkpoint_every: Option<usize>,

    /// Search endpoint URL
    #[arg(long, default_value = DEFAULT_ENDPOINT)]
    pub endpoint: String,

    /// Fixed User-Agent header instead of a random browser one
    #[arg(long)]
    pub user_agent: Option<String>,

    /// Request timeout in seconds
    #[arg(long, default_value_t = 20)]
    pub timeout: u64,

    /// CSS selector for one organic result block
    #[arg(long, default_value = DEFAULT_BLOCK_SELECTOR)]
    pub block_selector: String,

    /// CSS selector for the result link inside a block
    #[arg(long, default_value = DEFAULT_LINK_SELECTOR)]
    pub link_selector: String,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}
