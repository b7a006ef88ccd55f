//! Run configuration.
//!
//! Everything a component needs is handed to it through these structures at
//! construction time; nothing reads paths or constants from global state.

use std::path::PathBuf;

use anyhow::{anyhow, bail, Result};
use clap::ValueEnum;
use url::Url;

use crate::args::Args;
use crate::extractor::{DEFAULT_BLOCK_SELECTOR, DEFAULT_LINK_SELECTOR};

pub const DEFAULT_ENDPOINT: &str = "http://www.bing.com/search";

/// What the query runner does when fetching a query fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum FailurePolicy {
    /// Log the failure, keep any previous results for the query, move on.
    Skip,
    /// Retry up to `max_retries` more times, then skip.
    Retry,
    /// Stop the batch and report the error.
    Abort,
}

#[derive(Debug, Clone)]
pub struct FetchConfig {
    pub endpoint: String,
    pub timeout_seconds: u64,
    /// Fixed User-Agent. `None` picks one of the built-in browser strings.
    pub user_agent: Option<String>,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            timeout_seconds: 20,
            user_agent: None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct RunnerConfig {
    /// Where the scraped store is persisted.
    pub store_path: PathBuf,
    /// Results requested from the engine per query, above `results_per_query`
    /// to make up for links dropped by de-duplication.
    pub raw_count: usize,
    /// Inclusive range, in seconds, of the delay before each request.
    pub delay_seconds: (u64, u64),
    pub failure_policy: FailurePolicy,
    pub max_retries: u32,
    /// Persist the store after every N processed queries.
    pub checkpoint_every: Option<usize>,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            store_path: PathBuf::from("output/results.json"),
            raw_count: 30,
            delay_seconds: (5, 15),
            failure_policy: FailurePolicy::Skip,
            max_retries: 2,
            checkpoint_every: None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub queries_path: PathBuf,
    pub reference_path: PathBuf,
    pub stats_path: PathBuf,
    pub scrape: bool,
    pub query_start: usize,
    pub query_end: Option<usize>,
    pub results_per_query: usize,
    pub rate_limit: bool,
    pub block_selector: String,
    pub link_selector: String,
    pub runner: RunnerConfig,
    pub fetch: FetchConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            queries_path: PathBuf::from("input/queries.txt"),
            reference_path: PathBuf::from("input/reference.json"),
            stats_path: PathBuf::from("output/stats.csv"),
            scrape: false,
            query_start: 0,
            query_end: None,
            results_per_query: 10,
            rate_limit: true,
            block_selector: DEFAULT_BLOCK_SELECTOR.to_string(),
            link_selector: DEFAULT_LINK_SELECTOR.to_string(),
            runner: RunnerConfig::default(),
            fetch: FetchConfig::default(),
        }
    }
}

impl Config {
    pub fn from_args(args: &Args) -> Self {
        Self {
            queries_path: args.queries.clone(),
            reference_path: args.reference.clone(),
            stats_path: args.stats.clone(),
            scrape: args.scrape,
            query_start: args.query_start,
            query_end: args.query_end,
            results_per_query: args.results_per_query,
            rate_limit: !args.no_sleep,
            block_selector: args.block_selector.clone(),
            link_selector: args.link_selector.clone(),
            runner: RunnerConfig {
                store_path: args.results.clone(),
                raw_count: args.raw_count,
                delay_seconds: (args.min_delay, args.max_delay),
                failure_policy: args.on_error,
                max_retries: args.retries,
                checkpoint_every: args.checkpoint_every,
            },
            fetch: FetchConfig {
                endpoint: args.endpoint.clone(),
                timeout_seconds: args.timeout,
                user_agent: args.user_agent.clone(),
            },
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.results_per_query == 0 {
            bail!("results_per_query must be greater than 0");
        }
        if self.runner.raw_count < self.results_per_query {
            bail!(
                "raw_count ({}) must be at least results_per_query ({})",
                self.runner.raw_count,
                self.results_per_query
            );
        }
        if self.runner.delay_seconds.0 > self.runner.delay_seconds.1 {
            bail!("minimum delay must be <= maximum delay");
        }
        if self.runner.checkpoint_every == Some(0) {
            bail!("checkpoint interval must be greater than 0");
        }
        if self.fetch.timeout_seconds == 0 {
            bail!("timeout_seconds must be greater than 0");
        }
        Url::parse(&self.fetch.endpoint)
            .map_err(|e| anyhow!("invalid search endpoint {:?}: {e}", self.fetch.endpoint))?;
        Ok(())
    }
}
