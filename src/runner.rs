//! Batch scraping of a query list into a [`ResultStore`].

use std::thread;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use rand::Rng;
use tracing::{error, info, warn};

use crate::config::{FailurePolicy, RunnerConfig};
use crate::extractor::ResultExtractor;
use crate::fetch::PageFetcher;
use crate::store::ResultStore;

/// Counters for one scrape run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub scraped: usize,
    pub empty: usize,
    pub failed: usize,
}

pub struct QueryRunner<F> {
    config: RunnerConfig,
    fetcher: F,
    extractor: ResultExtractor,
}

impl<F: PageFetcher> QueryRunner<F> {
    pub fn new(config: RunnerConfig, fetcher: F, extractor: ResultExtractor) -> Self {
        Self {
            config,
            fetcher,
            extractor,
        }
    }

    /// Scrape every query in `queries` and persist the merged store.
    ///
    /// Starts from `existing` when given, so queries scraped by earlier runs
    /// are kept. Each successful scrape replaces the query's previous entry.
    /// The store is written to `store_path` once after the last query, plus
    /// after every `checkpoint_every` queries when configured.
    ///
    /// With `rate_limit`, every request is preceded by a random pause drawn
    /// from `delay_seconds`.
    pub fn run(
        &self,
        queries: &[String],
        results_per_query: usize,
        existing: Option<ResultStore>,
        rate_limit: bool,
    ) -> Result<(ResultStore, RunSummary)> {
        let start_time = Instant::now();
        let mut store = existing.unwrap_or_default();
        let mut summary = RunSummary::default();

        info!(
            action = "start",
            component = "query_runner",
            query_count = queries.len(),
            existing_queries = store.len(),
            results_per_query,
            "Starting scrape run"
        );

        for (index, query) in queries.iter().enumerate() {
            info!(
                action = "scrape",
                component = "query_runner",
                position = index + 1,
                query = query.as_str(),
                "Scraping query"
            );

            match self.scrape_query(query, results_per_query, rate_limit) {
                Ok(results) => {
                    info!(action = "scraped", component = "query_runner", result_count = results.len(), "Query results");
                    if results.is_empty() {
                        summary.empty += 1;
                        warn!(
                            action = "scraped",
                            component = "query_runner",
                            query = query.as_str(),
                            "No results extracted for query; the engine may be blocking requests or its markup changed"
                        );
                    }
                    summary.scraped += 1;
                    store.insert(query.as_str(), results);
                }
                Err(e) if self.config.failure_policy == FailurePolicy::Abort => {
                    error!(action = "abort", component = "query_runner", query = query.as_str(), error = %e, "Query failed; aborting run");
                    return Err(e).with_context(|| format!("Scrape aborted at query {:?}", query));
                }
                Err(e) => {
                    summary.failed += 1;
                    error!(action = "skip", component = "query_runner", query = query.as_str(), error = %e, "Query failed; keeping previous results");
                }
            }

            if let Some(every) = self.config.checkpoint_every {
                let processed = index + 1;
                if processed % every == 0 && processed < queries.len() {
                    info!(action = "checkpoint", component = "query_runner", processed, "Saving checkpoint");
                    store.save(&self.config.store_path)?;
                }
            }
        }

        info!(action = "save", component = "query_runner", file_path = ?self.config.store_path, "Saving results of all queries");
        store.save(&self.config.store_path)?;

        if summary.empty > 0 {
            warn!(
                action = "complete",
                component = "query_runner",
                empty_queries = summary.empty,
                "Some pages had no results; check for blocking or markup changes"
            );
        }
        info!(
            action = "complete",
            component = "query_runner",
            scraped = summary.scraped,
            empty = summary.empty,
            failed = summary.failed,
            duration_ms = start_time.elapsed().as_millis(),
            "Scrape run completed"
        );

        Ok((store, summary))
    }

    fn scrape_query(&self, query: &str, results_per_query: usize, rate_limit: bool) -> Result<Vec<String>> {
        let attempts = match self.config.failure_policy {
            FailurePolicy::Retry => self.config.max_retries + 1,
            FailurePolicy::Skip | FailurePolicy::Abort => 1,
        };

        let mut attempt = 1;
        loop {
            if rate_limit {
                self.pause();
            }

            match self.fetcher.fetch(query, self.config.raw_count) {
                Ok(html) => return Ok(self.extractor.extract(&html, Some(results_per_query), true)),
                Err(e) if attempt < attempts => {
                    warn!(action = "retry", component = "query_runner", attempt, max_attempts = attempts, error = %e, "Fetch failed; retrying");
                    attempt += 1;
                }
                Err(e) => return Err(e),
            }
        }
    }

    fn pause(&self) {
        let delay = draw_delay(&mut rand::thread_rng(), self.config.delay_seconds);
        info!(action = "sleep", component = "query_runner", seconds = delay.as_secs(), "Waiting before request");
        thread::sleep(delay);
    }
}

/// Whole seconds drawn uniformly from the inclusive `(min, max)` range.
fn draw_delay<R: Rng>(rng: &mut R, (min, max): (u64, u64)) -> Duration {
    Duration::from_secs(rng.gen_range(min..=max))
}
