use anyhow::Result;
use std::time::Instant;
use tracing::{info, warn};

use crate::config::Config;
use crate::extractor::ResultExtractor;
use crate::fetch::HttpFetcher;
use crate::report::Report;
use crate::runner::QueryRunner;
use crate::store::{load_queries, ResultStore};

/// Scrape (when enabled), compare against the reference store and write the
/// stats report.
///
/// Returns `None` when there is no reference store to compare against.
pub fn run(config: &Config) -> Result<Option<Report>> {
    let total_start_time = Instant::now();
    config.validate()?;

    let store_path = &config.runner.store_path;
    let results = if config.scrape {
        let queries = load_queries(&config.queries_path, config.query_start, config.query_end)?;
        let existing = ResultStore::load(store_path)?;
        let extractor = ResultExtractor::new(&config.block_selector, &config.link_selector)?;
        let fetcher = HttpFetcher::new(&config.fetch)?;
        let runner = QueryRunner::new(config.runner.clone(), fetcher, extractor);

        let (store, summary) =
            runner.run(&queries, config.results_per_query, existing, config.rate_limit)?;
        if summary.failed > 0 {
            warn!(action = "complete", component = "pipeline", failed_queries = summary.failed, "Some queries failed to scrape");
        }
        store
    } else {
        ResultStore::load_or_default(store_path)?
    };

    let Some(reference) = ResultStore::load(&config.reference_path)? else {
        warn!(action = "load", component = "pipeline", file_path = ?config.reference_path, "No reference data; skipping statistics");
        return Ok(None);
    };

    let report = Report::build(&reference, &results);
    report.write_csv(&config.stats_path)?;

    info!(
        action = "complete",
        component = "pipeline",
        duration_ms = total_start_time.elapsed().as_millis(),
        "Run completed"
    );
    Ok(Some(report))
}
