pub mod args;
pub mod canonical;
pub mod config;
pub mod extractor;
pub mod fetch;
pub mod pipeline;
pub mod report;
pub mod runner;
pub mod stats;
pub mod store;
pub mod utils;

#[cfg(test)]
mod test_utils;

pub use args::Args;
pub use canonical::canonicalize;
pub use config::{Config, FailurePolicy};
pub use extractor::ResultExtractor;
pub use fetch::{HttpFetcher, PageFetcher};
pub use report::Report;
pub use runner::{QueryRunner, RunSummary};
pub use stats::{aggregate, compare_query, AggregateStats, QueryStats};
pub use store::{load_queries, ResultStore};
