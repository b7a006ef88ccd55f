//! Per-query comparison table and its CSV rendering.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use tracing::{info, warn};

use crate::stats::{aggregate, compare_query, AggregateStats, QueryStats};
use crate::store::ResultStore;

pub const CSV_HEADER: [&str; 4] = ["Query", "OverlapCount", "PercentOverlap", "CorrelationCoefficient"];
pub const AGGREGATE_LABEL: &str = "Averages";

#[derive(Debug, Clone, PartialEq)]
pub struct ReportRow {
    pub query: String,
    pub stats: QueryStats,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Report {
    pub rows: Vec<ReportRow>,
    pub aggregate: Option<AggregateStats>,
}

impl Report {
    /// Compare every reference query against the scraped results, in the
    /// reference store's order.
    ///
    /// A query missing from `results` is compared against an empty list.
    pub fn build(reference: &ResultStore, results: &ResultStore) -> Self {
        info!(
            action = "start",
            component = "stats",
            query_count = reference.len(),
            "Calculating stats"
        );

        let mut missing = 0usize;
        let rows: Vec<ReportRow> = reference
            .iter()
            .map(|(query, reference_list)| {
                let scraped = results.get(query).unwrap_or_else(|| {
                    missing += 1;
                    warn!(action = "compare", component = "stats", query = query, "No scraped results for reference query");
                    &[]
                });
                ReportRow {
                    query: query.to_string(),
                    stats: compare_query(reference_list, scraped),
                }
            })
            .collect();

        let per_query: Vec<QueryStats> = rows.iter().map(|row| row.stats).collect();
        let aggregate = aggregate(&per_query);

        if aggregate.is_none() {
            warn!(action = "complete", component = "stats", "Reference store has no queries; no aggregate row");
        }
        info!(
            action = "complete",
            component = "stats",
            query_count = rows.len(),
            missing_queries = missing,
            "Stats calculated"
        );

        Self { rows, aggregate }
    }

    pub fn write_csv(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory {:?}", parent))?;
        }

        let mut writer = csv::Writer::from_path(path)
            .with_context(|| format!("Failed to open stats file {:?}", path))?;

        writer.write_record(CSV_HEADER)?;
        for row in &self.rows {
            writer.write_record([
                row.query.clone(),
                row.stats.overlap_count.to_string(),
                row.stats.percent_overlap.to_string(),
                row.stats.correlation.to_string(),
            ])?;
        }
        if let Some(summary) = &self.aggregate {
            writer.write_record([
                AGGREGATE_LABEL.to_string(),
                summary.overlap_count.to_string(),
                summary.percent_overlap.to_string(),
                summary.correlation.to_string(),
            ])?;
        }
        writer.flush()?;

        info!(action = "save", component = "stats", row_count = self.rows.len(), file_path = ?path, "Saved stats report");
        Ok(())
    }

    /// Print a short summary for the terminal.
    pub fn print_summary(&self) {
        println!("\n--- Result Overlap Report ---");
        println!("Queries compared: {}", self.rows.len());

        let Some(summary) = &self.aggregate else {
            println!("No queries in the reference data.");
            return;
        };

        println!("Average overlapping results: {:.2}", summary.overlap_count);
        println!("Average percent overlap: {:.2}%", summary.percent_overlap);
        println!("Average rank correlation: {:.4}", summary.correlation);

        let mut by_correlation: Vec<&ReportRow> = self.rows.iter().collect();
        by_correlation.sort_by(|a, b| b.stats.correlation.total_cmp(&a.stats.correlation));

        if let (Some(best), Some(worst)) = (by_correlation.first(), by_correlation.last()) {
            println!(
                "Best correlated: \"{}\" ({:.4}, {} overlapping)",
                best.query, best.stats.correlation, best.stats.overlap_count
            );
            println!(
                "Worst correlated: \"{}\" ({:.4}, {} overlapping)",
                worst.query, worst.stats.correlation, worst.stats.overlap_count
            );
        }

        let zero_overlap = self.rows.iter().filter(|r| r.stats.overlap_count == 0).count();
        if zero_overlap > 0 {
            println!("Queries with no overlap: {}", zero_overlap);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn store(entries: &[(&str, &[&str])]) -> ResultStore {
        entries
            .iter()
            .map(|(q, urls)| (q.to_string(), urls.iter().map(|u| u.to_string()).collect()))
            .collect()
    }

    #[test]
    fn rows_follow_reference_order() {
        let reference = store(&[("second", &["a"]), ("first", &["b"])]);
        let results = store(&[("first", &["b"]), ("second", &["a"])]);

        let report = Report::build(&reference, &results);
        let order: Vec<&str> = report.rows.iter().map(|r| r.query.as_str()).collect();
        assert_eq!(order, vec!["second", "first"]);
        assert!(report.rows.iter().all(|r| r.stats.overlap_count == 1));
    }

    #[test]
    fn missing_scraped_query_counts_as_no_overlap() {
        let reference = store(&[("q", &["https://a.com", "https://b.com"])]);
        let report = Report::build(&reference, &ResultStore::new());
        assert_eq!(report.rows[0].stats.overlap_count, 0);
        assert_eq!(report.rows[0].stats.percent_overlap, 0.0);
        assert!(report.aggregate.is_some());
    }

    #[test]
    fn empty_reference_has_no_aggregate() {
        let report = Report::build(&ResultStore::new(), &store(&[("q", &["a"])]));
        assert!(report.rows.is_empty());
        assert!(report.aggregate.is_none());
    }

    #[test]
    fn writes_header_rows_and_averages() {
        let reference = store(&[
            ("swapped", &["a", "b", "c", "d"]),
            ("disjoint, with comma", &["a"]),
        ]);
        let results = store(&[("swapped", &["b", "a", "d", "c"]), ("disjoint, with comma", &["z"])]);
        let report = Report::build(&reference, &results);

        let dir = TempDir::new().unwrap();
        let path = dir.path().join("out/stats.csv");
        report.write_csv(&path).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines.len(), 4);
        assert_eq!(lines[0], "Query,OverlapCount,PercentOverlap,CorrelationCoefficient");
        assert!(lines[1].starts_with("swapped,4,100,0.6"));
        assert_eq!(lines[2], "\"disjoint, with comma\",0,0,0");
        assert!(lines[3].starts_with("Averages,2,50,0.3"));
    }

    #[test]
    fn empty_report_writes_only_header() {
        let report = Report::build(&ResultStore::new(), &ResultStore::new());
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("stats.csv");
        report.write_csv(&path).unwrap();
        let content = fs::read_to_string(&path).unwrap();
        assert_eq!(content.lines().count(), 1);
    }
}
