//! End-to-end scrape → persist → compare using canned result pages (no
//! network).

use std::collections::HashMap;
use std::fs;

use anyhow::{bail, Result};
use serpcmp::config::RunnerConfig;
use serpcmp::{FailurePolicy, PageFetcher, QueryRunner, Report, ResultExtractor, ResultStore};
use tempfile::TempDir;

struct CannedPages(HashMap<String, String>);

impl CannedPages {
    fn new(pages: &[(&str, &[&str])]) -> Self {
        let pages = pages
            .iter()
            .map(|(query, links)| {
                let items: String = links
                    .iter()
                    .map(|href| {
                        format!(r#"<li class="b_algo"><h2><a href="{href}">result</a></h2><p>text</p></li>"#)
                    })
                    .collect();
                (
                    query.to_string(),
                    format!(r#"<html><body><ol id="b_results">{items}</ol></body></html>"#),
                )
            })
            .collect();
        Self(pages)
    }
}

impl PageFetcher for CannedPages {
    fn fetch(&self, query: &str, _raw_count: usize) -> Result<String> {
        match self.0.get(query) {
            Some(html) => Ok(html.clone()),
            None => bail!("connection refused"),
        }
    }
}

fn close(actual: f64, expected: f64) -> bool {
    (actual - expected).abs() < 1e-9
}

#[test]
fn scraped_results_compare_against_reference() {
    let dir = TempDir::new().unwrap();
    let store_path = dir.path().join("output/results.json");
    let stats_path = dir.path().join("output/stats.csv");

    let fetcher = CannedPages::new(&[
        (
            "swapped",
            &["https://www.b.com/", "http://a.com", "https://d.com", "https://c.com/", "https://b.com"],
        ),
        ("exact", &["https://only.org"]),
    ]);
    let config = RunnerConfig {
        store_path: store_path.clone(),
        failure_policy: FailurePolicy::Skip,
        ..Default::default()
    };
    let runner = QueryRunner::new(config, fetcher, ResultExtractor::bing().unwrap());

    let queries: Vec<String> = ["swapped", "exact", "unreachable"].iter().map(|q| q.to_string()).collect();
    let (results, summary) = runner.run(&queries, 4, None, false).unwrap();
    assert_eq!(summary.scraped, 2);
    assert_eq!(summary.failed, 1);

    // The persisted store is what a later comparison run reads back.
    let reloaded = ResultStore::load(&store_path).unwrap().expect("store saved");
    assert_eq!(reloaded, results);
    assert_eq!(
        reloaded.get("swapped").unwrap(),
        ["https://www.b.com/", "http://a.com", "https://d.com", "https://c.com/"]
    );

    let reference: ResultStore = [
        ("swapped", vec!["https://a.com", "https://b.com", "https://c.com", "https://d.com"]),
        ("exact", vec!["https://only.org/"]),
        ("unreachable", vec!["https://x.com", "https://y.com"]),
    ]
    .into_iter()
    .map(|(q, urls)| (q.to_string(), urls.into_iter().map(String::from).collect()))
    .collect();

    let report = Report::build(&reference, &reloaded);
    let rows: Vec<_> = report.rows.iter().map(|r| (r.query.as_str(), r.stats)).collect();

    assert_eq!(rows[0].0, "swapped");
    assert_eq!(rows[0].1.overlap_count, 4);
    assert!(close(rows[0].1.percent_overlap, 100.0));
    assert!(close(rows[0].1.correlation, 0.6));

    assert_eq!(rows[1].0, "exact");
    assert!(close(rows[1].1.correlation, 1.0));

    assert_eq!(rows[2].0, "unreachable");
    assert_eq!(rows[2].1.overlap_count, 0);

    let summary = report.aggregate.expect("three queries");
    assert!(close(summary.overlap_count, 5.0 / 3.0));
    assert!(close(summary.percent_overlap, 200.0 / 3.0));
    assert!(close(summary.correlation, 1.6 / 3.0));

    report.write_csv(&stats_path).unwrap();
    let csv = fs::read_to_string(&stats_path).unwrap();
    let lines: Vec<&str> = csv.lines().collect();
    assert_eq!(lines.len(), 5);
    assert_eq!(lines[0], "Query,OverlapCount,PercentOverlap,CorrelationCoefficient");
    assert!(lines[4].starts_with("Averages,"));
}

#[test]
fn rerun_updates_only_requested_queries() {
    let dir = TempDir::new().unwrap();
    let store_path = dir.path().join("results.json");

    let mut existing = ResultStore::new();
    existing.insert("first", vec!["https://first.org".to_string()]);
    existing.insert("second", vec!["https://stale.org".to_string()]);
    existing.save(&store_path).unwrap();

    let fetcher = CannedPages::new(&[("second", &["https://fresh.org"]), ("third", &["https://third.org"])]);
    let config = RunnerConfig {
        store_path: store_path.clone(),
        ..Default::default()
    };
    let runner = QueryRunner::new(config, fetcher, ResultExtractor::bing().unwrap());

    let queries = vec!["second".to_string(), "third".to_string()];
    let previous = ResultStore::load(&store_path).unwrap();
    runner.run(&queries, 10, previous, false).unwrap();

    let store = ResultStore::load(&store_path).unwrap().unwrap();
    let order: Vec<&str> = store.queries().collect();
    assert_eq!(order, vec!["first", "second", "third"]);
    assert_eq!(store.get("first").unwrap(), ["https://first.org"]);
    assert_eq!(store.get("second").unwrap(), ["https://fresh.org"]);
}
