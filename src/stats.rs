use std::collections::HashMap;

use crate::canonical::canonicalize;

/// Agreement between a reference result list and a scraped one.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QueryStats {
    pub overlap_count: usize,
    /// Share of the reference list found in the other list, 0 to 100.
    pub percent_overlap: f64,
    /// Spearman rank correlation over the overlapping results, -1 to 1.
    pub correlation: f64,
}

/// Mean of each [`QueryStats`] field across a corpus.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AggregateStats {
    pub overlap_count: f64,
    pub percent_overlap: f64,
    pub correlation: f64,
}

/// Canonical URL to 1-based rank. A URL listed twice keeps its later rank.
fn rank_map(results: &[String]) -> HashMap<String, usize> {
    results
        .iter()
        .enumerate()
        .map(|(index, url)| (canonicalize(url), index + 1))
        .collect()
}

/// Compare `reference` against `other`.
///
/// Percent overlap is relative to the reference list's length; an empty
/// reference list has 0% overlap.
pub fn compare_query(reference: &[String], other: &[String]) -> QueryStats {
    let n = reference.len();
    let reference_ranks = rank_map(reference);
    let other_ranks = rank_map(other);

    let mut overlap_count = 0usize;
    let mut sum_squared_d = 0usize;
    for (url, rank) in &reference_ranks {
        if let Some(other_rank) = other_ranks.get(url) {
            overlap_count += 1;
            sum_squared_d += rank.abs_diff(*other_rank).pow(2);
        }
    }

    let percent_overlap = if n == 0 {
        0.0
    } else {
        overlap_count as f64 / n as f64 * 100.0
    };

    QueryStats {
        overlap_count,
        percent_overlap,
        correlation: spearman(overlap_count, sum_squared_d),
    }
}

fn spearman(overlap_count: usize, sum_squared_d: usize) -> f64 {
    match (overlap_count, sum_squared_d) {
        (0, _) => 0.0,
        (1, 0) => 1.0,
        (1, _) => 0.0,
        (n, d) => {
            let n = n as f64;
            let coefficient = 1.0 - 6.0 * d as f64 / (n * (n * n - 1.0));
            // Ranks are positions in the full lists rather than within the
            // overlap, so the raw value can fall below -1.
            coefficient.clamp(-1.0, 1.0)
        }
    }
}

/// Arithmetic mean of every metric, or `None` for an empty corpus.
pub fn aggregate(stats: &[QueryStats]) -> Option<AggregateStats> {
    if stats.is_empty() {
        return None;
    }

    let count = stats.len() as f64;
    let (overlap, percent, correlation) = stats.iter().fold((0.0, 0.0, 0.0), |acc, s| {
        (
            acc.0 + s.overlap_count as f64,
            acc.1 + s.percent_overlap,
            acc.2 + s.correlation,
        )
    });

    Some(AggregateStats {
        overlap_count: overlap / count,
        percent_overlap: percent / count,
        correlation: correlation / count,
    })
}
