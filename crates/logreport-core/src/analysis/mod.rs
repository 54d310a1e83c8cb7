mod aggregator;
pub mod stats;

pub use aggregator::UrlAggregator;

use crate::Result;
use crate::parser::{LogRecords, ParseCounts};
use stats::round_report;
use serde::{Deserialize, Serialize};
use std::io::BufRead;

/// Timing summary for a single request path, as shown in the report
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UrlStat {
    pub url: String,
    pub count: u64,
    pub count_perc: f64,
    pub time_sum: f64,
    pub time_perc: f64,
    pub time_avg: f64,
    pub time_max: f64,
    pub time_med: f64,
}

impl UrlStat {
    /// Round every derived value to [`stats::REPORT_PRECISION`] digits
    pub fn rounded(self) -> Self {
        Self {
            count_perc: round_report(self.count_perc),
            time_sum: round_report(self.time_sum),
            time_perc: round_report(self.time_perc),
            time_avg: round_report(self.time_avg),
            time_max: round_report(self.time_max),
            time_med: round_report(self.time_med),
            ..self
        }
    }
}

/// Sort by total time, slowest first. Stable, so equal totals keep their
/// first-seen order.
pub fn sort_by_time_sum(stats: &mut [UrlStat]) {
    stats.sort_by(|a, b| b.time_sum.total_cmp(&a.time_sum));
}

/// Slowest URLs first, cut to `limit`, then rounded for display.
///
/// Ordering and truncation see the exact sums, so values that round to the
/// same number still rank correctly.
pub fn top_by_time_sum(mut stats: Vec<UrlStat>, limit: Option<usize>) -> Vec<UrlStat> {
    sort_by_time_sum(&mut stats);
    if let Some(limit) = limit {
        stats.truncate(limit);
    }
    stats.into_iter().map(UrlStat::rounded).collect()
}

/// Statistics and line counters from one full pass over a log
#[derive(Debug, Clone, PartialEq)]
pub struct LogAnalysis {
    /// Unrounded per-URL statistics in first-seen order
    pub stats: Vec<UrlStat>,
    pub counts: ParseCounts,
}

/// Consume every line of a log and derive its per-URL statistics
pub fn analyze_records<R: BufRead>(mut records: LogRecords<R>) -> Result<LogAnalysis> {
    let mut aggregator = UrlAggregator::new();
    aggregator.consume(&mut records)?;

    let counts = records.counts();
    tracing::info!(
        "Parsed {} of {} lines ({} distinct urls)",
        counts.parsed,
        counts.total,
        aggregator.url_count()
    );

    Ok(LogAnalysis {
        stats: aggregator.finish(),
        counts,
    })
}
