use super::UrlStat;
use super::stats;
use crate::Result;
use crate::parser::{ParsedLine, ParsedRecord};
use std::collections::HashMap;

#[derive(Debug, Default)]
struct UrlAggregate {
    url: String,
    request_times: Vec<f64>,
}

/// Collects request times per URL over one log pass.
///
/// URLs are kept in first-seen order so the derived table is deterministic.
#[derive(Debug, Default)]
pub struct UrlAggregator {
    index: HashMap<String, usize>,
    aggregates: Vec<UrlAggregate>,
    total_count: u64,
    total_time: f64,
}

impl UrlAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, record: ParsedRecord) {
        let slot = match self.index.get(&record.url) {
            Some(&slot) => slot,
            None => {
                let slot = self.aggregates.len();
                self.index.insert(record.url.clone(), slot);
                self.aggregates.push(UrlAggregate {
                    url: record.url,
                    request_times: Vec::new(),
                });
                slot
            }
        };

        self.aggregates[slot].request_times.push(record.request_time);
        self.total_count += 1;
        self.total_time += record.request_time;
    }

    /// Feed one parser result; unparsed lines are ignored
    pub fn push_line(&mut self, line: ParsedLine) {
        if let Some(record) = line.into_record() {
            self.push(record);
        }
    }

    /// Drain a record stream, stopping at the first read error
    pub fn consume<I>(&mut self, records: I) -> Result<()>
    where
        I: IntoIterator<Item = Result<ParsedLine>>,
    {
        for line in records {
            self.push_line(line?);
        }
        Ok(())
    }

    pub fn total_count(&self) -> u64 {
        self.total_count
    }

    pub fn total_time(&self) -> f64 {
        self.total_time
    }

    pub fn url_count(&self) -> usize {
        self.aggregates.len()
    }

    /// Derive per-URL statistics in first-seen order.
    ///
    /// Percentages are relative to every parsed record. Nothing is rounded;
    /// see [`UrlStat::rounded`].
    pub fn finish(self) -> Vec<UrlStat> {
        tracing::debug!(
            "Deriving statistics for {} urls over {} requests",
            self.aggregates.len(),
            self.total_count
        );

        let total_count = self.total_count;
        let total_time = self.total_time;

        self.aggregates
            .into_iter()
            .map(|aggregate| {
                let count = aggregate.request_times.len() as u64;
                let time_sum: f64 = aggregate.request_times.iter().sum();
                let time_max = stats::max(&aggregate.request_times).unwrap_or(0.0);
                let time_med = stats::median(&aggregate.request_times).unwrap_or(0.0);

                // All-zero request times leave nothing to apportion
                let time_perc = if total_time > 0.0 {
                    100.0 * time_sum / total_time
                } else {
                    0.0
                };

                UrlStat {
                    url: aggregate.url,
                    count,
                    count_perc: 100.0 * count as f64 / total_count as f64,
                    time_sum,
                    time_perc,
                    time_avg: time_sum / count as f64,
                    time_max,
                    time_med,
                }
            })
            .collect()
    }
}
