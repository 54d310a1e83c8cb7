mod writer;

pub use writer::{HtmlReportRenderer, TABLE_PLACEHOLDER};

use crate::Result;
use crate::analysis::{UrlStat, top_by_time_sum};
use chrono::NaiveDate;
use std::path::{Path, PathBuf};

/// Everything a renderer needs to produce one report
#[derive(Debug, Clone)]
pub struct ReportContext {
    pub generation_date: NaiveDate,
    pub table: Vec<UrlStat>,
    pub size_limit: Option<usize>,
}

impl ReportContext {
    /// Order the table by total time, slowest first, apply the size limit
    /// and round the remaining rows
    pub fn new(
        generation_date: NaiveDate,
        stats: Vec<UrlStat>,
        size_limit: Option<usize>,
    ) -> Self {
        Self {
            generation_date,
            table: top_by_time_sum(stats, size_limit),
            size_limit,
        }
    }
}

/// Serializes a finished report to disk
pub trait ReportRenderer {
    fn render(&self, context: &ReportContext, target: &Path) -> Result<()>;
}

/// Location of the report for a log generation
pub fn report_path(report_dir: &Path, date: NaiveDate) -> PathBuf {
    report_dir.join(format!("report-{}.html", date.format("%Y.%m.%d")))
}

pub fn report_exists(report_dir: &Path, date: NaiveDate) -> bool {
    report_path(report_dir, date).is_file()
}
