use crate::{Error, Result};
use std::path::PathBuf;

pub const DEFAULT_LOG_PREFIX: &str = "nginx-access-ui.log";
pub const DEFAULT_REPORT_SIZE: usize = 1000;
pub const DEFAULT_ERROR_THRESHOLD: f64 = 0.1;

/// Fully resolved settings for a single analyzer run.
///
/// How these values are gathered (files, flags, environment) is up to the
/// caller; the pipeline only ever sees this struct.
#[derive(Debug, Clone, PartialEq)]
pub struct AnalyzerConfig {
    /// Directory scanned for rotated access logs
    pub log_dir: PathBuf,
    /// Directory receiving `report-YYYY.MM.DD.html` artifacts
    pub report_dir: PathBuf,
    /// Maximum number of URLs in a report (`None` = unlimited)
    pub report_size: Option<usize>,
    /// Largest tolerated fraction of unparsed lines
    pub error_threshold: f64,
    /// File name prefix preceding `-YYYYMMDD[.gz]`
    pub log_prefix: String,
    /// Custom HTML template, bundled template when unset
    pub report_template: Option<PathBuf>,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            log_dir: PathBuf::from("./log"),
            report_dir: PathBuf::from("./reports"),
            report_size: Some(DEFAULT_REPORT_SIZE),
            error_threshold: DEFAULT_ERROR_THRESHOLD,
            log_prefix: DEFAULT_LOG_PREFIX.to_string(),
            report_template: None,
        }
    }
}

impl AnalyzerConfig {
    /// Set the report size limit, treating 0 as unlimited
    pub fn with_report_size(mut self, size: usize) -> Self {
        self.report_size = if size == 0 { None } else { Some(size) };
        self
    }

    pub fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.error_threshold) {
            return Err(Error::InvalidConfig(format!(
                "error threshold must be within [0, 1], got {}",
                self.error_threshold
            )));
        }

        if self.log_prefix.is_empty() {
            return Err(Error::InvalidConfig(
                "log prefix must not be empty".to_string(),
            ));
        }

        Ok(())
    }
}
