use crate::Result;
use crate::analysis::analyze_records;
use crate::config::AnalyzerConfig;
use crate::logs::{LogFile, LogSelector};
use crate::parser::{LogReader, ParseCounts};
use crate::report::{ReportContext, ReportRenderer, report_exists, report_path};
use std::path::PathBuf;

/// How a run ended. Every variant is a normal completion.
#[derive(Debug, Clone, PartialEq)]
pub enum RunOutcome {
    /// The log directory holds no matching file
    NoLogs,
    /// A report for the latest generation is already on disk
    AlreadyAnalyzed { log: LogFile, report: PathBuf },
    /// Too many lines failed to parse; nothing was written
    ErrorThresholdExceeded {
        log: LogFile,
        counts: ParseCounts,
        threshold: f64,
    },
    /// A new report was written
    Reported {
        log: LogFile,
        report: PathBuf,
        counts: ParseCounts,
        urls: usize,
    },
}

/// Selects the latest log, analyzes it and writes its report at most once
#[derive(Debug)]
pub struct LogAnalyzer {
    config: AnalyzerConfig,
    selector: LogSelector,
}

impl LogAnalyzer {
    pub fn new(config: AnalyzerConfig) -> Result<Self> {
        config.validate()?;
        let selector = LogSelector::new(&config.log_prefix)?;
        Ok(Self { config, selector })
    }

    pub fn config(&self) -> &AnalyzerConfig {
        &self.config
    }

    pub fn run<R>(&self, renderer: &R) -> Result<RunOutcome>
    where
        R: ReportRenderer + ?Sized,
    {
        let Some(log) = self.selector.latest(&self.config.log_dir)? else {
            tracing::debug!("No logs found in {}", self.config.log_dir.display());
            return Ok(RunOutcome::NoLogs);
        };

        let report = report_path(&self.config.report_dir, log.generation_date);
        if report_exists(&self.config.report_dir, log.generation_date) {
            tracing::debug!("Report already present: {}", report.display());
            return Ok(RunOutcome::AlreadyAnalyzed { log, report });
        }

        let records = LogReader::open(&log)?;
        let analysis = analyze_records(records)?;

        let threshold = self.config.error_threshold;
        if analysis.counts.exceeds(threshold) {
            tracing::debug!(
                "Error ratio {:.4} over threshold {} for {}",
                analysis.counts.error_ratio(),
                threshold,
                log.path.display()
            );
            return Ok(RunOutcome::ErrorThresholdExceeded {
                log,
                counts: analysis.counts,
                threshold,
            });
        }

        let context = ReportContext::new(log.generation_date, analysis.stats, self.config.report_size);
        renderer.render(&context, &report)?;

        Ok(RunOutcome::Reported {
            log,
            report,
            counts: analysis.counts,
            urls: context.table.len(),
        })
    }
}
