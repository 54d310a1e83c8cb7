use crate::OutputFormat;
use crate::config::Settings;
use anyhow::Result;
use logreport_core::report::HtmlReportRenderer;
use logreport_core::{LogAnalyzer, RunOutcome};
use serde::Serialize;
use std::io;

/// Flat view of a run outcome for printing
#[derive(Debug, Clone, Serialize)]
pub struct OutcomeSummary {
    pub outcome: &'static str,
    pub log: Option<String>,
    pub report: Option<String>,
    pub total_lines: Option<u64>,
    pub parsed_lines: Option<u64>,
    pub error_ratio: Option<f64>,
    pub urls: Option<usize>,
}

impl OutcomeSummary {
    pub fn from_outcome(outcome: &RunOutcome) -> Self {
        let empty = Self {
            outcome: "no_logs",
            log: None,
            report: None,
            total_lines: None,
            parsed_lines: None,
            error_ratio: None,
            urls: None,
        };

        match outcome {
            RunOutcome::NoLogs => empty,
            RunOutcome::AlreadyAnalyzed { log, report } => Self {
                outcome: "already_analyzed",
                log: Some(log.path.display().to_string()),
                report: Some(report.display().to_string()),
                ..empty
            },
            RunOutcome::ErrorThresholdExceeded { log, counts, .. } => Self {
                outcome: "error_threshold_exceeded",
                log: Some(log.path.display().to_string()),
                total_lines: Some(counts.total),
                parsed_lines: Some(counts.parsed),
                error_ratio: Some(counts.error_ratio()),
                ..empty
            },
            RunOutcome::Reported {
                log,
                report,
                counts,
                urls,
            } => Self {
                outcome: "reported",
                log: Some(log.path.display().to_string()),
                report: Some(report.display().to_string()),
                total_lines: Some(counts.total),
                parsed_lines: Some(counts.parsed),
                error_ratio: Some(counts.error_ratio()),
                urls: Some(*urls),
            },
        }
    }
}

/// Run the analyzer once with the given settings
pub fn run_analysis(settings: &Settings) -> Result<RunOutcome> {
    let config = &settings.analyzer;
    tracing::debug!(
        "Analyzing logs in {} into {}",
        config.log_dir.display(),
        config.report_dir.display()
    );

    let renderer = match &config.report_template {
        Some(path) => HtmlReportRenderer::from_file(path)?,
        None => HtmlReportRenderer::default(),
    };

    let analyzer = LogAnalyzer::new(config.clone())?;
    let outcome = analyzer.run(&renderer)?;

    log_outcome(&outcome, config.error_threshold);
    Ok(outcome)
}

pub fn execute(settings: &Settings, format: OutputFormat) -> Result<()> {
    let outcome = run_analysis(settings)?;
    let summary = OutcomeSummary::from_outcome(&outcome);

    match format {
        OutputFormat::Json => output_json(&summary)?,
        OutputFormat::Table => output_table(&summary)?,
        OutputFormat::Pretty => output_pretty(&summary),
    }

    Ok(())
}

fn log_outcome(outcome: &RunOutcome, threshold: f64) {
    match outcome {
        RunOutcome::NoLogs => tracing::info!("No logs available, nothing to do"),
        RunOutcome::AlreadyAnalyzed { log, report } => tracing::info!(
            "Log {} already analyzed: {}",
            log.generation_date,
            report.display()
        ),
        RunOutcome::ErrorThresholdExceeded { log, counts, .. } => tracing::warn!(
            "Error threshold exceeded for {}: {} of {} lines unparsed ({:.2}% > {:.2}%)",
            log.path.display(),
            counts.unparsed(),
            counts.total,
            counts.error_ratio() * 100.0,
            threshold * 100.0
        ),
        RunOutcome::Reported { report, urls, .. } => {
            tracing::info!("Report ready: {} ({} urls)", report.display(), urls)
        }
    }
}

fn output_pretty(summary: &OutcomeSummary) {
    use console::style;

    let headline = match summary.outcome {
        "reported" => style("Report generated").bold().green(),
        "already_analyzed" => style("Already analyzed").bold().cyan(),
        "error_threshold_exceeded" => style("Error threshold exceeded").bold().yellow(),
        _ => style("No logs available").bold().dim(),
    };
    println!("{}", headline);

    if let Some(log) = &summary.log {
        println!("  Log:          {}", log);
    }
    if let Some(report) = &summary.report {
        println!("  Report:       {}", report);
    }
    if let (Some(total), Some(parsed)) = (summary.total_lines, summary.parsed_lines) {
        println!("  Lines:        {} parsed of {}", parsed, total);
    }
    if let Some(ratio) = summary.error_ratio {
        println!("  Error ratio:  {:.2}%", ratio * 100.0);
    }
    if let Some(urls) = summary.urls {
        println!("  URLs:         {}", urls);
    }
}

fn output_json(summary: &OutcomeSummary) -> Result<()> {
    let json = serde_json::to_string_pretty(summary)?;
    println!("{}", json);
    Ok(())
}

fn output_table(summary: &OutcomeSummary) -> Result<()> {
    let mut rows = vec![("Outcome", summary.outcome.to_string())];
    if let Some(log) = &summary.log {
        rows.push(("Log", log.clone()));
    }
    if let Some(report) = &summary.report {
        rows.push(("Report", report.clone()));
    }
    if let Some(total) = summary.total_lines {
        rows.push(("Total Lines", total.to_string()));
    }
    if let Some(parsed) = summary.parsed_lines {
        rows.push(("Parsed Lines", parsed.to_string()));
    }
    if let Some(ratio) = summary.error_ratio {
        rows.push(("Error Ratio", format!("{:.4}", ratio)));
    }
    if let Some(urls) = summary.urls {
        rows.push(("URLs", urls.to_string()));
    }

    let mut csv = csv::Writer::from_writer(io::stdout().lock());
    csv.write_record(["Metric", "Value"])?;
    for (metric, value) in rows {
        csv.write_record([metric, value.as_str()])?;
    }
    csv.flush()?;
    Ok(())
}
