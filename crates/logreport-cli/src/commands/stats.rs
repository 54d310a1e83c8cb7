use crate::OutputFormat;
use anyhow::{Context, Result};
use logreport_core::analysis::{LogAnalysis, UrlStat, analyze_records, top_by_time_sum};
use logreport_core::parser::LogReader;
use serde::Serialize;
use std::io::{self, Write};
use std::path::Path;

#[derive(Debug, Serialize)]
struct StatsOutput<'a> {
    file: String,
    total_lines: u64,
    parsed_lines: u64,
    error_ratio: f64,
    table: &'a [UrlStat],
}

/// Parse and aggregate a single log file, slowest URLs first.
///
/// A `limit` of 0 or `None` keeps every URL. Values are rounded.
pub fn analyze_file(file: &Path, limit: Option<usize>) -> Result<LogAnalysis> {
    tracing::debug!("Reading log file: {}", file.display());

    let records = LogReader::open_detected(file)
        .with_context(|| format!("Failed to open log file {}", file.display()))?;
    let mut analysis = analyze_records(records)
        .with_context(|| format!("Failed to read log file {}", file.display()))?;

    analysis.stats = top_by_time_sum(analysis.stats, limit.filter(|&l| l > 0));

    Ok(analysis)
}

pub fn execute(file: &Path, limit: Option<usize>, format: OutputFormat) -> Result<()> {
    tracing::info!("Computing request time statistics for: {}", file.display());

    let analysis = analyze_file(file, limit)?;

    match format {
        OutputFormat::Json => output_json(file, &analysis)?,
        OutputFormat::Table => write_csv(io::stdout().lock(), &analysis.stats)?,
        OutputFormat::Pretty => output_pretty(file, &analysis),
    }

    Ok(())
}

fn output_pretty(file: &Path, analysis: &LogAnalysis) {
    use console::style;

    println!("\n{}", style("Request Time Statistics").bold().cyan());
    println!("{}", style("=======================").cyan());

    println!("\n{}", style("Summary:").bold());
    println!("  File:          {}", file.display());
    println!("  Total Lines:   {}", analysis.counts.total);
    println!("  Parsed Lines:  {}", analysis.counts.parsed);
    println!(
        "  Error Ratio:   {:.2}%",
        analysis.counts.error_ratio() * 100.0
    );

    if analysis.stats.is_empty() {
        println!("\n  No requests found");
        println!();
        return;
    }

    println!("\n{}", style("Slowest URLs (by total time):").bold());
    println!(
        "  {:>7} {:>8} {:>10} {:>8} {:>8} {:>8} {:>8}  URL",
        "count", "count%", "time_sum", "time%", "avg", "max", "med"
    );
    for stat in &analysis.stats {
        println!(
            "  {:>7} {:>8.3} {:>10.3} {:>8.3} {:>8.3} {:>8.3} {:>8.3}  {}",
            stat.count,
            stat.count_perc,
            stat.time_sum,
            stat.time_perc,
            stat.time_avg,
            stat.time_max,
            stat.time_med,
            stat.url
        );
    }

    println!(); // trailing newline
}

fn output_json(file: &Path, analysis: &LogAnalysis) -> Result<()> {
    let output = StatsOutput {
        file: file.display().to_string(),
        total_lines: analysis.counts.total,
        parsed_lines: analysis.counts.parsed,
        error_ratio: analysis.counts.error_ratio(),
        table: &analysis.stats,
    };
    let json = serde_json::to_string_pretty(&output)?;
    println!("{}", json);
    Ok(())
}

/// Write the table as CSV with a header row
pub fn write_csv<W: Write>(writer: W, stats: &[UrlStat]) -> Result<()> {
    let mut csv = csv::Writer::from_writer(writer);
    for stat in stats {
        csv.serialize(stat)?;
    }
    csv.flush()?;
    Ok(())
}
