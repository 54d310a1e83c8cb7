use super::{ReportContext, ReportRenderer};
use crate::{Error, Result};
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

pub const TABLE_PLACEHOLDER: &str = "$table_json";

const BUNDLED_TEMPLATE: &str = include_str!("../../templates/report.html");

/// Renders the report table into an HTML template.
///
/// The template must contain `$table_json`, which is replaced with the
/// table as a JSON array.
#[derive(Debug, Clone)]
pub struct HtmlReportRenderer {
    template: String,
}

impl Default for HtmlReportRenderer {
    fn default() -> Self {
        Self {
            template: BUNDLED_TEMPLATE.to_string(),
        }
    }
}

impl HtmlReportRenderer {
    pub fn from_template(template: String) -> Result<Self> {
        if !template.contains(TABLE_PLACEHOLDER) {
            return Err(Error::InvalidTemplate(format!(
                "missing {} placeholder",
                TABLE_PLACEHOLDER
            )));
        }
        Ok(Self { template })
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        tracing::debug!("Loading report template from: {}", path.display());

        let template = fs::read_to_string(path)?;
        Self::from_template(template).map_err(|e| match e {
            Error::InvalidTemplate(msg) => {
                Error::InvalidTemplate(format!("{}: {}", path.display(), msg))
            }
            other => other,
        })
    }

    /// Produce the final HTML for a report
    pub fn to_html(&self, context: &ReportContext) -> Result<String> {
        // Keep the JSON from closing an enclosing <script> element
        let table_json = serde_json::to_string(&context.table)?.replace("</", r"<\/");
        Ok(self.template.replace(TABLE_PLACEHOLDER, &table_json))
    }
}

impl ReportRenderer for HtmlReportRenderer {
    fn render(&self, context: &ReportContext, target: &Path) -> Result<()> {
        tracing::debug!("Writing report to: {}", target.display());

        let html = self.to_html(context)?;

        if let Some(parent) = target.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)?;
        }

        // A partial file must never appear under the final name
        let staging = staging_path(target);
        let result = write_file(&staging, &html)
            .and_then(|()| fs::rename(&staging, target).map_err(Error::from));
        if result.is_err() {
            let _ = fs::remove_file(&staging);
        }
        result?;

        tracing::info!(
            "Wrote report with {} urls to {}",
            context.table.len(),
            target.display()
        );

        Ok(())
    }
}

fn staging_path(target: &Path) -> PathBuf {
    let mut name = target.file_name().unwrap_or_default().to_os_string();
    name.push(".tmp");
    target.with_file_name(name)
}

fn write_file(path: &Path, contents: &str) -> Result<()> {
    let mut writer = BufWriter::new(File::create(path)?);
    writer.write_all(contents.as_bytes())?;
    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::UrlStat;
    use crate::report::report_path;
    use chrono::NaiveDate;
    use tempfile::TempDir;

    fn context(urls: &[&str]) -> ReportContext {
        let table = urls
            .iter()
            .map(|url| UrlStat {
                url: url.to_string(),
                count: 1,
                count_perc: 100.0,
                time_sum: 0.5,
                time_perc: 100.0,
                time_avg: 0.5,
                time_max: 0.5,
                time_med: 0.5,
            })
            .collect();

        ReportContext::new(NaiveDate::from_ymd_opt(2017, 6, 30).unwrap(), table, None)
    }

    #[test]
    fn test_bundled_template_has_placeholder() {
        assert!(BUNDLED_TEMPLATE.contains(TABLE_PLACEHOLDER));
    }

    #[test]
    fn test_to_html_substitutes_table() {
        let renderer = HtmlReportRenderer::from_template("var table = $table_json;".to_string()).unwrap();

        let html = renderer.to_html(&context(&["/url/1"])).unwrap();

        assert!(html.starts_with("var table = [{"));
        assert!(html.contains("\"url\":\"/url/1\""));
        assert!(html.contains("\"time_med\":0.5"));
        assert!(!html.contains(TABLE_PLACEHOLDER));
    }

    #[test]
    fn test_script_close_is_escaped() {
        let renderer = HtmlReportRenderer::from_template("$table_json".to_string()).unwrap();

        let html = renderer.to_html(&context(&["/</script><b>"])).unwrap();
        assert!(!html.contains("</script>"));
    }

    #[test]
    fn test_template_without_placeholder_rejected() {
        let result = HtmlReportRenderer::from_template("<html></html>".to_string());
        assert!(matches!(result, Err(Error::InvalidTemplate(_))));
    }

    #[test]
    fn test_render_creates_report_dir() {
        let temp_dir = TempDir::new().unwrap();
        let report_dir = temp_dir.path().join("nested").join("reports");
        let ctx = context(&["/a", "/b"]);
        let target = report_path(&report_dir, ctx.generation_date);

        HtmlReportRenderer::default().render(&ctx, &target).unwrap();

        let html = fs::read_to_string(&target).unwrap();
        assert!(html.contains("\"url\":\"/b\""));
        assert!(!staging_path(&target).exists());
    }

    #[test]
    fn test_from_file() {
        let temp_dir = TempDir::new().unwrap();
        let good = temp_dir.path().join("good.html");
        let bad = temp_dir.path().join("bad.html");
        fs::write(&good, "<script>var t = $table_json;</script>").unwrap();
        fs::write(&bad, "<p>nothing</p>").unwrap();

        assert!(HtmlReportRenderer::from_file(&good).is_ok());
        assert!(HtmlReportRenderer::from_file(&bad).is_err());
        assert!(HtmlReportRenderer::from_file(&temp_dir.path().join("missing.html")).is_err());
    }
}
