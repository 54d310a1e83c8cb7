use anyhow::{Context, Result};
use logreport_core::AnalyzerConfig;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

/// Keys accepted in a JSON configuration file.
///
/// Every key is optional; anything left out keeps its built-in default.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE", deny_unknown_fields)]
pub struct FileConfig {
    pub log_dir: Option<PathBuf>,
    pub report_dir: Option<PathBuf>,
    pub report_size: Option<usize>,
    pub error_threshold: Option<f64>,
    pub log_prefix: Option<String>,
    pub report_template: Option<PathBuf>,
    pub log_file: Option<PathBuf>,
}

/// Resolved settings for the binary
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Settings {
    pub analyzer: AnalyzerConfig,
    /// Append log output to this file instead of stderr
    pub log_file: Option<PathBuf>,
}

impl Settings {
    /// Built-in defaults, overridden by the given config file if any
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };

        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let file: FileConfig = serde_json::from_str(&content)
            .with_context(|| format!("Invalid config file {}", path.display()))?;

        let settings = Self::default().merge(file);
        settings
            .analyzer
            .validate()
            .with_context(|| format!("Invalid config file {}", path.display()))?;

        Ok(settings)
    }

    pub fn merge(mut self, file: FileConfig) -> Self {
        if let Some(log_dir) = file.log_dir {
            self.analyzer.log_dir = log_dir;
        }
        if let Some(report_dir) = file.report_dir {
            self.analyzer.report_dir = report_dir;
        }
        if let Some(size) = file.report_size {
            self.analyzer = self.analyzer.with_report_size(size);
        }
        if let Some(threshold) = file.error_threshold {
            self.analyzer.error_threshold = threshold;
        }
        if let Some(prefix) = file.log_prefix {
            self.analyzer.log_prefix = prefix;
        }
        if file.report_template.is_some() {
            self.analyzer.report_template = file.report_template;
        }
        if file.log_file.is_some() {
            self.log_file = file.log_file;
        }
        self
    }
}
