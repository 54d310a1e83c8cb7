use super::types::LogFile;
use crate::{Error, Result};
use chrono::NaiveDate;
use regex::Regex;
use std::fs;
use std::io::ErrorKind;
use std::path::Path;

/// Finds the most recent log generation in a directory.
///
/// File names must look like `<prefix>-YYYYMMDD` or `<prefix>-YYYYMMDD.gz`.
/// Names whose date part is not a real calendar date are ignored.
#[derive(Debug, Clone)]
pub struct LogSelector {
    pattern: Regex,
}

struct Candidate {
    name: String,
    date: NaiveDate,
    is_compressed: bool,
}

impl LogSelector {
    pub fn new(prefix: &str) -> Result<Self> {
        if prefix.is_empty() {
            return Err(Error::InvalidPattern("empty log prefix".to_string()));
        }

        let source = format!(r"^{}-(?P<date>\d{{8}})(?P<gz>\.gz)?$", regex::escape(prefix));
        let pattern = Regex::new(&source)
            .map_err(|e| Error::InvalidPattern(format!("'{}': {}", prefix, e)))?;

        Ok(Self { pattern })
    }

    /// Return the log with the latest date in `dir`, if any.
    ///
    /// A missing directory yields `Ok(None)`. When two files carry the same
    /// date (e.g. plain and gzipped copies) the lexicographically smaller name
    /// wins, so the uncompressed file is preferred.
    pub fn latest(&self, dir: &Path) -> Result<Option<LogFile>> {
        tracing::debug!("Scanning log directory: {}", dir.display());

        let entries = match fs::read_dir(dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                tracing::debug!("Log directory does not exist: {}", dir.display());
                return Ok(None);
            }
            Err(e) => return Err(e.into()),
        };

        let mut best: Option<Candidate> = None;

        for entry in entries {
            let entry = entry?;
            // Follows symlinks; a dangling link is skipped
            if !entry.path().is_file() {
                continue;
            }

            let Some(name) = entry.file_name().to_str().map(str::to_string) else {
                continue;
            };

            let Some(candidate) = self.match_name(&name) else {
                continue;
            };

            let replace = match &best {
                None => true,
                Some(current) => {
                    candidate.date > current.date
                        || (candidate.date == current.date && candidate.name < current.name)
                }
            };

            if replace {
                best = Some(candidate);
            }
        }

        let selected = best.map(|c| LogFile::new(dir.join(&c.name), c.is_compressed, c.date));

        match &selected {
            Some(log) => tracing::info!(
                "Selected log {} for {}",
                log.path.display(),
                log.generation_date
            ),
            None => tracing::debug!("No matching log files in {}", dir.display()),
        }

        Ok(selected)
    }

    fn match_name(&self, name: &str) -> Option<Candidate> {
        let caps = self.pattern.captures(name)?;
        let raw_date = caps.name("date")?.as_str();

        let date = match NaiveDate::parse_from_str(raw_date, "%Y%m%d") {
            Ok(date) => date,
            Err(e) => {
                tracing::debug!("Skipping {}: bad date '{}': {}", name, raw_date, e);
                return None;
            }
        };

        Some(Candidate {
            name: name.to_string(),
            date,
            is_compressed: caps.name("gz").is_some(),
        })
    }
}
