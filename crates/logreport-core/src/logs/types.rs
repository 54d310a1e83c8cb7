use chrono::NaiveDate;
use std::path::PathBuf;

/// A single rotated access log, identified by the date in its file name
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogFile {
    pub path: PathBuf,
    pub is_compressed: bool,
    pub generation_date: NaiveDate,
}

impl LogFile {
    pub fn new(path: PathBuf, is_compressed: bool, generation_date: NaiveDate) -> Self {
        Self {
            path,
            is_compressed,
            generation_date,
        }
    }
}
