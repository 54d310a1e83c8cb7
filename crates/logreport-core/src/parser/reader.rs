use super::line::{ParsedLine, parse_line};
use crate::Result;
use crate::logs::LogFile;
use flate2::read::MultiGzDecoder;
use serde::Serialize;
use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::path::Path;

const READ_BUFFER_BYTES: usize = 128 * 1024;

/// Line counters gathered over a full pass of a log file
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ParseCounts {
    pub total: u64,
    pub parsed: u64,
}

impl ParseCounts {
    pub fn unparsed(&self) -> u64 {
        self.total - self.parsed
    }

    /// Fraction of lines that failed to parse; an empty file has no errors
    pub fn error_ratio(&self) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        self.unparsed() as f64 / self.total as f64
    }

    pub fn exceeds(&self, threshold: f64) -> bool {
        self.error_ratio() > threshold
    }
}

pub struct LogReader;

impl LogReader {
    /// Open a selected log, decompressing transparently when needed
    pub fn open(log: &LogFile) -> Result<LogRecords<Box<dyn BufRead>>> {
        Self::open_path(&log.path, log.is_compressed)
    }

    /// Open any log file; gzip is assumed when the extension is `.gz`
    pub fn open_detected(path: &Path) -> Result<LogRecords<Box<dyn BufRead>>> {
        let is_compressed = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case("gz"));
        Self::open_path(path, is_compressed)
    }

    fn open_path(path: &Path, is_compressed: bool) -> Result<LogRecords<Box<dyn BufRead>>> {
        tracing::debug!(
            "Opening log file: {} (compressed: {})",
            path.display(),
            is_compressed
        );

        let file = File::open(path)?;
        let inner: Box<dyn Read> = if is_compressed {
            Box::new(MultiGzDecoder::new(file))
        } else {
            Box::new(file)
        };

        let reader: Box<dyn BufRead> = Box::new(BufReader::with_capacity(READ_BUFFER_BYTES, inner));
        Ok(LogRecords::new(reader))
    }
}

/// Single-pass iterator of parsed lines.
///
/// Yields one item per line. Malformed or non UTF-8 lines become
/// [`ParsedLine::Unparsed`]; read failures are yielded once as `Err` and end
/// the iteration. Counters are final once the iterator returns `None`.
pub struct LogRecords<R> {
    reader: R,
    buf: Vec<u8>,
    counts: ParseCounts,
    done: bool,
}

impl<R: BufRead> LogRecords<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            buf: Vec::new(),
            counts: ParseCounts::default(),
            done: false,
        }
    }

    pub fn counts(&self) -> ParseCounts {
        self.counts
    }

    fn parse_buffered(&self) -> ParsedLine {
        let mut bytes = self.buf.as_slice();
        if let Some(stripped) = bytes.strip_suffix(b"\n") {
            bytes = stripped;
        }
        if let Some(stripped) = bytes.strip_suffix(b"\r") {
            bytes = stripped;
        }

        let Ok(line) = std::str::from_utf8(bytes) else {
            return ParsedLine::Unparsed;
        };

        match parse_line(line) {
            Some(record) => ParsedLine::Record(record),
            None => ParsedLine::Unparsed,
        }
    }
}

impl<R: BufRead> Iterator for LogRecords<R> {
    type Item = Result<ParsedLine>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        self.buf.clear();
        match self.reader.read_until(b'\n', &mut self.buf) {
            Ok(0) => {
                self.done = true;
                tracing::debug!(
                    "Finished reading log: {} lines, {} parsed",
                    self.counts.total,
                    self.counts.parsed
                );
                None
            }
            Ok(_) => {
                let parsed = self.parse_buffered();
                self.counts.total += 1;
                if parsed.is_parsed() {
                    self.counts.parsed += 1;
                } else {
                    tracing::trace!("Unparsed line {}", self.counts.total);
                }
                Some(Ok(parsed))
            }
            Err(e) => {
                self.done = true;
                Some(Err(e.into()))
            }
        }
    }
}
