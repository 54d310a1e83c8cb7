mod line;
mod reader;

pub use line::{ParsedLine, ParsedRecord, parse_line};
pub use reader::{LogReader, LogRecords, ParseCounts};
