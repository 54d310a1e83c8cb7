pub mod analysis;
pub mod config;
pub mod error;
pub mod logs;
pub mod parser;
pub mod pipeline;
pub mod report;

pub use config::AnalyzerConfig;
pub use error::{Error, Result};
pub use pipeline::{LogAnalyzer, RunOutcome};
