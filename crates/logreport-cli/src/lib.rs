use clap::ValueEnum;

pub mod commands;
pub mod config;

/// How command results are printed on stdout
#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
pub enum OutputFormat {
    /// Styled summary for a terminal
    Pretty,
    /// A single JSON document
    Json,
    /// Comma-separated rows with a header
    Table,
}

impl OutputFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pretty => "pretty",
            Self::Json => "json",
            Self::Table => "table",
        }
    }
}
