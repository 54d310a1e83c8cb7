mod selector;
mod types;

pub use selector::LogSelector;
pub use types::LogFile;
