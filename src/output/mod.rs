//! Report rendering and persistence

pub mod formatter;
pub mod report;

pub use formatter::{ConsoleFormatter, JsonFormatter, OutputFormatter};
pub use report::{MatchReport, ReportMetadata};
