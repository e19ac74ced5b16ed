//! Exporter trait and output error types

use crate::checker::ProbeResult;
use thiserror::Error;

/// Errors that can occur during output operations
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Failed to format output: {0}")]
    Format(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for output operations
pub type OutputResult<T> = Result<T, OutputError>;

/// Supported export formats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExportFormat {
    Csv,
    Text,
    M3u,
}

impl ExportFormat {
    /// All formats, in the order "export all" writes them
    pub const ALL: [ExportFormat; 3] = [Self::Csv, Self::Text, Self::M3u];

    pub fn file_extension(&self) -> &'static str {
        match self {
            Self::Csv => "csv",
            Self::Text => "txt",
            Self::M3u => "m3u",
        }
    }

    /// Returns the exporter for this format
    pub fn exporter(&self) -> Box<dyn Exporter> {
        match self {
            Self::Csv => Box::new(super::CsvExporter),
            Self::Text => Box::new(super::TextExporter),
            Self::M3u => Box::new(super::M3uExporter),
        }
    }
}

/// Serializes probe results into one output format
///
/// Implementations are pure: the same input always renders the same bytes,
/// and results are never modified.
pub trait Exporter: Send + Sync {
    fn format(&self) -> ExportFormat;

    /// Renders `results`; unreachable entries are left out unless
    /// `include_unavailable` is set
    fn render(&self, results: &[ProbeResult], include_unavailable: bool) -> OutputResult<String>;
}

/// Results selected for export, in input order
pub(crate) fn selected(
    results: &[ProbeResult],
    include_unavailable: bool,
) -> impl Iterator<Item = &ProbeResult> {
    results
        .iter()
        .filter(move |r| include_unavailable || r.reachable())
}

/// Replaces line breaks so a name always stays on one output line
pub(crate) fn single_line(name: &str) -> String {
    name.replace(['\r', '\n'], " ")
}
