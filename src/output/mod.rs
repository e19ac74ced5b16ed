//! Output module for exporting check results
//!
//! This module handles:
//! - Serializing results as CSV, plain text, or M3U
//! - Writing export files
//! - Printing tables and statistics to the console

mod csv_export;
mod m3u;
pub mod stats;
pub mod text;
mod traits;

pub use csv_export::{export_csv, CsvExporter, CSV_HEADER};
pub use m3u::{export_m3u, M3uExporter};
pub use stats::{format_table, print_partial, print_summary, print_table};
pub use text::{export_text, TextExporter};
pub use traits::{ExportFormat, Exporter, OutputError, OutputResult};

use crate::checker::ProbeResult;
use std::path::{Path, PathBuf};

/// Writes export content to `path` as UTF-8, creating parent directories
pub fn write_export(path: &Path, content: &str) -> OutputResult<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    std::fs::write(path, content)?;
    Ok(())
}

/// Renders `results` in `format` and writes them to `path`
///
/// # Returns
///
/// * `Ok(usize)` - Number of results written
/// * `Err(OutputError)` - Rendering or writing failed
pub fn export_to_file(
    format: ExportFormat,
    results: &[ProbeResult],
    include_unavailable: bool,
    path: &Path,
) -> OutputResult<usize> {
    let content = format.exporter().render(results, include_unavailable)?;
    write_export(path, &content)?;

    let written = results
        .iter()
        .filter(|r| include_unavailable || r.reachable())
        .count();
    tracing::info!(
        "Exported {} channels as {} to {}",
        written,
        format.file_extension(),
        path.display()
    );
    Ok(written)
}

/// Joins an output directory and file name
pub fn output_path(directory: &str, file_name: &str) -> PathBuf {
    Path::new(directory).join(file_name)
}
