//! CSV export

use crate::checker::ProbeResult;
use crate::output::traits::{selected, ExportFormat, Exporter, OutputError, OutputResult};
use csv::WriterBuilder;

/// CSV header row
pub const CSV_HEADER: [&str; 5] = ["name", "url", "reachable", "latency_ms", "status_detail"];

/// Writes `name,url,reachable,latency_ms,status_detail` rows
///
/// The name is emitted raw (possibly empty); `latency_ms` is empty for
/// unreachable entries. Fields containing a comma, quote, or line break are
/// quoted.
#[derive(Debug, Clone, Copy, Default)]
pub struct CsvExporter;

impl Exporter for CsvExporter {
    fn format(&self) -> ExportFormat {
        ExportFormat::Csv
    }

    fn render(&self, results: &[ProbeResult], include_unavailable: bool) -> OutputResult<String> {
        let mut writer = WriterBuilder::new().from_writer(Vec::new());
        writer.write_record(CSV_HEADER)?;

        for result in selected(results, include_unavailable) {
            let latency = result
                .latency_ms()
                .map(|ms| ms.to_string())
                .unwrap_or_default();
            let reachable = if result.reachable() { "true" } else { "false" };

            writer.write_record([
                result.channel().name.as_str(),
                result.channel().url.as_str(),
                reachable,
                latency.as_str(),
                result.status_detail().as_str(),
            ])?;
        }

        let bytes = writer
            .into_inner()
            .map_err(|e| OutputError::Format(e.to_string()))?;
        String::from_utf8(bytes).map_err(|e| OutputError::Format(e.to_string()))
    }
}

/// Renders results as CSV
pub fn export_csv(results: &[ProbeResult], include_unavailable: bool) -> OutputResult<String> {
    CsvExporter.render(results, include_unavailable)
}
