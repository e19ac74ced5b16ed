//! Human-readable text report
//!
//! One line per result (`[OK 123ms] name — url` / `[FAIL reason] name — url`)
//! followed by a summary block.

use crate::checker::{summarize, ProbeResult, Summary};
use crate::output::traits::{selected, single_line, ExportFormat, Exporter, OutputResult};

const RULE_WIDTH: usize = 80;

/// Plain text report exporter
#[derive(Debug, Clone, Copy, Default)]
pub struct TextExporter;

impl Exporter for TextExporter {
    fn format(&self) -> ExportFormat {
        ExportFormat::Text
    }

    fn render(&self, results: &[ProbeResult], include_unavailable: bool) -> OutputResult<String> {
        Ok(format_text_report(results, include_unavailable))
    }
}

/// Renders results as a text report
pub fn export_text(results: &[ProbeResult], include_unavailable: bool) -> OutputResult<String> {
    TextExporter.render(results, include_unavailable)
}

/// Formats the report
///
/// The summary block always covers every result passed in, including
/// entries left out of the listing.
pub fn format_text_report(results: &[ProbeResult], include_unavailable: bool) -> String {
    let rule = "=".repeat(RULE_WIDTH);
    let mut text = String::new();

    text.push_str("IPTV Channel Test Results\n");
    text.push_str(&rule);
    text.push('\n');

    for result in selected(results, include_unavailable) {
        text.push_str(&format_line(result));
        text.push('\n');
    }

    text.push_str(&rule);
    text.push('\n');
    text.push_str(&format_summary_block(&summarize(results)));
    text
}

/// Formats a single result line
pub fn format_line(result: &ProbeResult) -> String {
    let tag = match result.latency_ms() {
        Some(ms) => format!("[OK {}ms]", ms),
        None => format!("[FAIL {}]", result.status_detail()),
    };
    let channel = result.channel();
    format!(
        "{} {} — {}",
        tag,
        single_line(channel.display_name()),
        channel.url.trim()
    )
}

/// Formats the summary block shared by the text report and the console
pub fn format_summary_block(summary: &Summary) -> String {
    let mut block = String::new();
    block.push_str("Summary\n");
    block.push_str(&format!("  Total:        {}\n", summary.total));
    block.push_str(&format!("  Available:    {}\n", summary.available));
    block.push_str(&format!("  Unavailable:  {}\n", summary.unavailable));
    if summary.unsupported > 0 {
        block.push_str(&format!(
            "  Manual check: {} (non-HTTP links)\n",
            summary.unsupported
        ));
    }
    block.push_str(&format!(
        "  Success rate: {:.1}%\n",
        summary.success_percent()
    ));
    block.push_str(&format!(
        "  Avg latency:  {:.1}ms\n",
        summary.avg_latency_ms
    ));
    block
}
